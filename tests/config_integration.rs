use std::path::PathBuf;

use pagecraft::config::{
    ConfigFlags, ThemeMode, clear_config_flags, load_config_flags, parse_flag_tokens,
    save_config_flags,
};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".pagecraftrc");
    let content = r"
# comment
--mobile

--theme light
   
--render-debug-log=render.log
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.mobile);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
    assert!(!flags.seed_demo);
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".pagecraftrc");
    let content = "--mobile\n--theme light\n--render-debug-log file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "pagecraft".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--seed-demo".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);
    let merged = file_flags.union(&cli_flags);

    assert!(merged.mobile);
    assert!(merged.seed_demo);
    assert_eq!(merged.theme, Some(ThemeMode::Dark));
    assert_eq!(merged.render_debug_log, Some(PathBuf::from("file.log")));
}

#[test]
fn test_parse_flag_tokens_accepts_equals_syntax() {
    let args = vec![
        "pagecraft".to_string(),
        "--theme=dark".to_string(),
        "--render-debug-log=render.log".to_string(),
    ];
    let flags = parse_flag_tokens(&args);
    assert_eq!(flags.theme, Some(ThemeMode::Dark));
    assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
}

#[test]
fn test_local_file_layers_over_global_file() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".pagecraftrc");
    std::fs::write(&global, "--no-images\n--theme light\n").unwrap();
    std::fs::write(&local, "--theme dark\n--perf\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert!(merged.no_images);
    assert!(merged.perf);
    assert_eq!(merged.theme, Some(ThemeMode::Dark));
}

#[test]
fn test_saved_flags_survive_a_reload_until_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pagecraft").join("config");
    let flags = ConfigFlags {
        mobile: true,
        force_half_cell: true,
        ..ConfigFlags::default()
    };

    save_config_flags(&path, &flags).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with('#'));
    assert_eq!(load_config_flags(&path).unwrap(), flags);

    clear_config_flags(&path).unwrap();
    assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
}
