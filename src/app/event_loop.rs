use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::image::PendingRead;
use crate::page::Page;

const RESIZE_DEBOUNCE_MS: u64 = 100;
const IDLE_POLL_MS: u64 = 250;
const BUSY_POLL_MS: u64 = 10;

/// Holds back terminal resizes until the size has been stable for a while.
pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    latest: Option<QueuedResize>,
}

#[derive(Clone, Copy)]
struct QueuedResize {
    width: u16,
    height: u16,
    at_ms: u64,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            latest: None,
        }
    }

    /// Remember the newest size. Each call restarts the delay.
    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.latest = Some(QueuedResize {
            width,
            height,
            at_ms: now_ms,
        });
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let queued = self.latest?;
        if now_ms.saturating_sub(queued.at_ms) < self.delay_ms {
            return None;
        }
        self.latest = None;
        Some((queued.width, queued.height))
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.latest.is_some()
    }
}

/// Bookkeeping carried across iterations of the event loop.
struct LoopState {
    started: Instant,
    resize: ResizeDebouncer,
    reads: Vec<PendingRead>,
    frame: u64,
    dirty: bool,
}

impl LoopState {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            resize: ResizeDebouncer::new(RESIZE_DEBOUNCE_MS),
            reads: Vec::new(),
            frame: 0,
            dirty: true,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Apply `msg`, then start whatever I/O it asks for.
    fn dispatch(&mut self, model: &mut Model, msg: Message) {
        let effect = msg.clone();
        *model = update(std::mem::take(model), msg);
        App::handle_message_side_effects(model, &mut self.reads, &effect);
        self.dirty = true;
    }

    fn poll_timeout(&self) -> Duration {
        let ms = if self.dirty {
            0
        } else if self.resize.is_pending() || !self.reads.is_empty() {
            BUSY_POLL_MS
        } else {
            IDLE_POLL_MS
        };
        Duration::from_millis(ms)
    }

    /// Timers and background work that finish without user input.
    fn tick(&mut self, model: &mut Model) {
        if model.expire_toast(Instant::now()) {
            self.dirty = true;
        }
        if let Some((width, height)) = self.resize.take_ready(self.elapsed_ms()) {
            crate::perf::log_event(
                "event.resize.apply",
                format!("frame={} width={width} height={height}", self.frame),
            );
            self.dispatch(model, Message::Resize(width, height));
        }
        for msg in App::poll_pending_reads(&mut self.reads) {
            crate::perf::log_event("image.read.done", format!("frame={} msg={msg:?}", self.frame));
            self.dispatch(model, msg);
        }
        model.set_resize_pending(self.resize.is_pending());
    }

    /// Read one input event, then everything already queued behind it, so a
    /// burst of key repeats costs one frame.
    fn read_input(&mut self, model: &mut Model) -> Result<()> {
        if !event::poll(self.poll_timeout())? {
            return Ok(());
        }
        let mut handled = 0_u32;
        loop {
            let now_ms = self.elapsed_ms();
            if let Some(msg) = App::handle_event(&event::read()?, model, now_ms, &mut self.resize)
            {
                crate::perf::log_event("event.message", format!("frame={} msg={msg:?}", self.frame));
                self.dispatch(model, msg);
                handled += 1;
            }
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }
        if handled > 1 {
            crate::perf::log_event(
                "event.drain",
                format!("frame={} handled={handled}", self.frame),
            );
        }
        Ok(())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        self.frame += 1;

        let prep = Instant::now();
        model.load_page_images();
        crate::perf::log_event(
            "frame.prep",
            format!(
                "frame={} prep_ms={:.3} protocols={}",
                self.frame,
                prep.elapsed().as_secs_f64() * 1000.0,
                model.image_protocols.len(),
            ),
        );

        let draw = Instant::now();
        terminal.draw(|frame| App::view(model, frame))?;
        crate::perf::log_event(
            "frame.draw",
            format!(
                "frame={} draw_ms={:.3}",
                self.frame,
                draw.elapsed().as_secs_f64() * 1000.0
            ),
        );
        self.dirty = false;
        Ok(())
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        // The picker queries stdio, so it has to run before raw mode.
        let picker = if self.images_enabled {
            let _picker_scope = crate::perf::scope("app.create_picker");
            crate::image::create_picker(self.force_half_cell)
        } else {
            None
        };

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; pagecraft requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let page = if self.seed_demo {
            Page::demo()
        } else {
            Page::new()
        };
        tracing::info!(
            width = size.width,
            height = size.height,
            blocks = page.len(),
            device = ?self.device,
            "session started"
        );

        let mut model = Model::new(page, (size.width, size.height)).with_picker(picker);
        model.device = self.device;
        model.images_enabled = self.images_enabled;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        let _ = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste);
        let result = Self::event_loop(&mut terminal, &mut model);
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut state = LoopState::new();
        while !model.should_quit {
            state.tick(model);
            state.read_input(model)?;
            if state.dirty && !model.should_quit {
                state.draw(terminal, model)?;
            }
        }
        Ok(())
    }
}
