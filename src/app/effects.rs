use crate::app::{App, Message, Model};
use crate::image::{PendingRead, acquire};

impl App {
    /// Run the I/O a message asks for after `update` has applied it.
    pub(super) fn handle_message_side_effects(
        model: &Model,
        pending_reads: &mut Vec<PendingRead>,
        msg: &Message,
    ) {
        Self::drop_stale_reads(model, pending_reads);
        if !matches!(msg, Message::ImageUpload) {
            return;
        }
        let Some(edit) = model.image_edit() else {
            return;
        };
        if !edit.reading || pending_reads.iter().any(|p| p.block() == edit.block) {
            return;
        }
        let path = acquire::expand_path(&edit.path);
        tracing::info!(block = %edit.block, path = %path.display(), "reading image file");
        pending_reads.push(acquire::spawn_read(edit.block, path));
    }

    /// Forget reads whose image panel closed or stopped reading.
    fn drop_stale_reads(model: &Model, pending_reads: &mut Vec<PendingRead>) {
        let reading = model
            .image_edit()
            .filter(|edit| edit.reading)
            .map(|edit| edit.block);
        pending_reads.retain(|pending| {
            let live = reading == Some(pending.block());
            if !live {
                tracing::debug!(
                    block = %pending.block(),
                    path = %pending.path().display(),
                    "image read abandoned"
                );
            }
            live
        });
    }

    /// Turn finished background reads into messages.
    pub(super) fn poll_pending_reads(pending_reads: &mut Vec<PendingRead>) -> Vec<Message> {
        let mut messages = Vec::new();
        pending_reads.retain(|pending| match pending.try_take() {
            None => true,
            Some(Ok(uri)) => {
                tracing::info!(block = %pending.block(), bytes = uri.len(), "image file encoded");
                messages.push(Message::ImageAcquired(pending.block(), uri));
                false
            }
            Some(Err(err)) => {
                tracing::warn!(
                    block = %pending.block(),
                    path = %pending.path().display(),
                    error = %err,
                    "image file rejected"
                );
                messages.push(Message::ImageRejected(pending.block(), err.user_message()));
                false
            }
        });
        messages
    }
}
