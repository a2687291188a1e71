use crate::event::{EditorEvent, EventHandler, ExportEvent};

/// Writes every editor event to the log
#[derive(Debug, Default)]
pub struct LogHandler;

impl EventHandler for LogHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::ExportChanged(ExportEvent::Failed { message }) => {
                log::error!("{}", message);
            }
            EditorEvent::ExportChanged(export) => log::info!("{:?}", export),
            other => log::debug!("{:?}", other),
        }
    }
}
