mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use handlers::LogHandler;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &EditorEvent);
}

// Re-export the event types
pub use events::EditorEvent;
pub use events::ExportEvent;
pub use events::HistoryEvent;
pub use events::LayerEvent;
