use crate::layer::LayerId;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    LayerChanged(LayerEvent),
    SelectionChanged {
        old: Option<LayerId>,
        new: Option<LayerId>,
    },
    HistoryChanged(HistoryEvent),
    ExportChanged(ExportEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerEvent {
    Added { id: LayerId },
    Removed { id: LayerId },
    Updated { id: LayerId },
    Duplicated { source: LayerId, copy: LayerId },
    Reordered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEvent {
    Undone { index: usize },
    Redone { index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Started { filename: String },
    Saved { filename: String },
    Failed { message: String },
}
