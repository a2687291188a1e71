use crate::command::Command;
use crate::error::UploadError;
use crate::image::{ImageRef, UploadedImage};
use eframe::egui;
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const ACCEPTED_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// What an upload must satisfy before it is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadLimits {
    pub max_bytes: usize,
    pub accepted_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            accepted_types: ACCEPTED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UploadLimits {
    /// Type first, then size.
    pub fn check(&self, mime: &str, size: usize) -> Result<(), UploadError> {
        if !self.accepted_types.iter().any(|t| t == mime) {
            return Err(UploadError::UnsupportedType(mime.to_string()));
        }
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// MIME type implied by a file name's extension.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Validates and decodes an in-memory upload.
pub fn decode_upload(
    name: &str,
    mime: &str,
    bytes: &[u8],
    limits: &UploadLimits,
) -> Result<ImageRef, UploadError> {
    limits.check(mime, bytes.len())?;
    let pixels = image::load_from_memory(bytes)?.to_rgba8();
    log::debug!("Decoded '{}': {}x{}", name, pixels.width(), pixels.height());
    Ok(UploadedImage::new_ref(name, pixels))
}

/// Validates and decodes an upload on disk. The size is checked from the
/// file's metadata so oversized files are never read.
pub fn read_upload(path: &Path, limits: &UploadLimits) -> Result<ImageRef, UploadError> {
    UploadSource::from_path(path).load(limits)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Identifies one upload attempt; later attempts supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UploadTicket(u64);

/// Hands out tickets and rejects completions from superseded uploads.
#[derive(Debug, Default)]
pub struct UploadTracker {
    latest: u64,
}

impl UploadTracker {
    pub fn begin(&mut self) -> UploadTicket {
        self.latest += 1;
        UploadTicket(self.latest)
    }

    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Turns a finished decode into the command to dispatch.
    ///
    /// Returns `None` if a newer upload has started since `ticket` was issued.
    pub fn complete(
        &self,
        ticket: UploadTicket,
        result: Result<ImageRef, UploadError>,
    ) -> Option<Result<Command, UploadError>> {
        if !self.is_current(ticket) {
            log::debug!("Discarding stale upload result {:?}", ticket);
            return None;
        }
        Some(result.map(Command::SetImage))
    }
}

/// Where the bytes of an upload come from.
#[derive(Debug, Clone)]
pub enum UploadContent {
    Bytes(Arc<[u8]>),
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct UploadSource {
    pub name: String,
    /// Declared type; guessed from the name when empty
    pub mime: String,
    pub content: UploadContent,
}

impl UploadSource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            mime: String::new(),
            content: UploadContent::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: String::new(),
            content: UploadContent::Bytes(bytes.into()),
        }
    }

    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        let content = match (&file.bytes, &file.path) {
            (Some(bytes), _) => UploadContent::Bytes(bytes.clone()),
            (None, Some(path)) => UploadContent::Path(path.clone()),
            (None, None) => {
                log::warn!("Dropped file '{}' has no accessible data", file.name);
                return None;
            }
        };
        let name = match (&file.path, file.name.is_empty()) {
            (Some(path), true) => display_name(path),
            (_, false) => file.name.clone(),
            (None, true) => "unknown".to_owned(),
        };
        Some(Self {
            name,
            mime: file.mime.clone(),
            content,
        })
    }

    fn mime(&self) -> &str {
        if self.mime.is_empty() {
            mime_from_name(&self.name).unwrap_or_default()
        } else {
            &self.mime
        }
    }

    fn load(&self, limits: &UploadLimits) -> Result<ImageRef, UploadError> {
        match &self.content {
            UploadContent::Bytes(bytes) => decode_upload(&self.name, self.mime(), bytes, limits),
            UploadContent::Path(path) => {
                let size = std::fs::metadata(path)?.len() as usize;
                limits.check(self.mime(), size)?;
                let bytes = std::fs::read(path)?;
                decode_upload(&self.name, self.mime(), &bytes, limits)
            }
        }
    }
}

struct PendingUpload {
    ticket: UploadTicket,
    receiver: oneshot::Receiver<Result<ImageRef, UploadError>>,
}

/// Accepts dropped or opened images, decodes them off the UI thread and
/// yields `SetImage` commands. Keeps the message of the latest failure.
pub struct FileHandler {
    limits: UploadLimits,
    tracker: UploadTracker,
    pending: Vec<PendingUpload>,
    error: Option<String>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new(UploadLimits::default())
    }
}

impl FileHandler {
    pub fn new(limits: UploadLimits) -> Self {
        Self {
            limits,
            tracker: UploadTracker::default(),
            pending: Vec::new(),
            error: None,
        }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// User-visible message of the last failed upload.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Starts an upload from the first file dropped this frame, if any.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(UploadSource::from_dropped));
        match dropped {
            Some(source) => {
                let repaint = ctx.clone();
                self.start(source, move || repaint.request_repaint());
                true
            }
            None => false,
        }
    }

    /// Validates and decodes `source` on a worker thread.
    ///
    /// Type and size are checked on the worker too, so a rejected file is
    /// reported through [`FileHandler::poll`] like any other failure.
    pub fn start(&mut self, source: UploadSource, notify: impl FnOnce() + Send + 'static) -> UploadTicket {
        let ticket = self.tracker.begin();
        let limits = self.limits.clone();
        let (sender, receiver) = oneshot::channel();
        log::info!("Loading upload '{}'", source.name);

        std::thread::spawn(move || {
            let _ = sender.send(source.load(&limits));
            notify();
        });

        self.pending.push(PendingUpload { ticket, receiver });
        ticket
    }

    /// Collects finished uploads without blocking.
    pub fn poll(&mut self) -> Vec<Command> {
        let mut finished = Vec::new();
        self.pending.retain_mut(|upload| match upload.receiver.try_recv() {
            Ok(None) => true,
            Ok(Some(result)) => {
                finished.push((upload.ticket, result));
                false
            }
            Err(oneshot::Canceled) => false,
        });
        self.settle(finished)
    }

    /// Blocks until every upload in flight has finished.
    pub fn wait(&mut self) -> Vec<Command> {
        let finished = self
            .pending
            .drain(..)
            .filter_map(|upload| {
                futures::executor::block_on(upload.receiver)
                    .ok()
                    .map(|result| (upload.ticket, result))
            })
            .collect();
        self.settle(finished)
    }

    fn settle(&mut self, finished: Vec<(UploadTicket, Result<ImageRef, UploadError>)>) -> Vec<Command> {
        let mut commands = Vec::new();
        for (ticket, result) in finished {
            match self.tracker.complete(ticket, result) {
                Some(Ok(command)) => {
                    self.error = None;
                    commands.push(command);
                }
                Some(Err(e)) => {
                    log::error!("Upload failed: {:?}", e);
                    self.error = Some(e.to_string());
                }
                None => {}
            }
        }
        commands
    }

    /// Overlay shown while files are dragged over the window.
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }
        let text = ctx.input(|i| {
            let mut text = "Drop an image (JPEG, PNG or WebP, up to 5MB)\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_is_checked_before_size() {
        let limits = UploadLimits::default();
        let err = limits.check("image/gif", 50 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(_)));
        assert_eq!(err.to_string(), "Please upload a valid image file (JPEG, PNG, or WebP)");
    }

    #[test]
    fn size_limit_is_inclusive() {
        let limits = UploadLimits::default();
        assert!(limits.check("image/png", MAX_UPLOAD_BYTES).is_ok());
        let err = limits.check("image/png", MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 5MB");
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_from_name("photo.JPG"), Some("image/jpeg"));
        assert_eq!(mime_from_name("a.webp"), Some("image/webp"));
        assert_eq!(mime_from_name("notes.txt"), None);
        assert_eq!(mime_from_name("noext"), None);
    }

    #[test]
    fn undecodable_bytes_fail_to_load() {
        let err = decode_upload("x.png", "image/png", b"not a png", &UploadLimits::default()).unwrap_err();
        assert_eq!(err.to_string(), "Failed to load image");
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut tracker = UploadTracker::default();
        let first = tracker.begin();
        let second = tracker.begin();
        let image = UploadedImage::new_ref("a.png", image::RgbaImage::new(1, 1));

        assert!(tracker.complete(first, Ok(image.clone())).is_none());
        assert!(matches!(
            tracker.complete(second, Ok(image)),
            Some(Ok(Command::SetImage(_)))
        ));
    }
}
