use super::{ExportOptions, FileSink, encode, to_data_url};
use crate::compositing::{self, RenderSettings};
use crate::error::ExportError;
use crate::fonts::FontBook;
use crate::util::time::timestamp_nanos;
use futures::channel::oneshot;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::Arc;

/// The composited preview and what it was rendered from.
#[derive(Debug, Clone)]
pub struct Preview {
    pub image: RgbaImage,
    pub data_url: String,
    options: ExportOptions,
    source_revision: u64,
}

struct PendingSave {
    file_name: String,
    receiver: oneshot::Receiver<Result<PathBuf, ExportError>>,
}

/// Export dialog state: options, the live preview and at most one save in flight.
pub struct ExportDialog {
    pub options: ExportOptions,
    preview: Option<Preview>,
    pending: Option<PendingSave>,
    last_error: Option<String>,
    sink: Arc<dyn FileSink>,
    /// Noise seed for every preview render, so the grain holds still
    preview_seed: u64,
}

impl std::fmt::Debug for ExportDialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportDialog")
            .field("options", &self.options)
            .field("has_preview", &self.preview.is_some())
            .field("exporting", &self.is_exporting())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl ExportDialog {
    pub fn new(options: ExportOptions, sink: Arc<dyn FileSink>) -> Self {
        Self {
            options,
            preview: None,
            pending: None,
            last_error: None,
            sink,
            preview_seed: timestamp_nanos(),
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    /// Re-renders the preview when the options or the source changed.
    ///
    /// Without a source there is no preview. Returns true if it was re-rendered.
    pub fn refresh_preview(
        &mut self,
        source: Option<&RgbaImage>,
        source_revision: u64,
        fonts: &FontBook,
    ) -> bool {
        let Some(source) = source else {
            self.preview = None;
            return false;
        };
        let stale = self.preview.as_ref().is_none_or(|preview| {
            preview.options != self.options || preview.source_revision != source_revision
        });
        if !stale {
            return false;
        }

        let image = compositing::compose(
            source,
            &self.options,
            RenderSettings::preview().with_seed(self.preview_seed),
            fonts,
        );
        let data_url = match encode(&image, super::ExportFormat::Png, 1.0) {
            Ok(bytes) => to_data_url(&bytes, super::ExportFormat::Png),
            Err(e) => {
                log::error!("Failed to encode export preview: {}", e);
                String::new()
            }
        };
        self.preview = Some(Preview {
            image,
            data_url,
            options: self.options.clone(),
            source_revision,
        });
        true
    }

    pub fn is_exporting(&self) -> bool {
        self.pending.is_some()
    }

    /// File name of the save in flight.
    pub fn exporting_file(&self) -> Option<&str> {
        self.pending.as_ref().map(|pending| pending.file_name.as_str())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Composites `source` at the chosen scale, encodes and saves it on a
    /// worker thread. `notify` runs on the worker once the result is ready.
    ///
    /// Returns the file name being written.
    pub fn start_export(
        &mut self,
        source: Option<&RgbaImage>,
        fonts: &FontBook,
        notify: impl FnOnce() + Send + 'static,
    ) -> Result<String, ExportError> {
        let source = source.ok_or(ExportError::NoSource)?;
        if self.pending.is_some() {
            return Err(ExportError::InFlight);
        }

        let options = self.options.clone();
        let file_name = options.file_name();
        let source = source.clone();
        let fonts = fonts.clone();
        let sink = Arc::clone(&self.sink);
        let (sender, receiver) = oneshot::channel();

        let worker_file = file_name.clone();
        std::thread::spawn(move || {
            let settings = RenderSettings::new(options.scale.factor());
            let image = compositing::compose(&source, &options, settings, &fonts);
            let result = encode(&image, options.format, options.clamped_quality())
                .and_then(|bytes| Ok(sink.save(&worker_file, &bytes)?));
            // The dialog may have been dropped; nobody is left to tell
            let _ = sender.send(result);
            notify();
        });

        log::info!("Exporting {}", file_name);
        self.last_error = None;
        self.pending = Some(PendingSave {
            file_name: file_name.clone(),
            receiver,
        });
        Ok(file_name)
    }

    /// Checks the save in flight without blocking.
    ///
    /// Returns `None` while nothing has finished. A finished save clears the
    /// exporting state whether it succeeded or not.
    pub fn poll(&mut self) -> Option<Result<PathBuf, ExportError>> {
        let pending = self.pending.as_mut()?;
        let result = match pending.receiver.try_recv() {
            Ok(None) => return None,
            Ok(Some(result)) => result,
            Err(oneshot::Canceled) => Err(ExportError::Cancelled),
        };
        self.finish(result)
    }

    /// Blocks until the save in flight finishes.
    pub fn wait(&mut self) -> Option<Result<PathBuf, ExportError>> {
        let pending = self.pending.as_mut()?;
        let result = futures::executor::block_on(&mut pending.receiver)
            .unwrap_or(Err(ExportError::Cancelled));
        self.finish(result)
    }

    fn finish(&mut self, result: Result<PathBuf, ExportError>) -> Option<Result<PathBuf, ExportError>> {
        self.pending = None;
        match &result {
            Ok(path) => log::info!("Export saved to {}", path.display()),
            Err(e) => {
                log::error!("{}", e);
                self.last_error = Some(e.to_string());
            }
        }
        Some(result)
    }
}
