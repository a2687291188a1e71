use image::RgbaImage;
use std::sync::Arc;

/// A decoded upload. Shared between layers and history snapshots, never mutated.
pub struct UploadedImage {
    name: String,
    pixels: RgbaImage,
}

// Define a reference-counted type alias for UploadedImage
pub type ImageRef = Arc<UploadedImage>;

impl UploadedImage {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            pixels,
        }
    }

    pub fn new_ref(name: impl Into<String>, pixels: RgbaImage) -> ImageRef {
        Arc::new(Self::new(name, pixels))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

// Pixel buffers can be megabytes; keep them out of debug output
impl std::fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedImage")
            .field("name", &self.name)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}
