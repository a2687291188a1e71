use crate::compositing::color::Rgba8;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_FILENAME: &str = "my-image";
pub const MIN_QUALITY: f32 = 0.1;
pub const MAX_QUALITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Jpeg, ExportFormat::Webp];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// Whether `quality` affects the encoded output.
    pub fn is_lossy(self) -> bool {
        matches!(self, ExportFormat::Jpeg | ExportFormat::Webp)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// Output size multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ExportScale {
    X1,
    #[default]
    X2,
    X4,
}

impl ExportScale {
    pub const ALL: [ExportScale; 3] = [ExportScale::X1, ExportScale::X2, ExportScale::X4];

    pub fn factor(self) -> f32 {
        u8::from(self) as f32
    }
}

impl From<ExportScale> for u8 {
    fn from(scale: ExportScale) -> u8 {
        match scale {
            ExportScale::X1 => 1,
            ExportScale::X2 => 2,
            ExportScale::X4 => 4,
        }
    }
}

impl TryFrom<u8> for ExportScale {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ExportScale::X1),
            2 => Ok(ExportScale::X2),
            4 => Ok(ExportScale::X4),
            other => Err(format!("unsupported export scale {other}, expected 1, 2 or 4")),
        }
    }
}

impl fmt::Display for ExportScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", u8::from(*self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectToggles {
    pub shadow: bool,
    pub border: bool,
    pub watermark: bool,
    pub gradient: bool,
    pub noise: bool,
    pub vignette: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            shadow: true,
            border: false,
            watermark: false,
            gradient: false,
            noise: false,
            vignette: false,
        }
    }
}

impl EffectToggles {
    pub fn none() -> Self {
        Self {
            shadow: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectStyle {
    pub border_width: f32,
    pub border_color: Rgba8,
    pub shadow_color: Rgba8,
    pub shadow_blur: f32,
    pub gradient_colors: [Rgba8; 2],
    pub noise_opacity: f32,
    pub vignette_intensity: f32,
}

impl Default for EffectStyle {
    fn default() -> Self {
        Self {
            border_width: 2.0,
            border_color: Rgba8::WHITE.with_alpha(0.2),
            shadow_color: Rgba8::BLACK.with_alpha(0.2),
            shadow_blur: 20.0,
            gradient_colors: [Rgba8::new(0, 0, 0, 0), Rgba8::new(0, 0, 0, 0x66)],
            noise_opacity: 0.05,
            vignette_intensity: 0.3,
        }
    }
}

/// Everything the export dialog lets the user choose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// 0.1 to 1.0, used by lossy formats
    pub quality: f32,
    pub scale: ExportScale,
    /// Without extension; the format's extension is appended on save
    pub filename: String,
    pub background: Rgba8,
    pub effects: EffectToggles,
    pub border_radius: f32,
    pub padding: f32,
    pub style: EffectStyle,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 1.0,
            scale: ExportScale::X2,
            filename: DEFAULT_FILENAME.to_string(),
            background: Rgba8::WHITE,
            effects: EffectToggles::default(),
            border_radius: 16.0,
            padding: 20.0,
            style: EffectStyle::default(),
        }
    }
}

impl ExportOptions {
    /// Options with every effect off, no rounding and no padding.
    pub fn plain() -> Self {
        Self {
            effects: EffectToggles::none(),
            border_radius: 0.0,
            padding: 0.0,
            ..Self::default()
        }
    }

    pub fn clamped_quality(&self) -> f32 {
        if self.quality.is_nan() {
            return MAX_QUALITY;
        }
        self.quality.clamp(MIN_QUALITY, MAX_QUALITY)
    }

    /// The file name to save under: sanitized stem plus the format's extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", sanitize_stem(&self.filename), self.format.extension())
    }
}

/// Strips path separators and characters most filesystems reject.
/// An empty result falls back to the default name.
pub fn sanitize_stem(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}
