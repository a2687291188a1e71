mod dialog;
mod options;
mod sink;

use crate::error::ExportError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{RgbImage, RgbaImage};
use std::io::Cursor;

pub use dialog::{ExportDialog, Preview};
pub use options::{
    DEFAULT_FILENAME, EffectStyle, EffectToggles, ExportFormat, ExportOptions, ExportScale,
    MAX_QUALITY, MIN_QUALITY, sanitize_stem,
};
pub use sink::{DirectorySink, FileSink};

/// Encodes `image` as `format`. `quality` (0.1 to 1.0) applies to JPEG and WebP.
///
/// JPEG has no alpha, so pixels are flattened over black first.
pub fn encode(image: &RgbaImage, format: ExportFormat, quality: f32) -> Result<Vec<u8>, ExportError> {
    let mut bytes = Cursor::new(Vec::new());
    match format {
        ExportFormat::Png => image.write_with_encoder(PngEncoder::new(&mut bytes))?,
        ExportFormat::Jpeg => {
            let quality = (quality.clamp(MIN_QUALITY, MAX_QUALITY) * 100.0).round() as u8;
            flatten(image).write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?
        }
        ExportFormat::Webp => {
            let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY) * 100.0;
            let encoded = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height())
                .encode_simple(false, quality)
                .map_err(|e| ExportError::Webp(format!("{e:?}")))?;
            return Ok(encoded.to_vec());
        }
    }
    Ok(bytes.into_inner())
}

fn flatten(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let a = a as u16;
        let mul = |c: u8| ((c as u16 * a + 127) / 255) as u8;
        image::Rgb([mul(r), mul(g), mul(b)])
    })
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(bytes: &[u8], format: ExportFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_round_trips_pixels() {
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128]));
        let bytes = encode(&image, ExportFormat::Png, 1.0).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, image);
    }

    #[test]
    fn jpeg_flattens_alpha_over_black() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        let bytes = encode(&image, ExportFormat::Jpeg, 0.9).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c < 8)));
    }

    #[test]
    fn lower_quality_jpeg_is_smaller() {
        let image = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, (x ^ y) as u8, 255]));
        let high = encode(&image, ExportFormat::Jpeg, 1.0).unwrap();
        let low = encode(&image, ExportFormat::Jpeg, 0.1).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn webp_is_decodable() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let bytes = encode(&image, ExportFormat::Webp, 0.5).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::WebP);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 4));
    }

    #[test]
    fn webp_quality_changes_the_output() {
        let image = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, (x ^ y) as u8, 255]));
        let high = encode(&image, ExportFormat::Webp, 1.0).unwrap();
        let low = encode(&image, ExportFormat::Webp, 0.1).unwrap();
        assert_ne!(low, high);
        assert!(low.len() < high.len());
    }

    #[test]
    fn data_url_has_mime_prefix() {
        let url = to_data_url(b"abc", ExportFormat::Png);
        assert_eq!(url, "data:image/png;base64,YWJj");
    }
}
