use super::color::Rgba8;
use image::RgbaImage;

/// Per-pixel clip coverage in 0.0..=1.0, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl Mask {
    /// Anti-aliased coverage of a rounded rectangle filling `width x height`.
    pub fn rounded_rect(width: u32, height: u32, radius: f32) -> Self {
        let radius = radius.min(width.min(height) as f32 / 2.0).max(0.0);
        let (w, h) = (width as f32, height as f32);
        let mut coverage = Vec::with_capacity((width * height) as usize);

        for y in 0..height {
            for x in 0..width {
                // Distance from the pixel centre to the nearest corner circle centre
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let cx = px.clamp(radius, w - radius);
                let cy = py.clamp(radius, h - radius);
                let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                coverage.push((radius - dist + 0.5).clamp(0.0, 1.0));
            }
        }

        Self {
            width,
            height,
            coverage,
        }
    }

    #[inline]
    pub fn at(&self, x: u32, y: u32) -> f32 {
        self.coverage[(y * self.width + x) as usize]
    }

    pub fn row(&self, y: u32) -> &[f32] {
        let start = (y * self.width) as usize;
        &self.coverage[start..start + self.width as usize]
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Porter-Duff "over" of a straight-alpha source onto a straight-alpha pixel.
///
/// `coverage` scales the source alpha (clip masks, glyph coverage).
#[inline]
pub fn blend_over(dst: &mut [u8], src: [u8; 4], coverage: f32) {
    let src_a = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    if src_a >= 1.0 {
        dst[..4].copy_from_slice(&src);
        return;
    }

    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a > 0.0 {
        for c in 0..3 {
            let value = (src[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }
}

/// The drawing target of the pipeline: an RGBA buffer plus an optional clip.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
    clip: Option<Mask>,
}

impl Surface {
    /// A fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            clip: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Clip all later drawing to a rounded rectangle covering the surface.
    pub fn clip_rounded(&mut self, radius: f32) {
        if radius > 0.0 {
            self.clip = Some(Mask::rounded_rect(self.width(), self.height(), radius));
        }
    }

    pub fn clip(&self) -> Option<&Mask> {
        self.clip.as_ref()
    }

    #[inline]
    fn clip_at(&self, x: u32, y: u32) -> f32 {
        self.clip.as_ref().map_or(1.0, |mask| mask.at(x, y))
    }

    /// Blends one pixel; coordinates outside the surface are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 4], coverage: f32) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let coverage = coverage * self.clip_at(x, y);
        blend_over(&mut self.image.get_pixel_mut(x, y).0, color, coverage);
    }

    pub fn fill(&mut self, color: Rgba8) {
        let color = color.to_array();
        let clip = self.clip.as_ref();
        for (i, pixel) in self.image.pixels_mut().enumerate() {
            let coverage = clip.map_or(1.0, |mask| mask.coverage[i]);
            blend_over(&mut pixel.0, color, coverage);
        }
    }

    /// Fills the axis-aligned rectangle `[x0, x1) x [y0, y1)`.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba8) {
        let color = color.to_array();
        for y in y0.max(0)..y1.min(self.height() as i64) {
            for x in x0.max(0)..x1.min(self.width() as i64) {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    /// Draws `source` with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, source: &RgbaImage, x: i64, y: i64) {
        for (sx, sy, pixel) in source.enumerate_pixels() {
            self.blend_pixel(x.saturating_add(sx as i64), y.saturating_add(sy as i64), pixel.0, 1.0);
        }
    }

    /// Runs `f` over every row in parallel with that row's clip coverage.
    pub fn par_rows<F>(&mut self, f: F)
    where
        F: Fn(u32, &mut [u8], Option<&[f32]>) + Sync + Send,
    {
        use rayon::prelude::*;

        let stride = self.width() as usize * 4;
        if stride == 0 {
            return;
        }
        let clip = self.clip.as_ref();
        self.image
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| f(y as u32, row, clip.map(|mask| mask.row(y as u32))));
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn opaque_source_replaces_destination() {
        let mut dst = [10, 20, 30, 255];
        blend_over(&mut dst, [200, 100, 50, 255], 1.0);
        assert_eq!(dst, [200, 100, 50, 255]);
    }

    #[test]
    fn transparent_source_is_noop() {
        let mut dst = [10, 20, 30, 40];
        blend_over(&mut dst, [200, 100, 50, 0], 1.0);
        blend_over(&mut dst, [200, 100, 50, 255], 0.0);
        assert_eq!(dst, [10, 20, 30, 40]);
    }

    #[test]
    fn half_alpha_over_opaque_mixes() {
        let mut dst = [0, 0, 0, 255];
        blend_over(&mut dst, [255, 255, 255, 255], 0.5);
        assert_eq!(dst[3], 255);
        assert!((126..=129).contains(&dst[0]));
    }

    #[test]
    fn rounded_clip_leaves_corners_empty() {
        let mut surface = Surface::new(40, 40);
        surface.clip_rounded(10.0);
        surface.fill(Rgba8::WHITE);
        assert_eq!(surface.image().get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(surface.image().get_pixel(20, 20), &Rgba([255, 255, 255, 255]));
        assert_eq!(surface.image().get_pixel(20, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn draw_image_clips_to_bounds() {
        let mut surface = Surface::new(4, 4);
        let source = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]));
        surface.draw_image(&source, 2, -1);
        assert_eq!(surface.image().get_pixel(3, 1), &Rgba([1, 2, 3, 255]));
        assert_eq!(surface.image().get_pixel(1, 1), &Rgba([0, 0, 0, 0]));
    }
}
