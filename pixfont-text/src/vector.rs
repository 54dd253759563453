//! Vector text rasterizer — draws text through a [`TextBackend`] onto an
//! RGBA scratch [`Surface`], then thresholds it to 1-bit ink.
//!
//! ```text
//! lines ──measure──► max_w ──► Surface (max_w + 2·pad) × (n·1.2·size + 2·pad)
//!                                 │
//!                     fill_line at (x_align, pad + i·line_h)
//!                                 │
//!                                 ▼
//!           threshold: a > 0 && r < cutoff → ink, else transparent
//! ```

use pixfont_core::{Alignment, PixelBuffer, Rendered};

/// Host text engine: measures and fills single lines of text.
pub trait TextBackend {
    /// Advance width of `line` in pixels.
    fn measure(&mut self, line: &str, family: &str, size_px: f32) -> f32;

    /// Fill `line` in black with the top of its em box at `origin`.
    fn fill_line(
        &mut self,
        surface: &mut Surface,
        line: &str,
        family: &str,
        size_px: f32,
        origin: (f32, f32),
    );
}

/// Layout and threshold parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorConfig {
    /// Transparent margin on every side, in pixels.
    pub padding: f32,
    /// Line pitch as a multiple of the font size.
    pub line_height_factor: f32,
    /// Pixels with a red channel at or above this are dropped.
    pub ink_threshold: u8,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            line_height_factor: 1.2,
            ink_threshold: 200,
        }
    }
}

// ── Scratch surface ─────────────────────────────────────────────────

/// Non-premultiplied RGBA8 canvas the backend draws into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// A fully transparent surface; zero dimensions are raised to 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Overwrite one pixel. Out-of-range writes are ignored.
    pub fn put(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    /// Source-over blend of `rgba` onto one pixel.
    pub fn blend(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let src_a = rgba[3] as f32 / 255.0;
        if src_a <= 0.0 {
            return;
        }
        let dst_a = self.data[i + 3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        for c in 0..3 {
            let src = rgba[c] as f32;
            let dst = self.data[i + c] as f32;
            let out = (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
            self.data[i + c] = out.round().clamp(0.0, 255.0) as u8;
        }
        self.data[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Collapse to 1-bit: non-transparent pixels with red below `cutoff`
    /// become ink, every other pixel becomes empty.
    pub fn threshold(&self, cutoff: u8) -> Rendered {
        let mut buffer = PixelBuffer::new(self.width, self.height);
        let mut ink_count = 0u32;
        for (i, px) in self.data.chunks_exact(4).enumerate() {
            if px[3] > 0 && px[0] < cutoff {
                let x = i as u32 % self.width;
                let y = i as u32 / self.width;
                buffer.set(x, y, true);
                ink_count += 1;
            }
        }
        Rendered { buffer, ink_count }
    }
}

// ── Rasterizer ──────────────────────────────────────────────────────

/// Renders text in system fonts through a [`TextBackend`].
pub struct VectorRasterizer<B> {
    backend: B,
    pub config: VectorConfig,
}

impl<B: TextBackend> VectorRasterizer<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, VectorConfig::default())
    }

    pub fn with_config(backend: B, config: VectorConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draw `text` onto a padded scratch surface without thresholding.
    ///
    /// Returns `None` when no line has any width.
    pub fn draw(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        alignment: Alignment,
    ) -> Option<Surface> {
        let lines: Vec<&str> = text.split('\n').collect();
        let widths: Vec<f32> = lines
            .iter()
            .map(|line| self.backend.measure(line, family, size_px))
            .collect();
        let max_width = widths.iter().copied().fold(0.0f32, f32::max);
        if max_width <= 0.0 {
            return None;
        }

        let pad = self.config.padding;
        let line_height = size_px * self.config.line_height_factor;
        let total_height = lines.len() as f32 * line_height;
        let mut surface = Surface::new(
            (max_width + pad * 2.0) as u32,
            (total_height + pad * 2.0) as u32,
        );

        for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let x = pad
                + match alignment {
                    Alignment::Center => (max_width - width) / 2.0,
                    Alignment::Right => max_width - width,
                    Alignment::Left | Alignment::Justify => 0.0,
                };
            let y = pad + i as f32 * line_height;
            self.backend
                .fill_line(&mut surface, line, family, size_px, (x, y));
        }
        Some(surface)
    }

    /// Render `text` to 1-bit ink; zero-width text yields [`Rendered::empty`].
    pub fn render(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        alignment: Alignment,
    ) -> Rendered {
        let Some(surface) = self.draw(text, family, size_px, alignment) else {
            log::debug!("Vector render of {text:?} has no width");
            return Rendered::empty();
        };
        let rendered = surface.threshold(self.config.ink_threshold);
        log::debug!(
            "Vector render: {}×{} at {size_px}px {family:?}, {} ink pixels",
            surface.width(),
            surface.height(),
            rendered.ink_count
        );
        rendered
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Draws every character as a `size/2`-wide block, with a light grey
    /// fringe column on its right that the threshold must drop.
    struct BlockBackend {
        fills: Vec<(String, (f32, f32))>,
    }

    impl BlockBackend {
        fn new() -> Self {
            Self { fills: Vec::new() }
        }
    }

    impl TextBackend for BlockBackend {
        fn measure(&mut self, line: &str, _family: &str, size_px: f32) -> f32 {
            line.chars().count() as f32 * size_px / 2.0
        }

        fn fill_line(
            &mut self,
            surface: &mut Surface,
            line: &str,
            _family: &str,
            size_px: f32,
            origin: (f32, f32),
        ) {
            self.fills.push((line.to_string(), origin));
            let advance = (size_px / 2.0) as i32;
            let (x0, y0) = (origin.0.round() as i32, origin.1.round() as i32);
            for (n, _) in line.chars().enumerate() {
                let left = x0 + n as i32 * advance;
                for y in 0..size_px as i32 {
                    for x in 0..advance - 1 {
                        surface.blend(left + x, y0 + y, [0, 0, 0, 255]);
                    }
                    surface.blend(left + advance - 1, y0 + y, [230, 230, 230, 90]);
                }
            }
        }
    }

    #[test]
    fn test_surface_dimensions() {
        let mut raster = VectorRasterizer::new(BlockBackend::new());
        let surface = raster.draw("AB\nC", "monospace", 16.0, Alignment::Left).unwrap();
        // max width 16, two lines of 19.2
        assert_eq!(surface.width(), 16 + 20);
        assert_eq!(surface.height(), (2.0f32 * 16.0 * 1.2 + 20.0) as u32);
    }

    #[test]
    fn test_line_origins_per_alignment() {
        let cases = [
            (Alignment::Left, [10.0, 10.0]),
            (Alignment::Center, [10.0, 14.0]),
            (Alignment::Right, [10.0, 18.0]),
            (Alignment::Justify, [10.0, 10.0]),
        ];
        for (alignment, xs) in cases {
            let mut raster = VectorRasterizer::new(BlockBackend::new());
            raster.draw("ABC\nA", "serif", 8.0, alignment).unwrap();
            let fills = &raster.backend().fills;
            assert_eq!(fills.len(), 2);
            assert_eq!(fills[0].1, (xs[0], 10.0), "{alignment}");
            assert_eq!(fills[1].1, (xs[1], 10.0 + 8.0 * 1.2), "{alignment}");
        }
    }

    #[test]
    fn test_threshold_drops_light_pixels() {
        let mut raster = VectorRasterizer::new(BlockBackend::new());
        let rendered = raster.render("A", "monospace", 16.0, Alignment::Left);
        // One 7×16 black block; the grey fringe column is not ink.
        assert_eq!(rendered.ink_count, 7 * 16);
        assert_eq!(rendered.ink_count, rendered.buffer.ink_count());
        assert!(rendered.buffer.get(10, 10));
        assert!(!rendered.buffer.get(10 + 7, 10), "fringe column must be dropped");
        assert!(!rendered.buffer.get(0, 0), "padding stays transparent");
    }

    #[test]
    fn test_threshold_rules() {
        let mut surface = Surface::new(4, 1);
        surface.put(0, 0, [0, 0, 0, 255]); // ink
        surface.put(1, 0, [199, 255, 255, 1]); // faint but dark-red channel: ink
        surface.put(2, 0, [200, 0, 0, 255]); // at the cutoff: dropped
        surface.put(3, 0, [0, 0, 0, 0]); // transparent: dropped
        let rendered = surface.threshold(200);
        assert_eq!(rendered.ink_count, 2);
        assert_eq!(rendered.buffer.to_string(), "##..");
    }

    #[test]
    fn test_blend_over_transparent_keeps_color() {
        let mut surface = Surface::new(1, 1);
        surface.blend(0, 0, [0, 0, 0, 128]);
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 128]));
        surface.blend(0, 0, [0, 0, 0, 128]);
        let alpha = surface.pixel(0, 0).unwrap()[3];
        assert!(alpha > 128 && alpha < 255, "alpha accumulates, got {alpha}");
    }

    #[test]
    fn test_blend_out_of_range_ignored() {
        let mut surface = Surface::new(2, 2);
        surface.blend(-1, 0, [0, 0, 0, 255]);
        surface.blend(0, 5, [0, 0, 0, 255]);
        assert!(surface.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_text_is_one_by_one() {
        let mut raster = VectorRasterizer::new(BlockBackend::new());
        assert_eq!(raster.render("", "serif", 16.0, Alignment::Left), Rendered::empty());
        assert_eq!(raster.render("\n\n", "serif", 16.0, Alignment::Center), Rendered::empty());
        assert!(raster.backend().fills.is_empty());
    }

    #[test]
    fn test_custom_config() {
        let config = VectorConfig {
            padding: 0.0,
            line_height_factor: 1.0,
            ink_threshold: 255,
        };
        let mut raster = VectorRasterizer::with_config(BlockBackend::new(), config);
        let rendered = raster.render("A", "serif", 4.0, Alignment::Left);
        assert_eq!((rendered.buffer.width(), rendered.buffer.height()), (2, 4));
        // With a 255 cutoff the grey fringe counts too.
        assert_eq!(rendered.ink_count, 8);
    }
}
