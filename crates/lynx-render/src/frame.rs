//! Two-panel frame geometry and rendering.
//!
//! ```text
//! +--------------------------------+
//! | 0042                           |  <- label strip
//! | +-----------+   +-----------+  |
//! | |   prey    |   | predator  |  |
//! | +-----------+   +-----------+  |
//! +--------------------------------+
//! ```
//!
//! Only interior cells are drawn; each becomes a `cell_px` square.

use image::{Rgba, RgbaImage};
use lynx_space::PaddedGrid;

use crate::colormap::heat;
use crate::error::RenderError;
use crate::font::{draw_digits, text_width, GLYPH_HEIGHT};

/// Outer margin in pixels.
pub const MARGIN: u32 = 2;
/// Gap between the two panels in pixels.
pub const PANEL_GAP: u32 = 4;
/// Font pixel size of the frame label.
pub const LABEL_SCALE: u32 = 2;

const BACKGROUND: Rgba<u8> = Rgba([32, 32, 32, 255]);
const LABEL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Largest frame side a GIF can hold.
const MAX_SIDE: u64 = u16::MAX as u64;

/// Pixel geometry of one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    domain: usize,
    cell_px: u32,
    label_digits: usize,
    width: u32,
    height: u32,
}

impl FrameLayout {
    /// Geometry for an `n x n` domain whose labels go up to `last_index`.
    ///
    /// Labels are zero-padded to the digit count of `last_index`.
    pub fn new(domain: usize, cell_px: u32, last_index: u64) -> Result<Self, RenderError> {
        if cell_px == 0 {
            return Err(RenderError::ZeroCellSize);
        }
        let label_digits = last_index.to_string().len();
        let panel = domain as u64 * u64::from(cell_px);
        let label_w = u64::from(text_width(label_digits, LABEL_SCALE));
        let margin = u64::from(MARGIN);
        let width = (2 * panel + u64::from(PANEL_GAP)).max(label_w) + 2 * margin;
        let height = u64::from(GLYPH_HEIGHT * LABEL_SCALE) + panel + 3 * margin;
        if width > MAX_SIDE || height > MAX_SIDE {
            return Err(RenderError::FrameTooLarge {
                size: (width, height),
            });
        }
        Ok(Self {
            domain,
            cell_px,
            label_digits,
            width: width as u32,
            height: height as u32,
        })
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Side of one panel in pixels.
    pub fn panel_side(&self) -> u32 {
        self.domain as u32 * self.cell_px
    }

    /// Top-left pixel of the prey panel.
    pub fn prey_origin(&self) -> (u32, u32) {
        (MARGIN, 2 * MARGIN + GLYPH_HEIGHT * LABEL_SCALE)
    }

    /// Top-left pixel of the predator panel.
    pub fn predator_origin(&self) -> (u32, u32) {
        let (x, y) = self.prey_origin();
        (x + self.panel_side() + PANEL_GAP, y)
    }

    /// Zero-padded label text for `index`.
    pub fn label(&self, index: u64) -> String {
        format!("{index:0width$}", width = self.label_digits)
    }

    /// Render one frame: prey on the left, predator on the right.
    pub fn render(
        &self,
        prey: &PaddedGrid,
        predator: &PaddedGrid,
        index: u64,
    ) -> Result<RgbaImage, RenderError> {
        for grid in [prey, predator] {
            let found = grid.indexing().domain_size();
            if found != self.domain {
                return Err(RenderError::DomainMismatch {
                    expected: self.domain,
                    found,
                });
            }
        }
        let mut img = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        draw_digits(
            &mut img,
            MARGIN,
            MARGIN,
            &self.label(index),
            LABEL_SCALE,
            LABEL,
        );
        self.paint_panel(&mut img, prey, self.prey_origin());
        self.paint_panel(&mut img, predator, self.predator_origin());
        Ok(img)
    }

    fn paint_panel(&self, img: &mut RgbaImage, grid: &PaddedGrid, (x0, y0): (u32, u32)) {
        for (r, row) in grid.interior_rows().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                let color = heat(v);
                let (px, py) = (x0 + c as u32 * self.cell_px, y0 + r as u32 * self.cell_px);
                for dy in 0..self.cell_px {
                    for dx in 0..self.cell_px {
                        img.put_pixel(px + dx, py + dy, color);
                    }
                }
            }
        }
    }
}
