//! 3x5 bitmap digits.

use image::{Rgba, RgbaImage};

/// Glyph width in font pixels.
pub const GLYPH_WIDTH: u32 = 3;
/// Glyph height in font pixels.
pub const GLYPH_HEIGHT: u32 = 5;
/// Blank columns between glyphs, in font pixels.
pub const GLYPH_SPACING: u32 = 1;

/// One row per entry, most significant of the low three bits is the
/// leftmost pixel.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b011, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Pixel width of `len` glyphs at `scale`.
pub fn text_width(len: usize, scale: u32) -> u32 {
    if len == 0 {
        return 0;
    }
    let len = len as u32;
    (len * GLYPH_WIDTH + (len - 1) * GLYPH_SPACING) * scale
}

/// Whether font pixel `(x, y)` of `digit` is set.
pub fn glyph_pixel(digit: u8, x: u32, y: u32) -> bool {
    DIGITS[usize::from(digit % 10)][y as usize] & (0b100 >> x) != 0
}

/// Draw the ASCII digits of `text` with the top-left corner at `(x, y)`.
///
/// Non-digit characters leave a blank cell. Pixels falling outside the
/// image are dropped.
pub fn draw_digits(img: &mut RgbaImage, x: u32, y: u32, text: &str, scale: u32, color: Rgba<u8>) {
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
    for (i, ch) in text.chars().enumerate() {
        let Some(d) = ch.to_digit(10) else { continue };
        let gx = x + i as u32 * advance;
        for fy in 0..GLYPH_HEIGHT {
            for fx in 0..GLYPH_WIDTH {
                if !glyph_pixel(d as u8, fx, fy) {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (px, py) = (gx + fx * scale + dx, y + fy * scale + dy);
                        if px < img.width() && py < img.height() {
                            img.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}
