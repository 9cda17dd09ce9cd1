//! Built-in fixed-size bitmap font.
//!
//! Last tier of font resolution: always available, ignores the requested
//! size. Glyphs are 5x7 cells drawn at 2x scale with one cell of spacing.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Pixel size of one glyph cell.
pub const CELL: u32 = 2;
/// Horizontal advance per character (5 cells + 1 cell spacing).
pub const ADVANCE: u32 = 6 * CELL;
/// Vertical advance per line (7 cells + 1 cell spacing).
pub const LINE_HEIGHT: u32 = 8 * CELL;

const BOX: [u8; 7] = [
    0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
];

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters share the uppercase shapes; anything unknown is a box.
pub fn glyph5x7(ch: char) -> [u8; 7] {
    #[rustfmt::skip]
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001],
        'B' => [0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110],
        'C' => [0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110],
        'D' => [0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100],
        'E' => [0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111],
        'F' => [0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000],
        'G' => [0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111],
        'H' => [0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001],
        'I' => [0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110],
        'J' => [0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100],
        'K' => [0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001],
        'L' => [0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111],
        'M' => [0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001],
        'N' => [0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001],
        'O' => [0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110],
        'P' => [0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000],
        'Q' => [0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101],
        'R' => [0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001],
        'S' => [0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110],
        'T' => [0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100],
        'U' => [0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110],
        'V' => [0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100],
        'W' => [0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010],
        'X' => [0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001],
        'Y' => [0b10001,0b10001,0b10001,0b01010,0b00100,0b00100,0b00100],
        'Z' => [0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111],

        '0' => [0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110],
        '1' => [0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110],
        '2' => [0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111],
        '3' => [0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110],
        '4' => [0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010],
        '5' => [0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110],
        '6' => [0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110],
        '7' => [0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000],
        '8' => [0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110],
        '9' => [0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100],

        ' ' => [0; 7],
        '!' => [0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100],
        '?' => [0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100],
        '.' => [0b00000,0b00000,0b00000,0b00000,0b00000,0b01100,0b01100],
        ',' => [0b00000,0b00000,0b00000,0b00000,0b01100,0b00100,0b01000],
        ':' => [0b00000,0b01100,0b01100,0b00000,0b01100,0b01100,0b00000],
        ';' => [0b00000,0b01100,0b01100,0b00000,0b01100,0b00100,0b01000],
        '\'' => [0b01100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000],
        '"' => [0b01010,0b01010,0b01010,0b00000,0b00000,0b00000,0b00000],
        '-' => [0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000],
        '+' => [0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000],
        '=' => [0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000],
        '/' => [0b00001,0b00001,0b00010,0b00100,0b01000,0b10000,0b10000],
        '(' => [0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010],
        ')' => [0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000],
        '_' => [0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111],
        '&' => [0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101],
        '#' => [0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010],
        '*' => [0b00000,0b00100,0b10101,0b01110,0b10101,0b00100,0b00000],
        '%' => [0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011],
        '@' => [0b01110,0b10001,0b00001,0b01101,0b10101,0b10101,0b01110],
        '|' => [0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100],

        _ => BOX,
    };
    rows
}

/// Coverage mask of one glyph cell: `5·CELL × 7·CELL`, not trimmed.
pub fn glyph_mask(ch: char) -> GrayImage {
    let mut mask = GrayImage::new(5 * CELL, 7 * CELL);
    for (ry, bits) in glyph5x7(ch).iter().enumerate() {
        for rx in 0..5u32 {
            if bits & (1 << (4 - rx)) != 0 {
                draw_filled_rect_mut(
                    &mut mask,
                    Rect::at((rx * CELL) as i32, (ry as u32 * CELL) as i32).of_size(CELL, CELL),
                    Luma([255]),
                );
            }
        }
    }
    mask
}

/// Pen position of every character in `text`, line by line, starting at the
/// top-left. Whitespace still advances but yields nothing.
pub fn pen_positions(text: &str) -> impl Iterator<Item = (i64, i64, char)> + '_ {
    text.lines().enumerate().flat_map(|(row, line)| {
        let pen_y = row as i64 * LINE_HEIGHT as i64;
        line.chars()
            .enumerate()
            .filter(|(_, ch)| !ch.is_whitespace())
            .map(move |(col, ch)| (col as i64 * ADVANCE as i64, pen_y, ch))
    })
}
