//! # Pixel Font
//!
//! A 5-row bitmap font and its rasterizer. Every set bit becomes one filled
//! pixel command; characters without a glyph only move the cursor.

use glam::Vec2;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use stroke_canvas::{Color, DrawCommand, Surface, render::RenderList};

use crate::pipeline::{DrawContext, Step};

/// Advance, in pixel widths, of a character the font does not know.
pub const FALLBACK_WIDTH: f32 = 3.0;
pub const DEFAULT_LETTER_SPACING: f32 = 0.8;

const GLYPH_TABLE: &[(char, &[&str])] = &[
    ('A', &["010", "101", "111", "101", "101"]),
    ('B', &["110", "101", "110", "101", "110"]),
    ('C', &["011", "100", "100", "100", "011"]),
    ('D', &["110", "101", "101", "101", "110"]),
    ('E', &["111", "100", "110", "100", "111"]),
    ('F', &["111", "100", "110", "100", "100"]),
    ('G', &["0111", "1000", "1011", "1001", "0111"]),
    ('H', &["101", "101", "111", "101", "101"]),
    ('I', &["111", "010", "010", "010", "111"]),
    ('J', &["001", "001", "001", "101", "010"]),
    ('K', &["101", "101", "110", "101", "101"]),
    ('L', &["100", "100", "100", "100", "111"]),
    ('M', &["10001", "11011", "10101", "10001", "10001"]),
    ('N', &["1001", "1101", "1011", "1001", "1001"]),
    ('O', &["010", "101", "101", "101", "010"]),
    ('P', &["110", "101", "110", "100", "100"]),
    ('Q', &["0110", "1001", "1001", "1011", "0111"]),
    ('R', &["110", "101", "110", "101", "101"]),
    ('S', &["011", "100", "010", "001", "110"]),
    ('T', &["111", "010", "010", "010", "010"]),
    ('U', &["101", "101", "101", "101", "111"]),
    ('V', &["101", "101", "101", "101", "010"]),
    ('W', &["10001", "10001", "10101", "11011", "10001"]),
    ('X', &["101", "101", "010", "101", "101"]),
    ('Y', &["101", "101", "010", "010", "010"]),
    ('Z', &["111", "001", "010", "100", "111"]),
    ('0', &["111", "101", "101", "101", "111"]),
    ('1', &["010", "110", "010", "010", "111"]),
    ('2', &["110", "001", "010", "100", "111"]),
    ('3', &["110", "001", "010", "001", "110"]),
    ('4', &["101", "101", "111", "001", "001"]),
    ('5', &["111", "100", "110", "001", "110"]),
    ('6', &["011", "100", "110", "101", "010"]),
    ('7', &["111", "001", "010", "010", "010"]),
    ('8', &["010", "101", "010", "101", "010"]),
    ('9', &["010", "101", "011", "001", "110"]),
    ('!', &["1", "1", "1", "0", "1"]),
    ('?', &["110", "001", "010", "000", "010"]),
    ('.', &["0", "0", "0", "0", "1"]),
    (':', &["0", "1", "0", "1", "0"]),
    ('-', &["000", "000", "111", "000", "000"]),
];

/// The font shipped with the effects.
pub static STANDARD: Lazy<PixelFont> = Lazy::new(|| PixelFont::from_table(GLYPH_TABLE));

/// One character bitmap; rows are strings of `'0'`/`'1'`.
#[derive(Clone, Copy, Debug)]
pub struct Glyph {
    rows: &'static [&'static str],
}

impl Glyph {
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Set bits as `(column, row)`, row-major.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.bytes()
                .enumerate()
                .filter(|(_, bit)| *bit == b'1')
                .map(move |(x, _)| (x, y))
        })
    }
}

#[derive(Clone, Debug)]
pub struct PixelFont {
    glyphs: HashMap<char, Glyph>,
    height: usize,
}

impl PixelFont {
    pub fn from_table(table: &'static [(char, &'static [&'static str])]) -> Self {
        let glyphs: HashMap<char, Glyph> = table
            .iter()
            .map(|(c, rows)| (*c, Glyph { rows }))
            .collect();
        let height = table.iter().map(|(_, rows)| rows.len()).max().unwrap_or(0);
        Self { glyphs, height }
    }

    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Rows per glyph.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cursor advance after `c`, in pixel widths.
    pub fn advance(&self, c: char, letter_spacing: f32) -> f32 {
        let width = self
            .glyph(c)
            .map_or(FALLBACK_WIDTH, |g| g.width() as f32);
        width + letter_spacing
    }

    /// Total cursor advance of `text` in surface units.
    pub fn measure(&self, text: &str, pixel_size: f32, letter_spacing: f32) -> f32 {
        text.to_uppercase()
            .chars()
            .map(|c| self.advance(c, letter_spacing) * pixel_size)
            .sum()
    }

    /// Lays out `text` into pixel commands, in drawing order.
    pub fn rasterize(&self, text: &PixelText, surface: &Surface) -> TextRaster {
        let mut commands = RenderList::new();
        let mut cursor_x = text.origin.x;

        for c in text.text.to_uppercase().chars() {
            if let Some(glyph) = self.glyph(c) {
                for (col, row) in glyph.pixels() {
                    let at = Vec2::new(
                        cursor_x + col as f32 * text.pixel_size,
                        text.origin.y + row as f32 * text.pixel_size,
                    );
                    commands.push(DrawCommand::pixel(at, text.pixel_size, text.color, surface));
                }
            }
            cursor_x += self.advance(c, text.letter_spacing) * text.pixel_size;
        }

        TextRaster {
            commands,
            end_x: cursor_x,
        }
    }
}

/// Output of [`PixelFont::rasterize`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextRaster {
    pub commands: RenderList,
    /// Cursor position after the last character.
    pub end_x: f32,
}

/// A request to draw text with the pixel font.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelText {
    pub text: String,
    /// Top-left corner of the first character.
    pub origin: Vec2,
    /// Side of one font pixel, in surface units.
    pub pixel_size: f32,
    pub color: Color,
    /// Pause after each pixel; `None` follows the session's draw delay.
    pub pixel_delay_ms: Option<u64>,
    pub letter_spacing: f32,
}

impl PixelText {
    pub fn new(text: impl Into<String>, origin: Vec2, pixel_size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            origin,
            pixel_size,
            color,
            pixel_delay_ms: None,
            letter_spacing: DEFAULT_LETTER_SPACING,
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.pixel_delay_ms = Some(ms);
        self
    }

    pub fn with_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }
}

/// Sends `text` pixel by pixel, pacing after each one.
pub async fn draw_text(ctx: &mut DrawContext<'_>, font: &PixelFont, text: &PixelText) -> Step {
    let raster = font.rasterize(text, ctx.surface());
    let delay = text.pixel_delay_ms.unwrap_or_else(|| ctx.draw_delay_ms());
    tracing::debug!(
        text = %text.text,
        pixels = raster.commands.len(),
        delay_ms = delay,
        "Rasterized text"
    );
    for cmd in &raster.commands {
        ctx.send_paced(cmd, delay).await?;
    }
    Ok(())
}
