//! Pixel-art characters: four sprites, one per quadrant, with a "VS" title.

use glam::Vec2;
use stroke_canvas::math::{BOTTOM_LEFT, BOTTOM_RIGHT, CENTER, TOP_LEFT, TOP_RIGHT};
use stroke_canvas::{Color, DrawCommand, Rect, Surface, render::RenderList};

use crate::font::{DEFAULT_LETTER_SPACING, PixelFont, PixelText, STANDARD, draw_text};
use crate::pipeline::{DrawContext, Step};

pub const SPRITE_PIXEL_MS: u64 = 3;
pub const TEXT_PIXEL_MS: u64 = 2;
pub const NAME_PIXEL_SIZE: f32 = 0.008;
pub const TITLE_PIXEL_SIZE: f32 = 0.02;
/// Share of its quadrant a sprite may cover.
pub const SPRITE_SCALE: f32 = 0.65;

const DIVIDER_THICKNESS: f32 = 8.0;
const LABEL_MARGIN: f32 = 0.01;

const fn hex(rgb: u32) -> Color {
    Color::Hex([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub name: &'static str,
    pub name_color: Color,
    pub width: usize,
    pub rows: &'static [&'static str],
    pub palette: &'static [(char, Color)],
    pub quadrant: Rect,
    /// Negative: name above the sprite. Positive: below.
    pub label_offset: f32,
}

pub const MARIO: Sprite = Sprite {
    name: "MARIO",
    name_color: hex(0xFF0000),
    width: 12,
    rows: &[
        "____RRRRR___",
        "___RRRRRRR__",
        "___NNNYNY___",
        "__NSSYSYYN__",
        "__NSSYSYYYNN",
        "__NYYYYYYYYN",
        "____BBBB____",
        "__RBBBRBBR__",
        "_RBBRRRBBRR_",
        "RBBBBBRBBBB_",
        "BBBBBBRBBBBB",
        "BBBB__BBBB__",
        "NNN____NNN__",
        "_NN____NN___",
    ],
    palette: &[
        ('R', hex(0xE60000)),
        ('N', hex(0x7A3D03)),
        ('Y', hex(0xFBD000)),
        ('S', hex(0xFFCC99)),
        ('B', hex(0x0040FF)),
    ],
    quadrant: TOP_LEFT,
    label_offset: -0.08,
};

pub const PIKACHU: Sprite = Sprite {
    name: "PIKACHU",
    name_color: hex(0xFFA500),
    width: 13,
    rows: &[
        "____PPPPP____",
        "___PKKKPKK___",
        "__PKKPKPKKK__",
        "_PKKPKKPKPKK_",
        "_PKKPOKPKPOKK",
        "PPKPKKKPKPKPP",
        "PPKPK_KPKPKPP",
        "_PKPKKKPKPKP_",
        "__PKKKKKPKP__",
        "___PPPPPPP___",
        "____PP_PP____",
    ],
    palette: &[
        ('P', hex(0xFFDE38)),
        ('K', hex(0x000000)),
        ('O', hex(0xFF4444)),
        ('W', hex(0xFFFFFF)),
    ],
    quadrant: TOP_RIGHT,
    label_offset: -0.08,
};

pub const LINK: Sprite = Sprite {
    name: "LINK",
    name_color: hex(0x008000),
    width: 11,
    rows: &[
        "____GGG____",
        "___GGGGG___",
        "__LGGGGGL__",
        "_LGSYYSGLS_",
        "_GSSSSSGSG_",
        "__GSSSG GG_",
        "___GGGGG___",
        "___GNGNG___",
        "___GNGNG___",
        "__NNYNYNN__",
        "_BN___NB_",
        "B_______B",
    ],
    palette: &[
        ('G', hex(0x00A000)),
        ('L', hex(0x90EE90)),
        ('S', hex(0xFFDBAC)),
        ('Y', hex(0xFFFF99)),
        ('N', hex(0x704830)),
        ('B', hex(0x503020)),
    ],
    quadrant: BOTTOM_LEFT,
    label_offset: 0.13,
};

pub const SONIC: Sprite = Sprite {
    name: "SONIC",
    name_color: hex(0x0000FF),
    width: 13,
    rows: &[
        "___CCCCCCC___",
        "__CCCWCCCWC__",
        "_CCWCCCWCWCC_",
        "_CTWCWCWTWCC_",
        "CTTTWCWTTTWCW",
        "CTTT K TTTWCW",
        "CCTTTTTTWCC_",
        "_CCTTTTTCC__",
        "__EWWWEWWWE__",
        "__E_W_W_W_E__",
        "___E___E____",
    ],
    palette: &[
        ('C', hex(0x0070FF)),
        ('T', hex(0xC0D8F0)),
        ('W', hex(0xFFFFFF)),
        ('E', hex(0xD00000)),
        ('K', hex(0x000000)),
    ],
    quadrant: BOTTOM_RIGHT,
    label_offset: 0.13,
};

pub const ROSTER: [Sprite; 4] = [MARIO, PIKACHU, LINK, SONIC];

/// Quadrant dividers, each tinted after a neighbouring sprite.
pub fn dividers() -> RenderList {
    let line = |start: Vec2, end: Vec2, color: Color| {
        DrawCommand::line(start, end, color, DIVIDER_THICKNESS)
    };
    vec![
        line(Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.5), hex(0xE60000)),
        line(Vec2::new(0.5, 0.0), Vec2::new(0.5, 1.0), hex(0xFF4444)),
        line(Vec2::new(0.5, 0.5), Vec2::new(0.5, 1.0), hex(0x0070FF)),
        line(Vec2::new(0.0, 0.5), Vec2::new(0.5, 0.5), hex(0x00A000)),
    ]
}

/// Where a sprite and its name land inside the quadrant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteLayout {
    pub origin: Vec2,
    pub pixel_size: f32,
    pub label_origin: Vec2,
}

impl Sprite {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn color_of(&self, symbol: char) -> Option<Color> {
        self.palette
            .iter()
            .find(|(c, _)| *c == symbol)
            .map(|(_, color)| *color)
    }

    pub fn layout(&self, font: &PixelFont) -> SpriteLayout {
        let q = self.quadrant;
        let pixel_size = (q.width() * SPRITE_SCALE / self.width as f32)
            .min(q.height() * SPRITE_SCALE / self.height() as f32);
        let size = Vec2::new(self.width as f32, self.height() as f32) * pixel_size;
        let origin = q.min + (q.size() - size) / 2.0;

        let text_height = font.height() as f32 * NAME_PIXEL_SIZE;
        let label_width = font.measure(self.name, NAME_PIXEL_SIZE, DEFAULT_LETTER_SPACING);
        let label_y = if self.label_offset < 0.0 {
            origin.y + self.label_offset - text_height
        } else {
            origin.y + size.y + self.label_offset
        };
        // Upper bound wins when the quadrant is too short for both.
        let label_y = label_y
            .max(q.min.y + LABEL_MARGIN)
            .min(q.max.y - LABEL_MARGIN - text_height);

        SpriteLayout {
            origin,
            pixel_size,
            label_origin: Vec2::new(q.min.x + (q.width() - label_width) / 2.0, label_y),
        }
    }

    /// Filled pixels, row by row. Blanks and unknown symbols are skipped.
    pub fn pixels(&self, layout: &SpriteLayout, surface: &Surface) -> RenderList {
        let mut commands = RenderList::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, symbol) in row.chars().take(self.width).enumerate() {
                if symbol == '_' {
                    continue;
                }
                let Some(color) = self.color_of(symbol) else {
                    continue;
                };
                let at = layout.origin + Vec2::new(x as f32, y as f32) * layout.pixel_size;
                commands.push(DrawCommand::pixel(at, layout.pixel_size, color, surface));
            }
        }
        commands
    }

    pub fn label(&self, layout: &SpriteLayout) -> PixelText {
        PixelText::new(self.name, layout.label_origin, NAME_PIXEL_SIZE, self.name_color)
            .with_delay(TEXT_PIXEL_MS)
    }
}

/// The centred "VS" title.
pub fn title(font: &PixelFont) -> PixelText {
    let width = font.measure("VS", TITLE_PIXEL_SIZE, DEFAULT_LETTER_SPACING);
    let height = font.height() as f32 * TITLE_PIXEL_SIZE;
    let origin = CENTER - Vec2::new(width, height) / 2.0;
    PixelText::new("VS", origin, TITLE_PIXEL_SIZE, Color::BLACK).with_delay(TEXT_PIXEL_MS)
}

pub async fn pixel_art_characters(ctx: &mut DrawContext<'_>) -> Step {
    let font = &*STANDARD;

    for divider in dividers() {
        ctx.send(&divider)?;
    }
    ctx.pace(100).await;
    draw_text(ctx, font, &title(font)).await?;
    ctx.pace(100).await;

    for sprite in &ROSTER {
        ctx.begin_unit()?;
        let layout = sprite.layout(font);
        tracing::debug!(sprite = sprite.name, pixel_size = layout.pixel_size, "Drawing sprite");

        draw_text(ctx, font, &sprite.label(&layout)).await?;
        ctx.pace(50).await;
        for pixel in sprite.pixels(&layout, ctx.surface()) {
            ctx.send_paced(&pixel, SPRITE_PIXEL_MS).await?;
        }
        ctx.pace(200).await;
    }
    Ok(())
}
