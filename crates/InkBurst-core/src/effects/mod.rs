//! # Effects
//!
//! The procedural generators. Each one is an `async fn` over a
//! [`DrawContext`] that returns a [`Step`]; the session wraps them with the
//! start/finish bookkeeping.

use std::fmt;
use std::str::FromStr;
use stroke_canvas::CommandBatch;

use crate::font::{self, PixelText};
use crate::pipeline::{DrawContext, Step};
use crate::session::DrawError;

pub mod ballet;
pub mod bloom;
pub mod characters;
pub mod festival;
pub mod fireworks;
pub mod glass;
pub mod maintenance;
pub mod nova;
pub mod sweep;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    PixelArtCharacters,
    DirectionalHueBlast,
    RadialBurst,
    ColorFestival,
    LightSpeedFireworks,
    FractalBloomMandala,
    PulsatingStainedGlass,
    CelestialBallet,
    RecursiveStarNova,
    ClearCanvas,
    Text(PixelText),
    Replay(CommandBatch),
}

/// Effects that need no input beyond a name.
pub const CATALOG: [Effect; 10] = [
    Effect::PixelArtCharacters,
    Effect::DirectionalHueBlast,
    Effect::RadialBurst,
    Effect::ColorFestival,
    Effect::LightSpeedFireworks,
    Effect::FractalBloomMandala,
    Effect::PulsatingStainedGlass,
    Effect::CelestialBallet,
    Effect::RecursiveStarNova,
    Effect::ClearCanvas,
];

impl Effect {
    /// Stable kebab-case identifier, as accepted by `FromStr`.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::PixelArtCharacters => "pixel-art-characters",
            Effect::DirectionalHueBlast => "directional-hue-blast",
            Effect::RadialBurst => "radial-burst",
            Effect::ColorFestival => "color-festival",
            Effect::LightSpeedFireworks => "light-speed-fireworks",
            Effect::FractalBloomMandala => "fractal-bloom-mandala",
            Effect::PulsatingStainedGlass => "pulsating-stained-glass",
            Effect::CelestialBallet => "celestial-ballet",
            Effect::RecursiveStarNova => "recursive-star-nova",
            Effect::ClearCanvas => "clear-canvas",
            Effect::Text(_) => "pixel-text",
            Effect::Replay(_) => "replay",
        }
    }

    /// Human-readable name used in notifications.
    pub fn title(&self) -> String {
        match self {
            Effect::PixelArtCharacters => "Enhanced Pixel Art Characters".into(),
            Effect::DirectionalHueBlast => "Directional Hue Blast".into(),
            Effect::RadialBurst => "Radial Burst".into(),
            Effect::ColorFestival => "Color Festival".into(),
            Effect::LightSpeedFireworks => "Light Speed Fireworks".into(),
            Effect::FractalBloomMandala => "Fractal Bloom Mandala".into(),
            Effect::PulsatingStainedGlass => "Pulsating Stained Glass".into(),
            Effect::CelestialBallet => "Celestial Ballet".into(),
            Effect::RecursiveStarNova => "Recursive Star Polygon Nova".into(),
            Effect::ClearCanvas => "Clear Canvas".into(),
            Effect::Text(text) => format!("Pixel Text \"{}\"", text.text),
            Effect::Replay(batch) => format!("Drawing {} lines", batch.len()),
        }
    }

    /// Whether a run of this effect bumps the session frame counter.
    pub fn advances_frame(&self) -> bool {
        matches!(
            self,
            Effect::FractalBloomMandala | Effect::RecursiveStarNova
        )
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        CATALOG
            .into_iter()
            .find(|effect| effect.name() == wanted)
            .ok_or_else(|| DrawError::UnknownEffect(s.to_string()))
    }
}

/// Runs the generator behind `effect`. `frame` is the session frame counter.
pub async fn run(effect: &Effect, ctx: &mut DrawContext<'_>, frame: u64) -> Step {
    match effect {
        Effect::PixelArtCharacters => characters::pixel_art_characters(ctx).await,
        Effect::DirectionalHueBlast => sweep::directional_hue_blast(ctx).await,
        Effect::RadialBurst => sweep::radial_burst(ctx).await,
        Effect::ColorFestival => festival::color_festival(ctx).await,
        Effect::LightSpeedFireworks => fireworks::light_speed_fireworks(ctx).await,
        Effect::FractalBloomMandala => bloom::fractal_bloom_mandala(ctx, frame).await,
        Effect::PulsatingStainedGlass => glass::pulsating_stained_glass(ctx).await,
        Effect::CelestialBallet => ballet::celestial_ballet(ctx).await,
        Effect::RecursiveStarNova => nova::recursive_star_nova(ctx, frame).await,
        Effect::ClearCanvas => maintenance::clear_canvas(ctx).await,
        Effect::Text(text) => {
            ctx.begin_unit()?;
            font::draw_text(ctx, &font::STANDARD, text).await
        }
        Effect::Replay(batch) => maintenance::replay(ctx, batch).await,
    }
}
