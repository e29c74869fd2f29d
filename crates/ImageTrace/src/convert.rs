//! # Image Conversion
//!
//! Loads an image, fits it to the requested size, reduces its colours and
//! turns every colour region's outline into line commands on the default
//! 800x630 surface.

use glam::Vec2;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::path::Path;
use std::str::FromStr;
use stroke_canvas::{Color, CommandBatch, DrawCommand, Surface};

use crate::contour::{Mask, external_contours};
use crate::quantize::{MAX_COLORS, quantize};
use crate::simplify::{outline_segments, perimeter, simplify_closed};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 2.0;
pub const MAX_THICKNESS: u32 = 50;

/// Coordinates are kept to four decimals.
const COORD_PRECISION: f32 = 10_000.0;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid size '{0}', expected WIDTHxHEIGHT")]
    Size(String),
    #[error("unknown quality '{0}', expected low, medium or high")]
    Quality(String),
}

/// Outline fidelity: how far a simplified outline may stray from the pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    /// Allowed deviation as a share of the outline's perimeter.
    pub fn epsilon_factor(self) -> f32 {
        match self {
            Quality::Low => 0.004,
            Quality::Medium => 0.002,
            Quality::High => 0.001,
        }
    }
}

impl FromStr for Quality {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            _ => Err(TraceError::Quality(s.to_string())),
        }
    }
}

/// A target size in pixels such as `67.32x67.32`; rounded when applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExactSize {
    pub width: f32,
    pub height: f32,
}

impl ExactSize {
    pub fn pixels(&self) -> (u32, u32) {
        let side = |v: f32| (v.round() as u32).max(1);
        (side(self.width), side(self.height))
    }
}

impl FromStr for ExactSize {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TraceError::Size(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(invalid)
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraceOptions {
    /// Palette size, `1..=16`. Default: 8.
    pub max_colors: usize,
    /// Stroke thickness, `1..=50`. Default: 2.
    pub thickness: u32,
    /// Resize factor, `0.1..=2.0`. Ignored when `exact_size` is set. Default: 1.0.
    pub scale: f32,
    pub exact_size: Option<ExactSize>,
    pub quality: Quality,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_colors: 8,
            thickness: 2,
            scale: 1.0,
            exact_size: None,
            quality: Quality::Medium,
        }
    }
}

impl TraceOptions {
    /// Copy with every numeric option forced into its supported range.
    pub fn clamped(&self) -> Self {
        let scale = if self.scale.is_finite() { self.scale } else { 1.0 };
        Self {
            max_colors: self.max_colors.clamp(1, MAX_COLORS),
            thickness: self.thickness.clamp(1, MAX_THICKNESS),
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            ..self.clone()
        }
    }
}

/// Converts to RGB and resizes: nearest-neighbour to an exact size, or
/// Lanczos by the scale factor.
pub fn prepare(image: &DynamicImage, options: &TraceOptions) -> RgbImage {
    let options = options.clamped();
    let rgb = image.to_rgb8();
    match options.exact_size {
        Some(size) => {
            let (width, height) = size.pixels();
            imageops::resize(&rgb, width, height, FilterType::Nearest)
        }
        None => {
            let width = ((rgb.width() as f32 * options.scale) as u32).max(1);
            let height = ((rgb.height() as f32 * options.scale) as u32).max(1);
            if (width, height) == rgb.dimensions() {
                rgb
            } else {
                imageops::resize(&rgb, width, height, FilterType::Lanczos3)
            }
        }
    }
}

/// Maps a pixel position onto the surface, rounded to four decimals.
pub fn normalize(p: Vec2, surface: &Surface) -> Vec2 {
    let round = |v: f32| (v * COORD_PRECISION).round() / COORD_PRECISION;
    Vec2::new(round(p.x / surface.width), round(p.y / surface.height))
}

/// Outline commands for every palette colour, in palette order.
pub fn trace(image: &RgbImage, options: &TraceOptions) -> Vec<DrawCommand> {
    let options = options.clamped();
    let surface = Surface::default();
    let palette = quantize(image, options.max_colors);
    let (width, height) = image.dimensions();
    let mut commands = Vec::new();

    for (index, rgb) in palette.colors.iter().enumerate() {
        let color = Color::Hex(*rgb);
        let mask = Mask::new(width, height, palette.labels.iter().map(|&l| l == index).collect());
        let before = commands.len();

        for contour in external_contours(&mask) {
            let points: Vec<Vec2> = contour.iter().map(|p| p.as_vec2()).collect();
            let epsilon = options.quality.epsilon_factor() * perimeter(&points);
            let outline = simplify_closed(&points, epsilon);
            commands.extend(outline_segments(&outline).into_iter().map(|(a, b)| {
                DrawCommand::line(
                    normalize(a, &surface),
                    normalize(b, &surface),
                    color,
                    options.thickness as f32,
                )
            }));
        }
        tracing::debug!(%color, commands = commands.len() - before, "Traced palette colour");
    }
    commands
}

/// Loads `path` and converts it into a batch named after the image file.
pub fn convert_file(
    path: impl AsRef<Path>,
    options: &TraceOptions,
) -> Result<CommandBatch, TraceError> {
    let path = path.as_ref();
    let image = image::open(path)?;
    let prepared = prepare(&image, options);
    tracing::info!(
        path = %path.display(),
        width = prepared.width(),
        height = prepared.height(),
        "Tracing image"
    );

    let commands = trace(&prepared, options);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(CommandBatch::new(name, commands, &Surface::default()))
}
