//! # ImageTrace
//!
//! `image_trace` turns a raster image into a replayable `CommandBatch`: the
//! image is reduced to a small palette, the outline of every colour region is
//! traced, simplified and normalized onto the drawing surface.
//!
//! ## Core Architecture
//! - **Quantize (`src/quantize.rs`)**: Seeded k-means palette reduction.
//! - **Contour (`src/contour.rs`)**: Outer boundaries of regions in a binary mask.
//! - **Simplify (`src/simplify.rs`)**: Douglas-Peucker on closed outlines.
//! - **Convert (`src/convert.rs`)**: Options, resizing and the file-to-batch entry point.

pub mod contour;
pub mod convert;
pub mod quantize;
pub mod simplify;

pub use contour::{Mask, external_contours};
pub use convert::{ExactSize, Quality, TraceError, TraceOptions, convert_file, prepare, trace};
pub use quantize::{Palette, quantize};
