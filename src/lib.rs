#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod arena;
pub mod colorspace;
pub mod error;
pub mod histogram;
pub mod palette;

pub use colorspace::LinearColor;
pub use error::HistogramError;
pub use histogram::{Histogram, HistogramEntry};
pub use palette::Palette;

/// Configuration for a histogram build.
#[derive(Debug, Clone)]
pub struct HistogramConfig {
    /// Source gamma exponent used to linearize color channels.
    pub gamma: f64,
    /// Hard ceiling on distinct (posterized) colors. Exceeding it fails the
    /// build with [`HistogramError::Overflow`].
    pub max_colors: usize,
    /// Low-order bits to zero in every channel before bucketing (0–7).
    /// Raising this merges near-duplicate colors, trading histogram
    /// precision for bounded size.
    pub ignore_bits: u8,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            gamma: 0.45455,
            max_colors: 65_536,
            ignore_bits: 0,
        }
    }
}

impl HistogramConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn max_colors(mut self, n: usize) -> Self {
        self.max_colors = n;
        self
    }

    pub fn ignore_bits(mut self, bits: u8) -> Self {
        self.ignore_bits = bits;
        self
    }
}

/// Build a bounded, weighted color histogram from an RGBA image.
///
/// Pixels are scanned in row-major order; each contributes a weight of 1.0,
/// or `0.5 + importance[i]` when a per-pixel importance map (row-major,
/// `width * height` scalars) is supplied. Colors are deduplicated after
/// zeroing `config.ignore_bits` low bits of every channel.
///
/// Fails with [`HistogramError::Overflow`], discarding all partial state, as
/// soon as the distinct-color count would exceed `config.max_colors`; the
/// expected response is to retry with a coarser `ignore_bits`.
pub fn build_histogram(
    pixels: &[rgb::RGBA<u8>],
    width: usize,
    height: usize,
    config: &HistogramConfig,
    importance: Option<&[f32]>,
) -> Result<Histogram, HistogramError> {
    validate_inputs(pixels.len(), width, height, importance, config)?;
    histogram::build_histogram(pixels, importance, config)
}

fn validate_inputs(
    pixel_count: usize,
    width: usize,
    height: usize,
    importance: Option<&[f32]>,
    config: &HistogramConfig,
) -> Result<(), HistogramError> {
    if width == 0 || height == 0 {
        return Err(HistogramError::ZeroDimension);
    }
    if pixel_count != width * height {
        return Err(HistogramError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
        });
    }
    if let Some(map) = importance {
        if map.len() != pixel_count {
            return Err(HistogramError::ImportanceMapMismatch {
                len: map.len(),
                pixels: pixel_count,
            });
        }
    }
    if config.ignore_bits > 7 {
        return Err(HistogramError::InvalidIgnoreBits(config.ignore_bits));
    }
    if config.max_colors == 0 {
        return Err(HistogramError::InvalidMaxColors(config.max_colors));
    }
    Ok(())
}
