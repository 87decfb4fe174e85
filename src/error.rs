use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("importance map length {len} does not match pixel count {pixels}")]
    ImportanceMapMismatch { len: usize, pixels: usize },

    #[error("ignore_bits must be at most 7, got {0}")]
    InvalidIgnoreBits(u8),

    #[error("max_colors must be at least 1, got {0}")]
    InvalidMaxColors(usize),

    #[error("image exceeds {max_colors} distinct colors at this posterization level")]
    Overflow { max_colors: usize },
}
