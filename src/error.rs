//! Error types for motion-score

use thiserror::Error;

/// Rejected configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("history.capacity must be at least 1")]
    ZeroCapacity,

    #[error("matcher.live_stride must be at least 1")]
    ZeroStride,

    #[error("matcher.missing_penalty must be finite and non-negative, got {0}")]
    InvalidPenalty(f32),

    #[error("scoring.{name} must be finite and positive, got {value}")]
    InvalidCurve { name: &'static str, value: f64 },

    #[error("extraction.confidence_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("extraction frame size must be positive, got {width}x{height}")]
    InvalidFrameSize { width: f32, height: f32 },
}
