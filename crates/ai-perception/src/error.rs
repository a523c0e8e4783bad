use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("vision distance must be finite and non-negative, got {0}")]
    VisionDistance(f32),

    #[error("field of view must be in (0, 360] degrees, got {0}")]
    FieldOfView(f32),
}
