use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VizError {
    #[error("unknown render mode `{0}`")]
    UnknownMode(String),
    #[error("GPU rendering unavailable: {0}")]
    GpuUnavailable(String),
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },
    #[error("GPU frame failed: {0}")]
    GpuFrame(String),
}

pub type Result<T> = std::result::Result<T, VizError>;
