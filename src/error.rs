use derive_more::Display;

pub type Result<T> = core::result::Result<T, MarchingSquaresError>;

#[derive(Debug, Display)]
#[display("{self:?}")]
pub enum MarchingSquaresError {
    /// Buffer length does not match the requested dimensions.
    SizeMismatch { expected: usize, actual: usize },
    /// Operation needs more channels than the image has.
    ChannelCount { required: usize, actual: usize },
    ChannelOutOfRange { channel: usize, channels: usize },
    InvalidKernel { width: usize, height: usize },
}

impl std::error::Error for MarchingSquaresError {}
