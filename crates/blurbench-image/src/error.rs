/// An error type for the image and image processing crates.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must agree in size do not.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the gaussian sigma is not positive or gives a kernel that is too wide.
    #[error("Sigma must be positive and at most 500/3, got {0}")]
    InvalidSigma(f32),

    /// Error when a region does not fit inside the image it refers to.
    #[error("Region ({0}, {1}, {2}x{3}) is out of the image bounds ({4}x{5})")]
    RegionOutOfBounds(usize, usize, usize, usize, usize, usize),

    /// Error when four quadrants cannot be tiled into one image.
    #[error("Quadrant sizes do not tile a rectangle: {0}")]
    QuadrantMismatch(String),
}
