use std::path::PathBuf;

/// Failures at the file boundary: reading, decoding and encoding images.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// The path does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// The extension does not name a supported output format.
    #[error("Unsupported image file extension: {0}")]
    InvalidFileExtension(PathBuf),

    /// The file system refused an operation.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The decoded buffer does not form a valid image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] blurbench_image::ImageError),

    /// The file content is not a decodable image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The encoder rejected the image.
    #[error("Failed to encode the image. {0}")]
    ImageEncodeError(image::ImageError),
}
