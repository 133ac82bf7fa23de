#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// owned interleaved image buffers.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
