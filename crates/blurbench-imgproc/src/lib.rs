#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// copying a region out of an image.
pub mod crop;

/// recursive quadrant decomposition of the blur.
pub mod decompose;

/// image filtering module.
pub mod filter;

/// quadrant merging module.
pub mod merge;

/// worker pool helpers.
pub mod parallel;

/// rectangular regions over an image.
pub mod region;
