//! Filter operations
//!
//! This module provides the gaussian kernel and the convolution routines used by the blur.

/// Filter kernels
pub mod kernels;

/// Convolution operations
mod convolution;
pub use convolution::*;
