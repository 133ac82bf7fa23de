#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use blurbench_image as image;

#[doc(inline)]
pub use blurbench_imgproc as imgproc;

#[doc(inline)]
pub use blurbench_io as io;

/// Batch processing of image files.
pub mod batch;

/// Timing harness comparing the processing modes.
pub mod benchmark;

/// Validated configuration for the batch processor and the harness.
pub mod config;

/// Error types for the top-level crate.
pub mod error;

/// Random test image generation.
pub mod synthetic;

pub use crate::batch::{BatchProcessor, ProcessingMode, ProcessingResult};
pub use crate::benchmark::{BenchmarkHarness, BenchmarkReport, BenchmarkRow};
pub use crate::config::{BenchmarkConfig, BlurConfig};
pub use crate::error::BlurError;
