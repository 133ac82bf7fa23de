use blurbench_image::ImageError;
use blurbench_imgproc::parallel::ParallelError;
use blurbench_io::IoError;

/// An error type for batch processing and benchmarking.
#[derive(thiserror::Error, Debug)]
pub enum BlurError {
    /// The gaussian sigma is not positive or gives a kernel wider than the supported maximum.
    #[error("Sigma must be positive and at most 500/3, got {0}")]
    InvalidSigma(f32),

    /// The worker pool size is zero.
    #[error("Thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The number of benchmark repetitions is zero.
    #[error("Run count must be > 0, got {0}")]
    InvalidRunCount(usize),

    /// The leaf area of the recursive decomposition is zero.
    #[error("Leaf area must be > 0, got {0}")]
    InvalidLeafArea(usize),

    /// The benchmark has no thread counts to measure.
    #[error("At least one thread count is required")]
    EmptyThreadCounts,

    /// An image could not be read or decoded.
    #[error("Failed to decode the image. {0}")]
    Decode(#[from] IoError),

    /// An image could not be encoded or written.
    #[error("Failed to encode the image. {0}")]
    Encode(IoError),

    /// The blur reported an error for one image.
    #[error("Failed to process the image. {0}")]
    Computation(#[from] ImageError),

    /// The blur panicked for one image.
    #[error("Image processing panicked: {0}")]
    ComputationFault(String),

    /// A worker pool could not be created.
    #[error("Failed to create the worker pool. {0}")]
    ThreadPool(#[from] ParallelError),

    /// A configuration file could not be parsed.
    #[error("Failed to parse the configuration. {0}")]
    Config(#[from] serde_json::Error),

    /// A file or directory could not be accessed.
    #[error("Failed to manipulate the file. {0}")]
    File(#[from] std::io::Error),
}
