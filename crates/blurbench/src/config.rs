use std::path::Path;

use blurbench_imgproc::{
    decompose::DEFAULT_LEAF_AREA, filter::kernels::is_valid_sigma, parallel::available_threads,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::BlurError;

/// Default blur strength.
pub const DEFAULT_SIGMA: f32 = 2.0;

/// Default size of the image worker pool.
pub const DEFAULT_NUM_THREADS: usize = 4;

/// Default number of repetitions per thread count in the benchmark.
pub const DEFAULT_RUNS: usize = 3;

/// Default thread counts measured by the benchmark.
pub const DEFAULT_THREAD_COUNTS: [usize; 4] = [2, 4, 8, 16];

/// Configuration of a [`BatchProcessor`](crate::BatchProcessor).
///
/// Missing fields take their default value when deserialized.
///
/// # Examples
///
/// ```
/// use blurbench::BlurConfig;
///
/// let config: BlurConfig = serde_json::from_str(r#"{ "sigma": 1.5 }"#).unwrap();
/// assert_eq!(config.sigma, 1.5);
/// assert_eq!(config.num_threads, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurConfig {
    /// Standard deviation of the gaussian kernel, must be > 0 and at most 500/3.
    pub sigma: f32,
    /// Number of images processed concurrently in parallel mode.
    pub num_threads: usize,
    /// Largest region, in pixels, blurred without further splitting.
    pub leaf_area: usize,
    /// Size of the pool scheduling the region tasks; defaults to the available cores.
    pub region_threads: Option<usize>,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            num_threads: DEFAULT_NUM_THREADS,
            leaf_area: DEFAULT_LEAF_AREA,
            region_threads: None,
        }
    }
}

impl BlurConfig {
    /// Check the configuration before any processing starts.
    pub fn validate(&self) -> Result<(), BlurError> {
        validate_sigma(self.sigma)?;
        validate_threads(self.num_threads)?;
        validate_leaf_area(self.leaf_area)?;
        if let Some(threads) = self.region_threads {
            validate_threads(threads)?;
        }
        Ok(())
    }

    /// Number of threads of the region scheduler.
    pub fn region_threads(&self) -> usize {
        self.region_threads.unwrap_or_else(available_threads)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BlurError> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration of a [`BenchmarkHarness`](crate::BenchmarkHarness).
///
/// Missing fields take their default value when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Standard deviation of the gaussian kernel, must be > 0 and at most 500/3.
    pub sigma: f32,
    /// Image pool sizes to measure in parallel mode.
    pub thread_counts: Vec<usize>,
    /// Parallel runs averaged per thread count.
    pub runs: usize,
    /// Largest region, in pixels, blurred without further splitting.
    pub leaf_area: usize,
    /// Size of the pool scheduling the region tasks; defaults to the available cores.
    pub region_threads: Option<usize>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            thread_counts: DEFAULT_THREAD_COUNTS.to_vec(),
            runs: DEFAULT_RUNS,
            leaf_area: DEFAULT_LEAF_AREA,
            region_threads: None,
        }
    }
}

impl BenchmarkConfig {
    /// Check the configuration before any processing starts.
    pub fn validate(&self) -> Result<(), BlurError> {
        validate_sigma(self.sigma)?;
        if self.thread_counts.is_empty() {
            return Err(BlurError::EmptyThreadCounts);
        }
        for &threads in &self.thread_counts {
            validate_threads(threads)?;
        }
        if self.runs == 0 {
            return Err(BlurError::InvalidRunCount(self.runs));
        }
        validate_leaf_area(self.leaf_area)?;
        if let Some(threads) = self.region_threads {
            validate_threads(threads)?;
        }
        Ok(())
    }

    /// The batch configuration for one measured pool size.
    pub fn blur_config(&self, num_threads: usize) -> BlurConfig {
        BlurConfig {
            sigma: self.sigma,
            num_threads,
            leaf_area: self.leaf_area,
            region_threads: self.region_threads,
        }
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BlurError> {
        let config: Self = read_json(path)?;
        config.validate()?;
        Ok(config)
    }
}

fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, BlurError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

fn validate_sigma(sigma: f32) -> Result<(), BlurError> {
    if !is_valid_sigma(sigma) {
        return Err(BlurError::InvalidSigma(sigma));
    }
    Ok(())
}

fn validate_threads(threads: usize) -> Result<(), BlurError> {
    if threads == 0 {
        return Err(BlurError::InvalidThreadCount(threads));
    }
    Ok(())
}

fn validate_leaf_area(leaf_area: usize) -> Result<(), BlurError> {
    if leaf_area == 0 {
        return Err(BlurError::InvalidLeafArea(leaf_area));
    }
    Ok(())
}
