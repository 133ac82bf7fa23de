use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

use blurbench_image::Image;
use blurbench_imgproc::{
    decompose::gaussian_blur_recursive,
    filter::{gaussian_blur_sequential, kernels::GaussianKernel},
    parallel::{build_thread_pool, spawn_collect},
};
use blurbench_io::{
    functional::{read_image_any_rgb8, write_image_rgb8},
    IoError,
};
use serde::{Deserialize, Serialize};

use crate::{config::BlurConfig, error::BlurError};

/// How a batch of images is blurred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// One image after the other on the calling thread, each with the interior scan.
    #[default]
    Sequential,
    /// Images on a worker pool, each with the recursive quadrant decomposition.
    Parallel,
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::Sequential => write!(f, "sequential"),
            ProcessingMode::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(ProcessingMode::Sequential),
            "parallel" | "par" => Ok(ProcessingMode::Parallel),
            other => Err(format!(
                "unknown processing mode '{other}', expected 'sequential' or 'parallel'"
            )),
        }
    }
}

/// The blurred images of one batch together with the wall-clock time it took.
///
/// Images keep the order of the input paths, minus the ones that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    images: Vec<Image<u8, 3>>,
    elapsed: Duration,
}

impl ProcessingResult {
    /// Create a result from already processed images.
    pub fn new(images: Vec<Image<u8, 3>>, elapsed: Duration) -> Self {
        Self { images, elapsed }
    }

    /// The blurred images.
    pub fn images(&self) -> &[Image<u8, 3>] {
        &self.images
    }

    /// Consume the result and return the blurred images.
    pub fn into_images(self) -> Vec<Image<u8, 3>> {
        self.images
    }

    /// Number of images that were processed successfully.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no image was processed successfully.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Wall-clock time of the batch.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Wall-clock time of the batch in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Write the images to `dir` as `blurred_<i>.jpg`, creating the directory if needed.
    ///
    /// Returns the written paths in image order.
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, BlurError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut paths = Vec::with_capacity(self.images.len());
        for (i, image) in self.images.iter().enumerate() {
            let path = dir.join(format!("blurred_{i}.jpg"));
            write_image_rgb8(&path, image).map_err(BlurError::Encode)?;
            paths.push(path);
        }
        log::info!("saved {} images to {}", paths.len(), dir.display());

        Ok(paths)
    }
}

/// Blurs batches of image files with a fixed gaussian kernel.
///
/// Per-image failures never abort a batch: a file that cannot be decoded, or whose blur
/// fails or panics, is logged and left out of the result.
///
/// # Examples
///
/// ```no_run
/// use blurbench::{BatchProcessor, BlurConfig, ProcessingMode};
///
/// let processor = BatchProcessor::new(BlurConfig::default()).unwrap();
/// let result = processor
///     .process(&["test_0.jpg", "test_1.jpg"], ProcessingMode::Parallel)
///     .unwrap();
/// println!("{} images in {:.3}s", result.len(), result.elapsed_secs());
/// ```
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: BlurConfig,
    kernel: GaussianKernel,
}

impl BatchProcessor {
    /// Validate the configuration and build the gaussian kernel.
    pub fn new(config: BlurConfig) -> Result<Self, BlurError> {
        config.validate()?;
        let kernel = GaussianKernel::new(config.sigma)?;
        log::debug!(
            "gaussian kernel sigma {} size {}x{}",
            kernel.sigma(),
            kernel.size(),
            kernel.size()
        );
        Ok(Self { config, kernel })
    }

    /// The processor configuration.
    pub fn config(&self) -> &BlurConfig {
        &self.config
    }

    /// The kernel shared by every image.
    pub fn kernel(&self) -> &GaussianKernel {
        &self.kernel
    }

    /// Blur every readable image of `paths` with the given mode.
    ///
    /// # Errors
    ///
    /// Only the creation of the worker pools can fail; see [`Self::process_parallel`].
    pub fn process<P>(
        &self,
        paths: &[P],
        mode: ProcessingMode,
    ) -> Result<ProcessingResult, BlurError>
    where
        P: AsRef<Path> + Sync,
    {
        match mode {
            ProcessingMode::Sequential => Ok(self.process_sequential(paths)),
            ProcessingMode::Parallel => self.process_parallel(paths),
        }
    }

    /// Read and blur the images one after the other with the interior scan.
    pub fn process_sequential<P: AsRef<Path>>(&self, paths: &[P]) -> ProcessingResult {
        self.run_sequential(paths, |path| read_image_any_rgb8(path))
    }

    /// Read and blur the images concurrently with the recursive decomposition.
    ///
    /// Images are distributed over a pool of `num_threads` workers. The region tasks of all
    /// images share one pool of `region_threads` workers. Both pools live for the duration
    /// of the call.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::ThreadPool`] if a worker pool cannot be created.
    pub fn process_parallel<P>(&self, paths: &[P]) -> Result<ProcessingResult, BlurError>
    where
        P: AsRef<Path> + Sync,
    {
        self.run_parallel(paths, |path| read_image_any_rgb8(path))
    }

    fn run_sequential<P, D>(&self, paths: &[P], decode: D) -> ProcessingResult
    where
        P: AsRef<Path>,
        D: Fn(&Path) -> Result<Image<u8, 3>, IoError>,
    {
        let start = Instant::now();
        let outcomes = paths
            .iter()
            .map(|path| {
                contain(|| {
                    let image = decode(path.as_ref())?;
                    Ok(gaussian_blur_sequential(&image, &self.kernel)?)
                })
            })
            .collect();
        let images = collect_outcomes(paths, outcomes);
        let elapsed = start.elapsed();

        log_batch(ProcessingMode::Sequential, paths.len(), images.len(), elapsed);
        ProcessingResult::new(images, elapsed)
    }

    fn run_parallel<P, D>(&self, paths: &[P], decode: D) -> Result<ProcessingResult, BlurError>
    where
        P: AsRef<Path> + Sync,
        D: Fn(&Path) -> Result<Image<u8, 3>, IoError> + Sync,
    {
        let image_pool = build_thread_pool(self.config.num_threads, "blur-image")?;
        let region_pool = build_thread_pool(self.config.region_threads(), "blur-region")?;

        let start = Instant::now();
        let outcomes = spawn_collect(&image_pool, paths, |index, path| {
            log::trace!("image {index}: {}", path.as_ref().display());
            contain(|| {
                let image = decode(path.as_ref())?;
                Ok(region_pool.install(|| {
                    gaussian_blur_recursive(&image, &self.kernel, self.config.leaf_area)
                })?)
            })
        });
        let images = collect_outcomes(paths, outcomes);
        let elapsed = start.elapsed();

        drop(image_pool);
        drop(region_pool);

        log_batch(ProcessingMode::Parallel, paths.len(), images.len(), elapsed);
        Ok(ProcessingResult::new(images, elapsed))
    }

    /// Blur an image already in memory with the given mode.
    ///
    /// In parallel mode the region tasks run on the current rayon pool.
    pub fn blur_image(
        &self,
        image: &Image<u8, 3>,
        mode: ProcessingMode,
    ) -> Result<Image<u8, 3>, BlurError> {
        contain(|| {
            Ok(match mode {
                ProcessingMode::Sequential => gaussian_blur_sequential(image, &self.kernel),
                ProcessingMode::Parallel => {
                    gaussian_blur_recursive(image, &self.kernel, self.config.leaf_area)
                }
            }?)
        })
    }
}

/// Run the work of one image, decode included, turning a panic into
/// [`BlurError::ComputationFault`].
fn contain<F>(f: F) -> Result<Image<u8, 3>, BlurError>
where
    F: FnOnce() -> Result<Image<u8, 3>, BlurError>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(res) => res,
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(BlurError::ComputationFault(msg))
        }
    }
}

fn collect_outcomes<P: AsRef<Path>>(
    paths: &[P],
    outcomes: Vec<Result<Image<u8, 3>, BlurError>>,
) -> Vec<Image<u8, 3>> {
    paths
        .iter()
        .zip(outcomes)
        .filter_map(|(path, outcome)| match outcome {
            Ok(image) => Some(image),
            Err(e) => {
                log::warn!("skipping {}: {e}", path.as_ref().display());
                None
            }
        })
        .collect()
}

fn log_batch(mode: ProcessingMode, total: usize, processed: usize, elapsed: Duration) {
    if processed < total {
        log::warn!("{mode}: {} of {total} images skipped", total - processed);
    }
    log::info!(
        "{mode}: processed {processed} images in {:.3}s",
        elapsed.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blurbench_image::ImageSize;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn checker_image(width: usize, height: usize) -> Result<Image<u8, 3>, BlurError> {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 20 };
                data.extend_from_slice(&[v, 255 - v, (x * 3) as u8]);
            }
        }
        Ok(Image::new(ImageSize { width, height }, data)?)
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("parallel".parse(), Ok(ProcessingMode::Parallel));
        assert_eq!("SEQ".parse(), Ok(ProcessingMode::Sequential));
        assert!("both".parse::<ProcessingMode>().is_err());
        assert_eq!(ProcessingMode::Parallel.to_string(), "parallel");
        assert_eq!(ProcessingMode::default(), ProcessingMode::Sequential);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = BlurConfig {
            sigma: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            BatchProcessor::new(config),
            Err(BlurError::InvalidSigma(_))
        ));
    }

    #[test]
    fn test_blur_image_modes_agree() -> Result<(), BlurError> {
        let processor = BatchProcessor::new(BlurConfig {
            sigma: 1.0,
            leaf_area: 64,
            ..Default::default()
        })?;
        let image = checker_image(40, 33)?;

        let sequential = processor.blur_image(&image, ProcessingMode::Sequential)?;
        let parallel = processor.blur_image(&image, ProcessingMode::Parallel)?;
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.size(), image.size());
        Ok(())
    }

    #[test]
    fn test_contain_panic() {
        let res = contain(|| panic!("boom"));
        assert!(matches!(res, Err(BlurError::ComputationFault(ref m)) if m == "boom"));

        let res = contain(|| Err(blurbench_image::ImageError::InvalidSigma(-1.0).into()));
        assert!(matches!(res, Err(BlurError::Computation(_))));
    }

    #[test]
    fn test_decoder_panic_is_skipped() -> Result<(), BlurError> {
        init_logger();
        let processor = BatchProcessor::new(BlurConfig {
            sigma: 1.0,
            num_threads: 2,
            leaf_area: 32,
            region_threads: Some(2),
        })?;
        let paths = ["a.png", "corrupt.png", "b.png"];
        let decode = |path: &Path| -> Result<Image<u8, 3>, IoError> {
            if path.ends_with("corrupt.png") {
                panic!("decoder overflow");
            }
            Ok(Image::from_size_val([6, 5].into(), 128)?)
        };

        let result = processor.run_sequential(&paths, decode);
        assert_eq!(result.len(), 2);

        let result = processor.run_parallel(&paths, decode)?;
        assert_eq!(result.len(), 2);
        assert!(result.images().iter().all(|image| image.size() == [6, 5].into()));
        Ok(())
    }

    #[test]
    fn test_empty_batch() -> Result<(), BlurError> {
        init_logger();
        let processor = BatchProcessor::new(BlurConfig::default())?;
        let paths: Vec<PathBuf> = vec![];

        for mode in [ProcessingMode::Sequential, ProcessingMode::Parallel] {
            let result = processor.process(&paths, mode)?;
            assert!(result.is_empty());
            assert_eq!(result.len(), 0);
        }
        Ok(())
    }

    #[test]
    fn test_failed_images_are_skipped() -> Result<(), BlurError> {
        init_logger();
        let tmp_dir = tempfile::tempdir()?;

        let first = tmp_dir.path().join("first.png");
        let broken = tmp_dir.path().join("broken.png");
        let missing = tmp_dir.path().join("missing.png");
        let last = tmp_dir.path().join("last.png");
        write_image_rgb8(&first, &checker_image(16, 12)?).map_err(BlurError::Encode)?;
        std::fs::write(&broken, b"not an image")?;
        write_image_rgb8(&last, &checker_image(20, 8)?).map_err(BlurError::Encode)?;

        let processor = BatchProcessor::new(BlurConfig {
            sigma: 1.0,
            num_threads: 2,
            leaf_area: 32,
            region_threads: Some(2),
        })?;
        let paths = [&first, &broken, &missing, &last];

        for mode in [ProcessingMode::Sequential, ProcessingMode::Parallel] {
            let result = processor.process(&paths, mode)?;
            assert_eq!(result.len(), 2);
            assert_eq!(result.images()[0].size(), ImageSize { width: 16, height: 12 });
            assert_eq!(result.images()[1].size(), ImageSize { width: 20, height: 8 });
        }
        Ok(())
    }

    #[test]
    fn test_save_to_dir() -> Result<(), BlurError> {
        let tmp_dir = tempfile::tempdir()?;
        let out_dir = tmp_dir.path().join("out");

        let result = ProcessingResult::new(
            vec![checker_image(8, 8)?, checker_image(12, 4)?],
            Duration::from_millis(5),
        );
        let paths = result.save_to_dir(&out_dir)?;

        assert_eq!(paths, vec![out_dir.join("blurred_0.jpg"), out_dir.join("blurred_1.jpg")]);
        assert!(paths.iter().all(|p| p.is_file()));
        assert_relative_eq!(result.elapsed_secs(), 0.005);
        Ok(())
    }
}
