use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::{batch::BatchProcessor, config::BenchmarkConfig, error::BlurError};

/// Mean time and speedup of one measured configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRow {
    /// Size of the image worker pool; `1` is the sequential baseline.
    pub threads: usize,
    /// Mean wall-clock time of the batch.
    pub mean: Duration,
    /// Baseline time divided by the mean time.
    pub speedup: f64,
}

/// The outcome of a benchmark: the sequential baseline and one row per thread count.
///
/// The [`fmt::Display`] implementation prints the report as CSV:
///
/// ```text
/// Image Processing Benchmark
/// Images: 10
/// ThreadCount,ProcessingTime,Speedup
/// 1,4.210,1.00
/// 2,2.304,1.83
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    /// Number of input paths of the batch.
    pub num_images: usize,
    /// Time of the sequential run.
    pub baseline: Duration,
    /// One row per measured thread count, in configuration order.
    pub rows: Vec<BenchmarkRow>,
}

impl BenchmarkReport {
    /// Build a report from the baseline time and the run times of each thread count.
    ///
    /// Thread counts without any run are left out.
    pub fn from_durations(
        num_images: usize,
        baseline: Duration,
        runs: &[(usize, Vec<Duration>)],
    ) -> Self {
        let rows = runs
            .iter()
            .filter(|(_, times)| !times.is_empty())
            .map(|(threads, times)| {
                let mean = times.iter().sum::<Duration>() / times.len() as u32;
                BenchmarkRow {
                    threads: *threads,
                    mean,
                    speedup: speedup(baseline, mean),
                }
            })
            .collect();

        Self {
            num_images,
            baseline,
            rows,
        }
    }

    /// The row of a given thread count, if it was measured.
    pub fn row(&self, threads: usize) -> Option<&BenchmarkRow> {
        self.rows.iter().find(|row| row.threads == threads)
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image Processing Benchmark")?;
        writeln!(f, "Images: {}", self.num_images)?;
        writeln!(f, "ThreadCount,ProcessingTime,Speedup")?;
        writeln!(f, "1,{:.3},1.00", self.baseline.as_secs_f64())?;
        for row in &self.rows {
            writeln!(
                f,
                "{},{:.3},{:.2}",
                row.threads,
                row.mean.as_secs_f64(),
                row.speedup
            )?;
        }
        Ok(())
    }
}

/// Ratio of the baseline time to a measured time.
///
/// A zero measured time gives `1.0` against a zero baseline and infinity otherwise.
pub fn speedup(baseline: Duration, mean: Duration) -> f64 {
    if mean.is_zero() {
        return if baseline.is_zero() { 1.0 } else { f64::INFINITY };
    }
    baseline.as_secs_f64() / mean.as_secs_f64()
}

/// Times sequential processing against parallel processing at several pool sizes.
///
/// The sequential mode runs once and gives the baseline. Each thread count then runs the
/// parallel mode `runs` times with a fresh processor, and its mean time is compared with
/// the baseline.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    config: BenchmarkConfig,
}

impl BenchmarkHarness {
    /// Validate the configuration.
    pub fn new(config: BenchmarkConfig) -> Result<Self, BlurError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The harness configuration.
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Run the benchmark over the given images.
    pub fn run<P>(&self, paths: &[P]) -> Result<BenchmarkReport, BlurError>
    where
        P: AsRef<Path> + Sync,
    {
        log::info!(
            "benchmark: {} images, sigma {}, thread counts {:?}, {} runs",
            paths.len(),
            self.config.sigma,
            self.config.thread_counts,
            self.config.runs
        );

        let baseline = BatchProcessor::new(self.config.blur_config(1))?
            .process_sequential(paths)
            .elapsed();
        log::info!("baseline: {:.3}s", baseline.as_secs_f64());

        let mut runs = Vec::with_capacity(self.config.thread_counts.len());
        for &threads in &self.config.thread_counts {
            let processor = BatchProcessor::new(self.config.blur_config(threads))?;
            let mut times = Vec::with_capacity(self.config.runs);
            for run in 0..self.config.runs {
                let elapsed = processor.process_parallel(paths)?.elapsed();
                log::debug!(
                    "{threads} threads, run {run}: {:.3}s",
                    elapsed.as_secs_f64()
                );
                times.push(elapsed);
            }
            runs.push((threads, times));
        }

        Ok(BenchmarkReport::from_durations(paths.len(), baseline, &runs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_speedup() {
        let secs = Duration::from_secs;
        assert_relative_eq!(speedup(secs(4), secs(2)), 2.0);
        assert_relative_eq!(speedup(secs(3), secs(3)), 1.0);
        assert_relative_eq!(speedup(secs(1), secs(4)), 0.25);
        assert_relative_eq!(speedup(Duration::ZERO, Duration::ZERO), 1.0);
        assert!(speedup(secs(1), Duration::ZERO).is_infinite());
    }

    #[test]
    fn test_report_from_durations() {
        let ms = Duration::from_millis;
        let report = BenchmarkReport::from_durations(
            10,
            ms(3000),
            &[
                (1, vec![ms(3000), ms(3000), ms(3000)]),
                (2, vec![ms(1400), ms(1600), ms(1500)]),
                (4, vec![]),
            ],
        );

        assert_eq!(report.rows.len(), 2);
        let one = report.row(1).map(|row| row.speedup);
        assert_eq!(one, Some(1.0));

        let two = report.row(2).copied();
        assert_eq!(two.map(|row| row.mean), Some(ms(1500)));
        assert_relative_eq!(two.map_or(0.0, |row| row.speedup), 2.0);
        assert!(report.row(4).is_none());
    }

    #[test]
    fn test_report_display() {
        let ms = Duration::from_millis;
        let report = BenchmarkReport::from_durations(
            3,
            ms(4210),
            &[(2, vec![ms(2000), ms(2200)]), (8, vec![ms(1000)])],
        );

        let expected = "Image Processing Benchmark\n\
                        Images: 3\n\
                        ThreadCount,ProcessingTime,Speedup\n\
                        1,4.210,1.00\n\
                        2,2.100,2.00\n\
                        8,1.000,4.21\n";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_harness_rejects_invalid_config() {
        let config = BenchmarkConfig {
            thread_counts: vec![],
            ..Default::default()
        };
        assert!(matches!(
            BenchmarkHarness::new(config),
            Err(BlurError::EmptyThreadCounts)
        ));
    }

    #[test]
    fn test_harness_empty_batch() -> Result<(), BlurError> {
        let harness = BenchmarkHarness::new(BenchmarkConfig {
            thread_counts: vec![1, 2],
            runs: 2,
            region_threads: Some(1),
            ..Default::default()
        })?;
        let paths: Vec<std::path::PathBuf> = vec![];
        let report = harness.run(&paths)?;

        assert_eq!(report.num_images, 0);
        assert_eq!(
            report.rows.iter().map(|row| row.threads).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(report.rows.iter().all(|row| row.speedup > 0.0));
        Ok(())
    }
}
