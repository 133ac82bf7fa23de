use std::path::PathBuf;

use blurbench::{
    image::{Image, ImageSize},
    imgproc::filter::{gaussian_blur_sequential, kernels::GaussianKernel},
    io::functional::{list_images, read_image_any_rgb8, write_image_rgb8},
    synthetic::{generate_test_images, random_image},
    BatchProcessor, BenchmarkConfig, BenchmarkHarness, BlurConfig, BlurError, ProcessingMode,
};
use rand::{rngs::StdRng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Write lossless random images so the decoded pixels are known exactly.
fn write_png_batch(
    dir: &std::path::Path,
    sizes: &[(usize, usize)],
) -> Result<(Vec<PathBuf>, Vec<Image<u8, 3>>), BlurError> {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut paths = Vec::new();
    let mut images = Vec::new();
    for (i, &(width, height)) in sizes.iter().enumerate() {
        let image = random_image(&mut rng, ImageSize { width, height })?;
        let path = dir.join(format!("input_{i}.png"));
        write_image_rgb8(&path, &image).map_err(BlurError::Encode)?;
        paths.push(path);
        images.push(image);
    }
    Ok((paths, images))
}

#[test]
fn sequential_and_parallel_agree() -> Result<(), BlurError> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let (paths, images) = write_png_batch(tmp_dir.path(), &[(64, 48), (33, 70), (90, 17)])?;

    let config = BlurConfig {
        sigma: 1.5,
        num_threads: 3,
        leaf_area: 256,
        region_threads: Some(2),
    };
    let processor = BatchProcessor::new(config)?;

    let sequential = processor.process(&paths, ProcessingMode::Sequential)?;
    let parallel = processor.process(&paths, ProcessingMode::Parallel)?;

    assert_eq!(sequential.len(), 3);
    assert_eq!(sequential.images(), parallel.images());

    let kernel = GaussianKernel::new(1.5)?;
    for (blurred, image) in parallel.images().iter().zip(&images) {
        assert_eq!(blurred, &gaussian_blur_sequential(image, &kernel)?);
    }
    Ok(())
}

#[test]
fn parallel_keeps_input_order_around_failures() -> Result<(), BlurError> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let sizes = [(10, 10), (20, 10), (30, 10), (40, 10), (50, 10)];
    let (mut paths, _) = write_png_batch(tmp_dir.path(), &sizes)?;
    paths.insert(2, tmp_dir.path().join("does_not_exist.png"));

    let processor = BatchProcessor::new(BlurConfig {
        sigma: 1.0,
        num_threads: 4,
        leaf_area: 16,
        region_threads: Some(2),
    })?;
    let result = processor.process_parallel(&paths)?;

    let widths: Vec<usize> = result.images().iter().map(Image::width).collect();
    assert_eq!(widths, vec![10, 20, 30, 40, 50]);
    Ok(())
}

#[test]
fn generate_process_and_save() -> Result<(), BlurError> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let input_dir = tmp_dir.path().join("test_images");
    let output_dir = tmp_dir.path().join("output");

    let size = ImageSize {
        width: 48,
        height: 40,
    };
    generate_test_images(&input_dir, 4, size, &mut StdRng::seed_from_u64(9))?;
    let paths = list_images(&input_dir)?;
    assert_eq!(paths.len(), 4);

    let processor = BatchProcessor::new(BlurConfig::default())?;
    let result = processor.process(&paths, ProcessingMode::Parallel)?;
    assert_eq!(result.len(), 4);

    let saved = result.save_to_dir(&output_dir)?;
    assert_eq!(saved.len(), 4);
    for path in &saved {
        assert_eq!(read_image_any_rgb8(path)?.size(), size);
    }
    Ok(())
}

#[test]
fn benchmark_report_covers_every_thread_count() -> Result<(), BlurError> {
    init_logger();
    let tmp_dir = tempfile::tempdir()?;
    let (paths, _) = write_png_batch(tmp_dir.path(), &[(40, 40), (40, 40)])?;

    let harness = BenchmarkHarness::new(BenchmarkConfig {
        sigma: 1.0,
        thread_counts: vec![1, 2],
        runs: 2,
        leaf_area: 400,
        region_threads: Some(2),
    })?;
    let report = harness.run(&paths)?;

    assert_eq!(report.num_images, 2);
    assert_eq!(report.rows.len(), 2);
    assert!(report
        .rows
        .iter()
        .all(|row| row.speedup.is_finite() && row.speedup > 0.0));

    let csv = report.to_string();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[2], "ThreadCount,ProcessingTime,Speedup");
    assert!(lines[3].starts_with("1,") && lines[3].ends_with(",1.00"));
    assert!(lines[4].starts_with("1,"));
    assert!(lines[5].starts_with("2,"));
    Ok(())
}
