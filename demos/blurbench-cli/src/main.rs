use std::path::{Path, PathBuf};

use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};

use blurbench::image::ImageSize;
use blurbench::io::functional as F;
use blurbench::synthetic::{self, DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE};
use blurbench::{BatchProcessor, BenchmarkConfig, BenchmarkHarness, BlurConfig, ProcessingMode};

#[derive(FromArgs, Debug)]
/// Gaussian blur of image batches, sequential against recursive parallel.
///
/// Without a subcommand, runs the benchmark on the test_images directory.
struct Args {
    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Generate(GenerateArgs),
    Process(ProcessArgs),
    Bench(BenchArgs),
}

#[derive(FromArgs, Debug)]
/// Create random RGB test images named test_<i>.jpg.
#[argh(subcommand, name = "generate")]
struct GenerateArgs {
    /// directory to write the images to
    #[argh(option, short = 'd', default = "PathBuf::from(\"test_images\")")]
    dir: PathBuf,

    /// number of images
    #[argh(option, short = 'n', default = "DEFAULT_IMAGE_COUNT")]
    count: usize,

    /// image width in pixels
    #[argh(option, default = "DEFAULT_IMAGE_SIZE.width")]
    width: usize,

    /// image height in pixels
    #[argh(option, default = "DEFAULT_IMAGE_SIZE.height")]
    height: usize,

    /// seed of the random generator
    #[argh(option)]
    seed: Option<u64>,
}

#[derive(FromArgs, Debug)]
/// Blur every image of a directory and save the results as blurred_<i>.jpg.
#[argh(subcommand, name = "process")]
struct ProcessArgs {
    /// directory containing the input images
    #[argh(option, short = 'i', default = "PathBuf::from(\"test_images\")")]
    input_dir: PathBuf,

    /// directory to write the blurred images to
    #[argh(option, short = 'o', default = "PathBuf::from(\"output\")")]
    output_dir: PathBuf,

    /// processing mode: sequential or parallel
    #[argh(option, short = 'm', default = "ProcessingMode::Parallel")]
    mode: ProcessingMode,

    /// JSON file with the blur configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// gaussian sigma, overrides the configuration
    #[argh(option, short = 's')]
    sigma: Option<f32>,

    /// number of images processed concurrently, overrides the configuration
    #[argh(option, short = 'n')]
    num_threads: Option<usize>,
}

#[derive(FromArgs, Debug)]
/// Time sequential processing against parallel processing at several pool sizes.
#[argh(subcommand, name = "bench")]
struct BenchArgs {
    /// directory containing the input images
    #[argh(option, short = 'd', default = "PathBuf::from(\"test_images\")")]
    dir: PathBuf,

    /// JSON file with the benchmark configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// parallel runs per thread count, overrides the configuration
    #[argh(option, short = 'r')]
    runs: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    match args.command {
        Some(Command::Generate(args)) => generate(&args),
        Some(Command::Process(args)) => process(&args),
        Some(Command::Bench(args)) => bench(&args),
        None => bench(&BenchArgs {
            dir: PathBuf::from("test_images"),
            config: None,
            runs: None,
        }),
    }
}

fn create_images(
    dir: &Path,
    count: usize,
    size: ImageSize,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    synthetic::generate_test_images(dir, count, size, &mut rng)?;
    println!("Created {count} test images in {}", dir.display());
    Ok(())
}

fn generate(args: &GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    create_images(&args.dir, args.count, size, args.seed)
}

fn find_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let paths = if dir.exists() {
        F::list_images(dir)?
    } else {
        Vec::new()
    };
    if paths.is_empty() {
        println!("No test images found!");
    } else {
        println!("Found {} test images", paths.len());
    }
    Ok(paths)
}

fn process(args: &ProcessArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => BlurConfig::from_json_file(path)?,
        None => BlurConfig::default(),
    };
    if let Some(sigma) = args.sigma {
        config.sigma = sigma;
    }
    if let Some(num_threads) = args.num_threads {
        config.num_threads = num_threads;
    }
    let processor = BatchProcessor::new(config)?;

    let paths = find_images(&args.input_dir)?;
    if paths.is_empty() {
        return Ok(());
    }

    let result = processor.process(&paths, args.mode)?;
    println!("Processing completed in {:.3} seconds.", result.elapsed_secs());

    result.save_to_dir(&args.output_dir)?;
    println!(
        "Saved {} images to {}",
        result.len(),
        args.output_dir.display()
    );

    Ok(())
}

fn bench(args: &BenchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => BenchmarkConfig::from_json_file(path)?,
        None => BenchmarkConfig::default(),
    };
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    let harness = BenchmarkHarness::new(config)?;

    let mut paths = find_images(&args.dir)?;
    if paths.is_empty() {
        println!("Creating test images...");
        create_images(&args.dir, DEFAULT_IMAGE_COUNT, DEFAULT_IMAGE_SIZE, None)?;
        paths = find_images(&args.dir)?;
    }

    let report = harness.run(&paths)?;
    print!("{report}");

    Ok(())
}
