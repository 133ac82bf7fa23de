use std::path::{Path, PathBuf};

use blurbench_image::{Image, ImageError, ImageSize};
use blurbench_io::functional::write_image_jpeg_rgb8;
use rand::Rng;

use crate::error::BlurError;

/// Number of test images of the default data set.
pub const DEFAULT_IMAGE_COUNT: usize = 10;

/// Size of the images of the default data set.
pub const DEFAULT_IMAGE_SIZE: ImageSize = ImageSize {
    width: 1024,
    height: 1024,
};

/// Create an RGB image where every channel of every pixel is uniformly random.
pub fn random_image<R: Rng>(rng: &mut R, size: ImageSize) -> Result<Image<u8, 3>, ImageError> {
    let data = (0..size.area() * 3).map(|_| rng.random::<u8>()).collect();
    Image::new(size, data)
}

/// Write `count` random images named `test_<i>.jpg` into `dir`.
///
/// The directory is created if needed and existing files are overwritten.
///
/// # Returns
///
/// The written paths, in index order.
pub fn generate_test_images<R: Rng>(
    dir: impl AsRef<Path>,
    count: usize,
    size: ImageSize,
    rng: &mut R,
) -> Result<Vec<PathBuf>, BlurError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(count);
    for i in 0..count {
        let image = random_image(rng, size)?;
        let path = dir.join(format!("test_{i}.jpg"));
        write_image_jpeg_rgb8(&path, &image, 100).map_err(BlurError::Encode)?;
        paths.push(path);
    }
    log::info!("created {count} test images of {size} in {}", dir.display());

    Ok(paths)
}
