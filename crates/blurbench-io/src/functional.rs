use std::io::Write;
use std::path::{Path, PathBuf};

use blurbench_image::{Image, ImageSize};
use image::{codecs::jpeg::JpegEncoder, ExtendedColorType};

use crate::error::IoError;

/// File extensions recognized as images, lower case.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Quality used by [`write_image_rgb8`] for JPEG files.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Reads an image from the given file path and converts it to RGB8.
///
/// The method tries to read from any image format supported by the image crate. Gray or
/// alpha images are converted to three channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image containing the image data.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] for a missing path and
/// [`IoError::ImageDecodeError`] if the file cannot be parsed as an image.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes the given RGB8 image as a JPEG file.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG image.
/// * `image` - The image to encode.
/// * `quality` - The quality of the JPEG encoding, range from 1 (lowest) to 100 (highest).
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let file = std::fs::File::create(file_path)?;
    let mut writer = std::io::BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode(
            image.as_slice(),
            image.width() as u32,
            image.height() as u32,
            ExtendedColorType::Rgb8,
        )
        .map_err(IoError::ImageEncodeError)?;
    writer.flush()?;

    Ok(())
}

/// Writes the given RGB8 image, choosing the format from the file extension.
///
/// `jpg`/`jpeg` files are written with [`DEFAULT_JPEG_QUALITY`]; `png` and `bmp` are
/// lossless.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] for any other extension.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    match extension(file_path).as_deref() {
        Some("jpg" | "jpeg") => write_image_jpeg_rgb8(file_path, image, DEFAULT_JPEG_QUALITY),
        Some("png" | "bmp") => image::save_buffer(
            file_path,
            image.as_slice(),
            image.width() as u32,
            image.height() as u32,
            ExtendedColorType::Rgb8,
        )
        .map_err(IoError::ImageEncodeError),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

/// Whether the path has one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image_file(file_path: impl AsRef<Path>) -> bool {
    extension(file_path.as_ref()).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// List the image files of a directory, sorted by path.
///
/// Sub-directories are not visited.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(IoError::FileDoesNotExist(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

fn extension(file_path: &Path) -> Option<String> {
    file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}
