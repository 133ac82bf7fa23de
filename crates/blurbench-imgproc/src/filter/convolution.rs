use blurbench_image::{Image, ImageError};

use super::kernels::GaussianKernel;
use crate::{crop::crop_region, region::Region};

/// Compute one output pixel as the kernel-weighted sum of its neighborhood.
///
/// Neighborhood samples that fall outside `src` are dropped from the sum; their weight is
/// not redistributed. Each channel is accumulated in `f32`, truncated toward zero and
/// clamped to `[0, 255]`.
#[inline]
fn convolve_pixel<const C: usize>(
    src: &Image<u8, C>,
    kernel: &GaussianKernel,
    x: usize,
    y: usize,
) -> [u8; C] {
    let offset = kernel.offset() as isize;
    let (cols, rows) = (src.cols() as isize, src.rows() as isize);
    let src_data = src.as_slice();

    let mut acc = [0.0f32; C];
    for ky in 0..kernel.size() {
        let py = y as isize + ky as isize - offset;
        if py < 0 || py >= rows {
            continue;
        }
        let row_offset = py * cols;
        for (kx, &weight) in kernel.row(ky).iter().enumerate() {
            let px = x as isize + kx as isize - offset;
            if px < 0 || px >= cols {
                continue;
            }
            let idx = (row_offset + px) as usize * C;
            for (ch, acc) in acc.iter_mut().enumerate() {
                *acc += src_data[idx + ch] as f32 * weight;
            }
        }
    }

    acc.map(|v| (v as i32).clamp(0, 255) as u8)
}

/// Blur the interior of an image with a gaussian kernel, in a single-threaded scan.
///
/// Only pixels whose whole neighborhood lies inside the image are written; the band of
/// `kernel.offset()` pixels along every edge of `dst` is left untouched. Callers that start
/// from a zeroed destination therefore get black borders.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The gaussian kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
///
/// # Examples
///
/// ```
/// use blurbench_image::Image;
/// use blurbench_imgproc::filter::{gaussian_blur_interior, kernels::GaussianKernel};
///
/// let src = Image::<u8, 3>::from_size_val([5, 5].into(), 128).unwrap();
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
/// let kernel = GaussianKernel::new(0.3).unwrap();
///
/// gaussian_blur_interior(&src, &mut dst, &kernel).unwrap();
///
/// assert_eq!(dst.get([2, 2, 0]), Some(&128));
/// assert_eq!(dst.get([0, 0, 0]), Some(&0));
/// ```
pub fn gaussian_blur_interior<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &GaussianKernel,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let offset = kernel.offset();
    let (cols, rows) = (src.cols(), src.rows());
    let row_stride = cols * C;
    let dst_data = dst.as_slice_mut();

    for y in offset..rows.saturating_sub(offset) {
        let dst_row = &mut dst_data[y * row_stride..(y + 1) * row_stride];
        for x in offset..cols.saturating_sub(offset) {
            let pixel = convolve_pixel(src, kernel, x, y);
            dst_row[x * C..(x + 1) * C].copy_from_slice(&pixel);
        }
    }

    Ok(())
}

/// Blur the interior of an image and return the result as a new image.
///
/// Convenience wrapper over [`gaussian_blur_interior`] with a zero-initialized destination.
pub fn gaussian_blur_sequential<const C: usize>(
    src: &Image<u8, C>,
    kernel: &GaussianKernel,
) -> Result<Image<u8, C>, ImageError> {
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    gaussian_blur_interior(src, &mut dst, kernel)?;
    Ok(dst)
}

/// Blur a sub-region of an image.
///
/// The output has the size of `region` and holds, at `(x - region.x, y - region.y)`, the
/// blurred value of the source pixels with `max(offset, region.x) <= x` and
/// `x < min(region.right(), width) - offset` (likewise for `y`), where `offset` is
/// `kernel.offset()`. The band of `offset` pixels along the right and bottom edges of the
/// region is not computed; all pixels that are not computed stay zero.
///
/// # Errors
///
/// Returns [`ImageError::RegionOutOfBounds`] if `region` does not fit inside `src`.
pub fn gaussian_blur_region<const C: usize>(
    src: &Image<u8, C>,
    region: Region,
    kernel: &GaussianKernel,
) -> Result<Image<u8, C>, ImageError> {
    if !region.fits_in(src.size()) {
        return Err(ImageError::RegionOutOfBounds(
            region.x,
            region.y,
            region.width,
            region.height,
            src.cols(),
            src.rows(),
        ));
    }

    let mut dst = Image::<u8, C>::from_size_val(region.size(), 0)?;
    let offset = kernel.offset();

    let y_range = offset.max(region.y)
        ..region
            .bottom()
            .saturating_sub(offset)
            .min(src.rows().saturating_sub(offset));
    let x_range = offset.max(region.x)
        ..region
            .right()
            .saturating_sub(offset)
            .min(src.cols().saturating_sub(offset));

    let row_stride = region.width * C;
    let dst_data = dst.as_slice_mut();

    for y in y_range {
        let dst_row = &mut dst_data[(y - region.y) * row_stride..(y - region.y + 1) * row_stride];
        for x in x_range.clone() {
            let pixel = convolve_pixel(src, kernel, x, y);
            let dx = x - region.x;
            dst_row[dx * C..(dx + 1) * C].copy_from_slice(&pixel);
        }
    }

    Ok(dst)
}

/// Blur a sub-region of an image using a padded input window.
///
/// The region is first expanded by `kernel.offset()` pixels on every side (clamped to the
/// image, see [`Region::padded`]), the expanded window is blurred with
/// [`gaussian_blur_region`] and the result is cropped back to `region`. The cropped pixels
/// are identical to what a full-image scan would produce at the same positions, so regions
/// blurred independently can be stitched together without seams.
///
/// # Errors
///
/// Returns [`ImageError::RegionOutOfBounds`] if `region` does not fit inside `src`.
///
/// # Examples
///
/// ```
/// use blurbench_image::Image;
/// use blurbench_imgproc::filter::{gaussian_blur_region_padded, gaussian_blur_sequential};
/// use blurbench_imgproc::filter::kernels::GaussianKernel;
/// use blurbench_imgproc::region::Region;
///
/// let data = (0..16 * 16 * 3).map(|i| (i % 251) as u8).collect();
/// let src = Image::<u8, 3>::new([16, 16].into(), data).unwrap();
/// let kernel = GaussianKernel::new(1.0).unwrap();
///
/// let full = gaussian_blur_sequential(&src, &kernel).unwrap();
/// let part = gaussian_blur_region_padded(&src, Region::new(4, 5, 6, 7), &kernel).unwrap();
///
/// assert_eq!(part.get([0, 0, 1]), full.get([5, 4, 1]));
/// ```
pub fn gaussian_blur_region_padded<const C: usize>(
    src: &Image<u8, C>,
    region: Region,
    kernel: &GaussianKernel,
) -> Result<Image<u8, C>, ImageError> {
    if !region.fits_in(src.size()) {
        return Err(ImageError::RegionOutOfBounds(
            region.x,
            region.y,
            region.width,
            region.height,
            src.cols(),
            src.rows(),
        ));
    }

    let padded = region.padded(kernel.offset(), src.size());
    let padded_dst = gaussian_blur_region(src, padded, kernel)?;

    crop_region(
        &padded_dst,
        Region::new(
            region.x - padded.x,
            region.y - padded.y,
            region.width,
            region.height,
        ),
    )
}
