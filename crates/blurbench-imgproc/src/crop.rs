use blurbench_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::region::Region;

/// Copy the pixels of `region` out of `src` into a new image of the region size.
///
/// Rows are copied in parallel on the current rayon pool.
///
/// # Errors
///
/// Returns [`ImageError::RegionOutOfBounds`] if the region does not fit in `src`.
///
/// # Examples
///
/// ```
/// use blurbench_image::Image;
/// use blurbench_imgproc::{crop::crop_region, region::Region};
///
/// let src = Image::<u8, 1>::new([4, 3].into(), (0..12).collect()).unwrap();
/// let out = crop_region(&src, Region::new(1, 1, 2, 2)).unwrap();
/// assert_eq!(out.as_slice(), &[5, 6, 9, 10]);
/// ```
pub fn crop_region<T, const C: usize>(
    src: &Image<T, C>,
    region: Region,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    if !region.fits_in(src.size()) {
        return Err(ImageError::RegionOutOfBounds(
            region.x,
            region.y,
            region.width,
            region.height,
            src.width(),
            src.height(),
        ));
    }

    let mut dst = Image::from_size_val(region.size(), T::default())?;
    if region.is_empty() {
        return Ok(dst);
    }

    let stride = region.width * C;
    let first = region.x * C;
    dst.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(i, dst_row)| {
            let src_row = src.row(region.y + i);
            dst_row.copy_from_slice(&src_row[first..first + stride]);
        });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_rgb() -> Result<(), ImageError> {
        // 2x3 image, channel values count up
        let src = Image::<u8, 3>::new([2, 3].into(), (0..18).collect())?;

        let out = crop_region(&src, Region::new(1, 1, 1, 2))?;
        assert_eq!(out.size(), [1, 2].into());
        assert_eq!(out.as_slice(), &[9, 10, 11, 15, 16, 17]);
        Ok(())
    }

    #[test]
    fn crop_whole_and_empty() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new([3, 3].into(), (0..9).collect())?;

        assert_eq!(crop_region(&src, Region::from_size(src.size()))?, src);
        assert!(crop_region(&src, Region::new(3, 1, 0, 2))?.as_slice().is_empty());
        Ok(())
    }

    #[test]
    fn crop_out_of_bounds() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;

        let res = crop_region(&src, Region::new(2, 0, 2, 2));
        assert_eq!(res, Err(ImageError::RegionOutOfBounds(2, 0, 2, 2, 3, 3)));
        Ok(())
    }
}
