use blurbench_image::{Image, ImageError, ImageSize};

use crate::region::Quadrants;

/// Stitch four quadrant images into one image.
///
/// The quadrants must have tiled a parent region the way [`Region::quadrants`] splits it:
/// the top pair and the bottom pair share their heights, the left pair and the right pair
/// share their widths. The pixels are copied verbatim; nothing is blended at the seams.
///
/// [`Region::quadrants`]: crate::region::Region::quadrants
///
/// # Errors
///
/// Returns [`ImageError::QuadrantMismatch`] if the quadrant sizes are inconsistent.
///
/// # Examples
///
/// ```
/// use blurbench_image::Image;
/// use blurbench_imgproc::merge::merge_quadrants;
/// use blurbench_imgproc::region::Quadrants;
///
/// let merged = merge_quadrants(Quadrants {
///     top_left: Image::<u8, 1>::new([1, 1].into(), vec![1]).unwrap(),
///     top_right: Image::<u8, 1>::new([2, 1].into(), vec![2, 2]).unwrap(),
///     bottom_left: Image::<u8, 1>::new([1, 1].into(), vec![3]).unwrap(),
///     bottom_right: Image::<u8, 1>::new([2, 1].into(), vec![4, 4]).unwrap(),
/// })
/// .unwrap();
///
/// assert_eq!(merged.as_slice(), &[1, 2, 2, 3, 4, 4]);
/// ```
pub fn merge_quadrants<T, const C: usize>(
    quadrants: Quadrants<Image<T, C>>,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy,
{
    let Quadrants {
        top_left: tl,
        top_right: tr,
        bottom_left: bl,
        bottom_right: br,
    } = quadrants;

    if tl.rows() != tr.rows() || bl.rows() != br.rows() {
        return Err(ImageError::QuadrantMismatch(format!(
            "row heights differ: top {} vs {}, bottom {} vs {}",
            tl.rows(),
            tr.rows(),
            bl.rows(),
            br.rows()
        )));
    }

    if tl.cols() != bl.cols() || tr.cols() != br.cols() {
        return Err(ImageError::QuadrantMismatch(format!(
            "column widths differ: left {} vs {}, right {} vs {}",
            tl.cols(),
            bl.cols(),
            tr.cols(),
            br.cols()
        )));
    }

    let size = ImageSize {
        width: tl.cols() + tr.cols(),
        height: tl.rows() + bl.rows(),
    };

    let mut data = Vec::with_capacity(size.area() * C);
    for (left, right) in [(&tl, &tr), (&bl, &br)] {
        for y in 0..left.rows() {
            data.extend_from_slice(left.row(y));
            data.extend_from_slice(right.row(y));
        }
    }

    Image::new(size, data)
}
