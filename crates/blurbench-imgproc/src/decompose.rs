use blurbench_image::{Image, ImageError};

use crate::{
    filter::{gaussian_blur_region_padded, kernels::GaussianKernel},
    merge::merge_quadrants,
    region::{Quadrants, Region},
};

/// Regions with at most this many pixels are blurred directly instead of being split.
pub const DEFAULT_LEAF_AREA: usize = 50_000;

/// A unit of the recursive blur: one region of a shared, read-only source image.
///
/// A task whose region covers at most `leaf_area` pixels is a leaf and blurs its region with
/// a padded window. Any other task splits its region into four quadrants, spawns the
/// top-left, top-right and bottom-left children on the current rayon pool, computes the
/// bottom-right child itself and merges the four results.
///
/// The output of a task only depends on the source image, the kernel and the region, so it
/// is the same whatever order the children finish in.
pub struct RegionTask<'a, const C: usize> {
    src: &'a Image<u8, C>,
    kernel: &'a GaussianKernel,
    region: Region,
    leaf_area: usize,
}

impl<'a, const C: usize> RegionTask<'a, C> {
    /// Create the root task covering the whole source image.
    ///
    /// A `leaf_area` of zero is treated as one so the recursion always bottoms out.
    pub fn root(src: &'a Image<u8, C>, kernel: &'a GaussianKernel, leaf_area: usize) -> Self {
        Self {
            src,
            kernel,
            region: Region::from_size(src.size()),
            leaf_area: leaf_area.max(1),
        }
    }

    fn child(&self, region: Region) -> Self {
        Self {
            src: self.src,
            kernel: self.kernel,
            region,
            leaf_area: self.leaf_area,
        }
    }

    /// The region this task is responsible for.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Whether the task computes its region directly.
    pub fn is_leaf(&self) -> bool {
        self.region.area() <= self.leaf_area
    }

    /// Run the task and return an image with the size of its region.
    ///
    /// Children are scheduled on the rayon pool the caller runs in (the global pool unless
    /// called from inside [`rayon::ThreadPool::install`]).
    ///
    /// # Errors
    ///
    /// Any error of a child aborts the whole task; the other children still run to completion
    /// on their own buffers but their results are discarded.
    pub fn compute(&self) -> Result<Image<u8, C>, ImageError> {
        if self.is_leaf() {
            return gaussian_blur_region_padded(self.src, self.region, self.kernel);
        }

        let quads = self.region.quadrants();
        let top_left = self.child(quads.top_left);
        let top_right = self.child(quads.top_right);
        let bottom_left = self.child(quads.bottom_left);
        let bottom_right = self.child(quads.bottom_right);

        let (mut tl, mut tr, mut bl) = (None, None, None);
        let br = rayon::scope(|s| {
            s.spawn(|_| tl = Some(top_left.compute()));
            s.spawn(|_| tr = Some(top_right.compute()));
            s.spawn(|_| bl = Some(bottom_left.compute()));
            bottom_right.compute()
        });

        // join in reverse order of submission
        let bottom_right = br?;
        let bottom_left = joined(bl, "bottom-left")?;
        let top_right = joined(tr, "top-right")?;
        let top_left = joined(tl, "top-left")?;

        merge_quadrants(Quadrants {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }
}

fn joined<const C: usize>(
    slot: Option<Result<Image<u8, C>, ImageError>>,
    name: &str,
) -> Result<Image<u8, C>, ImageError> {
    slot.unwrap_or_else(|| {
        Err(ImageError::QuadrantMismatch(format!(
            "{name} quadrant produced no output"
        )))
    })
}

/// Blur an image by recursive quadrant decomposition.
///
/// The result is pixel-identical to [`crate::filter::gaussian_blur_sequential`] for any
/// `leaf_area`, including the black border band the interior scan leaves untouched.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `kernel` - The gaussian kernel.
/// * `leaf_area` - Largest region, in pixels, that is blurred without splitting.
///
/// # Examples
///
/// ```
/// use blurbench_image::Image;
/// use blurbench_imgproc::decompose::gaussian_blur_recursive;
/// use blurbench_imgproc::filter::{gaussian_blur_sequential, kernels::GaussianKernel};
///
/// let data = (0..40 * 30 * 3).map(|i| (i * 7 % 256) as u8).collect();
/// let src = Image::<u8, 3>::new([40, 30].into(), data).unwrap();
/// let kernel = GaussianKernel::new(1.0).unwrap();
///
/// let recursive = gaussian_blur_recursive(&src, &kernel, 100).unwrap();
/// let sequential = gaussian_blur_sequential(&src, &kernel).unwrap();
/// assert_eq!(recursive, sequential);
/// ```
pub fn gaussian_blur_recursive<const C: usize>(
    src: &Image<u8, C>,
    kernel: &GaussianKernel,
    leaf_area: usize,
) -> Result<Image<u8, C>, ImageError> {
    RegionTask::root(src, kernel, leaf_area).compute()
}

/// List the leaf regions the recursive blur visits for `region`.
///
/// Leaves are returned depth-first in top-left, top-right, bottom-left, bottom-right order.
/// Together they tile `region` exactly.
pub fn leaf_regions(region: Region, leaf_area: usize) -> Vec<Region> {
    let leaf_area = leaf_area.max(1);
    let mut leaves = Vec::new();
    let mut stack = vec![region];

    while let Some(region) = stack.pop() {
        if region.area() <= leaf_area {
            leaves.push(region);
            continue;
        }
        // reversed so that the top-left quadrant is visited first
        let mut quads = region.quadrants().into_array();
        quads.reverse();
        stack.extend(quads);
    }

    leaves
}
