use blurbench_image::ImageError;

/// Compute the side length of the square gaussian kernel for a given sigma.
///
/// The kernel covers three standard deviations on each side of the center, i.e.
/// `2 * ceil(3 * sigma) + 1`, so the size is always odd.
pub fn gaussian_kernel_size(sigma: f32) -> usize {
    (sigma * 3.0).ceil() as usize * 2 + 1
}

/// Largest kernel side length accepted by [`GaussianKernel::new`], reached at sigma 500/3.
pub const MAX_KERNEL_SIZE: usize = 1001;

/// Whether a kernel can be built for `sigma`: positive, finite and not wider than
/// [`MAX_KERNEL_SIZE`].
pub fn is_valid_sigma(sigma: f32) -> bool {
    sigma.is_finite() && sigma > 0.0 && (sigma * 3.0).ceil() <= ((MAX_KERNEL_SIZE - 1) / 2) as f32
}

/// A normalized square gaussian kernel.
///
/// The weights are stored row-major: `weight(kx, ky)` lives at `ky * size + kx`.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    size: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Create a gaussian blur kernel.
    ///
    /// # Arguments
    ///
    /// * `sigma` - The standard deviation of the gaussian. Must be positive and finite.
    ///
    /// # Returns
    ///
    /// A kernel of size `2 * ceil(3 * sigma) + 1` whose weights sum to one.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidSigma`] if sigma is not a positive finite number or if
    /// the kernel would be wider than [`MAX_KERNEL_SIZE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use blurbench_imgproc::filter::kernels::GaussianKernel;
    ///
    /// let kernel = GaussianKernel::new(1.0).unwrap();
    /// assert_eq!(kernel.size(), 7);
    /// assert_eq!(kernel.offset(), 3);
    /// ```
    pub fn new(sigma: f32) -> Result<Self, ImageError> {
        if !is_valid_sigma(sigma) {
            return Err(ImageError::InvalidSigma(sigma));
        }

        let size = gaussian_kernel_size(sigma);
        let center = (size / 2) as i64;
        let denom = 2.0 * sigma * sigma;

        // compute the kernel
        let mut weights = Vec::with_capacity(size * size);
        for ky in 0..size as i64 {
            for kx in 0..size as i64 {
                let (dx, dy) = (kx - center, ky - center);
                let exponent = -((dx * dx + dy * dy) as f32) / denom;
                weights.push((exponent as f64).exp() as f32);
            }
        }

        // normalize the kernel
        let norm = weights.iter().sum::<f32>();
        weights.iter_mut().for_each(|w| *w /= norm);

        Ok(Self {
            sigma,
            size,
            weights,
        })
    }

    /// The sigma the kernel was built from.
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// The side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the kernel center to its edge, `size / 2`.
    pub fn offset(&self) -> usize {
        self.size / 2
    }

    /// The weight at column `kx` and row `ky`.
    pub fn weight(&self, kx: usize, ky: usize) -> f32 {
        self.weights[ky * self.size + kx]
    }

    /// The weights of kernel row `ky`, indexed by `kx`.
    pub fn row(&self, ky: usize) -> &[f32] {
        &self.weights[ky * self.size..(ky + 1) * self.size]
    }

    /// All weights, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }
}
