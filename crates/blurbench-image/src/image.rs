use crate::error::ImageError;

/// Width and height of an image, in pixels.
///
/// # Examples
///
/// ```
/// use blurbench_image::ImageSize;
///
/// let size = ImageSize { width: 640, height: 480 };
/// assert_eq!(size.area(), 307_200);
/// assert_eq!(size, [640, 480].into());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl ImageSize {
    /// Number of pixels covered by the size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<[usize; 2]> for ImageSize {
    /// Build a size from `[width, height]`.
    fn from([width, height]: [usize; 2]) -> Self {
        Self { width, height }
    }
}

/// An owned image of `CHANNELS` interleaved channels per pixel.
///
/// Pixels are stored row after row, so the buffer has the layout (H, W, C) and its length is
/// always `width * height * CHANNELS`. Filters read from one image and produce another; a
/// decoded image is never modified in place.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Wrap a pixel buffer of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidChannelShape`] when `data` does not hold exactly
    /// `width * height * CHANNELS` values.
    ///
    /// # Examples
    ///
    /// ```
    /// use blurbench_image::{Image, ImageSize};
    ///
    /// let rgb = Image::<u8, 3>::new([4, 2].into(), vec![7; 4 * 2 * 3]).unwrap();
    /// assert_eq!((rgb.width(), rgb.height()), (4, 2));
    ///
    /// assert!(Image::<u8, 3>::new(ImageSize { width: 4, height: 2 }, vec![7; 5]).is_err());
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.area() * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// An image where every channel of every pixel is `val`.
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Self::new(size, vec![val; size.area() * CHANNELS])
    }

    /// The image size.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Alias of [`Self::width`].
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Alias of [`Self::height`].
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Number of interleaved channels.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// The whole buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The whole buffer, mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// The `width * CHANNELS` values of row `y`.
    ///
    /// Panics if `y` is out of bounds.
    pub fn row(&self, y: usize) -> &[T] {
        let stride = self.size.width * CHANNELS;
        &self.data[y * stride..(y + 1) * stride]
    }

    /// The value at `[y, x, ch]`, or `None` when any index is out of range.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [y, x, ch] = index;
        if y >= self.size.height || x >= self.size.width || ch >= CHANNELS {
            return None;
        }
        self.data.get((y * self.size.width + x) * CHANNELS + ch)
    }

    /// Channel `ch` of the pixel at column `x`, row `y`.
    ///
    /// # Errors
    ///
    /// [`ImageError::PixelIndexOutOfBounds`] or [`ImageError::ChannelIndexOutOfBounds`] when
    /// the coordinates fall outside the image.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        let (width, height) = (self.size.width, self.size.height);
        if x >= width || y >= height {
            return Err(ImageError::PixelIndexOutOfBounds(x, y, width, height));
        }
        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok(self.data[(y * width + x) * CHANNELS + ch])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_conversions() {
        let size: ImageSize = [3, 5].into();
        assert_eq!(size.width, 3);
        assert_eq!(size.height, 5);
        assert_eq!(size.area(), 15);
        assert_eq!(size.to_string(), "3x5");
    }

    #[test]
    fn new_checks_buffer_length() -> Result<(), ImageError> {
        let gray = Image::<u8, 1>::new([3, 2].into(), vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(gray.num_channels(), 1);
        assert_eq!((gray.cols(), gray.rows()), (3, 2));

        let res = Image::<u8, 3>::new([2, 2].into(), vec![0u8; 11]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(11, 12)));
        Ok(())
    }

    #[test]
    fn pixel_access() -> Result<(), ImageError> {
        // one column, two rows
        let image = Image::<u8, 3>::new([1, 2].into(), vec![0, 1, 2, 3, 4, 5])?;

        assert_eq!(image.get([1, 0, 2]), Some(&5));
        assert_eq!(image.get([2, 0, 0]), None);
        assert_eq!(image.get([0, 0, 3]), None);
        assert_eq!(image.get_pixel(0, 1, 1)?, 4);
        assert_eq!(
            image.get_pixel(1, 0, 0),
            Err(ImageError::PixelIndexOutOfBounds(1, 0, 1, 2))
        );
        assert_eq!(
            image.get_pixel(0, 0, 3),
            Err(ImageError::ChannelIndexOutOfBounds(3, 3))
        );
        assert_eq!(image.row(1), &[3, 4, 5]);
        Ok(())
    }

    #[test]
    fn mutate_buffer() -> Result<(), ImageError> {
        let mut image = Image::<u8, 3>::from_size_val([2, 1].into(), 9)?;
        image.as_slice_mut()[4] = 1;
        assert_eq!(image.as_slice(), &[9, 9, 9, 9, 1, 9]);
        Ok(())
    }

    #[test]
    fn empty_image() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([0, 0].into(), 0)?;
        assert!(image.as_slice().is_empty());
        assert_eq!(image.size().area(), 0);
        Ok(())
    }
}
