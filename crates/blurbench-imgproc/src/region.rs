use blurbench_image::ImageSize;

/// An axis-aligned rectangle over an image's pixel grid.
///
/// # Examples
///
/// ```
/// use blurbench_imgproc::region::Region;
///
/// let region = Region::new(2, 3, 5, 4);
/// assert_eq!(region.area(), 20);
/// assert_eq!(region.right(), 7);
/// assert_eq!(region.bottom(), 7);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    /// The x-coordinate of the top-left corner.
    pub x: usize,
    /// The y-coordinate of the top-left corner.
    pub y: usize,
    /// Width of the region in pixels.
    pub width: usize,
    /// Height of the region in pixels.
    pub height: usize,
}

/// Four values laid out as the quadrants of a split region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quadrants<T> {
    /// The top-left quadrant.
    pub top_left: T,
    /// The top-right quadrant.
    pub top_right: T,
    /// The bottom-left quadrant.
    pub bottom_left: T,
    /// The bottom-right quadrant.
    pub bottom_right: T,
}

impl<T> Quadrants<T> {
    /// Apply `f` to every quadrant.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Quadrants<U> {
        Quadrants {
            top_left: f(self.top_left),
            top_right: f(self.top_right),
            bottom_left: f(self.bottom_left),
            bottom_right: f(self.bottom_right),
        }
    }

    /// The quadrants in top-left, top-right, bottom-left, bottom-right order.
    pub fn into_array(self) -> [T; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }
}

impl Region {
    /// Create a new region.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region covering a whole image of the given size.
    pub fn from_size(size: ImageSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// The size of the region.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Number of pixels in the region.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Whether the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    /// One past the last column of the region.
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// One past the last row of the region.
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    /// Whether the region lies fully inside an image of the given size.
    pub fn fits_in(&self, size: ImageSize) -> bool {
        self.right() <= size.width && self.bottom() <= size.height
    }

    /// Whether two regions share at least one pixel.
    pub fn overlaps(&self, other: &Region) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Split the region into four quadrants at `width / 2` and `height / 2`.
    ///
    /// The top-left quadrant takes the smaller half on both axes when a dimension is odd,
    /// the remaining quadrants absorb the remainder. The quadrants tile the region exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use blurbench_imgproc::region::Region;
    ///
    /// let q = Region::new(0, 0, 5, 3).quadrants();
    /// assert_eq!(q.top_left, Region::new(0, 0, 2, 1));
    /// assert_eq!(q.top_right, Region::new(2, 0, 3, 1));
    /// assert_eq!(q.bottom_left, Region::new(0, 1, 2, 2));
    /// assert_eq!(q.bottom_right, Region::new(2, 1, 3, 2));
    /// ```
    pub fn quadrants(&self) -> Quadrants<Region> {
        let mid_x = self.width / 2;
        let mid_y = self.height / 2;
        let (rest_x, rest_y) = (self.width - mid_x, self.height - mid_y);

        Quadrants {
            top_left: Region::new(self.x, self.y, mid_x, mid_y),
            top_right: Region::new(self.x + mid_x, self.y, rest_x, mid_y),
            bottom_left: Region::new(self.x, self.y + mid_y, mid_x, rest_y),
            bottom_right: Region::new(self.x + mid_x, self.y + mid_y, rest_x, rest_y),
        }
    }

    /// Expand the region by `pad` pixels for convolution, clamped to `bounds`.
    ///
    /// The origin moves up-left by at most `pad`; the extent grows by `2 * pad` and is then
    /// clipped to the image, so a window clamped at the left or top edge reaches further to
    /// the right or bottom.
    ///
    /// # Examples
    ///
    /// ```
    /// use blurbench_imgproc::region::Region;
    ///
    /// let padded = Region::new(1, 10, 4, 4).padded(3, [20, 16].into());
    /// assert_eq!(padded, Region::new(0, 7, 10, 9));
    /// ```
    pub fn padded(&self, pad: usize, bounds: ImageSize) -> Region {
        let x = self.x.saturating_sub(pad);
        let y = self.y.saturating_sub(pad);
        let width = bounds
            .width
            .saturating_sub(x)
            .min(self.width + 2 * pad);
        let height = bounds
            .height
            .saturating_sub(y)
            .min(self.height + 2 * pad);
        Region::new(x, y, width, height)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Region {{ x: {}, y: {}, width: {}, height: {} }}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrants_even() {
        let q = Region::new(10, 20, 8, 6).quadrants();
        assert_eq!(q.top_left, Region::new(10, 20, 4, 3));
        assert_eq!(q.top_right, Region::new(14, 20, 4, 3));
        assert_eq!(q.bottom_left, Region::new(10, 23, 4, 3));
        assert_eq!(q.bottom_right, Region::new(14, 23, 4, 3));
    }

    #[test]
    fn test_quadrants_tile_exactly() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (5, 9), (16, 3), (101, 57)] {
            let region = Region::new(3, 4, w, h);
            let quads = region.quadrants().into_array();

            let total: usize = quads.iter().map(Region::area).sum();
            assert_eq!(total, region.area());

            for (i, a) in quads.iter().enumerate() {
                assert!(a.x >= region.x && a.right() <= region.right());
                assert!(a.y >= region.y && a.bottom() <= region.bottom());
                for b in quads.iter().skip(i + 1) {
                    assert!(!a.overlaps(b), "{a} overlaps {b}");
                }
            }
        }
    }

    #[test]
    fn test_padded_interior() {
        let padded = Region::new(10, 10, 5, 5).padded(2, [100, 100].into());
        assert_eq!(padded, Region::new(8, 8, 9, 9));
    }

    #[test]
    fn test_padded_clamped() {
        let bounds = ImageSize {
            width: 12,
            height: 12,
        };
        // clipped on the right and bottom
        let padded = Region::new(8, 9, 4, 3).padded(3, bounds);
        assert_eq!(padded, Region::new(5, 6, 7, 6));
        assert!(padded.fits_in(bounds));

        // pad larger than the image
        let padded = Region::new(0, 0, 2, 2).padded(50, bounds);
        assert_eq!(padded, Region::from_size(bounds));
    }

    #[test]
    fn test_overlaps() {
        let a = Region::new(0, 0, 4, 4);
        assert!(a.overlaps(&Region::new(3, 3, 2, 2)));
        assert!(!a.overlaps(&Region::new(4, 0, 2, 2)));
        assert!(!a.overlaps(&Region::new(1, 1, 0, 2)));
    }
}
