use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// Row-major 2D buffer. Element `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer2<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Buffer2<T> {
    /// Wraps `pixels` as a `width x height` buffer.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixels length must equal width * height"
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Non-panicking variant of [`Buffer2::new`]. Hands the vector back on a
    /// shape mismatch so the caller can report its length.
    pub fn try_new(width: usize, height: usize, pixels: Vec<T>) -> Result<Self, Vec<T>> {
        match width.checked_mul(height) {
            Some(len) if len == pixels.len() => Ok(Self {
                pixels,
                width,
                height,
            }),
            _ => Err(pixels),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.pixels[self.index_of(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index_of(x, y);
        &mut self.pixels[idx]
    }

    /// True when both buffers have the same width and height.
    #[inline]
    pub fn same_shape<U>(&self, other: &Buffer2<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> slice::ChunksExact<'_, T> {
        self.pixels.chunks_exact(self.width.max(1))
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }
}

impl<T: Clone> Buffer2<T> {
    pub fn new_filled(width: usize, height: usize, value: T) -> Self {
        Self::new(width, height, vec![value; width * height])
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

impl<T: Clone + Default> Buffer2<T> {
    pub fn new_default(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, T::default())
    }
}

impl<T> Index<(usize, usize)> for Buffer2<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        self.get(x, y)
    }
}

impl<T> IndexMut<(usize, usize)> for Buffer2<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        self.get_mut(x, y)
    }
}

impl<T> Deref for Buffer2<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl<T> DerefMut for Buffer2<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl<T> From<Buffer2<T>> for Vec<T> {
    #[inline]
    fn from(buffer: Buffer2<T>) -> Self {
        buffer.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_dimensions() {
        let buf = Buffer2::new(3, 2, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.len(), 6);
    }

    #[test]
    #[should_panic(expected = "pixels length must equal width * height")]
    fn test_new_rejects_wrong_length() {
        Buffer2::new(3, 2, vec![0u8; 5]);
    }

    #[test]
    fn test_try_new_returns_vec_on_mismatch() {
        let err = Buffer2::try_new(4, 4, vec![1u8; 15]).unwrap_err();
        assert_eq!(err.len(), 15);
        assert!(Buffer2::try_new(usize::MAX, 2, Vec::<u8>::new()).is_err());
    }

    #[test]
    fn test_row_major_indexing() {
        let buf = Buffer2::new(3, 2, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(*buf.get(2, 0), 2);
        assert_eq!(buf[(0, 1)], 3);
        assert_eq!(buf.index_of(1, 1), 4);
        assert_eq!(buf.row(1), &[3, 4, 5]);
    }

    #[test]
    fn test_row_mut_writes_only_that_row() {
        let mut buf = Buffer2::<u32>::new_default(4, 3);
        buf.row_mut(1).fill(7);
        for (y, row) in buf.rows().enumerate() {
            let expected = if y == 1 { 7 } else { 0 };
            assert!(row.iter().all(|&v| v == expected), "row {y}: {row:?}");
        }
    }

    #[test]
    fn test_same_shape_ignores_element_type() {
        let a = Buffer2::new_filled(5, 2, 0u8);
        let b = Buffer2::new_filled(5, 2, 0.0f32);
        let c = Buffer2::new_filled(2, 5, 0.0f32);
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
