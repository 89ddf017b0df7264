//! Borrowed 8-bit grayscale view over caller-owned bytes.
//!
//! Input-only: 8-bit data enters the crate here and is converted to
//! [`ImageF32`](super::ImageF32) before any processing, so the view stays
//! a plain struct with row access. `stride` may exceed `w` for padded
//! buffers.
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// View over a tightly packed row-major buffer (`stride == w`).
    pub fn from_slice(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
