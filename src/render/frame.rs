use crate::foundation::core::Resolution;

/// A canonical raster frame: RGB8, tightly packed, row-major.
///
/// Every frame handed to a [`crate::FrameSink`] has the run's configured [`Resolution`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// All-black frame of the given size.
    pub fn black(res: Resolution) -> Self {
        Self {
            width: res.width,
            height: res.height,
            data: vec![0u8; res.area() * 3],
        }
    }

    /// Frame dimensions.
    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`. Panics when out of bounds, like slice indexing.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 3]) {
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&px);
    }

    /// Row `y` as an RGB8 slice.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    /// Convert into an `image` buffer (used for resampling and PNG output).
    pub fn into_image(self) -> image::RgbImage {
        // Only reachable with a hand-edited `data` of the wrong length.
        let (w, h) = (self.width, self.height);
        image::RgbImage::from_raw(w, h, self.data).unwrap_or_else(|| image::RgbImage::new(w, h))
    }

    /// Build a frame from an `image` buffer.
    pub fn from_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 3
    }
}
