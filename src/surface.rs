use crate::{
    error::{SoftblitError, SoftblitResult},
    image::Image,
};

/// Backend-native pixel block: **premultiplied** BGRA8, top-down, with
/// DWORD-aligned rows.
///
/// A `Surface` is what compositing operates on. It shows up in two roles:
///
/// - the cached native form of an [`Image`], built by [`Surface::from_image`]
/// - a free-standing render target ([`Surface::new`] / [`Surface::opaque`])
///
/// `data` always holds exactly `stride * height` bytes. Rows are padded to
/// the stride with zero bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

/// Bytes per row for a 32bpp top-down bitmap, rounded up to a DWORD.
pub(crate) fn dword_stride(width: u32) -> usize {
    ((width as usize * 32 + 31) / 32) * 4
}

fn premultiply(c: u8, a: u8) -> u8 {
    (u32::from(c) * u32::from(a) / 255) as u8
}

/// Recover a straight channel from a premultiplied one. Callers handle
/// `a == 0` themselves; the clamp tolerates channels exceeding their alpha.
pub(crate) fn straighten(c: u8, a: u8) -> u8 {
    (u32::from(c) * 255 / u32::from(a)).min(255) as u8
}

/// [`Surface::from_image`] over bare image fields, usable while the caller
/// holds other borrows of the owning image.
pub(crate) fn materialize_parts(width: u32, height: u32, channels: u8, pixels: &[u8]) -> Surface {
    let channels = channels as usize;
    let stride = dword_stride(width);
    let mut data = vec![0u8; stride * height as usize];

    let src_stride = width as usize * channels;
    for y in 0..height as usize {
        let src_row = &pixels[y * src_stride..(y + 1) * src_stride];
        let dst_row = &mut data[y * stride..y * stride + width as usize * 4];
        for (s, d) in src_row
            .chunks_exact(channels)
            .zip(dst_row.chunks_exact_mut(4))
        {
            let a = if channels == 4 { s[3] } else { 255 };
            d[0] = premultiply(s[2], a);
            d[1] = premultiply(s[1], a);
            d[2] = premultiply(s[0], a);
            d[3] = a;
        }
    }

    Surface {
        width,
        height,
        stride,
        data,
    }
}

impl Surface {
    /// Transparent-black target of the given dimensions.
    pub fn new(width: u32, height: u32) -> SoftblitResult<Self> {
        if width == 0 || height == 0 {
            return Err(SoftblitError::validation(
                "surface dimensions must be non-zero",
            ));
        }
        let stride = dword_stride(width);
        let len = stride
            .checked_mul(height as usize)
            .ok_or_else(|| SoftblitError::validation("surface size overflow"))?;
        Ok(Self {
            width,
            height,
            stride,
            data: vec![0u8; len],
        })
    }

    /// Opaque target cleared to `rgb`, the usual shape of a backbuffer.
    pub fn opaque(width: u32, height: u32, rgb: [u8; 3]) -> SoftblitResult<Self> {
        let mut s = Self::new(width, height)?;
        s.fill(rgb);
        Ok(s)
    }

    /// Materialize the native form of `img`: truncating premultiply, RGBA
    /// reordered to BGRA. 3-channel images materialize fully opaque.
    pub fn from_image(img: &Image) -> Self {
        materialize_parts(img.width(), img.height(), img.channels(), img.pixels())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.stride..y * self.stride + self.width as usize * 4]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        let end = start + self.width as usize * 4;
        &mut self.data[start..end]
    }

    /// Set every pixel to opaque `rgb`. Row padding stays zero.
    pub fn fill(&mut self, rgb: [u8; 3]) {
        let bgra = [rgb[2], rgb[1], rgb[0], 255u8];
        for y in 0..self.height as usize {
            for px in self.row_mut(y).chunks_exact_mut(4) {
                px.copy_from_slice(&bgra);
            }
        }
    }

    /// Read the surface back as tightly packed straight-alpha RGBA8.
    ///
    /// Inverse of [`Surface::from_image`] up to the 1-step truncation loss of
    /// the premultiply round trip; exact for alpha 0 and 255.
    pub fn readback_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height as usize {
            for px in self.row(y).chunks_exact(4) {
                let a = px[3];
                if a == 0 {
                    out.extend_from_slice(&[0, 0, 0, 0]);
                } else {
                    out.push(straighten(px[2], a));
                    out.push(straighten(px[1], a));
                    out.push(straighten(px[0], a));
                    out.push(a);
                }
            }
        }
        out
    }
}
