use crate::{
    edges,
    error::{SoftblitError, SoftblitResult},
    surface::{self, Surface},
    transform,
};

/// Straight-alpha pixel buffer plus the lazily built native form.
///
/// An `Image` holds:
///
/// - `pixels`: top-down, row-major, tightly packed R,G,B[,A] bytes with
///   **straight** alpha
/// - an optional cached [`Surface`], the **premultiplied** BGRA form
///   compositing consumes
///
/// "Pixels present, surface absent" is a legal state; the surface is built on
/// demand by [`Image::materialize`] and kept in sync by every mutating
/// operation. Whenever a cached surface exists it is exactly what
/// materializing the current pixels would produce.
#[derive(Clone, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
    surface: Option<Surface>,
}

impl Image {
    /// Validated constructor. `channels` must be 3 (RGB) or 4 (RGBA) and
    /// `pixels` must hold exactly `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> SoftblitResult<Self> {
        if channels != 3 && channels != 4 {
            return Err(SoftblitError::validation(
                "channels must be 3 (RGB) or 4 (RGBA)",
            ));
        }
        if width == 0 || height == 0 {
            return Err(SoftblitError::validation(
                "image dimensions must be non-zero",
            ));
        }
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(channels as usize))
            .ok_or_else(|| SoftblitError::validation("image size overflow"))?;
        if pixels.len() != expected_len {
            return Err(SoftblitError::validation(
                "pixel buffer does not match width * height * channels",
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
            surface: None,
        })
    }

    /// Straight-alpha RGBA image over `pixels`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> SoftblitResult<Self> {
        Self::new(width, height, 4, pixels)
    }

    /// Opaque RGB image over `pixels`.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> SoftblitResult<Self> {
        Self::new(width, height, 3, pixels)
    }

    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        channels: u8,
        pixels: Vec<u8>,
        surface: Option<Surface>,
    ) -> Self {
        debug_assert!(channels == 3 || channels == 4);
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * channels as usize
        );
        Self {
            width,
            height,
            channels,
            pixels,
            surface,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 3 for RGB, 4 for RGBA. Also the per-pixel byte stride of `pixels`.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable pixel access. Drops the cached surface; the next
    /// [`Image::materialize`] or draw rebuilds it from the edited pixels.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.surface = None;
        &mut self.pixels
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Native form of the current pixels, building and caching it if absent.
    pub fn materialize(&mut self) -> &Surface {
        self.surface.get_or_insert_with(|| {
            surface::materialize_parts(self.width, self.height, self.channels, &self.pixels)
        })
    }

    /// Repaint RGB under transparent pixels from their nearest non-transparent
    /// neighbor, searching up to `max_radius`. No-op for 3-channel images;
    /// alpha never changes. A cached surface is rebuilt afterwards.
    pub fn clean_edges(&mut self, max_radius: u32) {
        if self.channels != 4 {
            return;
        }
        edges::clean_rgba(&mut self.pixels, self.width, self.height, max_radius);
        self.refresh_surface();
    }

    /// Mirror left-right in place. A cached surface is rebuilt; if none
    /// existed, none is created.
    pub fn flip_horizontal(&mut self) {
        transform::flip_horizontal_in_place(
            &mut self.pixels,
            self.width,
            self.height,
            self.channels,
        );
        self.refresh_surface();
    }

    /// Mirror top-bottom in place. Same surface policy as
    /// [`Image::flip_horizontal`].
    pub fn flip_vertical(&mut self) {
        transform::flip_vertical_in_place(&mut self.pixels, self.width, self.height, self.channels);
        self.refresh_surface();
    }

    /// Nearest-neighbor resample into a new image; the source is untouched.
    ///
    /// 4-channel results get the post-resize edge cleanup and arrive with
    /// their surface already built. 3-channel results stay surface-less until
    /// demanded.
    pub fn resize(&self, new_width: u32, new_height: u32) -> SoftblitResult<Image> {
        let pixels = transform::resize_pixels(
            &self.pixels,
            self.width,
            self.height,
            self.channels,
            new_width,
            new_height,
        )?;
        let mut out = Image::from_parts(new_width, new_height, self.channels, pixels, None);
        if out.channels == 4 {
            out.clean_edges(transform::RESIZE_CLEAN_RADIUS);
            out.materialize();
        }
        Ok(out)
    }

    /// Straight-alpha BGRA copy of the pixels, tightly packed. The layout
    /// window icons and cursors are fed with.
    pub fn to_bgra8(&self) -> Vec<u8> {
        let ch = self.channels as usize;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.pixels.chunks_exact(ch) {
            let a = if ch == 4 { px[3] } else { 255 };
            out.extend_from_slice(&[px[2], px[1], px[0], a]);
        }
        out
    }

    fn refresh_surface(&mut self) {
        if self.surface.is_some() {
            self.surface = Some(surface::materialize_parts(
                self.width,
                self.height,
                self.channels,
                &self.pixels,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_validate_inputs() {
        assert!(matches!(
            Image::from_rgba(0, 1, vec![]),
            Err(SoftblitError::Validation(_))
        ));
        assert!(matches!(
            Image::from_rgba(1, 1, vec![0; 3]),
            Err(SoftblitError::Validation(_))
        ));
        assert!(matches!(
            Image::new(1, 1, 2, vec![0; 2]),
            Err(SoftblitError::Validation(_))
        ));
        assert!(Image::from_rgb(1, 1, vec![0; 3]).is_ok());
    }

    #[test]
    fn materialize_caches_and_matches_from_image() {
        let mut img = Image::from_rgba(1, 1, vec![200, 100, 50, 128]).unwrap();
        assert!(img.surface().is_none());
        let fresh = Surface::from_image(&img);
        assert_eq!(img.materialize(), &fresh);
        assert!(img.surface().is_some());
    }

    #[test]
    fn pixels_mut_drops_the_cached_surface() {
        let mut img = Image::from_rgba(1, 1, vec![1, 2, 3, 4]).unwrap();
        img.materialize();
        img.pixels_mut()[0] = 9;
        assert!(img.surface().is_none());
    }

    #[test]
    fn clean_edges_is_a_noop_for_rgb() {
        let mut img = Image::from_rgb(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        img.clean_edges(5);
        assert_eq!(img.pixels(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn clean_edges_rebuilds_a_cached_surface() {
        let mut img = Image::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        img.materialize();
        img.clean_edges(1);
        assert_eq!(img.pixels(), &[255, 0, 0, 255, 255, 0, 0, 0]);
        assert_eq!(img.surface(), Some(&Surface::from_image(&img)));
    }

    #[test]
    fn flips_regenerate_the_surface_only_if_present() {
        let mut bare = Image::from_rgba(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        bare.flip_horizontal();
        assert!(bare.surface().is_none());

        let mut cached = Image::from_rgba(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
        cached.materialize();
        cached.flip_horizontal();
        assert_eq!(cached.pixels(), &[4, 5, 6, 255, 1, 2, 3, 255]);
        assert_eq!(cached.surface(), Some(&Surface::from_image(&cached)));
    }

    #[test]
    fn vertical_flip_moves_the_top_row_to_the_bottom() {
        let mut img = Image::from_rgb(1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        img.flip_vertical();
        assert_eq!(img.pixels(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn resize_rejects_zero_dimensions_with_a_typed_error() {
        let img = Image::from_rgba(1, 1, vec![0; 4]).unwrap();
        assert!(matches!(
            img.resize(0, 4),
            Err(SoftblitError::Validation(_))
        ));
    }

    #[test]
    fn rgba_resize_arrives_with_a_surface_rgb_without() {
        let rgba = Image::from_rgba(1, 1, vec![1, 2, 3, 255]).unwrap();
        assert!(rgba.resize(2, 2).unwrap().surface().is_some());

        let rgb = Image::from_rgb(1, 1, vec![1, 2, 3]).unwrap();
        assert!(rgb.resize(2, 2).unwrap().surface().is_none());
    }

    #[test]
    fn resize_leaves_the_source_untouched() {
        let img = Image::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        let before = img.pixels().to_vec();
        let _ = img.resize(4, 2).unwrap();
        assert_eq!(img.pixels(), &before[..]);
        assert!(img.surface().is_none());
    }

    #[test]
    fn to_bgra8_swizzles_and_fills_alpha_for_rgb() {
        let rgba = Image::from_rgba(1, 1, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(rgba.to_bgra8(), vec![30, 20, 10, 40]);

        let rgb = Image::from_rgb(1, 1, vec![10, 20, 30]).unwrap();
        assert_eq!(rgb.to_bgra8(), vec![30, 20, 10, 255]);
    }
}
