use std::path::Path;

use crate::{
    error::{SoftblitError, SoftblitResult},
    image::Image,
    surface::Surface,
};

/// Cleanup radius applied to freshly decoded images.
pub const DECODE_CLEAN_RADIUS: u32 = 5;

/// Decode encoded bytes into the backend-native form: **premultiplied** BGRA,
/// top-down, DWORD-aligned rows.
pub fn decode_from_memory(bytes: &[u8]) -> SoftblitResult<Surface> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SoftblitError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(SoftblitError::decode("decoded image has a zero dimension"));
    }
    let staging = Image::from_parts(width, height, 4, rgba.into_raw(), None);
    Ok(Surface::from_image(&staging))
}

/// Decode the file at `path` into the native form.
pub fn decode(path: impl AsRef<Path>) -> SoftblitResult<Surface> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    decode_from_memory(&bytes)
}

/// Recover a straight-alpha RGBA image from a native surface.
///
/// Inverts the premultiplication channel by channel; fully transparent pixels
/// come back as four zero bytes. Within 1 of the pre-materialization value
/// everywhere, exact at alpha 0 and 255.
pub fn normalize(native: &Surface) -> Image {
    Image::from_parts(native.width(), native.height(), 4, native.readback_rgba8(), None)
}

/// Full load pipeline: decode, normalize, edge cleanup, materialize.
///
/// The returned image carries straight-alpha pixels with RGB repainted under
/// transparent pixels near edges, and its surface cache is already warm.
pub fn load(path: impl AsRef<Path>) -> SoftblitResult<Image> {
    let path = path.as_ref();
    let bytes = read_file(path)?;
    let img = load_from_memory(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "loaded image"
    );
    Ok(img)
}

/// [`load`] for encoded bytes already in memory.
pub fn load_from_memory(bytes: &[u8]) -> SoftblitResult<Image> {
    let native = decode_from_memory(bytes)?;
    let mut img = normalize(&native);
    img.clean_edges(DECODE_CLEAN_RADIUS);
    img.materialize();
    Ok(img)
}

fn read_file(path: &Path) -> SoftblitResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| SoftblitError::decode(format!("read image '{}': {e}", path.display())))
}
