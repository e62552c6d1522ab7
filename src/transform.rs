use crate::error::{SoftblitError, SoftblitResult};

/// Cleanup radius applied to 4-channel results right after a resize.
pub const RESIZE_CLEAN_RADIUS: u32 = 3;

/// Nearest-neighbor resample of a tightly packed buffer. Channels are copied
/// verbatim, so straight alpha in means straight alpha out.
pub(crate) fn resize_pixels(
    src: &[u8],
    src_w: u32,
    src_h: u32,
    channels: u8,
    new_w: u32,
    new_h: u32,
) -> SoftblitResult<Vec<u8>> {
    if new_w == 0 || new_h == 0 {
        return Err(SoftblitError::validation(
            "resize dimensions must be non-zero",
        ));
    }
    let ch = channels as usize;
    let out_len = (new_w as usize)
        .checked_mul(new_h as usize)
        .and_then(|v| v.checked_mul(ch))
        .ok_or_else(|| SoftblitError::validation("resize target size overflow"))?;
    debug_assert_eq!(src.len(), src_w as usize * src_h as usize * ch);

    let mut out = vec![0u8; out_len];
    let src_stride = src_w as usize * ch;
    let dst_stride = new_w as usize * ch;

    for y in 0..new_h as usize {
        let sy = ((y as u64 * u64::from(src_h)) / u64::from(new_h)).min(u64::from(src_h) - 1)
            as usize;
        let src_row = &src[sy * src_stride..(sy + 1) * src_stride];
        let dst_row = &mut out[y * dst_stride..(y + 1) * dst_stride];
        for x in 0..new_w as usize {
            let sx = ((x as u64 * u64::from(src_w)) / u64::from(new_w)).min(u64::from(src_w) - 1)
                as usize;
            dst_row[x * ch..(x + 1) * ch].copy_from_slice(&src_row[sx * ch..(sx + 1) * ch]);
        }
    }
    Ok(out)
}

/// Mirror left-right in place. Pixels move as whole units.
pub(crate) fn flip_horizontal_in_place(pixels: &mut [u8], width: u32, height: u32, channels: u8) {
    let ch = channels as usize;
    let w = width as usize;
    let row_len = w * ch;
    debug_assert_eq!(pixels.len(), row_len * height as usize);

    for row in pixels.chunks_exact_mut(row_len) {
        for x in 0..w / 2 {
            let (left, right) = row.split_at_mut((w - 1 - x) * ch);
            left[x * ch..(x + 1) * ch].swap_with_slice(&mut right[..ch]);
        }
    }
}

/// Mirror top-bottom in place by swapping whole rows.
pub(crate) fn flip_vertical_in_place(pixels: &mut [u8], width: u32, height: u32, channels: u8) {
    let row_len = width as usize * channels as usize;
    let h = height as usize;
    debug_assert_eq!(pixels.len(), row_len * h);

    for y in 0..h / 2 {
        let (top, bottom) = pixels.split_at_mut((h - 1 - y) * row_len);
        top[y * row_len..(y + 1) * row_len].swap_with_slice(&mut bottom[..row_len]);
    }
}
