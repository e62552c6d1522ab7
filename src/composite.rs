use crate::{error::SoftblitResult, image::Image, surface::Surface};

/// Source-over composite `src` onto `target` with its top-left at `(x, y)`.
///
/// Both surfaces hold **premultiplied** BGRA, so the operator is
/// `out = src + dst * (255 - src_a) / 255` on every channel, with the
/// division rounded and the addition saturating. Offsets may be negative;
/// only the overlap with the target bounds is touched, and zero overlap is a
/// no-op.
pub fn blit(target: &mut Surface, src: &Surface, x: i32, y: i32) {
    let x = i64::from(x);
    let y = i64::from(y);

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width())).min(i64::from(target.width()));
    let y1 = (y + i64::from(src.height())).min(i64::from(target.height()));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    for ty in y0..y1 {
        let src_row = src.row((ty - y) as usize);
        let dst_row = target.row_mut(ty as usize);
        for tx in x0..x1 {
            let si = ((tx - x) * 4) as usize;
            let di = (tx * 4) as usize;
            over_premul(&mut dst_row[di..di + 4], &src_row[si..si + 4]);
        }
    }
}

/// Composite `img` onto `target` at `(x, y)`.
///
/// Uses the image's cached surface when present; otherwise a temporary one is
/// materialized for this call and dropped (the cache is not populated through
/// a shared reference).
pub fn draw(target: &mut Surface, img: &Image, x: i32, y: i32) {
    match img.surface() {
        Some(s) => blit(target, s, x, y),
        None => blit(target, &Surface::from_image(img), x, y),
    }
}

/// Resize `img` to `width` x `height` (full pipeline, source untouched),
/// composite the result at `(x, y)`, drop it.
pub fn draw_scaled(
    target: &mut Surface,
    img: &Image,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
) -> SoftblitResult<()> {
    let scaled = img.resize(width, height)?;
    draw(target, &scaled, x, y);
    Ok(())
}

fn over_premul(dst: &mut [u8], src: &[u8]) {
    let sa = src[3];
    if sa == 0 {
        return;
    }
    let inv = 255u16 - u16::from(sa);
    for i in 0..4 {
        dst[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
