use crate::error::{SoftblitError, SoftblitResult};

/// Repaint RGB under fully transparent pixels from the nearest non-transparent
/// neighbor, so later scaling cannot bleed stale color through alpha edges.
///
/// For every pixel with alpha 0, square rings of radius `1..=max_radius` are
/// searched over a snapshot of the input. Each ring's clamped bounding box is
/// scanned row-major, skipping cells inside the perimeter; the first pixel
/// found with non-zero alpha donates its RGB. Alpha itself never changes, so
/// the pass is idempotent.
pub fn clean_edges_rgba(
    pixels: &mut [u8],
    width: u32,
    height: u32,
    max_radius: u32,
) -> SoftblitResult<()> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SoftblitError::validation("edge cleanup buffer size overflow"))?;
    if pixels.len() != expected_len {
        return Err(SoftblitError::validation(
            "clean_edges_rgba expects pixels matching width*height*4",
        ));
    }
    clean_rgba(pixels, width, height, max_radius);
    Ok(())
}

pub(crate) fn clean_rgba(pixels: &mut [u8], width: u32, height: u32, max_radius: u32) {
    debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
    if max_radius == 0 {
        return;
    }

    let snapshot = pixels.to_vec();
    let w = width as i64;
    let h = height as i64;
    // Rings wider than the largest image extent cannot reach new cells.
    let limit = i64::from(max_radius).min(w.max(h));

    for y in 0..h {
        for x in 0..w {
            let idx = ((y * w + x) * 4) as usize;
            if snapshot[idx + 3] != 0 {
                continue;
            }
            if let Some(donor) = find_donor(&snapshot, w, h, x, y, limit) {
                pixels[idx..idx + 3].copy_from_slice(&snapshot[donor..donor + 3]);
            }
        }
    }
}

fn find_donor(snapshot: &[u8], w: i64, h: i64, x: i64, y: i64, limit: i64) -> Option<usize> {
    for r in 1..=limit {
        for ny in (y - r).max(0)..=(y + r).min(h - 1) {
            for nx in (x - r).max(0)..=(x + r).min(w - 1) {
                if (ny - y).abs() != r && (nx - x).abs() != r {
                    continue;
                }
                let n = ((ny * w + nx) * 4) as usize;
                if snapshot[n + 3] != 0 {
                    return Some(n);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_pixel_takes_rgb_from_adjacent_opaque() {
        let mut px = vec![255, 0, 0, 255, 0, 0, 0, 0];
        clean_edges_rgba(&mut px, 2, 1, 1).unwrap();
        assert_eq!(px, vec![255, 0, 0, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn alpha_channel_is_never_modified() {
        let mut px = vec![255, 0, 0, 255, 9, 9, 9, 0, 1, 2, 3, 77];
        let alphas: Vec<u8> = px.iter().skip(3).step_by(4).copied().collect();
        clean_edges_rgba(&mut px, 3, 1, 2).unwrap();
        let after: Vec<u8> = px.iter().skip(3).step_by(4).copied().collect();
        assert_eq!(alphas, after);
    }

    #[test]
    fn nearer_ring_beats_farther_donor() {
        // red . . . blue, radius 2: x=1 sees red at r=1, x=3 sees blue at r=1,
        // the center ties at r=2 and row-major order picks the left donor.
        let mut px = vec![
            255, 0, 0, 255, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 255, 255,
        ];
        clean_edges_rgba(&mut px, 5, 1, 2).unwrap();
        assert_eq!(&px[4..7], &[255, 0, 0]);
        assert_eq!(&px[8..11], &[255, 0, 0]);
        assert_eq!(&px[12..15], &[0, 0, 255]);
    }

    #[test]
    fn row_major_scan_breaks_ties_within_a_ring() {
        // All eight neighbors are opaque with distinct reds; the top-left
        // corner of the ring box is scanned first.
        let mut px = Vec::new();
        for v in 1u8..=9 {
            if v == 5 {
                px.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                px.extend_from_slice(&[v * 10, 0, 0, 255]);
            }
        }
        clean_edges_rgba(&mut px, 3, 3, 1).unwrap();
        assert_eq!(&px[4 * 4..4 * 4 + 3], &[10, 0, 0]);
    }

    #[test]
    fn donors_come_from_the_snapshot_not_from_repainted_pixels() {
        let mut px = vec![255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 0];
        clean_edges_rgba(&mut px, 3, 1, 1).unwrap();
        // x=1 is repainted, but its alpha stays 0, so x=2 finds no donor at r=1.
        assert_eq!(&px[4..8], &[255, 0, 0, 0]);
        assert_eq!(&px[8..12], &[0, 0, 0, 0]);
    }

    #[test]
    fn pixels_without_a_donor_in_range_are_untouched() {
        let mut px = vec![7, 8, 9, 0, 4, 5, 6, 0];
        clean_edges_rgba(&mut px, 2, 1, 3).unwrap();
        assert_eq!(px, vec![7, 8, 9, 0, 4, 5, 6, 0]);
    }

    #[test]
    fn cleanup_is_idempotent_for_a_fixed_radius() {
        let mut px = vec![
            10, 20, 30, 255, 0, 0, 0, 0, //
            0, 0, 0, 0, 200, 100, 50, 3,
        ];
        clean_edges_rgba(&mut px, 2, 2, 2).unwrap();
        let once = px.clone();
        clean_edges_rgba(&mut px, 2, 2, 2).unwrap();
        assert_eq!(px, once);
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        let mut px = vec![0u8; 12];
        assert!(clean_edges_rgba(&mut px, 2, 2, 1).is_err());
    }
}
