//! Palette-mapped blitting.
//!
//! This is the per-frame hot path: every palette sprite on screen goes through
//! [`draw_palette_mapped_image`] once per frame, for every one of its pixels.
//!
//! The source rectangle is clipped against the destination up front, so the
//! inner loop does no bounds checks of its own. When both images expose their
//! rows the loop runs over plain slices. Otherwise, or when a row is too
//! short to cover the clipped span, it falls back to `get_pixel`/`set_pixel`,
//! still inside the clipped rectangle.

use crate::image::Image;
use crate::logging::{log, LogCategory, LogLevel};
use crate::palette::PaletteTable;

/// Composite `src` onto `dst` at (`left`, `top`), remapping every source
/// index through `table`.
///
/// Pixels are visited row by row (y outer, x inner). Each source index `c`
/// becomes `table.lookup(c)`. The mapped value is written unless it is 0 and
/// `transparent` is set, in which case the destination pixel is left as it
/// was. The test is on the *mapped* value: a source pixel whose entry maps to
/// 0 is skipped too.
///
/// Writes that land outside `dst` are dropped.
///
/// Source indices must be in 0–15. This is checked in debug builds; in
/// release builds an out-of-range index panics on the table lookup.
pub fn draw_palette_mapped_image<D, S>(
    dst: &mut D,
    src: &S,
    table: &PaletteTable,
    left: i32,
    top: i32,
    transparent: bool,
) where
    D: Image + ?Sized,
    S: Image + ?Sized,
{
    log(LogCategory::Blit, LogLevel::Trace, || {
        format!(
            "Blit: {}x{} at ({}, {}) onto {}x{}, transparent={}",
            src.width(),
            src.height(),
            left,
            top,
            dst.width(),
            dst.height(),
            transparent
        )
    });

    // Clip in i64 so offsets near i32::MIN/MAX cannot overflow
    let (left64, top64) = (left as i64, top as i64);
    let x0 = (-left64).max(0);
    let x1 = (src.width() as i64).min(dst.width() as i64 - left64);
    let y0 = (-top64).max(0);
    let y1 = (src.height() as i64).min(dst.height() as i64 - top64);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    // Everything below is inside both images, so the casts are lossless
    let (x0, x1) = (x0 as i32, x1 as i32);
    let span = (x1 - x0) as usize;
    let (sx0, dx0) = (x0 as usize, (x0 + left) as usize);

    for y in y0 as i32..y1 as i32 {
        let dy = y + top;
        // Rows shorter than the clipped span are treated as unavailable
        let src_span = src.row(y).and_then(|row| row.get(sx0..sx0 + span));

        if let Some(dst_span) = dst
            .row_mut(dy)
            .and_then(|row| row.get_mut(dx0..dx0 + span))
        {
            match src_span {
                Some(src_span) => blit_span(dst_span, src_span, table, transparent),
                None => {
                    for (i, slot) in dst_span.iter_mut().enumerate() {
                        let mapped = table.lookup(src.get_pixel(x0 + i as i32, y));
                        if mapped != 0 || !transparent {
                            *slot = mapped;
                        }
                    }
                }
            }
            continue;
        }

        for x in x0..x1 {
            let c = match src_span {
                Some(row) => row[(x - x0) as usize],
                None => src.get_pixel(x, y),
            };
            let mapped = table.lookup(c);
            if mapped != 0 || !transparent {
                dst.set_pixel(x + left, dy, mapped);
            }
        }
    }
}

#[inline(always)]
fn blit_span(dst: &mut [i32], src: &[i32], table: &PaletteTable, transparent: bool) {
    if transparent {
        for (slot, &c) in dst.iter_mut().zip(src) {
            let mapped = table.lookup(c);
            if mapped != 0 {
                *slot = mapped;
            }
        }
    } else {
        for (slot, &c) in dst.iter_mut().zip(src) {
            *slot = table.lookup(c);
        }
    }
}
