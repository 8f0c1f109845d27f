//! Pure geometry for fit modes and stack layers.
//!
//! All functions here are pure and testable without any I/O or images.
//! Rounding is half-away-from-zero on every computed edge, and every
//! computed extent is clamped to at least one pixel.

use super::params::{DrawParams, FitMode, Rect};
use crate::targets::{PixelSize, round_pixels};

/// Clamp a rounded extent into `1..=limit`.
fn extent(value: f64, limit: u32) -> u32 {
    round_pixels(value).min(limit.max(1))
}

/// Offset that centers `inner` inside `outer`.
fn centered(outer: u32, inner: u32) -> u32 {
    ((outer.saturating_sub(inner)) as f64 / 2.0).round() as u32
}

/// Source rectangle for a `cover` draw: the largest centered region of the
/// source with the target aspect ratio.
///
/// A source wider than the target loses equal strips left and right;
/// a taller source loses equal strips top and bottom.
pub fn cover_source_rect(source: (u32, u32), target_aspect: f64) -> Rect {
    let (src_w, src_h) = source;
    let src_aspect = src_w as f64 / src_h as f64;

    if src_aspect > target_aspect {
        let w = extent(src_h as f64 * target_aspect, src_w);
        Rect::new(centered(src_w, w), 0, w, src_h)
    } else {
        let h = extent(src_w as f64 / target_aspect, src_h);
        Rect::new(0, centered(src_h, h), src_w, h)
    }
}

/// Destination rectangle for a `contain` draw: the source scaled to fit the
/// canvas on one axis exactly, centered on the other.
pub fn contain_dest_rect(source: (u32, u32), canvas: PixelSize, target_aspect: f64) -> Rect {
    let (src_w, src_h) = source;
    let src_aspect = src_w as f64 / src_h as f64;

    let (w, h) = if src_aspect > target_aspect {
        (
            canvas.width,
            extent(canvas.width as f64 / src_aspect, canvas.height),
        )
    } else {
        (
            extent(canvas.height as f64 * src_aspect, canvas.width),
            canvas.height,
        )
    };
    Rect::new(
        centered(canvas.width, w),
        centered(canvas.height, h),
        w,
        h,
    )
}

/// Plan a single fit-mode draw of `source` into a `target_w × target_h` canvas.
///
/// Target dimensions may be fractional; the canvas is their rounded size but
/// the aspect ratio comes from the unrounded values.
pub fn plan_draw(source: (u32, u32), target_w: f64, target_h: f64, fit: FitMode) -> DrawParams {
    let canvas = PixelSize::new(round_pixels(target_w), round_pixels(target_h));
    let target_aspect = target_w / target_h;
    let (src_w, src_h) = source;

    let (src, dst) = match fit {
        FitMode::Cover => (
            cover_source_rect(source, target_aspect),
            Rect::sized(canvas.width, canvas.height),
        ),
        FitMode::Contain => (
            Rect::sized(src_w, src_h),
            contain_dest_rect(source, canvas, target_aspect),
        ),
    };

    DrawParams {
        canvas_width: canvas.width,
        canvas_height: canvas.height,
        src,
        dst,
        blur: None,
    }
}

/// True when either source dimension is smaller than the target's.
pub fn needs_upscale(source: (u32, u32), target: PixelSize) -> bool {
    source.0 < target.width || source.1 < target.height
}

/// Shrink ratio for layer `index` (1 = backmost) of a `layers`-deep stack.
///
/// ```text
/// 3 layers → 0.92, 0.96, 1.00
/// ```
pub fn layer_shrink(layers: u32, index: u32) -> f64 {
    1.0 - (layers - index) as f64 * 0.04
}

/// Blur radius in pixels for layer `index` at `scale`. The front layer is sharp.
pub fn layer_blur(layers: u32, index: u32, scale: u32) -> f64 {
    ((layers - index) * 6 * scale) as f64
}

/// Plan a stack layer: `cover` the source into a centered square of
/// `round(side × shrink)` on a transparent `side × side` canvas.
pub fn plan_layer_draw(source: (u32, u32), side: u32, shrink: f64, blur: f64) -> DrawParams {
    let inner = extent(side as f64 * shrink, side);
    let offset = centered(side, inner);

    DrawParams {
        canvas_width: side,
        canvas_height: side,
        src: cover_source_rect(source, 1.0),
        dst: Rect::new(offset, offset, inner, inner),
        blur: (blur > 0.0).then_some(blur as f32),
    }
}
