// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-layer transfer helpers.
//!
//! These tie the engine to a [`LayerRegistry`]: the registry supplies
//! addresses, strides, and formats, the engine moves the pixels. Rectangle
//! operations target the layer's *active* buffer, the one the renderer is
//! drawing into; a buffer armed for swap is never written here.
//!
//! All rectangle arguments are asserted against the layer geometry. An
//! out-of-bounds rectangle is a renderer bug, not a runtime condition.

use lamina_core::geometry::{Extent, Origin};
use lamina_core::layer::{LayerRegistry, LayerView};

use crate::engine::{BlitEngine, BlitError, TransferChannel};
use crate::surface::SurfaceDesc;

fn assert_in_bounds(view: &LayerView, origin: Origin, size: Extent) {
    assert!(
        origin.x + size.width <= view.size.width && origin.y + size.height <= view.size.height,
        "rectangle exceeds layer geometry"
    );
}

fn pixel_address(registry: &LayerRegistry, view: &LayerView, origin: Origin) -> Result<u32, BlitError> {
    let buffer = registry.buffer_address(view.index, view.active_buffer)?;
    Ok(buffer + (origin.y * view.size.width + origin.x) * view.bytes_per_pixel)
}

fn rect_surface(
    registry: &LayerRegistry,
    view: &LayerView,
    origin: Origin,
) -> Result<SurfaceDesc, BlitError> {
    Ok(SurfaceDesc::new(
        pixel_address(registry, view, origin)?,
        view.size.width,
        view.format,
    ))
}

/// Copies one whole buffer of a layer onto another and makes the
/// destination the drawing target.
///
/// Used when the renderer switches buffers and needs the new target primed
/// with the current contents.
pub fn copy_buffer<C: TransferChannel>(
    engine: &mut BlitEngine<C>,
    registry: &mut LayerRegistry,
    layer: usize,
    src_buffer: u32,
    dst_buffer: u32,
) -> Result<(), BlitError> {
    let view = registry.view(layer)?;
    let src = SurfaceDesc::new(
        registry.buffer_address(layer, src_buffer)?,
        view.size.width,
        view.format,
    );
    let dst = SurfaceDesc::new(
        registry.buffer_address(layer, dst_buffer)?,
        view.size.width,
        view.format,
    );
    engine.copy(src, dst, view.size)?;
    registry.set_active_buffer(layer, dst_buffer)?;
    Ok(())
}

/// Copies a rectangle within the layer's active buffer.
///
/// Overlapping rectangles are the channel's concern; the software channel
/// in the sync harness buffers the source first.
///
/// # Panics
///
/// Panics if either rectangle exceeds the layer geometry.
pub fn copy_rect<C: TransferChannel>(
    engine: &mut BlitEngine<C>,
    registry: &LayerRegistry,
    layer: usize,
    src_origin: Origin,
    dst_origin: Origin,
    size: Extent,
) -> Result<(), BlitError> {
    let view = registry.view(layer)?;
    assert_in_bounds(&view, src_origin, size);
    assert_in_bounds(&view, dst_origin, size);
    let src = rect_surface(registry, &view, src_origin)?;
    let dst = rect_surface(registry, &view, dst_origin)?;
    engine.copy(src, dst, size)
}

/// Fills a rectangle of the layer's active buffer with a constant color in
/// the layer's format.
///
/// # Panics
///
/// Panics if the rectangle exceeds the layer geometry.
pub fn fill_rect<C: TransferChannel>(
    engine: &mut BlitEngine<C>,
    registry: &LayerRegistry,
    layer: usize,
    origin: Origin,
    size: Extent,
    color: u32,
) -> Result<(), BlitError> {
    let view = registry.view(layer)?;
    assert_in_bounds(&view, origin, size);
    let dst = rect_surface(registry, &view, origin)?;
    engine.fill(dst, size, color)
}

/// Copies a direct-color bitmap from memory into the layer's active
/// buffer, converting to the layer format if `bitmap.format` differs.
///
/// `bitmap.stride_px` may exceed `size.width` for bitmaps with row
/// padding.
///
/// # Panics
///
/// Panics if the destination rectangle exceeds the layer geometry.
pub fn draw_bitmap<C: TransferChannel>(
    engine: &mut BlitEngine<C>,
    registry: &LayerRegistry,
    layer: usize,
    origin: Origin,
    size: Extent,
    bitmap: SurfaceDesc,
) -> Result<(), BlitError> {
    let view = registry.view(layer)?;
    assert_in_bounds(&view, origin, size);
    let dst = rect_surface(registry, &view, origin)?;
    engine.copy(bitmap, dst, size)
}

/// Expands an 8-bit indexed bitmap through `lut` into the layer's active
/// buffer.
///
/// # Panics
///
/// Panics if the destination rectangle exceeds the layer geometry, or if
/// `lut` holds fewer than 256 entries.
pub fn draw_bitmap_indexed<C: TransferChannel>(
    engine: &mut BlitEngine<C>,
    registry: &LayerRegistry,
    layer: usize,
    origin: Origin,
    size: Extent,
    bitmap: SurfaceDesc,
    lut: &[u32],
) -> Result<(), BlitError> {
    let view = registry.view(layer)?;
    assert_in_bounds(&view, origin, size);
    let dst = rect_surface(registry, &view, origin)?;
    engine.convert_indexed(bitmap, dst, size, lut)
}
