// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transfer surface descriptors.

use lamina_core::format::PixelFormat;
use lamina_core::geometry::Extent;

/// One side of a rectangular transfer.
///
/// `address` points at the first pixel of the rectangle, not of the
/// underlying buffer; `stride_px` is the underlying buffer's row pitch in
/// pixels. A transfer of width `w` skips `stride_px - w` pixels between
/// rows on this surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceDesc {
    /// Bus address of the rectangle's first pixel.
    pub address: u32,
    /// Row pitch of the underlying buffer, in pixels.
    pub stride_px: u32,
    /// Pixel format of the underlying buffer.
    pub format: PixelFormat,
}

impl SurfaceDesc {
    /// Creates a descriptor.
    #[inline]
    #[must_use]
    pub const fn new(address: u32, stride_px: u32, format: PixelFormat) -> Self {
        Self {
            address,
            stride_px,
            format,
        }
    }

    /// Whether a transfer of `size` fits within this surface's row pitch.
    #[inline]
    #[must_use]
    pub const fn fits(&self, size: Extent) -> bool {
        size.width <= self.stride_px
    }

    /// Pixels skipped between rows for a transfer of `width`.
    ///
    /// Callers must have checked [`fits`](Self::fits) first.
    #[inline]
    #[must_use]
    pub const fn line_offset(&self, width: u32) -> u32 {
        self.stride_px - width
    }
}
