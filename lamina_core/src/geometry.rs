// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-space value types.

use core::fmt;

/// A width and height in pixels.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent {
    /// Creates an extent from a width and height.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.width * self.height
    }

    /// Whether the extent covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Debug for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extent({}x{})", self.width, self.height)
    }
}

/// A pixel position, relative to a buffer's or a window's top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin {
    /// Horizontal offset in pixels.
    pub x: u32,
    /// Vertical offset in pixels.
    pub y: u32,
}

impl Origin {
    /// The top-left corner.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates an origin from its coordinates.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Origin({}, {})", self.x, self.y)
    }
}
