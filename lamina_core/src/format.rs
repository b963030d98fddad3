// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel formats with an accelerated transfer path.
//!
//! [`PixelFormat`] is the closed set of formats the transfer engine and the
//! display controller both understand. Direct-color formats carry the full
//! pixel value per sample; indexed formats store look-up-table indices and
//! need a LUT to resolve to color.
//!
//! The renderer configures layers with a raw color-conversion code;
//! [`PixelFormat::from_code`] maps it, and an unknown code is a recoverable
//! configuration error rather than a trap.

/// A pixel format the accelerator can read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 32-bit direct color, 8 bits each of alpha, red, green, blue.
    Argb8888,
    /// 24-bit direct color, 8 bits each of red, green, blue.
    Rgb888,
    /// 16-bit direct color, 5/6/5 bits of red/green/blue.
    Rgb565,
    /// 16-bit direct color, 1 bit alpha and 5/5/5 bits of red/green/blue.
    Argb1555,
    /// 16-bit direct color, 4 bits each of alpha, red, green, blue.
    Argb4444,
    /// 8-bit indexed: each byte is a 256-entry LUT index.
    L8,
    /// 8-bit indexed: 4 bits alpha, 4 bits LUT index.
    Al44,
    /// 16-bit indexed: 8 bits alpha, 8 bits LUT index.
    Al88,
}

impl PixelFormat {
    /// Maps a raw color-conversion code to a format.
    ///
    /// Returns `None` for codes with no accelerated path; callers surface
    /// this as an `InvalidFormat` error.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Argb8888),
            1 => Some(Self::Rgb888),
            2 => Some(Self::Rgb565),
            3 => Some(Self::Argb1555),
            4 => Some(Self::Argb4444),
            5 => Some(Self::L8),
            6 => Some(Self::Al44),
            7 => Some(Self::Al88),
            _ => None,
        }
    }

    /// Returns the raw color-conversion code for this format.
    ///
    /// This is the inverse of [`from_code`](Self::from_code).
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Argb8888 => 0,
            Self::Rgb888 => 1,
            Self::Rgb565 => 2,
            Self::Argb1555 => 3,
            Self::Argb4444 => 4,
            Self::L8 => 5,
            Self::Al44 => 6,
            Self::Al88 => 7,
        }
    }

    /// Bytes occupied by one pixel in this format.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Argb8888 => 4,
            Self::Rgb888 => 3,
            Self::Rgb565 | Self::Argb1555 | Self::Argb4444 | Self::Al88 => 2,
            Self::L8 | Self::Al44 => 1,
        }
    }

    /// Whether pixels in this format are look-up-table indices rather than
    /// direct color values.
    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::L8 | Self::Al44 | Self::Al88)
    }
}
