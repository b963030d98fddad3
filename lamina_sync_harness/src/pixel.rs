// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Direct-color pixel conversion through an ARGB8888 intermediate.
//!
//! The software channel converts by widening the source pixel to
//! ARGB8888 and narrowing into the destination format. Widening
//! replicates the high bits of each component into the low bits so full
//! intensity maps to full intensity (five-bit 31 becomes eight-bit 255,
//! not 248).

use lamina_core::format::PixelFormat;

/// Widens a raw pixel in `format` to ARGB8888.
///
/// # Panics
///
/// Panics for indexed formats; their pixels are table indices and need a
/// LUT, not a format conversion.
#[must_use]
pub fn unpack_pixel(format: PixelFormat, raw: u32) -> u32 {
    match format {
        PixelFormat::Argb8888 => raw,
        PixelFormat::Rgb888 => 0xFF00_0000 | (raw & 0x00FF_FFFF),
        PixelFormat::Rgb565 => {
            let r = (raw >> 11) & 0x1F;
            let g = (raw >> 5) & 0x3F;
            let b = raw & 0x1F;
            0xFF00_0000
                | (((r << 3) | (r >> 2)) << 16)
                | (((g << 2) | (g >> 4)) << 8)
                | ((b << 3) | (b >> 2))
        }
        PixelFormat::Argb1555 => {
            let a = if raw & 0x8000 != 0 { 0xFF } else { 0x00 };
            let r = (raw >> 10) & 0x1F;
            let g = (raw >> 5) & 0x1F;
            let b = raw & 0x1F;
            (a << 24)
                | (((r << 3) | (r >> 2)) << 16)
                | (((g << 3) | (g >> 2)) << 8)
                | ((b << 3) | (b >> 2))
        }
        PixelFormat::Argb4444 => {
            let a = (raw >> 12) & 0xF;
            let r = (raw >> 8) & 0xF;
            let g = (raw >> 4) & 0xF;
            let b = raw & 0xF;
            (((a << 4) | a) << 24) | (((r << 4) | r) << 16) | (((g << 4) | g) << 8) | ((b << 4) | b)
        }
        PixelFormat::L8 | PixelFormat::Al44 | PixelFormat::Al88 => {
            panic!("indexed pixels resolve through a look-up table")
        }
    }
}

/// Narrows an ARGB8888 pixel to `format`, truncating low component bits.
///
/// # Panics
///
/// Panics for indexed formats; a direct color has no index.
#[must_use]
pub fn pack_pixel(format: PixelFormat, argb: u32) -> u32 {
    let a = (argb >> 24) & 0xFF;
    let r = (argb >> 16) & 0xFF;
    let g = (argb >> 8) & 0xFF;
    let b = argb & 0xFF;
    match format {
        PixelFormat::Argb8888 => argb,
        PixelFormat::Rgb888 => argb & 0x00FF_FFFF,
        PixelFormat::Rgb565 => ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3),
        PixelFormat::Argb1555 => ((a >> 7) << 15) | ((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3),
        PixelFormat::Argb4444 => ((a >> 4) << 12) | ((r >> 4) << 8) | ((g >> 4) << 4) | (b >> 4),
        PixelFormat::L8 | PixelFormat::Al44 | PixelFormat::Al88 => {
            panic!("indexed pixels resolve through a look-up table")
        }
    }
}
