// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transfer engine: request validation and completion polling.
//!
//! [`TransferChannel`] is what the hardware (or a software stand-in)
//! provides: start one rectangular transfer, report status. [`BlitEngine`]
//! owns a channel and adds everything the hardware does not do: rejecting
//! requests the accelerator cannot express, waiting for completion under a
//! spin budget instead of spinning forever, and turning fault bits into
//! errors.

use bitflags::bitflags;
use thiserror::Error;

use lamina_core::format::PixelFormat;
use lamina_core::geometry::Extent;

use crate::surface::SurfaceDesc;

bitflags! {
    /// Transfer channel status register bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChannelStatus: u32 {
        /// A transfer is in flight.
        const BUSY = 1 << 0;
        /// The last transfer aborted on a bus error.
        const TRANSFER_FAULT = 1 << 1;
        /// The last transfer was started with an invalid configuration.
        const CONFIG_FAULT = 1 << 2;
    }
}

/// One rectangular transfer, as handed to a [`TransferChannel`].
///
/// All requests are validated by [`BlitEngine`] before they reach the
/// channel; a channel may assume formats and strides are acceptable.
#[derive(Clone, Copy, Debug)]
pub enum BlitRequest<'a> {
    /// Copy `size` pixels from `src` to `dst`, converting between the
    /// surfaces' direct-color formats if they differ.
    Copy {
        /// Source rectangle.
        src: SurfaceDesc,
        /// Destination rectangle.
        dst: SurfaceDesc,
        /// Rectangle geometry.
        size: Extent,
    },
    /// Fill `size` pixels at `dst` with a constant color in the
    /// destination format.
    Fill {
        /// Destination rectangle.
        dst: SurfaceDesc,
        /// Rectangle geometry.
        size: Extent,
        /// Fill value, already in `dst.format`.
        color: u32,
    },
    /// Expand `size` indexed pixels from `src` through `lut` into the
    /// direct-color `dst`.
    ConvertIndexed {
        /// Source rectangle (indexed format).
        src: SurfaceDesc,
        /// Destination rectangle (direct-color format).
        dst: SurfaceDesc,
        /// Rectangle geometry.
        size: Extent,
        /// 256-entry look-up table, `0xAARRGGBB` per entry.
        lut: &'a [u32],
    },
}

/// Hardware seam for one transfer channel.
pub trait TransferChannel {
    /// Begins a transfer. The channel reports [`ChannelStatus::BUSY`] until
    /// it completes or faults.
    fn start(&mut self, request: &BlitRequest<'_>);

    /// Reads the channel's status register.
    fn status(&self) -> ChannelStatus;
}

/// Errors returned by [`BlitEngine`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlitError {
    /// The channel cannot transfer between these formats. For fills the
    /// destination format is reported twice.
    #[error("unsupported format pair: {0:?} to {1:?}")]
    UnsupportedFormat(PixelFormat, PixelFormat),
    /// A surface's row pitch is narrower than the requested rectangle.
    #[error("rectangle is wider than the surface stride")]
    InvalidStride,
    /// The channel stayed busy past the spin budget.
    #[error("transfer still busy after {spins} polls")]
    EngineTimeout {
        /// Number of status polls performed.
        spins: u32,
    },
    /// The channel raised a fault bit.
    #[error("transfer faulted: {0:?}")]
    TransferFault(ChannelStatus),
    /// The layer registry rejected the operation's target.
    #[error(transparent)]
    Registry(#[from] lamina_core::layer::RegistryError),
}

/// Checked transfer operations over one [`TransferChannel`].
///
/// The engine polls the channel to completion before returning, so at most
/// one transfer is ever in flight. `spin_budget` bounds the polling; a
/// healthy channel finishes any on-screen rectangle well within it, and a
/// wedged one surfaces as [`BlitError::EngineTimeout`] instead of hanging
/// the renderer.
#[derive(Debug)]
pub struct BlitEngine<C> {
    channel: C,
    spin_budget: u32,
}

impl<C: TransferChannel> BlitEngine<C> {
    /// Wraps a channel with the given polling budget.
    #[must_use]
    pub const fn new(channel: C, spin_budget: u32) -> Self {
        Self {
            channel,
            spin_budget,
        }
    }

    /// Copies a rectangle, converting between direct-color formats if the
    /// surfaces differ.
    ///
    /// A zero-area rectangle succeeds without touching the channel.
    /// Indexed-format surfaces are rejected unless source and destination
    /// formats match exactly (a raw index copy needs no LUT).
    pub fn copy(
        &mut self,
        src: SurfaceDesc,
        dst: SurfaceDesc,
        size: Extent,
    ) -> Result<(), BlitError> {
        if size.is_empty() {
            return Ok(());
        }
        if !src.fits(size) || !dst.fits(size) {
            return Err(BlitError::InvalidStride);
        }
        if (src.format.is_indexed() || dst.format.is_indexed()) && src.format != dst.format {
            return Err(BlitError::UnsupportedFormat(src.format, dst.format));
        }
        self.run(&BlitRequest::Copy { src, dst, size })
    }

    /// Fills a rectangle with a constant color in the destination format.
    ///
    /// A zero-area rectangle succeeds without touching the channel. Fills
    /// into indexed surfaces are rejected: the accelerator generates direct
    /// color, not indices.
    pub fn fill(&mut self, dst: SurfaceDesc, size: Extent, color: u32) -> Result<(), BlitError> {
        if size.is_empty() {
            return Ok(());
        }
        if !dst.fits(size) {
            return Err(BlitError::InvalidStride);
        }
        if dst.format.is_indexed() {
            return Err(BlitError::UnsupportedFormat(dst.format, dst.format));
        }
        self.run(&BlitRequest::Fill { dst, size, color })
    }

    /// Expands an indexed rectangle through a look-up table into a
    /// direct-color destination.
    ///
    /// A zero-area rectangle succeeds without touching the channel.
    ///
    /// # Panics
    ///
    /// Panics if `lut` holds fewer than 256 entries; the channel reads the
    /// table blindly by pixel value.
    pub fn convert_indexed(
        &mut self,
        src: SurfaceDesc,
        dst: SurfaceDesc,
        size: Extent,
        lut: &[u32],
    ) -> Result<(), BlitError> {
        assert!(lut.len() >= 256, "look-up table must hold 256 entries");
        if size.is_empty() {
            return Ok(());
        }
        if !src.fits(size) || !dst.fits(size) {
            return Err(BlitError::InvalidStride);
        }
        if src.format != PixelFormat::L8 || dst.format.is_indexed() {
            return Err(BlitError::UnsupportedFormat(src.format, dst.format));
        }
        self.run(&BlitRequest::ConvertIndexed {
            src,
            dst,
            size,
            lut,
        })
    }

    /// Borrows the underlying channel.
    #[must_use]
    pub const fn channel(&self) -> &C {
        &self.channel
    }

    /// Mutably borrows the underlying channel.
    pub const fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Unwraps the engine, returning the channel.
    #[must_use]
    pub fn into_channel(self) -> C {
        self.channel
    }

    fn run(&mut self, request: &BlitRequest<'_>) -> Result<(), BlitError> {
        self.channel.start(request);
        let mut spins = 0;
        loop {
            let status = self.channel.status();
            if status
                .intersects(ChannelStatus::TRANSFER_FAULT | ChannelStatus::CONFIG_FAULT)
            {
                return Err(BlitError::TransferFault(status));
            }
            if !status.contains(ChannelStatus::BUSY) {
                return Ok(());
            }
            spins += 1;
            if spins >= self.spin_budget {
                return Err(BlitError::EngineTimeout { spins });
            }
            core::hint::spin_loop();
        }
    }
}
