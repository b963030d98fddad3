// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A transfer channel that moves real bytes.

use alloc::vec::Vec;

use lamina_blit::engine::{BlitRequest, ChannelStatus, TransferChannel};
use lamina_blit::surface::SurfaceDesc;
use lamina_core::geometry::Extent;

use crate::mem::SimMemory;
use crate::pixel::{pack_pixel, unpack_pixel};

/// Runtime fault toggles for stress tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaultToggles {
    /// The channel reports busy forever instead of executing.
    pub hold_busy: bool,
    /// The channel raises a transfer fault instead of executing.
    pub raise_transfer_fault: bool,
}

/// Software stand-in for a 2D transfer accelerator.
///
/// Requests execute synchronously inside [`start`](TransferChannel::start)
/// against the owned [`SimMemory`]; the status register then reads idle,
/// so an engine polling afterwards completes on the first poll. The
/// toggles wedge the channel for timeout and fault-path tests.
#[derive(Debug)]
pub struct SoftBlitChannel {
    memory: SimMemory,
    status: ChannelStatus,
    /// Fault injection, checked before each request executes.
    pub toggles: FaultToggles,
}

impl SoftBlitChannel {
    /// Creates a channel over a block of simulated memory.
    #[must_use]
    pub fn new(memory: SimMemory) -> Self {
        Self {
            memory,
            status: ChannelStatus::empty(),
            toggles: FaultToggles::default(),
        }
    }

    /// Borrows the backing memory.
    #[must_use]
    pub const fn memory(&self) -> &SimMemory {
        &self.memory
    }

    /// Mutably borrows the backing memory.
    pub const fn memory_mut(&mut self) -> &mut SimMemory {
        &mut self.memory
    }

    fn pixel_address(surface: &SurfaceDesc, x: u32, y: u32) -> u32 {
        let bpp = surface.format.bytes_per_pixel();
        surface.address + (y * surface.stride_px + x) * bpp
    }

    fn copy(&mut self, src: SurfaceDesc, dst: SurfaceDesc, size: Extent) {
        let src_bpp = src.format.bytes_per_pixel();
        let dst_bpp = dst.format.bytes_per_pixel();
        // Buffer the source first so overlapping rectangles read
        // pre-transfer contents.
        let mut staged = Vec::with_capacity(size.area() as usize);
        for y in 0..size.height {
            for x in 0..size.width {
                staged.push(
                    self.memory
                        .read_pixel(Self::pixel_address(&src, x, y), src_bpp),
                );
            }
        }
        for y in 0..size.height {
            for x in 0..size.width {
                let raw = staged[(y * size.width + x) as usize];
                let out = if src.format == dst.format {
                    raw
                } else {
                    pack_pixel(dst.format, unpack_pixel(src.format, raw))
                };
                self.memory
                    .write_pixel(Self::pixel_address(&dst, x, y), dst_bpp, out);
            }
        }
    }

    fn fill(&mut self, dst: SurfaceDesc, size: Extent, color: u32) {
        let bpp = dst.format.bytes_per_pixel();
        for y in 0..size.height {
            for x in 0..size.width {
                self.memory
                    .write_pixel(Self::pixel_address(&dst, x, y), bpp, color);
            }
        }
    }

    fn convert_indexed(&mut self, src: SurfaceDesc, dst: SurfaceDesc, size: Extent, lut: &[u32]) {
        let dst_bpp = dst.format.bytes_per_pixel();
        for y in 0..size.height {
            for x in 0..size.width {
                let index = self.memory.read_pixel(Self::pixel_address(&src, x, y), 1);
                let argb = lut[index as usize];
                self.memory.write_pixel(
                    Self::pixel_address(&dst, x, y),
                    dst_bpp,
                    pack_pixel(dst.format, argb),
                );
            }
        }
    }
}

impl TransferChannel for SoftBlitChannel {
    fn start(&mut self, request: &BlitRequest<'_>) {
        if self.toggles.raise_transfer_fault {
            self.status = ChannelStatus::TRANSFER_FAULT;
            return;
        }
        if self.toggles.hold_busy {
            self.status = ChannelStatus::BUSY;
            return;
        }
        match *request {
            BlitRequest::Copy { src, dst, size } => self.copy(src, dst, size),
            BlitRequest::Fill { dst, size, color } => self.fill(dst, size, color),
            BlitRequest::ConvertIndexed {
                src,
                dst,
                size,
                lut,
            } => self.convert_indexed(src, dst, size, lut),
        }
        self.status = ChannelStatus::empty();
    }

    fn status(&self) -> ChannelStatus {
        self.status
    }
}
