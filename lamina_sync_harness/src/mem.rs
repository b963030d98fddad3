// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated frame-buffer memory.

use alloc::vec;
use alloc::vec::Vec;

/// A block of bus-addressable memory backed by the heap.
///
/// Addresses are the bus addresses the registry hands out, so surface
/// descriptors flow through unchanged. Storage is word-backed to keep the
/// byte views alignment-safe; pixel accessors assemble little-endian
/// values of one to four bytes.
#[derive(Debug)]
pub struct SimMemory {
    base: u32,
    words: Vec<u32>,
}

impl SimMemory {
    /// Allocates `len` bytes of zeroed memory starting at bus address
    /// `base`. `len` is rounded up to a whole word.
    #[must_use]
    pub fn new(base: u32, len: usize) -> Self {
        Self {
            base,
            words: vec![0; len.div_ceil(4)],
        }
    }

    /// First bus address covered.
    #[must_use]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Number of bytes covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len() * 4
    }

    /// Whether the block covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether `[address, address + len)` lies within the block.
    #[must_use]
    pub fn contains(&self, address: u32, len: u32) -> bool {
        address >= self.base
            && (address - self.base) as usize + len as usize <= self.len()
    }

    /// The whole block as bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    fn offset(&self, address: u32, len: u32) -> usize {
        assert!(
            self.contains(address, len),
            "access outside simulated memory"
        );
        (address - self.base) as usize
    }

    /// Reads a pixel of `bytes_per_pixel` bytes at a bus address.
    ///
    /// # Panics
    ///
    /// Panics if the access falls outside the block or
    /// `bytes_per_pixel` is not in `1..=4`.
    #[must_use]
    pub fn read_pixel(&self, address: u32, bytes_per_pixel: u32) -> u32 {
        assert!(
            (1..=4).contains(&bytes_per_pixel),
            "pixels are one to four bytes"
        );
        let offset = self.offset(address, bytes_per_pixel);
        let bytes = self.bytes();
        let mut value = 0u32;
        for i in (0..bytes_per_pixel as usize).rev() {
            value = (value << 8) | u32::from(bytes[offset + i]);
        }
        value
    }

    /// Writes a pixel of `bytes_per_pixel` bytes at a bus address.
    ///
    /// # Panics
    ///
    /// Panics if the access falls outside the block or
    /// `bytes_per_pixel` is not in `1..=4`.
    pub fn write_pixel(&mut self, address: u32, bytes_per_pixel: u32, value: u32) {
        assert!(
            (1..=4).contains(&bytes_per_pixel),
            "pixels are one to four bytes"
        );
        let offset = self.offset(address, bytes_per_pixel);
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut self.words);
        for i in 0..bytes_per_pixel as usize {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "shift keeps one byte"
            )]
            let byte = (value >> (8 * i)) as u8;
            bytes[offset + i] = byte;
        }
    }
}
