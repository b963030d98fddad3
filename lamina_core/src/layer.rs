// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer registry: per-plane geometry, buffer pool, and swap state.
//!
//! [`LayerRegistry`] owns one slot per display layer. Slot count is fixed at
//! construction; slots become usable once [`configure`](LayerRegistry::configure)
//! runs. Configuration-time fields (format, base address, buffer count) are
//! immutable afterwards; geometry and the window position stay mutable via
//! the narrow mutators.
//!
//! # Sharing model
//!
//! The registry is written by the main (renderer) context and read by the
//! refresh-event context. The only fields both contexts touch are each
//! slot's pending-swap and active-buffer indices, which are atomics:
//!
//! - [`request_swap`](LayerRegistry::request_swap) (main context) stores the
//!   pending index; a second request before the commit overwrites the first
//!   (last-writer-wins).
//! - [`take_pending_swap`](LayerRegistry::take_pending_swap) (event context)
//!   atomically exchanges the pending slot with [`INVALID`], so a request
//!   racing the refresh handler is either committed now or left armed for
//!   the next event, never torn.
//!
//! All other mutators take `&mut self` and belong to the main context.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

use crate::format::PixelFormat;
use crate::geometry::{Extent, Origin};

/// Sentinel value indicating "no pending swap" in atomic index fields.
pub const INVALID: u32 = u32::MAX;

/// Configuration for one layer, as supplied by the renderer.
///
/// `format_code` is the raw color-conversion code; it is resolved through
/// [`PixelFormat::from_code`] during [`LayerRegistry::configure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerConfig {
    /// Visible geometry in pixels.
    pub size: Extent,
    /// Raw color-conversion code.
    pub format_code: u16,
    /// Bus address of the start of the layer's buffer pool.
    pub base_address: u32,
    /// Number of rotating buffers (1 = single-buffered).
    pub buffer_count: u32,
}

/// Read-only snapshot of one layer's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerView {
    /// The layer's index in the registry.
    pub index: usize,
    /// Current visible geometry.
    pub size: Extent,
    /// Hardware window position.
    pub position: Origin,
    /// Resolved pixel format.
    pub format: PixelFormat,
    /// Bytes per pixel, derived from the format.
    pub bytes_per_pixel: u32,
    /// Start of the buffer pool.
    pub base_address: u32,
    /// Number of rotating buffers.
    pub buffer_count: u32,
    /// Buffer currently drawn into / most recently committed visible.
    pub active_buffer: u32,
    /// Buffer awaiting commit at the next refresh event, if any.
    pub pending_swap: Option<u32>,
    /// Whether the hardware layer output is enabled.
    pub enabled: bool,
}

/// Errors returned by [`LayerRegistry`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The layer index is outside the range fixed at construction.
    #[error("layer {0} is outside the configured range")]
    InvalidLayer(usize),
    /// The layer exists but has not been configured yet.
    #[error("layer {0} has not been configured")]
    NotConfigured(usize),
    /// The layer is configured and in use; reconfiguration needs it
    /// disabled with no pending swap.
    #[error("layer {0} is already configured and in use")]
    AlreadyConfigured(usize),
    /// The color-conversion code maps to no accelerated format.
    #[error("color-conversion code {0} has no accelerated format")]
    InvalidFormat(u16),
    /// The buffer index is outside the layer's pool.
    #[error("buffer {requested} is outside the pool of {count} buffers")]
    InvalidBuffer {
        /// The out-of-range index.
        requested: u32,
        /// The layer's buffer count.
        count: u32,
    },
    /// A layer cannot be configured with an empty buffer pool.
    #[error("buffer count must be at least 1")]
    ZeroBufferCount,
    /// The buffer pool would run past the end of the 32-bit address space.
    #[error("layer {0}: buffer pool does not fit the 32-bit address space")]
    PoolOverflow(usize),
}

/// Whether a pool of `buffer_count` buffers of `size` pixels at
/// `bytes_per_pixel` fits between `base_address` and the top of the
/// address space. Keeps all registry address arithmetic within `u32`.
pub(crate) fn pool_fits(
    base_address: u32,
    size: Extent,
    bytes_per_pixel: u32,
    buffer_count: u32,
) -> bool {
    u64::from(size.width)
        .checked_mul(u64::from(size.height))
        .and_then(|n| n.checked_mul(u64::from(bytes_per_pixel)))
        .and_then(|n| n.checked_mul(u64::from(buffer_count)))
        .and_then(|n| n.checked_add(u64::from(base_address)))
        .is_some_and(|end| end <= u64::from(u32::MAX))
}

#[derive(Debug)]
struct SlotConfig {
    format: PixelFormat,
    bytes_per_pixel: u32,
    base_address: u32,
    buffer_count: u32,
}

#[derive(Debug)]
struct Slot {
    config: Option<SlotConfig>,
    size: Extent,
    position: Origin,
    enabled: bool,
    active: AtomicU32,
    pending: AtomicU32,
}

impl Slot {
    fn empty() -> Self {
        Self {
            config: None,
            size: Extent::default(),
            position: Origin::ZERO,
            enabled: false,
            active: AtomicU32::new(0),
            pending: AtomicU32::new(INVALID),
        }
    }
}

/// Fixed-size storage for all display layers.
///
/// Created once during display bring-up and torn down at shutdown. No other
/// component writes layer state directly; mutation goes through the methods
/// here (usually via the [command dispatcher](crate::command)).
#[derive(Debug)]
pub struct LayerRegistry {
    slots: Vec<Slot>,
}

impl LayerRegistry {
    /// Creates a registry with `layer_count` unconfigured slots.
    #[must_use]
    pub fn new(layer_count: usize) -> Self {
        let mut slots = Vec::with_capacity(layer_count);
        for _ in 0..layer_count {
            slots.push(Slot::empty());
        }
        Self { slots }
    }

    /// Returns the number of layer slots.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.slots.len()
    }

    /// Configures a layer slot.
    ///
    /// Fails with [`RegistryError::InvalidLayer`] for an out-of-range index,
    /// [`RegistryError::InvalidFormat`] for an unmapped color-conversion
    /// code, [`RegistryError::PoolOverflow`] when the buffer pool would run
    /// past the 32-bit address space, and
    /// [`RegistryError::AlreadyConfigured`] when the slot is configured and
    /// either enabled or has a swap pending. A disabled, idle layer may be
    /// reconfigured.
    ///
    /// On success the layer starts disabled, with buffer 0 active and no
    /// pending swap.
    pub fn configure(&mut self, index: usize, config: LayerConfig) -> Result<(), RegistryError> {
        if index >= self.slots.len() {
            return Err(RegistryError::InvalidLayer(index));
        }
        if config.buffer_count == 0 {
            return Err(RegistryError::ZeroBufferCount);
        }
        let format = PixelFormat::from_code(config.format_code)
            .ok_or(RegistryError::InvalidFormat(config.format_code))?;
        if !pool_fits(
            config.base_address,
            config.size,
            format.bytes_per_pixel(),
            config.buffer_count,
        ) {
            return Err(RegistryError::PoolOverflow(index));
        }

        let slot = &mut self.slots[index];
        if slot.config.is_some()
            && (slot.enabled || slot.pending.load(Ordering::Relaxed) != INVALID)
        {
            return Err(RegistryError::AlreadyConfigured(index));
        }

        slot.config = Some(SlotConfig {
            format,
            bytes_per_pixel: format.bytes_per_pixel(),
            base_address: config.base_address,
            buffer_count: config.buffer_count,
        });
        slot.size = config.size;
        slot.position = Origin::ZERO;
        slot.enabled = false;
        slot.active.store(0, Ordering::Relaxed);
        slot.pending.store(INVALID, Ordering::Relaxed);
        Ok(())
    }

    /// Returns a read-only snapshot of a configured layer.
    pub fn view(&self, index: usize) -> Result<LayerView, RegistryError> {
        let (slot, config) = self.configured(index)?;
        let pending = slot.pending.load(Ordering::Acquire);
        Ok(LayerView {
            index,
            size: slot.size,
            position: slot.position,
            format: config.format,
            bytes_per_pixel: config.bytes_per_pixel,
            base_address: config.base_address,
            buffer_count: config.buffer_count,
            active_buffer: slot.active.load(Ordering::Acquire),
            pending_swap: if pending == INVALID { None } else { Some(pending) },
            enabled: slot.enabled,
        })
    }

    /// Updates a layer's visible geometry.
    ///
    /// Fails with [`RegistryError::PoolOverflow`] when the resized buffer
    /// pool would run past the 32-bit address space.
    pub fn set_geometry(&mut self, index: usize, size: Extent) -> Result<(), RegistryError> {
        let (_, config) = self.configured(index)?;
        if !pool_fits(
            config.base_address,
            size,
            config.bytes_per_pixel,
            config.buffer_count,
        ) {
            return Err(RegistryError::PoolOverflow(index));
        }
        self.slots[index].size = size;
        Ok(())
    }

    /// Updates a layer's hardware window position.
    pub fn set_position(&mut self, index: usize, position: Origin) -> Result<(), RegistryError> {
        self.configured(index)?;
        self.slots[index].position = position;
        Ok(())
    }

    /// Records whether the hardware layer output is enabled.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), RegistryError> {
        self.configured(index)?;
        self.slots[index].enabled = enabled;
        Ok(())
    }

    /// Sets the buffer the renderer is drawing into.
    ///
    /// Main-context counterpart of the commit the refresh handler performs;
    /// used after whole-buffer copies that change the drawing target.
    pub fn set_active_buffer(&mut self, index: usize, buffer: u32) -> Result<(), RegistryError> {
        let (slot, config) = self.configured(index)?;
        if buffer >= config.buffer_count {
            return Err(RegistryError::InvalidBuffer {
                requested: buffer,
                count: config.buffer_count,
            });
        }
        slot.active.store(buffer, Ordering::Release);
        Ok(())
    }

    /// Arms a swap to `buffer` for the next refresh event.
    ///
    /// Returns `Ok(true)` when the swap was armed, `Ok(false)` when the
    /// request named the currently active buffer and was coalesced into a
    /// no-op (nothing is armed, no confirmation will fire). A request that
    /// lands before a previous one commits overwrites it: the newest
    /// request always determines the visible buffer, so a coalesced
    /// request also disarms any swap a previous request left pending.
    pub fn request_swap(&self, index: usize, buffer: u32) -> Result<bool, RegistryError> {
        let (slot, config) = self.configured(index)?;
        if buffer >= config.buffer_count {
            return Err(RegistryError::InvalidBuffer {
                requested: buffer,
                count: config.buffer_count,
            });
        }
        if buffer == slot.active.load(Ordering::Acquire) {
            slot.pending.store(INVALID, Ordering::Release);
            return Ok(false);
        }
        slot.pending.store(buffer, Ordering::Release);
        Ok(true)
    }

    /// Atomically takes the pending swap for a layer, leaving it idle.
    ///
    /// Called from the refresh-event context. Returns `None` for idle or
    /// unconfigured slots; out-of-range indices also yield `None` so the
    /// handler can sweep `0..layer_count()` unconditionally.
    #[must_use]
    pub fn take_pending_swap(&self, index: usize) -> Option<u32> {
        let slot = self.slots.get(index)?;
        match slot.pending.swap(INVALID, Ordering::AcqRel) {
            INVALID => None,
            buffer => Some(buffer),
        }
    }

    /// Records `buffer` as the committed visible buffer.
    ///
    /// Event-context counterpart of [`set_active_buffer`]; only the swap
    /// synchronizer calls this.
    ///
    /// [`set_active_buffer`]: Self::set_active_buffer
    pub(crate) fn commit_visible(&self, index: usize, buffer: u32) {
        if let Some(slot) = self.slots.get(index) {
            slot.active.store(buffer, Ordering::Release);
        }
    }

    /// Size in bytes of one of the layer's buffers.
    pub fn buffer_size_bytes(&self, index: usize) -> Result<u32, RegistryError> {
        let (slot, config) = self.configured(index)?;
        Ok(slot.size.area() * config.bytes_per_pixel)
    }

    /// Bus address of the start of one of the layer's buffers.
    pub fn buffer_address(&self, index: usize, buffer: u32) -> Result<u32, RegistryError> {
        let (_, config) = self.configured(index)?;
        if buffer >= config.buffer_count {
            return Err(RegistryError::InvalidBuffer {
                requested: buffer,
                count: config.buffer_count,
            });
        }
        Ok(config.base_address + buffer * self.buffer_size_bytes(index)?)
    }

    /// Bus address of scan line `y` of the layer's buffer pool.
    ///
    /// Used for origin scrolling on single-buffered layers: the controller's
    /// scan address moves within one oversized buffer instead of swapping.
    pub fn origin_address(&self, index: usize, y: u32) -> Result<u32, RegistryError> {
        let (slot, config) = self.configured(index)?;
        Ok(config.base_address + y * slot.size.width * config.bytes_per_pixel)
    }

    fn configured(&self, index: usize) -> Result<(&Slot, &SlotConfig), RegistryError> {
        let slot = self
            .slots
            .get(index)
            .ok_or(RegistryError::InvalidLayer(index))?;
        let config = slot
            .config
            .as_ref()
            .ok_or(RegistryError::NotConfigured(index))?;
        Ok((slot, config))
    }
}
