// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The refresh-event commit loop.
//!
//! [`SwapSynchronizer::on_refresh`] is the event half of the swap protocol.
//! It runs once per hardware refresh event (vertical blanking, line match),
//! sweeps every layer for an armed swap, points the controller's scanout at
//! the committed buffer, and queues a [`Confirmation`] so the renderer
//! learns its previous buffer is free. Commits happen at most once per
//! request; a refresh event with nothing armed only re-arms the event.
//!
//! Confirmations cross back to the renderer through [`ConfirmQueue`], a
//! fixed-capacity single-producer single-consumer ring. The event context
//! pushes, the renderer pops; neither side blocks or allocates.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::controller::DisplayController;
use crate::layer::LayerRegistry;
use crate::trace::{RefreshTickEvent, SwapCommitEvent, Tracer};

/// Notice to the renderer that a swap was committed.
///
/// After receiving this, the buffer the layer previously scanned out is
/// safe to draw into again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    /// Layer the swap applied to.
    pub layer: u32,
    /// Buffer now scanned out.
    pub buffer: u32,
}

/// Fixed-capacity single-producer single-consumer confirmation ring.
///
/// The refresh-event context pushes, the renderer pops. Entries are packed
/// into one `u32` each (`layer` in the high half, `buffer` in the low) so
/// the queue works on targets without 64-bit atomics.
///
/// Capacity `N` should cover the worst-case number of commits the renderer
/// can leave undrained; a full queue drops the newest confirmation and
/// [`push`](Self::push) reports it.
#[derive(Debug)]
pub struct ConfirmQueue<const N: usize> {
    slots: [AtomicU32; N],
    head: AtomicU32,
    tail: AtomicU32,
}

impl<const N: usize> ConfirmQueue<N> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU32::new(0) }; N],
            head: AtomicU32::new(0),
            tail: AtomicU32::new(0),
        }
    }

    /// Number of confirmations currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail) as usize
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a confirmation. Returns `false` if the queue was full and
    /// the entry was dropped.
    ///
    /// Event-context side; must only be called from one context at a time.
    pub fn push(&self, confirmation: Confirmation) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head.wrapping_sub(tail) as usize >= N {
            return false;
        }
        debug_assert!(confirmation.layer <= u16::MAX as u32, "layer fits 16 bits");
        debug_assert!(
            confirmation.buffer <= u16::MAX as u32,
            "buffer index fits 16 bits"
        );
        let packed = (confirmation.layer << 16) | confirmation.buffer;
        self.slots[head as usize % N].store(packed, Ordering::Relaxed);
        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Removes and returns the oldest confirmation, if any.
    ///
    /// Renderer side; must only be called from one context at a time.
    pub fn pop(&self) -> Option<Confirmation> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail == head {
            return None;
        }
        let packed = self.slots[tail as usize % N].load(Ordering::Relaxed);
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(Confirmation {
            layer: packed >> 16,
            buffer: packed & 0xFFFF,
        })
    }
}

impl<const N: usize> Default for ConfirmQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Commits armed swaps once per refresh event.
#[derive(Debug, Default)]
pub struct SwapSynchronizer {
    refresh_events: u64,
    commits: u64,
    dropped_confirmations: u64,
}

impl SwapSynchronizer {
    /// Creates a synchronizer with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            refresh_events: 0,
            commits: 0,
            dropped_confirmations: 0,
        }
    }

    /// Handles one refresh event.
    ///
    /// For every layer with an armed swap: program the controller's scan
    /// address to the committed buffer, latch it via shadow reload, record
    /// the buffer as active, and queue a [`Confirmation`]. Always re-arms
    /// the refresh event, committed or not. A full queue loses the
    /// confirmation but not the commit; the loss is counted in
    /// [`dropped_confirmations`](Self::dropped_confirmations).
    pub fn on_refresh<C: DisplayController, const N: usize>(
        &mut self,
        registry: &LayerRegistry,
        controller: &mut C,
        confirmations: &ConfirmQueue<N>,
    ) {
        self.on_refresh_traced(registry, controller, confirmations, &mut Tracer::off());
    }

    /// [`on_refresh`](Self::on_refresh) with commit-loop tracing attached.
    pub fn on_refresh_traced<C: DisplayController, const N: usize>(
        &mut self,
        registry: &LayerRegistry,
        controller: &mut C,
        confirmations: &ConfirmQueue<N>,
        tracer: &mut Tracer<'_>,
    ) {
        for layer in 0..registry.layer_count() {
            let Some(buffer) = registry.take_pending_swap(layer) else {
                continue;
            };
            // request_swap validated the buffer, but a reconfigure racing
            // a stale request could still invalidate it; drop such swaps.
            let Ok(address) = registry.buffer_address(layer, buffer) else {
                continue;
            };
            controller.set_scan_address(layer, address);
            controller.reload_shadow();
            registry.commit_visible(layer, buffer);
            let delivered = confirmations.push(Confirmation {
                layer: layer as u32,
                buffer,
            });
            if !delivered {
                self.dropped_confirmations += 1;
            }
            self.commits += 1;
            tracer.swap_committed(SwapCommitEvent {
                layer: layer as u32,
                buffer,
                address,
                refresh_index: self.refresh_events,
            });
        }
        controller.arm_refresh_event();
        tracer.refresh_tick(RefreshTickEvent {
            refresh_index: self.refresh_events,
            commits: self.commits,
        });
        self.refresh_events += 1;
    }

    /// Total refresh events handled.
    #[must_use]
    pub const fn refresh_events(&self) -> u64 {
        self.refresh_events
    }

    /// Total swaps committed.
    #[must_use]
    pub const fn commits(&self) -> u64 {
        self.commits
    }

    /// Confirmations lost to a full queue.
    ///
    /// The commit itself still happens; only the notice to the renderer is
    /// dropped. A nonzero count means the queue is undersized or the
    /// renderer stopped draining it.
    #[must_use]
    pub const fn dropped_confirmations(&self) -> u64 {
        self.dropped_confirmations
    }
}
