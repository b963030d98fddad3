// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Commit-loop instrumentation.
//!
//! With the `trace` feature disabled (the default) every [`Tracer`] method
//! body compiles away and the loop pays nothing. With it enabled, a
//! [`TraceSink`] sees one event per refresh tick and one per committed
//! swap. Sinks run in the refresh-event context and must not block.

/// One refresh event observed by the commit loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTickEvent {
    /// Ordinal of this refresh event, counted from synchronizer creation.
    pub refresh_index: u64,
    /// Total swaps committed so far, including this tick's.
    pub commits: u64,
}

/// One buffer swap committed to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapCommitEvent {
    /// Layer the swap applied to.
    pub layer: u32,
    /// Buffer now scanned out.
    pub buffer: u32,
    /// Scan address programmed into the controller.
    pub address: u32,
    /// Refresh event the commit happened on.
    pub refresh_index: u64,
}

/// Receiver for commit-loop events.
///
/// All methods default to no-ops so sinks implement only what they need.
pub trait TraceSink {
    /// Called once per refresh event, after all commits for that event.
    fn refresh_tick(&mut self, event: RefreshTickEvent) {
        let _ = event;
    }

    /// Called for each swap committed to the controller.
    fn swap_committed(&mut self, event: SwapCommitEvent) {
        let _ = event;
    }
}

/// A possibly-absent trace sink.
///
/// The commit loop takes a `Tracer` rather than an `Option<&mut dyn
/// TraceSink>` so call sites stay tidy and the disabled-feature build
/// erases the calls entirely.
pub struct Tracer<'a> {
    sink: Option<&'a mut dyn TraceSink>,
}

impl<'a> Tracer<'a> {
    /// Wraps a sink.
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// A tracer that discards everything.
    #[must_use]
    pub const fn off() -> Self {
        Self { sink: None }
    }

    /// Reports a refresh tick.
    pub fn refresh_tick(&mut self, event: RefreshTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_mut() {
            sink.refresh_tick(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }

    /// Reports a committed swap.
    pub fn swap_committed(&mut self, event: SwapCommitEvent) {
        #[cfg(feature = "trace")]
        if let Some(sink) = self.sink.as_mut() {
            sink.swap_committed(event);
        }
        #[cfg(not(feature = "trace"))]
        let _ = event;
    }
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("attached", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}
