// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software display pipeline for exercising swap and transfer semantics.
//!
//! Everything the core and blit crates leave to hardware exists here in
//! software: [`SimMemory`] stands in for the frame-buffer RAM,
//! [`SoftBlitChannel`] executes transfer requests pixel by pixel, and
//! [`RecordingController`] logs every register write a real scanout
//! controller would receive. [`CommitTracker`] aggregates commit-loop
//! trace events into per-refresh history.
//!
//! The harness is what the integration scenarios at the bottom of this
//! crate run against; demos can reuse it to drive the pipeline without a
//! panel attached.

#![no_std]

extern crate alloc;

mod channel;
mod controller;
mod mem;
mod pixel;
mod tracker;

pub use channel::{FaultToggles, SoftBlitChannel};
pub use controller::{ControllerOp, RecordingController};
pub use mem::SimMemory;
pub use pixel::{pack_pixel, unpack_pixel};
pub use tracker::CommitTracker;

#[cfg(test)]
mod scenarios;
