// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer registry and refresh-synchronized buffer swapping for scanout
//! pipelines.
//!
//! `lamina_core` coordinates two contexts that share a set of display
//! layers: a software renderer drawing into off-screen buffers, and a
//! periodic hardware refresh event that decides which buffer each layer
//! scans out. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! The crate is organized around a per-refresh commit loop:
//!
//! ```text
//!   Renderer ──► dispatch(Command) ──► LayerRegistry (pending swap armed)
//!                                           │
//!                 refresh event             ▼
//!   SwapSynchronizer::on_refresh() ──► DisplayController (scan address,
//!                                           │              shadow reload)
//!                                           ▼
//!   ConfirmQueue ──► Renderer (buffer safe to reuse)
//! ```
//!
//! **[`layer`]** — The layer registry: per-plane geometry, pixel format,
//! buffer pool, and the atomic pending-swap slot that is the only state
//! shared between the two contexts.
//!
//! **[`sync`]** — The refresh-event handler. Commits armed swaps to the
//! display controller, exactly once per request, and queues confirmations
//! for the renderer instead of calling back from the event context.
//!
//! **[`command`]** — The closed command set the renderer drives the
//! pipeline with, validated and routed to registry and controller.
//!
//! **[`controller`]** — The [`DisplayController`](controller::DisplayController)
//! trait that panel bring-up code implements; everything the core needs
//! from the hardware, nothing it does not.
//!
//! **[`config`]** — Startup validation of a declarative display setup
//! into typed layer configurations.
//!
//! **[`format`]** / **[`geometry`]** — Pixel formats with an accelerated
//! transfer path, and small pixel-space value types.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types
//! for commit-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod command;
pub mod config;
pub mod controller;
pub mod format;
pub mod geometry;
pub mod layer;
pub mod sync;
pub mod trace;
