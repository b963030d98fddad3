// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accelerated 2D transfer engine abstraction for scanout pipelines.
//!
//! A [`TransferChannel`](engine::TransferChannel) is the hardware seam: one
//! rectangular transfer at a time, started and polled. [`BlitEngine`]
//! wraps a channel with request validation, completion polling under a
//! spin budget, and fault reporting, turning a raw accelerator into
//! checked copy/fill/convert operations on [`SurfaceDesc`]s.
//!
//! [`layer_ops`] builds on the engine for whole-layer work against a
//! [`LayerRegistry`](lamina_core::layer::LayerRegistry): buffer-to-buffer
//! copies, rectangle fills and copies in the drawing buffer, and bitmap
//! uploads.
//!
//! The crate is `no_std` and allocation-free.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod engine;
pub mod layer_ops;
pub mod surface;

pub use engine::{BlitEngine, BlitError, BlitRequest, ChannelStatus, TransferChannel};
pub use surface::SurfaceDesc;
