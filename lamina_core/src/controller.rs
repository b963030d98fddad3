// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hardware seam.
//!
//! [`DisplayController`] is everything the commit loop and the command
//! dispatcher need from a scanout controller. Panel bring-up code implements
//! it once per board; the sync harness implements it with a recording stub.
//!
//! Methods are infallible by design: register writes on the targets this
//! runs against cannot fail, and the refresh-event context has no one to
//! report to. Implementations that can fail (a remote bridge, say) must
//! handle that below this seam.

use crate::geometry::{Extent, Origin};
use crate::layer::LayerView;

/// Operations the commit loop issues to the scanout hardware.
///
/// Per-layer shadow-registered state (scan address, window, alpha, keying)
/// takes effect only after [`reload_shadow`](Self::reload_shadow).
pub trait DisplayController {
    /// Applies a freshly configured layer: format, geometry, initial
    /// scan address.
    fn apply_layer_config(&mut self, layer: usize, view: &LayerView);

    /// Points the layer's scanout at `address`.
    fn set_scan_address(&mut self, layer: usize, address: u32);

    /// Moves and resizes the layer's hardware window.
    fn set_window(&mut self, layer: usize, position: Origin, size: Extent);

    /// Sets the layer's constant alpha (0 transparent, 255 opaque).
    fn set_alpha(&mut self, layer: usize, alpha: u8);

    /// Enables or disables color keying on the layer.
    fn set_color_keying(&mut self, layer: usize, enabled: bool);

    /// Sets the color key, as `0x00BBGGRR`.
    fn set_color_key(&mut self, layer: usize, key: u32);

    /// Writes one look-up-table entry for an indexed-format layer.
    fn set_lut_entry(&mut self, layer: usize, index: u8, color: u32);

    /// Turns the layer's output on or off.
    fn set_layer_enabled(&mut self, layer: usize, enabled: bool);

    /// Latches all pending shadow-register writes at the next vertical
    /// blanking interval.
    fn reload_shadow(&mut self);

    /// Arms the next refresh event. The commit loop re-arms after every
    /// event; a controller whose event is free-running may make this a
    /// no-op.
    fn arm_refresh_event(&mut self);
}
