// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A display controller that logs instead of writing registers.

use alloc::vec::Vec;

use lamina_core::controller::DisplayController;
use lamina_core::geometry::{Extent, Origin};
use lamina_core::layer::LayerView;

/// One logged controller call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerOp {
    /// A layer configuration was applied.
    ApplyLayerConfig {
        /// Target layer.
        layer: usize,
    },
    /// A scan address was programmed.
    SetScanAddress {
        /// Target layer.
        layer: usize,
        /// Programmed address.
        address: u32,
    },
    /// A window was moved or resized.
    SetWindow {
        /// Target layer.
        layer: usize,
        /// Window corner.
        position: Origin,
        /// Window geometry.
        size: Extent,
    },
    /// Constant alpha was set.
    SetAlpha {
        /// Target layer.
        layer: usize,
        /// Alpha value.
        alpha: u8,
    },
    /// Color keying was toggled.
    SetColorKeying {
        /// Target layer.
        layer: usize,
        /// New state.
        enabled: bool,
    },
    /// The color key was set.
    SetColorKey {
        /// Target layer.
        layer: usize,
        /// Key as `0x00BBGGRR`.
        key: u32,
    },
    /// A look-up-table entry was written.
    SetLutEntry {
        /// Target layer.
        layer: usize,
        /// LUT index.
        index: u8,
        /// Entry value.
        color: u32,
    },
    /// Layer output was toggled.
    SetLayerEnabled {
        /// Target layer.
        layer: usize,
        /// New state.
        enabled: bool,
    },
    /// Shadow registers were latched.
    ReloadShadow,
    /// The refresh event was re-armed.
    ArmRefreshEvent,
}

/// Records every controller call in order.
///
/// State queries derive from the log, so the log is the single source of
/// truth a scenario asserts against.
#[derive(Debug, Default)]
pub struct RecordingController {
    ops: Vec<ControllerOp>,
}

impl RecordingController {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// The full call log, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[ControllerOp] {
        &self.ops
    }

    /// The most recently programmed scan address for a layer.
    #[must_use]
    pub fn scan_address(&self, layer: usize) -> Option<u32> {
        self.ops.iter().rev().find_map(|op| match *op {
            ControllerOp::SetScanAddress { layer: l, address } if l == layer => Some(address),
            _ => None,
        })
    }

    /// Number of shadow reloads issued.
    #[must_use]
    pub fn reloads(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, ControllerOp::ReloadShadow))
            .count()
    }

    /// Number of refresh-event re-arms issued.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, ControllerOp::ArmRefreshEvent))
            .count()
    }

    /// The most recent enable state for a layer.
    #[must_use]
    pub fn layer_enabled(&self, layer: usize) -> Option<bool> {
        self.ops.iter().rev().find_map(|op| match *op {
            ControllerOp::SetLayerEnabled { layer: l, enabled } if l == layer => Some(enabled),
            _ => None,
        })
    }
}

impl DisplayController for RecordingController {
    fn apply_layer_config(&mut self, layer: usize, _view: &LayerView) {
        self.ops.push(ControllerOp::ApplyLayerConfig { layer });
    }

    fn set_scan_address(&mut self, layer: usize, address: u32) {
        self.ops.push(ControllerOp::SetScanAddress { layer, address });
    }

    fn set_window(&mut self, layer: usize, position: Origin, size: Extent) {
        self.ops.push(ControllerOp::SetWindow {
            layer,
            position,
            size,
        });
    }

    fn set_alpha(&mut self, layer: usize, alpha: u8) {
        self.ops.push(ControllerOp::SetAlpha { layer, alpha });
    }

    fn set_color_keying(&mut self, layer: usize, enabled: bool) {
        self.ops.push(ControllerOp::SetColorKeying { layer, enabled });
    }

    fn set_color_key(&mut self, layer: usize, key: u32) {
        self.ops.push(ControllerOp::SetColorKey { layer, key });
    }

    fn set_lut_entry(&mut self, layer: usize, index: u8, color: u32) {
        self.ops.push(ControllerOp::SetLutEntry {
            layer,
            index,
            color,
        });
    }

    fn set_layer_enabled(&mut self, layer: usize, enabled: bool) {
        self.ops.push(ControllerOp::SetLayerEnabled { layer, enabled });
    }

    fn reload_shadow(&mut self) {
        self.ops.push(ControllerOp::ReloadShadow);
    }

    fn arm_refresh_event(&mut self) {
        self.ops.push(ControllerOp::ArmRefreshEvent);
    }
}
