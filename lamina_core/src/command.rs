// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer-facing command set.
//!
//! [`dispatch`] is the single entry point the renderer drives the pipeline
//! with: one closed [`Command`] enum, validated against the registry, then
//! routed to registry state and controller registers. Commands with no
//! sensible meaning for a layer's configuration (origin scrolling on a
//! multi-buffered layer, LUT writes on a direct-color layer) fail with
//! [`CommandError::Unsupported`] instead of being silently dropped.

use thiserror::Error;

use crate::controller::DisplayController;
use crate::geometry::{Extent, Origin};
use crate::layer::{LayerConfig, LayerRegistry, RegistryError};

/// One renderer request against a display layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Configures (or reconfigures) the layer and programs the controller.
    ConfigureLayer {
        /// The new configuration.
        config: LayerConfig,
    },
    /// Arms a buffer swap for the next refresh event.
    SetVisibleBuffer {
        /// Buffer to scan out.
        buffer: u32,
    },
    /// Scrolls a single-buffered layer by moving the scan address to a
    /// line offset within its (oversized) buffer.
    SetOrigin {
        /// First visible line.
        y: u32,
    },
    /// Moves the layer's hardware window.
    SetPosition {
        /// New top-left corner on the panel.
        position: Origin,
    },
    /// Resizes the layer.
    SetSize {
        /// New visible geometry.
        size: Extent,
    },
    /// Sets the layer's constant alpha.
    SetAlpha {
        /// 0 transparent, 255 opaque.
        alpha: u8,
    },
    /// Enables or disables color keying.
    SetColorKeying {
        /// Whether keyed pixels become transparent.
        enabled: bool,
    },
    /// Sets the color key.
    SetColorKey {
        /// Key color as `0x00RRGGBB`.
        rgb: u32,
    },
    /// Writes one look-up-table entry (indexed-format layers only).
    SetLutEntry {
        /// LUT index.
        index: u8,
        /// Entry value as `0xAARRGGBB`.
        color: u32,
    },
    /// Turns the layer's output on.
    Enable,
    /// Turns the layer's output off.
    Disable,
}

/// Errors returned by [`dispatch`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The registry rejected the command's target or arguments.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The command is meaningless for the layer's configuration.
    #[error("unsupported command: {0}")]
    Unsupported(&'static str),
}

/// Validates and executes one command against a layer.
///
/// Registry state is updated before controller registers are written, so a
/// controller observing a call can rely on [`LayerRegistry::view`] already
/// reflecting it.
pub fn dispatch<C: DisplayController>(
    registry: &mut LayerRegistry,
    controller: &mut C,
    layer: usize,
    command: Command,
) -> Result<(), CommandError> {
    match command {
        Command::ConfigureLayer { config } => {
            registry.configure(layer, config)?;
            let view = registry.view(layer)?;
            controller.apply_layer_config(layer, &view);
        }
        Command::SetVisibleBuffer { buffer } => {
            // Swap to the active buffer coalesces to a no-op; the commit
            // happens on the next refresh event either way.
            registry.request_swap(layer, buffer)?;
        }
        Command::SetOrigin { y } => {
            let view = registry.view(layer)?;
            if view.buffer_count > 1 {
                return Err(CommandError::Unsupported(
                    "origin scrolling conflicts with multiple buffers",
                ));
            }
            let address = registry.origin_address(layer, y)?;
            controller.set_scan_address(layer, address);
            controller.reload_shadow();
        }
        Command::SetPosition { position } => {
            registry.set_position(layer, position)?;
            let view = registry.view(layer)?;
            controller.set_window(layer, position, view.size);
            controller.reload_shadow();
        }
        Command::SetSize { size } => {
            registry.set_geometry(layer, size)?;
            let view = registry.view(layer)?;
            controller.set_window(layer, view.position, size);
            controller.reload_shadow();
        }
        Command::SetAlpha { alpha } => {
            registry.view(layer)?;
            controller.set_alpha(layer, alpha);
            controller.reload_shadow();
        }
        Command::SetColorKeying { enabled } => {
            registry.view(layer)?;
            controller.set_color_keying(layer, enabled);
            controller.reload_shadow();
        }
        Command::SetColorKey { rgb } => {
            registry.view(layer)?;
            // The controller wants 0x00BBGGRR; swap red and blue.
            let key = ((rgb & 0xFF_0000) >> 16) | (rgb & 0x00_FF00) | ((rgb & 0x00_00FF) << 16);
            controller.set_color_key(layer, key);
            controller.reload_shadow();
        }
        Command::SetLutEntry { index, color } => {
            let view = registry.view(layer)?;
            if !view.format.is_indexed() {
                return Err(CommandError::Unsupported(
                    "look-up table entries apply only to indexed formats",
                ));
            }
            controller.set_lut_entry(layer, index, color);
        }
        Command::Enable => {
            registry.set_enabled(layer, true)?;
            controller.set_layer_enabled(layer, true);
            controller.reload_shadow();
        }
        Command::Disable => {
            registry.set_enabled(layer, false)?;
            controller.set_layer_enabled(layer, false);
            controller.reload_shadow();
        }
    }
    Ok(())
}
