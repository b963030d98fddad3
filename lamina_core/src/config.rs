// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Startup validation of a declarative display setup.
//!
//! Bring-up code describes the whole display as a [`DisplaySetup`];
//! [`DisplaySetup::validate`] checks the cross-layer constraints the
//! registry cannot see one layer at a time, and yields the per-layer
//! [`LayerConfig`]s to feed through the command dispatcher.

use alloc::vec::Vec;

use thiserror::Error;

use crate::format::PixelFormat;
use crate::geometry::Extent;
use crate::layer::LayerConfig;

/// Declarative description of one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSetup {
    /// Visible geometry in pixels.
    pub size: Extent,
    /// Raw color-conversion code.
    pub format_code: u16,
    /// Bus address of the layer's buffer pool.
    pub base_address: u32,
    /// Number of rotating buffers.
    pub buffer_count: u32,
}

/// Declarative description of the whole display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplaySetup {
    /// One entry per hardware layer.
    pub layers: Vec<LayerSetup>,
    /// Number of virtual screens for origin scrolling (1 = none).
    pub virtual_screens: u32,
}

/// Errors found while validating a [`DisplaySetup`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The setup describes no layers at all.
    #[error("a display setup needs at least one layer")]
    NoLayers,
    /// A layer names a color-conversion code with no accelerated format.
    #[error("layer {layer}: color-conversion code {code} has no accelerated format")]
    InvalidFormat {
        /// The offending layer.
        layer: usize,
        /// The unmapped code.
        code: u16,
    },
    /// A layer has an empty buffer pool.
    #[error("layer {0}: buffer count must be at least 1")]
    ZeroBufferCount(usize),
    /// A layer has an empty geometry.
    #[error("layer {0}: geometry must be non-empty")]
    EmptyGeometry(usize),
    /// Virtual screens scroll by moving the scan address, which conflicts
    /// with buffer swapping on the same layer.
    #[error("layer {0}: virtual screens and multiple buffers cannot be combined")]
    VirtualScreenConflict(usize),
    /// The buffer pool would run past the end of the 32-bit address space.
    #[error("layer {0}: buffer pool does not fit the 32-bit address space")]
    PoolOverflow(usize),
}

impl DisplaySetup {
    /// Validates the setup and produces registry-ready layer configs.
    pub fn validate(&self) -> Result<Vec<LayerConfig>, ConfigError> {
        if self.layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        let mut configs = Vec::with_capacity(self.layers.len());
        for (layer, setup) in self.layers.iter().enumerate() {
            let Some(format) = PixelFormat::from_code(setup.format_code) else {
                return Err(ConfigError::InvalidFormat {
                    layer,
                    code: setup.format_code,
                });
            };
            if setup.buffer_count == 0 {
                return Err(ConfigError::ZeroBufferCount(layer));
            }
            if setup.size.is_empty() {
                return Err(ConfigError::EmptyGeometry(layer));
            }
            if self.virtual_screens > 1 && setup.buffer_count > 1 {
                return Err(ConfigError::VirtualScreenConflict(layer));
            }
            if !crate::layer::pool_fits(
                setup.base_address,
                setup.size,
                format.bytes_per_pixel(),
                setup.buffer_count,
            ) {
                return Err(ConfigError::PoolOverflow(layer));
            }
            configs.push(LayerConfig {
                size: setup.size,
                format_code: setup.format_code,
                base_address: setup.base_address,
                buffer_count: setup.buffer_count,
            });
        }
        Ok(configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn layer(format_code: u16, buffer_count: u32) -> LayerSetup {
        LayerSetup {
            size: Extent::new(240, 320),
            format_code,
            base_address: 0xD020_0000,
            buffer_count,
        }
    }

    #[test]
    fn valid_setup_yields_configs() {
        let setup = DisplaySetup {
            layers: vec![layer(2, 3), layer(0, 1)],
            virtual_screens: 1,
        };
        let configs = setup.validate().expect("setup is valid");
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].buffer_count, 3);
        assert_eq!(configs[1].format_code, 0);
    }

    #[test]
    fn empty_setup_rejected() {
        let setup = DisplaySetup {
            layers: Vec::new(),
            virtual_screens: 1,
        };
        assert_eq!(setup.validate(), Err(ConfigError::NoLayers));
    }

    #[test]
    fn bad_layers_named_by_index() {
        let setup = DisplaySetup {
            layers: vec![layer(2, 3), layer(42, 1)],
            virtual_screens: 1,
        };
        assert_eq!(
            setup.validate(),
            Err(ConfigError::InvalidFormat { layer: 1, code: 42 })
        );

        let setup = DisplaySetup {
            layers: vec![layer(2, 0)],
            virtual_screens: 1,
        };
        assert_eq!(setup.validate(), Err(ConfigError::ZeroBufferCount(0)));

        let mut empty = layer(2, 1);
        empty.size = Extent::new(0, 320);
        let setup = DisplaySetup {
            layers: vec![empty],
            virtual_screens: 1,
        };
        assert_eq!(setup.validate(), Err(ConfigError::EmptyGeometry(0)));
    }

    #[test]
    fn oversized_pool_rejected() {
        let mut huge = layer(0, 1);
        huge.size = Extent::new(0x1_0000, 0x1_0000);
        let setup = DisplaySetup {
            layers: vec![huge],
            virtual_screens: 1,
        };
        assert_eq!(setup.validate(), Err(ConfigError::PoolOverflow(0)));
    }

    #[test]
    fn virtual_screens_exclude_multiple_buffers() {
        let setup = DisplaySetup {
            layers: vec![layer(2, 3)],
            virtual_screens: 2,
        };
        assert_eq!(setup.validate(), Err(ConfigError::VirtualScreenConflict(0)));

        let setup = DisplaySetup {
            layers: vec![layer(2, 1)],
            virtual_screens: 2,
        };
        assert!(setup.validate().is_ok());
    }
}
