// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios driving the whole pipeline in software.
//!
//! Each scenario models the 240x320 panel the pipeline was brought up on:
//! layer 0 in RGB565 with a pool of three 153 600-byte buffers at
//! 0xD020_0000.

use alloc::vec;
use alloc::vec::Vec;

use lamina_blit::engine::{BlitEngine, BlitError, ChannelStatus};
use lamina_blit::layer_ops;
use lamina_blit::surface::SurfaceDesc;
use lamina_core::command::{dispatch, Command, CommandError};
use lamina_core::config::{DisplaySetup, LayerSetup};
use lamina_core::format::PixelFormat;
use lamina_core::geometry::{Extent, Origin};
use lamina_core::layer::LayerRegistry;
use lamina_core::sync::{ConfirmQueue, Confirmation, SwapSynchronizer};
use lamina_core::trace::Tracer;

use crate::{CommitTracker, RecordingController, SimMemory, SoftBlitChannel};

const BASE: u32 = 0xD020_0000;
const BUFFER_BYTES: u32 = 240 * 320 * 2;

fn panel_setup() -> DisplaySetup {
    DisplaySetup {
        layers: vec![LayerSetup {
            size: Extent::new(240, 320),
            format_code: 2,
            base_address: BASE,
            buffer_count: 3,
        }],
        virtual_screens: 1,
    }
}

/// Validates the setup and configures every layer through the dispatcher.
fn bring_up(controller: &mut RecordingController) -> LayerRegistry {
    let configs = panel_setup().validate().expect("panel setup is valid");
    let mut registry = LayerRegistry::new(configs.len());
    for (layer, config) in configs.into_iter().enumerate() {
        dispatch(
            &mut registry,
            controller,
            layer,
            Command::ConfigureLayer { config },
        )
        .expect("configure layer");
        dispatch(&mut registry, controller, layer, Command::Enable).expect("enable layer");
    }
    registry
}

fn engine() -> BlitEngine<SoftBlitChannel> {
    let memory = SimMemory::new(BASE, (3 * BUFFER_BYTES) as usize);
    BlitEngine::new(SoftBlitChannel::new(memory), 64)
}

#[test]
fn swap_commits_on_the_refresh_event() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);
    let queue = ConfirmQueue::<8>::new();
    let mut sync = SwapSynchronizer::new();

    dispatch(
        &mut registry,
        &mut controller,
        0,
        Command::SetVisibleBuffer { buffer: 1 },
    )
    .expect("arm swap");
    // Nothing reaches the controller before the event.
    assert_eq!(controller.scan_address(0), None);

    sync.on_refresh(&registry, &mut controller, &queue);

    assert_eq!(controller.scan_address(0), Some(BASE + BUFFER_BYTES));
    assert_eq!(queue.pop(), Some(Confirmation { layer: 0, buffer: 1 }));
    assert_eq!(queue.pop(), None);
    let view = registry.view(0).expect("configured");
    assert_eq!(view.active_buffer, 1);
    assert_eq!(view.pending_swap, None);
    assert_eq!(controller.armed(), 1);
}

#[test]
fn latest_request_wins_and_commits_once() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);
    let queue = ConfirmQueue::<8>::new();
    let mut sync = SwapSynchronizer::new();

    for buffer in [1, 2] {
        dispatch(
            &mut registry,
            &mut controller,
            0,
            Command::SetVisibleBuffer { buffer },
        )
        .expect("arm swap");
    }
    sync.on_refresh(&registry, &mut controller, &queue);

    assert_eq!(controller.scan_address(0), Some(BASE + 2 * BUFFER_BYTES));
    assert_eq!(queue.pop(), Some(Confirmation { layer: 0, buffer: 2 }));
    assert_eq!(queue.pop(), None, "the overwritten request never commits");
    assert_eq!(sync.commits(), 1);
}

#[test]
fn swap_to_the_active_buffer_is_a_no_op() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);
    let queue = ConfirmQueue::<8>::new();
    let mut sync = SwapSynchronizer::new();

    // An armed swap followed by a request for the active buffer: the
    // newer request wins and nothing commits.
    for buffer in [1, 0] {
        dispatch(
            &mut registry,
            &mut controller,
            0,
            Command::SetVisibleBuffer { buffer },
        )
        .expect("request swap");
    }
    sync.on_refresh(&registry, &mut controller, &queue);

    assert_eq!(controller.scan_address(0), None);
    assert!(queue.is_empty());
    assert_eq!(sync.commits(), 0);
    assert_eq!(registry.view(0).expect("configured").active_buffer, 0);
}

#[test]
fn idle_refresh_events_commit_nothing() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);
    let queue = ConfirmQueue::<8>::new();
    let mut sync = SwapSynchronizer::new();

    dispatch(
        &mut registry,
        &mut controller,
        0,
        Command::SetVisibleBuffer { buffer: 2 },
    )
    .expect("arm swap");
    for _ in 0..5 {
        sync.on_refresh(&registry, &mut controller, &queue);
    }

    assert_eq!(sync.refresh_events(), 5);
    assert_eq!(sync.commits(), 1, "one request commits exactly once");
    assert_eq!(controller.armed(), 5, "every event re-arms the next");
    assert_eq!(queue.pop(), Some(Confirmation { layer: 0, buffer: 2 }));
    assert!(queue.is_empty());
}

#[test]
fn traced_refresh_feeds_the_tracker() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);
    let queue = ConfirmQueue::<8>::new();
    let mut sync = SwapSynchronizer::new();
    let mut tracker = CommitTracker::<8>::new();

    dispatch(
        &mut registry,
        &mut controller,
        0,
        Command::SetVisibleBuffer { buffer: 1 },
    )
    .expect("arm swap");
    for _ in 0..3 {
        let mut tracer = Tracer::new(&mut tracker);
        sync.on_refresh_traced(&registry, &mut controller, &queue, &mut tracer);
    }

    assert_eq!(tracker.total_ticks(), 3);
    assert_eq!(tracker.total_commits(), 1);
    let commit = tracker.last_commit().expect("one commit traced");
    assert_eq!(commit.layer, 0);
    assert_eq!(commit.buffer, 1);
    assert_eq!(commit.address, BASE + BUFFER_BYTES);
    assert_eq!(commit.refresh_index, 0);
    assert_eq!(tracker.history()[5..], [1, 0, 0]);
}

#[test]
fn confirmation_queue_overflow_drops_the_newest() {
    let queue = ConfirmQueue::<2>::new();
    assert!(queue.push(Confirmation { layer: 0, buffer: 1 }));
    assert!(queue.push(Confirmation { layer: 0, buffer: 2 }));
    assert!(!queue.push(Confirmation { layer: 0, buffer: 0 }));
    let drained: Vec<_> = core::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(
        drained,
        [
            Confirmation { layer: 0, buffer: 1 },
            Confirmation { layer: 0, buffer: 2 },
        ]
    );
}

#[test]
fn fill_stays_inside_its_rectangle() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();

    layer_ops::fill_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(20, 30),
        Extent::new(10, 10),
        0xF800,
    )
    .expect("fill");

    let memory = engine.channel().memory();
    let pixel = |x: u32, y: u32| memory.read_pixel(BASE + (y * 240 + x) * 2, 2);
    assert_eq!(pixel(20, 30), 0xF800);
    assert_eq!(pixel(29, 39), 0xF800);
    // One past each edge is untouched.
    assert_eq!(pixel(19, 30), 0);
    assert_eq!(pixel(30, 30), 0);
    assert_eq!(pixel(20, 29), 0);
    assert_eq!(pixel(20, 40), 0);
}

#[test]
fn copy_rect_moves_pixels_exactly() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();

    layer_ops::fill_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Extent::new(8, 8),
        0x07E0,
    )
    .expect("seed source");
    layer_ops::copy_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Origin::new(100, 200),
        Extent::new(8, 8),
    )
    .expect("copy");

    let memory = engine.channel().memory();
    for y in 0..8 {
        for x in 0..8 {
            let address = BASE + ((200 + y) * 240 + 100 + x) * 2;
            assert_eq!(memory.read_pixel(address, 2), 0x07E0);
        }
    }
}

#[test]
fn copy_round_trip_restores_the_original() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();

    // A non-constant 8x8 pattern at the origin.
    let pattern = |x: u32, y: u32| 0x4000 + y * 16 + x;
    for y in 0..8 {
        for x in 0..8 {
            engine
                .channel_mut()
                .memory_mut()
                .write_pixel(BASE + (y * 240 + x) * 2, 2, pattern(x, y));
        }
    }

    layer_ops::copy_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Origin::new(100, 200),
        Extent::new(8, 8),
    )
    .expect("copy out");
    // Clobber the original before copying back.
    layer_ops::fill_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Extent::new(8, 8),
        0,
    )
    .expect("clobber");
    layer_ops::copy_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(100, 200),
        Origin::new(0, 0),
        Extent::new(8, 8),
    )
    .expect("copy back");

    let memory = engine.channel().memory();
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(
                memory.read_pixel(BASE + (y * 240 + x) * 2, 2),
                pattern(x, y),
                "round trip is pixel-exact"
            );
        }
    }
}

#[test]
fn copy_buffer_primes_the_next_target() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);
    let mut engine = engine();

    layer_ops::fill_rect(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Extent::new(240, 320),
        0x001F,
    )
    .expect("paint buffer 0");
    layer_ops::copy_buffer(&mut engine, &mut registry, 0, 0, 1).expect("prime buffer 1");

    assert_eq!(registry.view(0).expect("configured").active_buffer, 1);
    let memory = engine.channel().memory();
    assert_eq!(memory.read_pixel(BASE + BUFFER_BYTES, 2), 0x001F);
    assert_eq!(
        memory.read_pixel(BASE + BUFFER_BYTES + (319 * 240 + 239) * 2, 2),
        0x001F
    );
}

#[test]
fn bitmap_upload_converts_and_respects_padding() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();

    // A 4x2 ARGB8888 bitmap with a 6-pixel stride, staged in the tail of
    // buffer 2 which this scenario never scans out.
    let staging = BASE + 3 * BUFFER_BYTES - 4096;
    for y in 0..2 {
        for x in 0..6 {
            let color = if x < 4 { 0xFFFF_0000 } else { 0xFF00_FF00 };
            engine
                .channel_mut()
                .memory_mut()
                .write_pixel(staging + (y * 6 + x) * 4, 4, color);
        }
    }
    layer_ops::draw_bitmap(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Extent::new(4, 2),
        SurfaceDesc::new(staging, 6, PixelFormat::Argb8888),
    )
    .expect("upload");

    let memory = engine.channel().memory();
    for y in 0..2 {
        for x in 0..4 {
            assert_eq!(memory.read_pixel(BASE + (y * 240 + x) * 2, 2), 0xF800);
        }
    }
    // The padding pixels never land.
    assert_eq!(memory.read_pixel(BASE + 4 * 2, 2), 0);
}

#[test]
fn indexed_bitmap_expands_through_the_lut() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();

    let staging = BASE + 3 * BUFFER_BYTES - 4096;
    for i in 0..16 {
        engine.channel_mut().memory_mut().write_pixel(staging + i, 1, 9);
    }
    let mut lut = [0u32; 256];
    lut[9] = 0xFFFF_0000;
    layer_ops::draw_bitmap_indexed(
        &mut engine,
        &registry,
        0,
        Origin::new(0, 0),
        Extent::new(4, 4),
        SurfaceDesc::new(staging, 4, PixelFormat::L8),
        &lut,
    )
    .expect("upload");

    let memory = engine.channel().memory();
    assert_eq!(memory.read_pixel(BASE, 2), 0xF800);
    assert_eq!(memory.read_pixel(BASE + (3 * 240 + 3) * 2, 2), 0xF800);
}

#[test]
fn wedged_channel_surfaces_as_a_timeout() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();
    engine.channel_mut().toggles.hold_busy = true;

    assert_eq!(
        layer_ops::fill_rect(
            &mut engine,
            &registry,
            0,
            Origin::new(0, 0),
            Extent::new(1, 1),
            0,
        ),
        Err(BlitError::EngineTimeout { spins: 64 })
    );
}

#[test]
fn faulting_channel_surfaces_the_status() {
    let mut controller = RecordingController::new();
    let registry = bring_up(&mut controller);
    let mut engine = engine();
    engine.channel_mut().toggles.raise_transfer_fault = true;

    assert_eq!(
        layer_ops::copy_rect(
            &mut engine,
            &registry,
            0,
            Origin::new(0, 0),
            Origin::new(10, 10),
            Extent::new(4, 4),
        ),
        Err(BlitError::TransferFault(ChannelStatus::TRANSFER_FAULT))
    );
}

#[test]
fn dispatcher_rejects_mismatched_commands() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);

    // Origin scrolling needs a single buffer.
    assert!(matches!(
        dispatch(
            &mut registry,
            &mut controller,
            0,
            Command::SetOrigin { y: 4 },
        ),
        Err(CommandError::Unsupported(_))
    ));
    // LUT writes need an indexed format.
    assert!(matches!(
        dispatch(
            &mut registry,
            &mut controller,
            0,
            Command::SetLutEntry {
                index: 0,
                color: 0xFF00_0000,
            },
        ),
        Err(CommandError::Unsupported(_))
    ));
}

#[test]
fn surface_commands_reach_the_controller_in_order() {
    let mut controller = RecordingController::new();
    let mut registry = bring_up(&mut controller);

    dispatch(
        &mut registry,
        &mut controller,
        0,
        Command::SetAlpha { alpha: 128 },
    )
    .expect("alpha");
    dispatch(
        &mut registry,
        &mut controller,
        0,
        Command::SetColorKey { rgb: 0x0012_3456 },
    )
    .expect("key");
    dispatch(&mut registry, &mut controller, 0, Command::Disable).expect("disable");

    use crate::ControllerOp;
    let tail: Vec<_> = controller
        .ops()
        .iter()
        .filter(|op| {
            !matches!(
                op,
                ControllerOp::ReloadShadow | ControllerOp::ArmRefreshEvent
            )
        })
        .skip(2)
        .copied()
        .collect();
    assert_eq!(
        tail,
        [
            ControllerOp::SetAlpha { layer: 0, alpha: 128 },
            ControllerOp::SetColorKey {
                layer: 0,
                key: 0x0056_3412,
            },
            ControllerOp::SetLayerEnabled {
                layer: 0,
                enabled: false,
            },
        ]
    );
    assert_eq!(controller.layer_enabled(0), Some(false));
}
