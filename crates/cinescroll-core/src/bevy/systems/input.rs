//! Input collection systems.
//!
//! Translates Bevy input messages into engine scroll and pointer input.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::bevy::CameraEngineRes;
use crate::timeline::{DeltaMode, ScrollInput};

/// Maps a Bevy wheel reading to engine input.
///
/// Bevy reports scrolling down as negative `y`; the engine treats positive
/// deltas as forward, so the sign is flipped.
pub fn wheel_to_scroll_input(unit: MouseScrollUnit, y: f32, timestamp_ms: f64) -> ScrollInput {
    let mode = match unit {
        MouseScrollUnit::Line => DeltaMode::Line,
        MouseScrollUnit::Pixel => DeltaMode::Pixel,
    };
    ScrollInput::Wheel {
        delta_y: -y,
        mode,
        timestamp_ms,
    }
}

/// System to feed wheel and touch messages to the engine.
pub fn collect_scroll_input(
    time: Res<Time>,
    mut engine: ResMut<CameraEngineRes>,
    mut wheel_events: MessageReader<MouseWheel>,
    mut touch_events: MessageReader<TouchInput>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;

    for event in wheel_events.read() {
        if event.y.abs() < f32::EPSILON {
            continue;
        }
        engine.on_raw_input(wheel_to_scroll_input(event.unit, event.y, now_ms));
    }

    for event in touch_events.read() {
        let input = match event.phase {
            TouchPhase::Started => ScrollInput::TouchStart {
                y: event.position.y,
            },
            TouchPhase::Moved => ScrollInput::TouchMove {
                y: event.position.y,
            },
            TouchPhase::Ended | TouchPhase::Canceled => continue,
        };
        engine.on_raw_input(input);
    }
}

/// System to feed the normalized cursor position to mouse-look.
pub fn collect_pointer_input(
    mut engine: ResMut<CameraEngineRes>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cursor_events: MessageReader<CursorMoved>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let (width, height) = (window.width(), window.height());
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    if let Some(event) = cursor_events.read().last() {
        engine.set_pointer(event.position.x / width, event.position.y / height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_sign_and_unit() {
        assert_eq!(
            wheel_to_scroll_input(MouseScrollUnit::Line, -2.0, 10.0),
            ScrollInput::Wheel {
                delta_y: 2.0,
                mode: DeltaMode::Line,
                timestamp_ms: 10.0,
            }
        );
        assert!(matches!(
            wheel_to_scroll_input(MouseScrollUnit::Pixel, 4.0, 0.0),
            ScrollInput::Wheel { mode: DeltaMode::Pixel, delta_y, .. } if (delta_y + 4.0).abs() < f32::EPSILON
        ));
    }
}
