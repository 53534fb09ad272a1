use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::camera_flight::CameraPose;
use super::presentation::UiPointerCapture;
use super::view_state::CameraRig;
use super::ViewerCamera;

const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;
const ORBIT_ZOOM_SENSITIVITY: f32 = 0.1;
const ORBIT_MIN_RADIUS: f32 = 2.0;
const ORBIT_MAX_RADIUS: f32 = 400.0;
const ORBIT_PITCH_LIMIT: f32 = 1.54;

/// Orbit navigation around `target`, only honoured while `enabled`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub(super) struct FreeLookCamera {
    pub enabled: bool,
    pub target: Vec3,
}

impl Default for FreeLookCamera {
    fn default() -> Self {
        Self {
            enabled: false,
            target: Vec3::ZERO,
        }
    }
}

/// Borrowed view of the camera entity that the view controller drives.
pub(super) struct CameraRigMut<'a> {
    pub transform: &'a mut Transform,
    pub free_look: &'a mut FreeLookCamera,
}

impl CameraRig for CameraRigMut<'_> {
    fn position(&self) -> Vec3 {
        self.transform.translation
    }

    fn set_pose(&mut self, pose: CameraPose) {
        self.transform.translation = pose.position;
        if pose.position != pose.look_at {
            self.transform.look_at(pose.look_at, Vec3::Y);
        }
    }

    fn set_free_look_enabled(&mut self, enabled: bool) {
        self.free_look.enabled = enabled;
    }

    fn free_look_target(&self) -> Vec3 {
        self.free_look.target
    }

    fn set_free_look_target(&mut self, target: Vec3) {
        self.free_look.target = target;
    }
}

#[derive(Resource, Default)]
pub(super) struct OrbitDragState {
    last_cursor_position: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct OrbitAngles {
    radius: f32,
    yaw: f32,
    pitch: f32,
}

impl OrbitAngles {
    fn from_offset(offset: Vec3) -> Self {
        Self {
            radius: offset.length().max(0.1),
            yaw: offset.x.atan2(offset.z),
            pitch: offset.y.atan2((offset.x * offset.x + offset.z * offset.z).sqrt()),
        }
    }

    fn offset(&self) -> Vec3 {
        let rotation = Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, -self.pitch);
        rotation * Vec3::new(0.0, 0.0, self.radius)
    }
}

pub(super) fn free_look_controls(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    capture: Res<UiPointerCapture>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut drag_state: ResMut<OrbitDragState>,
    mut cameras: Query<(&FreeLookCamera, &mut Transform), With<ViewerCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((free_look, mut transform)) = cameras.single_mut() else {
        return;
    };
    let active = free_look.enabled && !capture.over_ui;

    let dragging = active && buttons.pressed(MouseButton::Left);
    let (delta, next_cursor) =
        drag_delta(drag_state.last_cursor_position, window.cursor_position(), dragging);
    drag_state.last_cursor_position = next_cursor;

    let mut scroll = 0.0;
    for event in mouse_wheel.read() {
        if active {
            scroll += normalized_mouse_wheel_delta(event.unit, event.y);
        }
    }

    if delta == Vec2::ZERO && scroll == 0.0 {
        return;
    }
    apply_free_look_input(&mut transform, free_look.target, delta, scroll);
}

fn drag_delta(previous: Option<Vec2>, current: Option<Vec2>, dragging: bool) -> (Vec2, Option<Vec2>) {
    if !dragging {
        return (Vec2::ZERO, None);
    }
    let Some(cursor) = current else {
        return (Vec2::ZERO, None);
    };
    let delta = previous.map(|last| cursor - last).unwrap_or(Vec2::ZERO);
    (delta, Some(cursor))
}

fn normalized_mouse_wheel_delta(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => y,
        MouseScrollUnit::Pixel => y / MouseScrollUnit::SCROLL_UNIT_CONVERSION_FACTOR,
    }
}

/// Orbits `transform` around `target` by a cursor drag and zooms by wheel lines.
fn apply_free_look_input(transform: &mut Transform, target: Vec3, delta: Vec2, scroll: f32) {
    let mut orbit = OrbitAngles::from_offset(transform.translation - target);
    if delta != Vec2::ZERO {
        orbit.yaw -= delta.x * ORBIT_ROTATE_SENSITIVITY;
        orbit.pitch = (orbit.pitch + delta.y * ORBIT_ROTATE_SENSITIVITY)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }
    if scroll != 0.0 {
        orbit.radius = (orbit.radius * (1.0 - scroll * ORBIT_ZOOM_SENSITIVITY))
            .clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
    }
    transform.translation = target + orbit.offset();
    transform.look_at(target, Vec3::Y);
}
