use bevy::prelude::*;

use super::camera_flight::CameraPose;
use super::presentation::{PresentationSink, PresentationState, StarDetails};
use super::view_state::CameraRig;

/// Presentation sink that keeps the resulting state plus a call log.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub state: PresentationState,
    pub calls: Vec<String>,
}

impl PresentationSink for RecordingSink {
    fn show_info_panel(&mut self, name: &str, text: &str) {
        self.calls.push(format!("show_info_panel:{name}"));
        self.state.show_info_panel(name, text);
    }

    fn hide_info_panel(&mut self) {
        self.calls.push("hide_info_panel".to_string());
        self.state.hide_info_panel();
    }

    fn show_star_popup(&mut self, star: &StarDetails, screen_position: Vec2) {
        self.calls.push(format!("show_star_popup:{}", star.name));
        self.state.show_star_popup(star, screen_position);
    }

    fn hide_star_popup(&mut self) {
        self.calls.push("hide_star_popup".to_string());
        self.state.hide_star_popup();
    }

    fn set_return_visible(&mut self, visible: bool) {
        self.calls.push(format!("set_return_visible:{visible}"));
        self.state.set_return_visible(visible);
    }

    fn set_overview_header_visible(&mut self, visible: bool) {
        self.calls.push(format!("set_overview_header_visible:{visible}"));
        self.state.set_overview_header_visible(visible);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRig {
    pub position: Vec3,
    pub look_at: Vec3,
    pub free_look_enabled: bool,
    pub free_look_target: Vec3,
    pub poses: Vec<CameraPose>,
}

impl RecordingRig {
    pub(crate) fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl CameraRig for RecordingRig {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.look_at = pose.look_at;
        self.poses.push(pose);
    }

    fn set_free_look_enabled(&mut self, enabled: bool) {
        self.free_look_enabled = enabled;
    }

    fn free_look_target(&self) -> Vec3 {
        self.free_look_target
    }

    fn set_free_look_target(&mut self, target: Vec3) {
        self.free_look_target = target;
    }
}
