use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::ViewCommand;

const PANEL_MARGIN: f32 = 16.0;
const INFO_PANEL_WIDTH: f32 = 320.0;

/// Display metadata for one star.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct StarDetails {
    pub name: String,
    pub brightness: f32,
    pub distance: String,
}

/// Outbound UI surface of the view controller.
pub(super) trait PresentationSink {
    fn show_info_panel(&mut self, name: &str, text: &str);
    fn hide_info_panel(&mut self);
    fn show_star_popup(&mut self, star: &StarDetails, screen_position: Vec2);
    fn hide_star_popup(&mut self);
    fn set_return_visible(&mut self, visible: bool);
    fn set_overview_header_visible(&mut self, visible: bool);
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct InfoPanel {
    pub name: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct StarPopup {
    pub star: StarDetails,
    pub screen_position: Vec2,
}

/// What the egui pass draws this frame.
#[derive(Resource, Clone, Debug, PartialEq)]
pub(super) struct PresentationState {
    pub info_panel: Option<InfoPanel>,
    pub star_popup: Option<StarPopup>,
    pub return_visible: bool,
    pub overview_header_visible: bool,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            info_panel: None,
            star_popup: None,
            return_visible: false,
            overview_header_visible: true,
        }
    }
}

impl PresentationSink for PresentationState {
    fn show_info_panel(&mut self, name: &str, text: &str) {
        self.info_panel = Some(InfoPanel {
            name: name.to_string(),
            text: text.to_string(),
        });
    }

    fn hide_info_panel(&mut self) {
        self.info_panel = None;
    }

    fn show_star_popup(&mut self, star: &StarDetails, screen_position: Vec2) {
        self.star_popup = Some(StarPopup {
            star: star.clone(),
            screen_position,
        });
    }

    fn hide_star_popup(&mut self) {
        self.star_popup = None;
    }

    fn set_return_visible(&mut self, visible: bool) {
        self.return_visible = visible;
    }

    fn set_overview_header_visible(&mut self, visible: bool) {
        self.overview_header_visible = visible;
    }
}

/// Set by the egui pass so world clicks under a panel are not picked.
#[derive(Resource, Default, Clone, Copy, Debug)]
pub(super) struct UiPointerCapture {
    pub over_ui: bool,
}

pub(super) fn render_presentation_egui(
    mut contexts: EguiContexts,
    presentation: Res<PresentationState>,
    mut capture: ResMut<UiPointerCapture>,
    mut commands: MessageWriter<ViewCommand>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if presentation.overview_header_visible {
        egui::Area::new(egui::Id::new("star-atlas-overview-header"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, PANEL_MARGIN])
            .interactable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Star Atlas");
                    ui.label("Click a constellation to explore it");
                });
            });
    }

    if let Some(panel) = presentation.info_panel.as_ref() {
        egui::Window::new(panel.name.as_str())
            .id(egui::Id::new("star-atlas-info-panel"))
            .anchor(egui::Align2::LEFT_TOP, [PANEL_MARGIN, PANEL_MARGIN])
            .default_width(INFO_PANEL_WIDTH)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(panel.text.as_str());
            });
    }

    if presentation.return_visible {
        egui::Area::new(egui::Id::new("star-atlas-return"))
            .anchor(egui::Align2::RIGHT_TOP, [-PANEL_MARGIN, PANEL_MARGIN])
            .show(ctx, |ui| {
                if ui.button("Back to overview").clicked() {
                    commands.write(ViewCommand::Back);
                }
            });
    }

    if let Some(popup) = presentation.star_popup.as_ref() {
        egui::Area::new(egui::Id::new("star-atlas-star-popup"))
            .fixed_pos(egui::pos2(popup.screen_position.x, popup.screen_position.y))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.strong(popup.star.name.as_str());
                    ui.label(format!("Brightness: {}", popup.star.brightness));
                    ui.label(format!("Distance: {}", popup.star.distance));
                });
            });
    }

    capture.over_ui = ctx.is_pointer_over_area();
}
