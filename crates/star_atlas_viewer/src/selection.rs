use bevy::prelude::{Entity, Vec2};

use super::presentation::{PresentationSink, StarDetails};

/// Popup anchor relative to the click that selected the star.
pub(super) const POPUP_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SelectionChange {
    Selected(Entity),
    Cleared,
}

/// At most one selected star, mirrored by the star popup.
#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct Selection {
    current: Option<Entity>,
}

impl Selection {
    pub(super) fn current(&self) -> Option<Entity> {
        self.current
    }

    /// Toggle on repeated picks of the same star; a miss clears.
    pub(super) fn on_pick<S>(
        &mut self,
        picked: Option<(Entity, &StarDetails)>,
        pointer: Vec2,
        sink: &mut S,
    ) -> SelectionChange
    where
        S: PresentationSink + ?Sized,
    {
        match picked {
            Some((entity, details)) if self.current != Some(entity) => {
                sink.show_star_popup(details, pointer + POPUP_OFFSET);
                self.current = Some(entity);
                SelectionChange::Selected(entity)
            }
            _ => {
                self.clear(sink);
                SelectionChange::Cleared
            }
        }
    }

    pub(super) fn clear<S>(&mut self, sink: &mut S)
    where
        S: PresentationSink + ?Sized,
    {
        sink.hide_star_popup();
        self.current = None;
    }
}
