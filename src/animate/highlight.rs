use crate::render::static_chart::{LEFT_SLOT, RIGHT_SLOT};
use crate::render::{Animation, DietGroup, Frame, Panel, RadarData, Rect, TitlePosition};

const ACTIVE_ALPHA: f64 = 0.6;
const IDLE_ALPHA: f64 = 0.1;
const LINE_WIDTH: f64 = 1.5;

/// Steps through the diet groups once, one frame each, filling the current
/// group strongly and every other group faintly.
pub struct Highlight<'a> {
    left: &'a RadarData,
    right: &'a RadarData,
    groups: &'a [DietGroup],
}

impl<'a> Highlight<'a> {
    pub fn new(left: &'a RadarData, right: &'a RadarData, groups: &'a [DietGroup]) -> Self {
        Highlight { left, right, groups }
    }

    fn panel(&self, data: &RadarData, x: f64, active: usize) -> Panel {
        Panel {
            title: format!("{}: {}", data.short_title, self.groups[active].name),
            title_position: TitlePosition::Top,
            rect: Rect::panel_at(x),
            series: data.series_with(self.groups, |i| {
                let alpha = if i == active { ACTIVE_ALPHA } else { IDLE_ALPHA };
                (alpha, LINE_WIDTH)
            }),
        }
    }
}

impl Animation for Highlight<'_> {
    fn frame_count(&self) -> usize {
        self.groups.len()
    }

    fn frame_state(&self, index: usize) -> Option<Frame> {
        if index >= self.frame_count() {
            return None;
        }
        Some(Frame {
            panels: vec![
                self.panel(self.left, LEFT_SLOT, index),
                self.panel(self.right, RIGHT_SLOT, index),
            ],
        })
    }
}
