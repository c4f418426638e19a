use super::{DietGroup, Frame, Panel, RadarData, Rect, TitlePosition};

pub const STATIC_TITLE: &str = "Comparison of Dietary Environmental Impacts";

const FILL_ALPHA: f64 = 0.2;
const LINE_WIDTH: f64 = 2.0;

pub const LEFT_SLOT: f64 = 0.05;
pub const RIGHT_SLOT: f64 = 0.55;

/// Both datasets side by side, every group filled lightly.
pub fn static_frame(left: &RadarData, right: &RadarData, groups: &[DietGroup]) -> Frame {
    let panel = |data: &RadarData, x: f64| Panel {
        title: data.title.clone(),
        title_position: TitlePosition::Top,
        rect: Rect::panel_at(x),
        series: data.series(groups, FILL_ALPHA, LINE_WIDTH),
    };
    Frame {
        panels: vec![panel(left, LEFT_SLOT), panel(right, RIGHT_SLOT)],
    }
}
