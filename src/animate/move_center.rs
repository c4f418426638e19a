use crate::config::MotionConfig;
use crate::render::{Animation, DietGroup, Frame, Panel, RadarData, Rect, TitlePosition};

const FILL_ALPHA: f64 = 0.2;
const LINE_WIDTH: f64 = 2.0;

/// Slides the two charts in from opposite edges until they overlap at the
/// center, then holds the overlap for the remaining frames.
pub struct MoveToCenter<'a> {
    left: &'a RadarData,
    right: &'a RadarData,
    groups: &'a [DietGroup],
    motion: MotionConfig,
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl<'a> MoveToCenter<'a> {
    pub fn new(left: &'a RadarData, right: &'a RadarData, groups: &'a [DietGroup], motion: MotionConfig) -> Self {
        MoveToCenter {
            left,
            right,
            groups,
            motion,
        }
    }

    /// 0 at the first frame, 1 once travel is done; clamped after that.
    pub fn progress(&self, index: usize) -> f64 {
        (index as f64 / self.motion.travel_frames as f64).min(1.0)
    }

    /// Left edges of the left and right charts, as figure-width fractions.
    pub fn anchors(&self, index: usize) -> (f64, f64) {
        let t = self.progress(index);
        (
            lerp(self.motion.left_start, self.motion.center, t),
            lerp(self.motion.right_start, self.motion.center, t),
        )
    }
}

impl Animation for MoveToCenter<'_> {
    fn frame_count(&self) -> usize {
        self.motion.total_frames as usize
    }

    fn frame_state(&self, index: usize) -> Option<Frame> {
        if index >= self.frame_count() {
            return None;
        }
        let (left_x, right_x) = self.anchors(index);

        // the right chart is pushed last so it always sits on top
        Some(Frame {
            panels: vec![
                Panel {
                    title: self.left.title.clone(),
                    title_position: TitlePosition::Top,
                    rect: Rect::panel_at(left_x),
                    series: self.left.series(self.groups, FILL_ALPHA, LINE_WIDTH),
                },
                Panel {
                    title: self.right.title.clone(),
                    title_position: TitlePosition::Bottom,
                    rect: Rect::panel_at(right_x),
                    series: self.right.series(self.groups, FILL_ALPHA, LINE_WIDTH),
                },
            ],
        })
    }
}
