//! Frame-by-frame state for the two animations.
//!
//! Both animators are pure: `frame_state(i)` computes what frame `i` shows and
//! `render::write_gif` does the drawing.

pub mod highlight;
pub mod move_center;

pub use highlight::Highlight;
pub use move_center::MoveToCenter;

pub const HIGHLIGHT_TITLE: &str = "Dietary Impact Comparison (Animated)";
pub const MOVE_TITLE: &str = "Dietary Impact Comparison (Overlay)";
