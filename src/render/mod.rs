//! Figure description types and the artifact writers.
//!
//! A [`Frame`] says what to draw: panels, their placement and every group's
//! polygon. The `draw` module turns a frame into pixels. The static figure
//! and both animations only build frames.

mod draw;
pub mod static_chart;

use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{parse_hex_color, GroupConfig, RenderConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::AngleSet;
use crate::normalize::ScaledAggregate;

/// Physical figure size; every length in the drawing code is derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
}

impl Canvas {
    pub fn new(render: &RenderConfig, dpi: f64) -> Canvas {
        Canvas {
            width_in: render.width_in,
            height_in: render.height_in,
            dpi,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round().max(1.0) as u32,
            (self.height_in * self.dpi).round().max(1.0) as u32,
        )
    }

    /// Points to pixels.
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }

    /// Figure fractions to pixel `(x, y, w, h)`.
    pub fn rect_px(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let (w, h) = self.size();
        let (w, h) = (w as f64, h as f64);
        (
            (rect.x * w).round() as i32,
            (rect.y * h).round() as i32,
            (rect.w * w).round() as i32,
            (rect.h * h).round() as i32,
        )
    }
}

/// Region of the figure in fractions of its size, origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

const PANEL_WIDTH: f64 = 0.40;
const PANEL_TOP: f64 = 0.10;
const PANEL_HEIGHT: f64 = 0.70;

impl Rect {
    /// Panel slot with its left edge at `x`.
    pub fn panel_at(x: f64) -> Rect {
        Rect {
            x,
            y: PANEL_TOP,
            w: PANEL_WIDTH,
            h: PANEL_HEIGHT,
        }
    }
}

/// A diet group and the color it has on every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DietGroup {
    pub name: String,
    pub color: RGBColor,
}

pub fn diet_groups(groups: &[GroupConfig]) -> PipelineResult<Vec<DietGroup>> {
    groups
        .iter()
        .map(|g| {
            let (r, gr, b) = parse_hex_color(&g.color)
                .ok_or_else(|| PipelineError::Config(format!("bad color '{}' for '{}'", g.color, g.name)))?;
            Ok(DietGroup {
                name: g.name.clone(),
                color: RGBColor(r, gr, b),
            })
        })
        .collect()
}

/// One dataset's scaled rows, lined up with the diet group order.
#[derive(Debug, Clone)]
pub struct RadarData {
    pub title: String,
    pub short_title: String,
    pub rows: Vec<Vec<f64>>,
}

impl RadarData {
    /// Looks up every group by key, failing on the first one the data lacks.
    pub fn prepare(
        title: &str,
        short_title: &str,
        scaled: &ScaledAggregate,
        groups: &[DietGroup],
    ) -> PipelineResult<RadarData> {
        let rows = groups
            .iter()
            .map(|g| scaled.row(&g.name).map(<[f64]>::to_vec))
            .collect::<PipelineResult<Vec<_>>>()?;
        Ok(RadarData {
            title: title.to_string(),
            short_title: short_title.to_string(),
            rows,
        })
    }

    /// Every group drawn the same way.
    pub fn series(&self, groups: &[DietGroup], fill_alpha: f64, line_width: f64) -> Vec<Series> {
        self.series_with(groups, |_| (fill_alpha, line_width))
    }

    /// Per-group `(fill_alpha, line_width)` chosen by group index.
    pub fn series_with(&self, groups: &[DietGroup], style: impl Fn(usize) -> (f64, f64)) -> Vec<Series> {
        groups
            .iter()
            .zip(&self.rows)
            .enumerate()
            .map(|(i, (group, values))| {
                let (fill_alpha, line_width) = style(i);
                Series {
                    group: group.name.clone(),
                    color: group.color,
                    values: values.clone(),
                    fill_alpha,
                    line_width,
                }
            })
            .collect()
    }
}

/// One group's polygon on one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub group: String,
    pub color: RGBColor,
    /// One value per axis, not closed.
    pub values: Vec<f64>,
    pub fill_alpha: f64,
    /// In points.
    pub line_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub title_position: TitlePosition,
    pub rect: Rect,
    pub series: Vec<Series>,
}

/// Everything that changes from one frame to the next. Panels are drawn in
/// order, so a later panel sits on top of an earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub panels: Vec<Panel>,
}

/// The parts of a figure that stay put across frames.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub title: String,
    pub indicators: Vec<String>,
    pub legend: Vec<DietGroup>,
    pub angles: AngleSet,
    pub radial_limit: f64,
}

/// A fixed-length sequence of frames.
pub trait Animation {
    fn frame_count(&self) -> usize;

    /// `None` past the last frame.
    fn frame_state(&self, index: usize) -> Option<Frame>;
}

pub fn write_png(path: &Path, canvas: &Canvas, chrome: &Chrome, frame: &Frame) -> PipelineResult<()> {
    let root = BitMapBackend::new(path, canvas.size()).into_drawing_area();
    draw::draw_frame(&root, canvas, chrome, frame)?;
    root.present().map_err(PipelineError::render)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Encode every frame of `animation` into one GIF, `delay_ms` per frame.
pub fn write_gif(
    path: &Path,
    canvas: &Canvas,
    delay_ms: u32,
    chrome: &Chrome,
    animation: &impl Animation,
) -> PipelineResult<usize> {
    let backend = BitMapBackend::gif(path, canvas.size(), delay_ms).map_err(PipelineError::render)?;
    let root = backend.into_drawing_area();

    let count = animation.frame_count();
    let mut written = 0;
    for index in 0..count {
        let frame = match animation.frame_state(index) {
            Some(frame) => frame,
            None => break,
        };
        debug!("Drawing frame {}/{} of {}", index + 1, count, path.display());
        draw::draw_frame(&root, canvas, chrome, &frame)?;
        root.present().map_err(PipelineError::render)?;
        written += 1;
    }

    if written < count {
        warn!("{} stopped after {} of {} frames", path.display(), written, count);
    }
    info!("Wrote {} frames to {}", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::GroupAggregate;
    use crate::animate::Highlight;
    use crate::config::Config;
    use crate::normalize::scale_by_max;
    use static_chart::static_frame;
    use tempfile::TempDir;

    // 40x20 px, small enough to encode quickly
    const TINY: Canvas = Canvas {
        width_in: 2.0,
        height_in: 1.0,
        dpi: 20.0,
    };

    fn chrome(groups: &[DietGroup]) -> Chrome {
        let indicators: Vec<String> = (0..9).map(|i| format!("ind{}", i)).collect();
        Chrome {
            title: "Title".to_string(),
            angles: AngleSet::new(indicators.len()).unwrap(),
            indicators,
            legend: groups.to_vec(),
            radial_limit: 1.1,
        }
    }

    fn radar(title: &str, groups: &[DietGroup]) -> RadarData {
        RadarData {
            title: title.to_string(),
            short_title: title.to_string(),
            rows: (0..groups.len())
                .map(|g| (0..9).map(|i| ((g + i) % 10) as f64 / 10.0).collect())
                .collect(),
        }
    }

    // claims more frames than it can produce
    struct ShortAnimation {
        frame: Frame,
    }

    impl Animation for ShortAnimation {
        fn frame_count(&self) -> usize {
            4
        }

        fn frame_state(&self, index: usize) -> Option<Frame> {
            if index < 2 {
                Some(self.frame.clone())
            } else {
                None
            }
        }
    }

    #[test]
    fn test_canvas() {
        let canvas = Canvas {
            width_in: 18.0,
            height_in: 10.0,
            dpi: 300.0,
        };
        assert_eq!(canvas.size(), (5400, 3000));
        assert_eq!(canvas.px(72.0), 300.0);
        assert_eq!(canvas.rect_px(&Rect::panel_at(0.55)), (2970, 300, 2160, 2100));
    }

    #[test]
    fn test_diet_groups_from_config() {
        let groups = diet_groups(&Config::default().groups).unwrap();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[0].name, "meat100");
        assert_eq!(groups[0].color, RGBColor(0xE4, 0x1A, 0x1C));
        assert_eq!(groups[5].color, RGBColor(0x98, 0x4E, 0xA3));
    }

    #[test]
    fn test_prepare_follows_group_order() {
        let agg = GroupAggregate::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            [("vegan", vec![1.0, 2.0, 3.0]), ("meat", vec![2.0, 2.0, 6.0])]
                .into_iter()
                .map(|(g, v)| (g.to_string(), v))
                .collect(),
        );
        let scaled = scale_by_max(&agg, 1.0);
        let groups = vec![
            DietGroup { name: "meat".into(), color: RED },
            DietGroup { name: "vegan".into(), color: BLUE },
        ];

        let data = RadarData::prepare("Title", "Short", &scaled, &groups).unwrap();
        assert_eq!(data.rows[0], vec![1.0, 1.0, 1.0]);
        assert_eq!(data.rows[1], vec![0.5, 1.0, 0.5]);

        let series = data.series(&groups, 0.2, 2.0);
        assert_eq!(series[1].group, "vegan");
        assert_eq!(series[1].color, BLUE);
    }

    #[test]
    fn test_prepare_missing_group() {
        let agg = GroupAggregate::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            [("meat".to_string(), vec![1.0, 1.0, 1.0])].into_iter().collect(),
        );
        let scaled = scale_by_max(&agg, 1.0);
        let groups = vec![DietGroup { name: "fish".into(), color: GREEN }];

        let err = RadarData::prepare("Title", "Short", &scaled, &groups).unwrap_err();
        assert!(matches!(err, PipelineError::MissingGroup { ref group } if group == "fish"));
    }

    #[test]
    fn test_write_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static.png");
        let groups = diet_groups(&Config::default().groups).unwrap();
        let (left, right) = (radar("Left", &groups), radar("Right", &groups));

        write_png(&path, &TINY, &chrome(&groups), &static_frame(&left, &right, &groups)).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_write_gif_one_frame_per_group() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highlight.gif");
        let groups = diet_groups(&Config::default().groups).unwrap();
        let (left, right) = (radar("Left", &groups), radar("Right", &groups));
        let animation = Highlight::new(&left, &right, &groups);

        let written = write_gif(&path, &TINY, 10, &chrome(&groups), &animation).unwrap();

        assert_eq!(written, animation.frame_count());
        assert_eq!(written, 6);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_write_gif_counts_frames_presented() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.gif");
        let groups = diet_groups(&Config::default().groups).unwrap();
        let (left, right) = (radar("Left", &groups), radar("Right", &groups));
        let animation = ShortAnimation {
            frame: static_frame(&left, &right, &groups),
        };

        let written = write_gif(&path, &TINY, 10, &chrome(&groups), &animation).unwrap();

        assert_eq!(written, 2);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
