use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;

use super::{Canvas, Chrome, Frame, Panel, Rect, TitlePosition};
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::{polygon_points, project};

const FONT: &str = "sans-serif";

// font sizes in points
const SUPTITLE_PT: f64 = 18.0;
const PANEL_TITLE_PT: f64 = 16.0;
const AXIS_LABEL_PT: f64 = 10.0;
const RING_LABEL_PT: f64 = 8.0;
const LEGEND_PT: f64 = 12.0;
const LEGEND_TITLE_PT: f64 = 14.0;

const RING_STEP: f64 = 0.2;
const LEGEND_COLUMNS: usize = 3;

fn legend_rect() -> Rect {
    Rect {
        x: 0.30,
        y: 0.83,
        w: 0.40,
        h: 0.15,
    }
}

fn grid_style() -> ShapeStyle {
    BLACK.mix(0.15).stroke_width(1)
}

fn text_style(size_px: f64, pos: Pos) -> TextStyle<'static> {
    (FONT, size_px).into_font().color(&BLACK).pos(pos)
}

pub(super) fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    canvas: &Canvas,
    chrome: &Chrome,
    frame: &Frame,
) -> PipelineResult<()> {
    root.fill(&WHITE).map_err(PipelineError::render)?;

    let (w, _) = canvas.size();
    root.draw(&Text::new(
        chrome.title.clone(),
        ((w / 2) as i32, canvas.px(SUPTITLE_PT) as i32),
        text_style(canvas.px(SUPTITLE_PT), Pos::new(HPos::Center, VPos::Top)),
    ))
    .map_err(PipelineError::render)?;

    // no panel background, so overlapping panels stay see-through
    for panel in &frame.panels {
        draw_panel(root, canvas, chrome, panel)?;
    }

    draw_legend(root, canvas, chrome)
}

fn draw_panel<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    canvas: &Canvas,
    chrome: &Chrome,
    panel: &Panel,
) -> PipelineResult<()> {
    let (x0, y0, w, h) = canvas.rect_px(&panel.rect);
    let title_band = canvas.px(PANEL_TITLE_PT * 2.0) as i32;
    let label_pad = canvas.px(AXIS_LABEL_PT * 3.0);

    let radar_top = match panel.title_position {
        TitlePosition::Top => y0 + title_band,
        TitlePosition::Bottom => y0,
    };
    let radar_h = (h - title_band).max(1);
    let center = (x0 + w / 2, radar_top + radar_h / 2);
    let radius = (w.min(radar_h) as f64 / 2.0 - label_pad).max(1.0);
    let r_max = chrome.radial_limit;

    // rings, plus a solid outer edge at the radial limit
    let mut ring = RING_STEP;
    while ring < r_max - 1e-9 {
        let ring_px = (radius * ring / r_max).round() as i32;
        root.draw(&Circle::new(center, ring_px, grid_style())).map_err(PipelineError::render)?;
        let at = project(center, radius, PI / 8.0, ring, r_max);
        root.draw(&Text::new(
            format!("{:.1}", ring),
            at,
            text_style(canvas.px(RING_LABEL_PT), Pos::new(HPos::Left, VPos::Bottom)),
        ))
        .map_err(PipelineError::render)?;
        ring += RING_STEP;
    }
    root.draw(&Circle::new(center, radius.round() as i32, BLACK.mix(0.6).stroke_width(1)))
        .map_err(PipelineError::render)?;

    // spokes and axis labels
    let label_radius = radius + canvas.px(AXIS_LABEL_PT * 1.2);
    for (&angle, name) in chrome.angles.angles().iter().zip(&chrome.indicators) {
        let tip = project(center, radius, angle, r_max, r_max);
        root.draw(&PathElement::new(vec![center, tip], grid_style()))
            .map_err(PipelineError::render)?;

        let hpos = if angle.cos() > 0.3 {
            HPos::Left
        } else if angle.cos() < -0.3 {
            HPos::Right
        } else {
            HPos::Center
        };
        let at = project(center, label_radius, angle, r_max, r_max);
        root.draw(&Text::new(
            name.clone(),
            at,
            text_style(canvas.px(AXIS_LABEL_PT), Pos::new(hpos, VPos::Center)),
        ))
        .map_err(PipelineError::render)?;
    }

    for series in &panel.series {
        let points = polygon_points(center, radius, &chrome.angles, &series.values, r_max);
        root.draw(&Polygon::new(points.clone(), series.color.mix(series.fill_alpha).filled()))
            .map_err(PipelineError::render)?;
        let stroke = (canvas.px(series.line_width).round() as u32).max(1);
        root.draw(&PathElement::new(points, series.color.stroke_width(stroke)))
            .map_err(PipelineError::render)?;
    }

    let (title_y, vpos) = match panel.title_position {
        TitlePosition::Top => (y0, VPos::Top),
        TitlePosition::Bottom => (y0 + h, VPos::Bottom),
    };
    root.draw(&Text::new(
        panel.title.clone(),
        (center.0, title_y),
        text_style(canvas.px(PANEL_TITLE_PT), Pos::new(HPos::Center, vpos)),
    ))
    .map_err(PipelineError::render)?;

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, canvas: &Canvas, chrome: &Chrome) -> PipelineResult<()> {
    let (x0, y0, w, h) = canvas.rect_px(&legend_rect());
    root.draw(&Rectangle::new([(x0, y0), (x0 + w, y0 + h)], BLACK.mix(0.3).stroke_width(1)))
        .map_err(PipelineError::render)?;

    let title_h = canvas.px(LEGEND_TITLE_PT * 1.6) as i32;
    root.draw(&Text::new(
        "Diet Group",
        (x0 + w / 2, y0 + canvas.px(LEGEND_TITLE_PT * 0.4) as i32),
        text_style(canvas.px(LEGEND_TITLE_PT), Pos::new(HPos::Center, VPos::Top)),
    ))
    .map_err(PipelineError::render)?;

    let rows = chrome.legend.len().div_ceil(LEGEND_COLUMNS).max(1);
    let col_w = w / LEGEND_COLUMNS as i32;
    let row_h = (h - title_h) / rows as i32;
    let swatch = canvas.px(LEGEND_PT * 2.0) as i32;
    let pad = canvas.px(LEGEND_PT) as i32;
    let thick = (canvas.px(4.0).round() as u32).max(1);

    for (i, group) in chrome.legend.iter().enumerate() {
        let col = (i % LEGEND_COLUMNS) as i32;
        let row = (i / LEGEND_COLUMNS) as i32;
        let x = x0 + col * col_w + pad;
        let y = y0 + title_h + row * row_h + row_h / 2;

        root.draw(&PathElement::new(vec![(x, y), (x + swatch, y)], group.color.stroke_width(thick)))
            .map_err(PipelineError::render)?;
        root.draw(&Text::new(
            group.name.clone(),
            (x + swatch + pad / 2, y),
            text_style(canvas.px(LEGEND_PT), Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(PipelineError::render)?;
    }

    Ok(())
}
