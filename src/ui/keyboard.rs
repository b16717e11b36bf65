//! Plan view of the stage.
//!
//! Draws every keyboard as seen from directly above. Each cell is shaded by
//! casting the same ray a mouse click there would cast, so what is drawn
//! under the cursor is exactly what a click will press.

use crate::app::App;
use crate::piano::{AudioSink, KeyClass};
use crate::scene::{resolve, Ray, Stage, Surface};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Normalized device coordinates of the center of a terminal cell.
///
/// Returns None if the cell lies outside `area`.
pub fn cell_to_ndc(area: Rect, col: u16, row: u16) -> Option<(f64, f64)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    if col < area.x || col >= area.x + area.width || row < area.y || row >= area.y + area.height {
        return None;
    }
    let x = ((col - area.x) as f64 + 0.5) / area.width as f64 * 2.0 - 1.0;
    let y = 1.0 - ((row - area.y) as f64 + 0.5) / area.height as f64 * 2.0;
    Some((x, y))
}

/// Terminal cell containing the given normalized device coordinates.
fn ndc_to_cell(area: Rect, x: f64, y: f64) -> Option<(u16, u16)> {
    if !(-1.0..1.0).contains(&x) || !(-1.0..1.0).contains(&y) {
        return None;
    }
    let col = ((x + 1.0) / 2.0 * area.width as f64) as u16;
    let row = ((1.0 - y) / 2.0 * area.height as f64) as u16;
    Some((area.x + col.min(area.width - 1), area.y + row.min(area.height - 1)))
}

/// Style of the key visible at one cell.
fn cell_style(stage: &Stage, surfaces: &[Surface], ray: Ray) -> Style {
    let Some(hit) = resolve(ray, surfaces) else {
        return Style::default();
    };
    let Some(key) = stage.key(hit.key) else {
        return Style::default();
    };

    match (key.class(), key.is_pressed()) {
        (_, true) => Style::default().bg(Color::Cyan),
        (KeyClass::White, false) => Style::default().bg(Color::White),
        (KeyClass::Black, false) => Style::default().bg(Color::DarkGray),
    }
}

/// Renders the stage and records where it was drawn.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
pub fn render_stage<A: AudioSink>(frame: &mut Frame, area: Rect, app: &mut App<A>) {
    let block = Block::default()
        .title(format!(" Stage ({} keyboards) ", app.stage().keyboards().len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.stage_area = inner;

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let surfaces = app.stage().surfaces(app.tweens());
    let (controller_ndc_x, controller_ndc_y) = app.camera.project(app.controller.position);
    let controller_cell = ndc_to_cell(inner, controller_ndc_x, controller_ndc_y);

    let mut lines = Vec::with_capacity(inner.height as usize);
    for row in inner.y..inner.y + inner.height {
        let mut spans = Vec::with_capacity(inner.width as usize);
        for col in inner.x..inner.x + inner.width {
            let Some((x, y)) = cell_to_ndc(inner, col, row) else {
                continue;
            };
            let style = cell_style(app.stage(), &surfaces, app.camera.ray_through(x, y));

            if controller_cell == Some((col, row)) {
                let marker = if app.controller.is_trigger_down() { "@" } else { "+" };
                spans.push(Span::styled(
                    marker,
                    style.fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(" ", style));
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}
