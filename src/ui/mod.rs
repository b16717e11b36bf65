//! Terminal user interface.
//!
//! A title bar, a plan view of the stage, and a status line with the
//! current controller state and key bindings.

mod keyboard;

use crate::app::App;
use crate::piano::AudioSink;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub use keyboard::{cell_to_ndc, render_stage};

/// Renders the complete UI.
///
/// The layout is divided into:
/// - Top: title and the notes currently held
/// - Center: the stage, seen from above
/// - Bottom: status message and key bindings
pub fn render<A: AudioSink>(frame: &mut Frame, app: &mut App<A>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(5),    // Stage
            Constraint::Length(2), // Status and help
        ])
        .split(frame.area());

    render_title(frame, chunks[0], app);
    render_stage(frame, chunks[1], app);
    render_status(frame, chunks[2], app);
}

fn render_title<A: AudioSink>(frame: &mut Frame, area: Rect, app: &App<A>) {
    let held: Vec<String> = app
        .stage()
        .iter_keys()
        .filter(|(_, key)| key.is_pressed())
        .map(|(_, key)| key.note().to_string())
        .collect();

    let line = Line::from(vec![
        Span::styled(
            " chordano ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  Held: "),
        Span::styled(
            if held.is_empty() {
                "-".to_string()
            } else {
                held.join(" ")
            },
            Style::default().fg(Color::Yellow),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_status<A: AudioSink>(frame: &mut Frame, area: Rect, app: &App<A>) {
    let key_style = Style::default().fg(Color::Yellow);
    let bracket_style = Style::default().fg(Color::DarkGray);
    let desc_style = Style::default().fg(Color::DarkGray);

    let status = app
        .status_message
        .as_ref()
        .map(|(message, _)| message.clone())
        .unwrap_or_default();
    let trigger = if app.controller.is_trigger_down() {
        "down"
    } else {
        "up"
    };
    let status_line = Line::from(vec![
        Span::styled(status, Style::default().fg(Color::Green)),
        Span::styled(format!("  [controller trigger {}]", trigger), desc_style),
    ]);

    let help_line = Line::from(vec![
        Span::styled("[", bracket_style),
        Span::styled("Click", key_style),
        Span::styled("]Play ", desc_style),
        Span::styled("[", bracket_style),
        Span::styled("Arrows", key_style),
        Span::styled("]Move controller ", desc_style),
        Span::styled("[", bracket_style),
        Span::styled("Space", key_style),
        Span::styled("]Trigger ", desc_style),
        Span::styled("[", bracket_style),
        Span::styled("r", key_style),
        Span::styled("]Release all ", desc_style),
        Span::styled("[", bracket_style),
        Span::styled("q", key_style),
        Span::styled("]Quit", desc_style),
    ]);

    frame.render_widget(Paragraph::new(vec![status_line, help_line]), area);
}
