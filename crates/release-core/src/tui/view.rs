//! Rendering for the release flow. Pure presentation: reads the `Session`,
//! never mutates it.

use super::flow::{FlowState, Session, SELECT_TITLE};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Accent color used throughout (amber, #D19A66).
pub const ACCENT: Color = Color::Rgb(0xD1, 0x9A, 0x66);

/// Line spinner frames.
const SPINNER: &[&str] = &["|", "/", "-", "\\"];

fn accent() -> Style {
    Style::default().fg(ACCENT)
}

/// Redraw the whole view for the current session state.
pub fn render(frame: &mut Frame, session: &Session) {
    let area = frame.area();

    match session.state {
        FlowState::CollectIosPath => {
            render_input(frame, area, session, "Location of your Info.plist");
        }
        FlowState::CollectAndroidPath => {
            render_input(frame, area, session, "Location of your build.gradle");
        }
        FlowState::SelectingIncrement => render_select(frame, area, session),
        _ => render_progress(frame, area, session),
    }
}

/// Spinner plus the label of the step in flight.
fn render_progress(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(1)])
        .split(area);

    let spinner = SPINNER[session.tick % SPINNER.len()];
    let line = Line::from(vec![
        Span::raw("   "),
        Span::styled(spinner, accent()),
        Span::raw(" "),
        Span::styled(session.process_label, accent()),
    ]);
    frame.render_widget(Paragraph::new(line), chunks[0]);
}

/// Single-line path prompt with a visible cursor.
fn render_input(frame: &mut Frame, area: Rect, session: &Session, prompt: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Prompt
            Constraint::Length(3), // Input
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        format!("   {prompt}"),
        accent().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    let value = if session.input.value.is_empty() {
        Span::styled("...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(session.input.value.as_str(), accent())
    };
    let input = Paragraph::new(Line::from(vec![Span::raw("> "), value]))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(input, chunks[1]);

    // Cursor sits inside the bordered input, after the "> " prefix
    let cursor_cols = session.input.value[..session.input.cursor].chars().count() as u16;
    frame.set_cursor_position((chunks[1].x + 3 + cursor_cols, chunks[1].y + 1));
}

/// The increment list with result previews.
fn render_select(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(9),    // List
            Constraint::Length(2), // Help
        ])
        .split(area);

    let title = Paragraph::new(Span::styled(
        format!("   {SELECT_TITLE}"),
        accent().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = session
        .choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let text = format!("{}. {} - {}", i + 1, choice.kind, choice.preview);
            let (prefix, style) = if i == session.cursor {
                ("> ", accent().add_modifier(Modifier::BOLD))
            } else {
                ("  ", accent())
            };
            ListItem::new(Line::from(Span::styled(format!("  {prefix}{text}"), style)))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(session.cursor));
    frame.render_stateful_widget(List::new(items), chunks[1], &mut list_state);

    let help = Paragraph::new("  ↑/↓ Move • Enter Confirm • Ctrl+C Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
