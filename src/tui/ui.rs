//! Stateless rendering for the routine game.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::App;
use crate::game::{Cue, Phase, StageRound};

/// Renders the whole frame for the current phase.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Slots or screen text
            Constraint::Length(5), // Tray
            Constraint::Length(3), // Status
        ])
        .split(area);

    let title = Paragraph::new("Routine Match - Order Your Day")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match app.controller().phase() {
        Phase::Start => draw_screen_text(
            frame,
            chunks[1],
            "Drag each picture to the task it shows.\n\nPress Enter to start, 'q' to quit.",
        ),
        Phase::Success => draw_screen_text(
            frame,
            chunks[1],
            "Well done! You ordered the whole day!\n\nPress 'r' to play again, 'q' to quit.",
        ),
        Phase::StageOne | Phase::StageTwo => {
            if let Some(round) = app.controller().round() {
                draw_slots(frame, chunks[1], round, app.slot_cursor());
                draw_tray(frame, chunks[2], round, app.item_cursor());
            }
        }
    }

    draw_status(frame, chunks[3], app);
}

fn draw_screen_text(frame: &mut Frame, area: Rect, text: &str) {
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, center_rect(area, 60, 8));
}

fn draw_slots(frame: &mut Frame, area: Rect, round: &StageRound, cursor: usize) {
    let lines: Vec<Line> = round
        .slots()
        .iter()
        .enumerate()
        .map(|(ix, slot)| {
            let marker = if slot.is_filled() { "[*]" } else { "[ ]" };
            let base = if slot.is_filled() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            let style = if ix == cursor {
                base.bg(Color::White).fg(Color::Black)
            } else {
                base
            };
            Line::from(Span::styled(format!("{} {}", marker, slot.label()), style))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Tasks").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_tray(frame: &mut Frame, area: Rect, round: &StageRound, cursor: usize) {
    let mut spans = Vec::new();
    for (ix, item) in round.items().iter().enumerate() {
        let name = short_asset_name(item.asset().as_str());
        let base = if item.is_locked() {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let style = if ix == cursor {
            base.bg(Color::White).fg(Color::Black)
        } else {
            base
        };
        spans.push(Span::styled(format!(" {} ", name), style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title("Pictures").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match app.banner() {
        Some(Cue::Correct) => ("That's right!", Color::Green),
        Some(Cue::Incorrect) => ("Oops, try again!", Color::Red),
        Some(Cue::StageComplete) => ("Hooray! All done!", Color::Magenta),
        None => match app.controller().phase() {
            Phase::StageOne | Phase::StageTwo => (
                "Arrows pick a picture and a task, Enter drops it. 'r' restarts.",
                Color::Yellow,
            ),
            _ => ("", Color::Yellow),
        },
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

/// Trims an asset path down to a readable chip label.
fn short_asset_name(path: &str) -> &str {
    path.rsplit('/')
        .next()
        .unwrap_or(path)
        .trim_end_matches(".jpg")
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(area.height.saturating_sub(height) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Length(area.width.saturating_sub(width) / 2),
        ])
        .split(vert[1])[1]
}
