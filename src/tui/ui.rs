use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};

use crate::commands::{days_left_label, progress_bar, short_id};
use crate::urgency::Urgency;
use super::app::{App, InputField, InputMode};

pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Normal => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::DueToday => Color::LightRed,
        Urgency::Overdue => Color::Red,
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Selected task gauge
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let views = app.views();
    let rows: Vec<Row> = views
        .iter()
        .map(|v| {
            let t = v.task;
            Row::new(vec![
                Cell::from(short_id(&t.id)),
                Cell::from(t.title.clone()),
                Cell::from(t.due_date.date_naive().to_string()),
                Cell::from(t.interval_label()),
                Cell::from(format!(
                    "{} {:>3}%",
                    progress_bar(v.progress.fraction, app.bar_width),
                    v.progress.percent()
                )),
                Cell::from(days_left_label(v.progress.days_remaining)),
                Cell::from(v.urgency.label()),
            ]).style(Style::default().fg(urgency_color(v.urgency)))
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(6),
        Constraint::Length(u16::try_from(app.bar_width).unwrap_or(u16::MAX).saturating_add(5)),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let title = format!("Recurdo - {} due today", app.badge);
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Title", "Due", "Every", "Progress", "Left", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let selected = app.state.selected().and_then(|i| views.get(i)).map(|v| {
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(v.task.title.clone()))
            .gauge_style(Style::default().fg(urgency_color(v.urgency)))
            .ratio(v.progress.clamped())
            .label(format!(
                "{}% of {} elapsed, {}",
                v.progress.percent(),
                v.task.interval_label(),
                days_left_label(v.progress.days_remaining)
            ))
    });
    drop(views);

    f.render_stateful_widget(table, chunks[0], &mut app.state);
    match selected {
        Some(gauge) => f.render_widget(gauge, chunks[1]),
        None => f.render_widget(Block::default().borders(Borders::ALL).title("No tasks"), chunks[1]),
    }

    let help_text = match &app.status {
        Some(status) if app.input_mode == InputMode::Normal => status.clone(),
        _ => match app.input_mode {
            InputMode::Normal => "q: Quit | a: Add | t: Title | d: Due | i: Interval | Space/r: Renew | x: Del | g: Refresh".to_string(),
            InputMode::Editing => "Enter: Save | Esc: Cancel".to_string(),
            InputMode::Adding => match &app.status {
                Some(status) => format!("{} | Enter: Next Step | Esc: Cancel", status),
                None => "Enter: Next Step | Esc: Cancel".to_string(),
            },
        },
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area); // Clear the area first

        let title = match app.input_mode {
            InputMode::Adding => match app.add_state.step {
                0 => "Add Task: Enter Title",
                1 => "Add Task: Repeat Every (e.g. 10d, 2w, 1m; blank for once)",
                2 => "Add Task: Due Date (YYYY-MM-DD; blank for one interval from today)",
                _ => "Add Task",
            },
            InputMode::Editing => match app.input_field {
                InputField::Title => "Edit Title",
                InputField::Due => "Edit Due Date (YYYY-MM-DD)",
                InputField::Interval => "Edit Interval (e.g. 10d, 2w, 1m; blank for once)",
                InputField::None => "Edit",
            },
            InputMode::Normal => "",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn draws_with_oversized_bar_width() {
        let mut app = App::new(Box::new(MemoryStore::default()), 10);
        app.bar_width = usize::MAX;
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
    }
}
