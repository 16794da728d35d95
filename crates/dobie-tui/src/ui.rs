//! Rendering for the run page

use crate::app::App;
use crate::widgets::{centered_rect, spinner_frame, DialogBuilder};
use dobie_client::RunStatus;
use dobie_core::{FileContent, Notice, NoticeLevel, NoticeStyle};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    if app.state.is_loading() {
        draw_loading(frame, app, chunks[1]);
    } else {
        draw_content(frame, app, chunks[1]);
    }

    draw_footer(frame, app, chunks[2]);

    // Overlays, bottom to top
    if let Some(kind) = app.state.progress {
        DialogBuilder::new("Working")
            .width(40)
            .border_color(Color::Cyan)
            .empty_line()
            .message(format!(
                "{} {}",
                spinner_frame(app.ticks),
                kind.progress_message()
            ))
            .empty_line()
            .render(frame, area);
    }
    if let Some(file) = &app.state.modal {
        draw_file_modal(frame, app, file, area);
    }
    if let Some(action) = app.state.pending_confirmation {
        DialogBuilder::new(action.title())
            .width(46)
            .border_color(Color::Red)
            .empty_line()
            .message(format!("Delete \"{}\"?", app.state.project.name))
            .styled_message(Line::from(Span::styled(
                action.warning(),
                Style::default().fg(Color::Red).bold(),
            )))
            .empty_line()
            .buttons(app.dialog_focus)
            .help("[y]es  [n]o  [Tab] switch")
            .render(frame, area);
    }
    if let Some(notice) = app.state.blocking_dialog() {
        draw_notice_dialog(frame, notice, area);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let project = &app.state.project;
    let title = Line::from(vec![
        Span::styled(" dobie ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(project.name.clone(), Style::default().bold()),
        Span::styled(
            format!("  ({})", project.id),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let text = format!("{} Loading run status...", spinner_frame(app.ticks));
    let loading = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Run "));
    frame.render_widget(loading, area);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_status(frame, app, chunks[0]);
    draw_actions(frame, app, chunks[1]);
}

fn status_span(status: &RunStatus) -> Span<'static> {
    match status {
        RunStatus::Running => Span::styled("● Running", Style::default().fg(Color::Green).bold()),
        RunStatus::NotRunning => Span::styled("○ Stopped", Style::default().fg(Color::DarkGray)),
        RunStatus::Other(value) => {
            Span::styled(format!("? {}", value), Style::default().fg(Color::Yellow))
        }
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(vec![Span::raw("Status: "), status_span(&app.state.run_status)]),
        Line::from(""),
    ];

    for (key, value) in &app.state.status_details {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", key), Style::default().fg(Color::DarkGray)),
            Span::raw(value),
        ]));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Run "));
    frame.render_widget(panel, area);
}

fn draw_actions(frame: &mut Frame, app: &App, area: Rect) {
    let running = app.state.run_status.is_running();
    let busy = app.state.is_busy();

    let entry = |key: &'static str, label: &'static str, enabled: bool| {
        let style = if enabled && !busy {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
            Span::styled(format!("[{}] ", key), Style::default().fg(Color::Yellow)),
            Span::styled(label, style),
        ])
    };

    let lines = vec![
        entry("b", "Build", true),
        entry("s", "Run", true),
        entry("x", "Stop", running),
        entry("d", "Delete", true),
        Line::from(""),
        entry("n", "nginx.conf", true),
        entry("c", "docker-compose.yml", true),
    ];

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Actions "));
    frame.render_widget(panel, area);
}

fn level_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
        NoticeLevel::Info => Color::Yellow,
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = if app.state.modal.is_some() {
        "[j/k] Scroll  [Esc] Close"
    } else if app.state.progress.is_some() {
        "[r]eload  [q]uit"
    } else {
        "[b]uild  [s]tart  [x] stop  [d]elete  [n]ginx  [c]ompose  [r]eload  [q]uit"
    };

    let toast = app
        .state
        .notices
        .iter()
        .rev()
        .find(|n| n.style == NoticeStyle::Toast);

    let line = match toast {
        Some(notice) => Line::from(vec![
            Span::styled(
                notice.message.clone(),
                Style::default().fg(level_color(notice.level)).bold(),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::raw(help),
        ]),
        None => Line::from(help),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_file_modal(frame: &mut Frame, app: &App, file: &FileContent, area: Rect) {
    let width = area.width.saturating_sub(8).max(20);
    let height = area.height.saturating_sub(4).max(6);
    let modal_area = centered_rect(width, height, area);

    frame.render_widget(Clear, modal_area);

    let body = Paragraph::new(file.content.as_str())
        .scroll((app.modal_scroll, 0))
        .block(
            Block::default()
                .title(format!(" {} ", file.kind.file_name()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(body, modal_area);
}

fn draw_notice_dialog(frame: &mut Frame, notice: &Notice, area: Rect) {
    let title = match notice.level {
        NoticeLevel::Success => "Success",
        NoticeLevel::Error => "Error",
        NoticeLevel::Info => "Notice",
    };
    DialogBuilder::new(title)
        .width(50)
        .border_color(level_color(notice.level))
        .empty_line()
        .message(notice.message.clone())
        .empty_line()
        .help("[Enter] OK")
        .render(frame, area);
}
