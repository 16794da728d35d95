//! Modal dialog builder
//!
//! Used for the delete confirmation, blocking notices and the progress box.

use crate::app::DialogFocus;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Builder for centered modal dialogs
pub struct DialogBuilder<'a> {
    title: &'a str,
    lines: Vec<Line<'a>>,
    width: u16,
    border_color: Color,
}

impl<'a> DialogBuilder<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            lines: Vec::new(),
            width: 50,
            border_color: Color::Yellow,
        }
    }

    pub fn width(mut self, w: u16) -> Self {
        self.width = w;
        self
    }

    pub fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    /// Add a plain message line
    pub fn message(mut self, text: impl Into<String>) -> Self {
        self.lines.push(Line::from(text.into()));
        self
    }

    pub fn styled_message(mut self, line: Line<'a>) -> Self {
        self.lines.push(line);
        self
    }

    pub fn empty_line(mut self) -> Self {
        self.lines.push(Line::from(""));
        self
    }

    /// Confirm/Cancel buttons, the focused one highlighted
    pub fn buttons(mut self, focus: DialogFocus) -> Self {
        let confirm_style = if focus == DialogFocus::Confirm {
            Style::default().bg(Color::Red).fg(Color::White).bold()
        } else {
            Style::default().fg(Color::Red)
        };
        let cancel_style = if focus == DialogFocus::Cancel {
            Style::default().bg(Color::Gray).fg(Color::Black).bold()
        } else {
            Style::default().fg(Color::Gray)
        };

        self.lines.push(Line::from(vec![
            Span::styled("  Confirm  ", confirm_style),
            Span::raw("    "),
            Span::styled("  Cancel  ", cancel_style),
        ]));
        self
    }

    /// Dimmed key hint line
    pub fn help(mut self, text: &'a str) -> Self {
        self.lines.push(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
        self
    }

    /// Render centered in `area`
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let height = (self.lines.len() as u16) + 2; // borders
        let dialog_area = centered_rect(self.width, height, area);

        frame.render_widget(Clear, dialog_area);

        let dialog = Paragraph::new(self.lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.border_color)),
            );

        frame.render_widget(dialog, dialog_area);
    }
}

/// Rectangle of the given size centered in `area`, clamped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
