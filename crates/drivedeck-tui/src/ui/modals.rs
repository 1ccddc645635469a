//! Modal dialog widgets.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::event::get_help_sections;
use crate::theme::Theme;

/// Center a fixed-size popup inside `area`.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(width)) / 2 + area.x;
    let y = (area.height.saturating_sub(height)) / 2 + area.y;
    Rect::new(x, y, width, height)
}

/// Blocking notification for a failed operation.
///
/// Stays up until the user presses a key; the browser underneath is
/// untouched because failed operations never mutate it.
pub struct ErrorModal<'a> {
    theme: &'a Theme,
    message: &'a str,
}

impl<'a> ErrorModal<'a> {
    pub fn new(theme: &'a Theme, message: &'a str) -> Self {
        Self { theme, message }
    }
}

impl Widget for ErrorModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 60, 8);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Error ")
            .title_style(
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.error));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::raw(""),
            Line::styled(self.message, Style::default().fg(self.theme.foreground)),
            Line::raw(""),
            Line::styled("Press any key to dismiss", self.theme.help_desc),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// One-line text prompt (new directory name, upload path, save target).
pub struct PromptModal<'a> {
    theme: &'a Theme,
    title: &'a str,
    input: &'a str,
}

impl<'a> PromptModal<'a> {
    pub fn new(theme: &'a Theme, title: &'a str, input: &'a str) -> Self {
        Self {
            theme,
            title,
            input,
        }
    }
}

impl Widget for PromptModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 64, 6);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines = vec![
            Line::from(vec![
                Span::styled("> ", self.theme.input_label),
                Span::styled(self.input, self.theme.input_text),
                Span::styled(" ", self.theme.input_cursor),
            ]),
            Line::raw(""),
            Line::styled("Enter to confirm, Esc to cancel", self.theme.help_desc),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Help overlay listing the key bindings.
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sections = get_help_sections();
        let height = sections
            .iter()
            .map(|s| s.bindings.len() + 2)
            .sum::<usize>() as u16
            + 2;
        let popup = centered(area, 54, height);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Help ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        for section in &sections {
            lines.push(Line::styled(section.title, self.theme.title));
            for binding in &section.bindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<14}", binding.keys), self.theme.help_key),
                    Span::styled(binding.description, self.theme.help_desc),
                ]));
            }
            lines.push(Line::raw(""));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
