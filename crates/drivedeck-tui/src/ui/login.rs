//! Login screen widget.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::app::state::{LoginField, LoginForm};
use crate::theme::Theme;
use crate::ui::modals::centered;

/// The sign-in form shown before any backend call is possible.
pub struct LoginView<'a> {
    theme: &'a Theme,
    form: &'a LoginForm,
}

impl<'a> LoginView<'a> {
    pub fn new(theme: &'a Theme, form: &'a LoginForm) -> Self {
        Self { theme, form }
    }

    fn field_line(&self, label: &str, value: &str, field: LoginField) -> Line<'static> {
        let focused = self.form.focus == field && !self.form.authenticating;
        let label_style = if focused {
            self.theme.input_label
        } else {
            self.theme.help_desc
        };
        let mut spans = vec![
            Span::styled(format!("  {label:<10}"), label_style),
            Span::styled(value.to_string(), self.theme.input_text),
        ];
        if focused {
            spans.push(Span::styled(" ", self.theme.input_cursor));
        }
        Line::from(spans)
    }
}

impl Widget for LoginView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered(area, 56, 13);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" drivedeck — sign in ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(self.theme.border);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let masked = "*".repeat(self.form.password.chars().count());
        let remember_focused =
            self.form.focus == LoginField::Remember && !self.form.authenticating;
        let remember_style = if remember_focused {
            self.theme.input_label
        } else {
            self.theme.help_desc
        };
        let remember_mark = if self.form.remember { "x" } else { " " };

        let mut lines = vec![
            Line::raw(""),
            self.field_line("Server", &self.form.base_url, LoginField::BaseUrl),
            self.field_line("Username", &self.form.username, LoginField::Username),
            self.field_line("Password", &masked, LoginField::Password),
            Line::raw(""),
            Line::styled(
                format!("  [{remember_mark}] Remember server address"),
                remember_style,
            ),
            Line::raw(""),
        ];

        if self.form.authenticating {
            lines.push(Line::styled(
                "  Signing in...",
                Style::default().fg(self.theme.info),
            ));
        } else if let Some(error) = &self.form.error {
            lines.push(Line::styled(
                format!("  {error}"),
                Style::default().fg(self.theme.error),
            ));
        } else {
            lines.push(Line::styled(
                "  Tab: next field · Enter: sign in · Esc: quit",
                self.theme.help_desc,
            ));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
