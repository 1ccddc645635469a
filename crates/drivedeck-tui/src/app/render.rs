//! Rendering for the application.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::login::LoginView;
use crate::ui::modals::{ErrorModal, HelpOverlay, PromptModal};
use crate::ui::{format_size, AppLayout, VisibleItemKind};

use super::state::{AppMode, Pane};
use super::App;

/// Width of the file-name column in the file table.
const NAME_COLUMN_WIDTH: usize = 40;

/// Fit `text` into a column of `width` display cells.
///
/// Measures display width, not bytes, so multibyte names neither split a
/// character nor misalign the columns after them. Over-wide text is cut
/// at a character boundary and marked with an ellipsis.
fn fit_cell(text: &str, width: usize) -> String {
    let mut cell = if text.width() <= width {
        text.to_string()
    } else {
        let target = width.saturating_sub(3);
        let mut cut = String::new();
        let mut used = 0;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > target {
                break;
            }
            used += w;
            cut.push(c);
        }
        cut.push_str("...");
        cut
    };
    let padding = width.saturating_sub(cell.width());
    cell.push_str(&" ".repeat(padding));
    cell
}

/// Root sentinel rendered as a slash-prefixed path.
fn display_path(path: &str) -> String {
    if path == "." {
        "/".to_string()
    } else {
        format!("/{path}")
    }
}

impl App {
    /// Render the whole frame for the current mode.
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        if self.mode == AppMode::Login {
            frame.render_widget(LoginView::new(&self.theme, &self.login), area);
            return;
        }

        let layout = AppLayout::new(area);
        self.render_tree(layout.tree, frame);
        self.render_header(layout.header, frame);
        self.render_files(layout.files, frame);
        self.render_footer(layout.footer, frame);

        match self.mode {
            AppMode::CreatingDirectory => frame.render_widget(
                PromptModal::new(&self.theme, "New Directory", self.prompt.as_str()),
                area,
            ),
            AppMode::PickingUpload => frame.render_widget(
                PromptModal::new(&self.theme, "Upload Local File", self.prompt.as_str()),
                area,
            ),
            AppMode::PickingDownload => frame.render_widget(
                PromptModal::new(&self.theme, "Save As", self.prompt.as_str()),
                area,
            ),
            AppMode::Help => frame.render_widget(HelpOverlay::new(&self.theme), area),
            _ => {}
        }

        if let Some(message) = &self.error {
            frame.render_widget(ErrorModal::new(&self.theme, message), area);
        }
    }

    fn render_header(&self, area: Rect, frame: &mut Frame) {
        let line = Line::from(vec![
            Span::styled(" drivedeck ", self.theme.title),
            Span::styled(
                display_path(self.nav.current()),
                Style::default().fg(self.theme.foreground),
            ),
        ]);
        frame.render_widget(Paragraph::new(line).style(self.theme.header), area);
    }

    fn render_tree(&mut self, area: Rect, frame: &mut Frame) {
        let focused = self.focus == Pane::Tree;
        let border = if focused {
            self.theme.title
        } else {
            self.theme.border
        };
        let block = Block::default()
            .title(" Directories ")
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(border);

        let viewport = area.height.saturating_sub(2) as usize;
        let items = self.visible_items();
        self.tree_state.clamp(items.len());
        self.tree_state.ensure_visible(viewport);

        let mut lines = Vec::new();
        for (idx, item) in items
            .iter()
            .enumerate()
            .skip(self.tree_state.offset)
            .take(viewport)
        {
            let (marker, style) = match item.kind {
                VisibleItemKind::Directory { expanded: true } => ("▾ ", self.theme.directory),
                VisibleItemKind::Directory { expanded: false } => ("▸ ", self.theme.directory),
                VisibleItemKind::Placeholder => ("  ", Style::default().fg(self.theme.muted)),
            };
            let mut line = Line::from(vec![
                Span::styled("  ".repeat(item.depth), self.theme.tree_lines),
                Span::styled(marker, self.theme.tree_lines),
                Span::styled(item.label.clone(), style),
            ]);
            if focused && idx == self.tree_state.selected {
                line = line.style(self.theme.selected);
            }
            lines.push(line);
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_files(&self, area: Rect, frame: &mut Frame) {
        let focused = self.focus == Pane::Files;
        let border = if focused {
            self.theme.title
        } else {
            self.theme.border
        };
        let block = Block::default()
            .title(format!(" Files — {} ", display_path(self.nav.current())))
            .title_style(self.theme.title)
            .borders(Borders::ALL)
            .border_style(border);

        let mut lines = vec![Line::styled(
            format!(
                "{} {:>10}  {}",
                fit_cell("Name", NAME_COLUMN_WIDTH),
                "Size",
                "Modified"
            ),
            Style::default()
                .fg(self.theme.muted)
                .add_modifier(Modifier::BOLD),
        )];

        if self.files.is_empty() {
            lines.push(Line::styled(
                "  (empty)",
                Style::default().fg(self.theme.muted),
            ));
        }

        for (idx, file) in self.files.iter().enumerate() {
            let mut line = Line::styled(
                format!(
                    "{} {:>10}  {}",
                    fit_cell(&file.name, NAME_COLUMN_WIDTH),
                    format_size(file.size),
                    file.last_modified
                ),
                self.theme.file,
            );
            if focused && idx == self.file_selected {
                line = line.style(self.theme.selected);
            }
            lines.push(line);
        }

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_footer(&self, area: Rect, frame: &mut Frame) {
        let message = self
            .orchestrator
            .active_message()
            .unwrap_or(self.status.as_str());
        let line = Line::from(vec![
            Span::styled(format!(" {message} "), self.theme.footer),
            Span::styled(
                "· u upload · d download · A mkdir · r refresh · ? help · q quit",
                self.theme.footer,
            ),
        ]);
        frame.render_widget(Paragraph::new(line).style(self.theme.footer), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivedeck_core::{FileEntry, Settings};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_fit_cell_pads_short_text_to_width() {
        assert_eq!(fit_cell("a.txt", 10), "a.txt     ");
    }

    #[test]
    fn test_fit_cell_truncates_multibyte_text_by_display_width() {
        let name = "финальная_версия_отчёта_за_2024_год.pdf";
        let cell = fit_cell(name, 20);
        assert_eq!(cell.width(), 20);
        assert!(cell.ends_with("..."));

        // Same width regardless of bytes per character.
        assert_eq!(fit_cell(name, 20).width(), fit_cell("a".repeat(60).as_str(), 20).width());
    }

    #[test]
    fn test_render_survives_long_multibyte_file_names() {
        let mut app = App::new(
            Settings::default(),
            "http://localhost:8080/api".to_string(),
        );
        app.mode = AppMode::Normal;
        app.files = vec![FileEntry::new(
            "финальная_версия_отчёта_за_2024_год.pdf",
            2048,
            "2024-05-01 10:00",
            ".",
        )];

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }
}
