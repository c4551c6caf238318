use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};

use crate::model::{Model, StatusLevel, UIData};

pub const FILTER_BAR_HEIGHT: usize = 3;
pub const STATUSLINE_HEIGHT: usize = 1;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const TABLE_BORDER_HEIGHT: usize = 2;
pub const COLUMN_WIDTH_MARGIN: usize = 2;
pub const MAX_COLUMN_WIDTH: usize = 40;

const FORM_FIELD_HEIGHT: u16 = 3;

#[derive(Debug, Default)]
pub struct TableUI {
    table_state: TableState,
}

impl TableUI {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let area = frame.area();

        let [filter_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(FILTER_BAR_HEIGHT as u16),
            Constraint::Min(1),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
        ])
        .areas(area);

        self.draw_filter_bar(uidata, frame, filter_area);
        self.draw_table(uidata, frame, table_area);
        self.draw_statusline(uidata, frame, status_area);

        if uidata.show_form {
            self.draw_form(uidata, frame, table_area);
        }
        if uidata.show_popup {
            self.draw_popup(uidata, frame, area);
        }
    }

    fn draw_filter_bar(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = Vec::new();
        for (label, selected) in uidata.filters.iter() {
            spans.push(format!(" {label}: ").into());
            let value = if selected == crate::filter::ALL_OPTION {
                selected.clone().dark_gray()
            } else {
                selected.clone().yellow().bold()
            };
            spans.push(value);
            spans.push("  ".into());
        }
        spans.push(format!("[{}/{}]", uidata.nrows, uidata.total_rows).blue());

        let block = Block::bordered()
            .title(" Filters ")
            .title_bottom(Line::from(" <c> country  <s> sector  <i> interest  <r> reset ").right_aligned());
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn draw_table(&mut self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let title = Line::from(format!(" {} ", uidata.name).bold());
        let instructions = Line::from(vec![
            " Add ".into(),
            "<A>".blue().bold(),
            " Export ".into(),
            "<E>".blue().bold(),
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);

        let header = Row::new(uidata.headers.iter().map(|h| Cell::from(h.as_str())))
            .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
        let rows = uidata
            .rows
            .iter()
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));
        let widths = uidata
            .column_widths
            .iter()
            .map(|&w| Constraint::Length(w as u16));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray).bold());

        if uidata.rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(uidata.selected_row));
        }
        // Rows are already windowed by the model
        *self.table_state.offset_mut() = 0;
        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_statusline(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let style = match uidata.status_level {
            StatusLevel::Info => Style::default(),
            StatusLevel::Success => Style::default().fg(Color::Green),
            StatusLevel::Warning => Style::default().fg(Color::Yellow).bold(),
            StatusLevel::Error => Style::default().fg(Color::Red).bold(),
        };
        frame.render_widget(Paragraph::new(uidata.status_message.as_str()).style(style), area);
    }

    fn draw_form(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let height = FORM_FIELD_HEIGHT * uidata.form.len() as u16 + 3;
        let popup_area = fixed_height_rect(70, height, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Add company ")
            .title_style(Style::default().fg(Color::Green).bold())
            .title_bottom(Line::from(" <Enter> add  <Tab> next  <Esc> back ").centered())
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Green));
        frame.render_widget(block, popup_area);

        let inner_area = popup_area.inner(Margin::new(2, 1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                uidata
                    .form
                    .iter()
                    .map(|_| Constraint::Length(FORM_FIELD_HEIGHT)),
            )
            .split(inner_area);

        for (idx, (field, chunk)) in uidata.form.iter().zip(chunks.iter()).enumerate() {
            let focused = idx == uidata.form_focus;
            let border_style = if focused {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let input = Paragraph::new(field.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(field.label)
                    .border_style(border_style),
            );
            frame.render_widget(input, *chunk);

            if focused && let Some(pos) = field.curser_pos {
                frame.set_cursor_position(Position::new(chunk.x + 1 + pos as u16, chunk.y + 1));
            }
        }
    }

    fn draw_popup(&self, uidata: &UIData, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);
        frame.render_widget(Clear, popup_area);
        let block = Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str()).block(block),
            popup_area,
        );
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn fixed_height_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(r);
    centered_rect(percent_x, 100, middle)
}
