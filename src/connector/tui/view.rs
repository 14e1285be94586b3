use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::connector::tui::{Focus, UiState};
use crate::domain::{ConditionLevel, SlopeStatus};
use crate::presentation::slope_table::{rows, COLUMN_TITLES};
use crate::presentation::{AppController, SearchState, SuggestionState};

const HELP_LINE: &str =
    "Tab/Shift-Tab: move focus  ↑/↓: pick suggestion or step range  Enter: confirm  Esc: quit";

pub(super) fn draw(frame: &mut Frame, controller: &AppController, ui: &UiState) {
    let search = controller.search_state();
    let diagnostics_height = if search.debug_payload().is_some() { 8 } else { 0 };

    let [title, inputs, dropdown, subscribe, status, results, diagnostics, help] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(diagnostics_height),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    frame.render_widget(
        Paragraph::new("Ski slope conditions near Polish cities".bold()),
        title,
    );
    draw_inputs(frame, inputs, controller, ui);
    draw_dropdown(frame, dropdown, controller, ui);
    draw_subscribe(frame, subscribe, controller, ui);
    draw_status(frame, status, controller);
    draw_results(frame, results, search);
    if let Some(payload) = search.debug_payload() {
        let block = Block::bordered()
            .title("Raw model response")
            .border_style(Style::new().fg(Color::Red));
        frame.render_widget(
            Paragraph::new(payload.to_string())
                .block(block)
                .wrap(Wrap { trim: false }),
            diagnostics,
        );
    }
    frame.render_widget(Paragraph::new(HELP_LINE.dim()), help);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::new().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::bordered().title(title).border_style(style)
}

fn button(label: &str, focused: bool, enabled: bool) -> Paragraph<'_> {
    let mut style = Style::new();
    if !enabled {
        style = style.fg(Color::DarkGray);
    } else if focused {
        style = style.fg(Color::Black).bg(Color::Cyan);
    }
    Paragraph::new(Line::from(Span::styled(format!(" {label} "), style)).centered())
        .block(field_block("", focused))
}

fn draw_inputs(frame: &mut Frame, area: Rect, controller: &AppController, ui: &UiState) {
    let [city_area, range_area, search_area] = Layout::horizontal([
        Constraint::Percentage(55),
        Constraint::Percentage(20),
        Constraint::Percentage(25),
    ])
    .areas(area);

    let city_title = if controller.is_city_confirmed() {
        "City ✓"
    } else {
        "City"
    };
    frame.render_widget(
        Paragraph::new(controller.city()).block(field_block(city_title, ui.focus == Focus::City)),
        city_area,
    );
    frame.render_widget(
        Paragraph::new(controller.range_input())
            .block(field_block("Range (km)", ui.focus == Focus::Range)),
        range_area,
    );

    let searching = controller.search_state().is_searching();
    let label = if searching { "Searching…" } else { "Search" };
    frame.render_widget(
        button(label, ui.focus == Focus::Search, !searching),
        search_area,
    );

    match ui.focus {
        Focus::City => place_cursor(frame, city_area, controller.city()),
        Focus::Range => place_cursor(frame, range_area, controller.range_input()),
        _ => {}
    }
}

fn draw_dropdown(frame: &mut Frame, area: Rect, controller: &AppController, ui: &UiState) {
    let state = controller.suggestion_state();

    let lines: Vec<Line> = match state {
        SuggestionState::Shown(list) => list
            .iter()
            .enumerate()
            .map(|(index, city)| {
                if ui.highlighted == Some(index) {
                    Line::from(format!("> {city}")).reversed()
                } else {
                    Line::from(format!("  {city}"))
                }
            })
            .collect(),
        SuggestionState::Errored(_) => vec![state
            .status_line()
            .map(|s| Line::from(s.to_string()).red())
            .unwrap_or_default()],
        SuggestionState::Empty => vec![Line::from("No matching cities.").dim()],
        _ => state
            .status_line()
            .map(|s| vec![Line::from(s.to_string()).italic()])
            .unwrap_or_default(),
    };

    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Suggestions")),
        area,
    );
}

fn draw_subscribe(frame: &mut Frame, area: Rect, controller: &AppController, ui: &UiState) {
    let [email_area, button_area] =
        Layout::horizontal([Constraint::Percentage(75), Constraint::Percentage(25)]).areas(area);

    frame.render_widget(
        Paragraph::new(controller.email())
            .block(field_block("Email for condition alerts", ui.focus == Focus::Email)),
        email_area,
    );
    frame.render_widget(
        button(
            "Subscribe",
            ui.focus == Focus::Subscribe,
            controller.can_subscribe(),
        ),
        button_area,
    );

    if ui.focus == Focus::Email {
        place_cursor(frame, email_area, controller.email());
    }
}

fn draw_status(frame: &mut Frame, area: Rect, controller: &AppController) {
    let mut lines = Vec::new();

    let search = controller.search_state();
    if let SearchState::Searching { query } = search {
        lines.push(Line::from(format!("Searching {}…", query.summary())).italic());
    } else if let Some(message) = search.message() {
        lines.push(Line::from(message).red());
    }
    if let Some(toast) = controller.toast_message() {
        lines.push(Line::from(toast.to_string()).green().bold());
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_results(frame: &mut Frame, area: Rect, search: &SearchState) {
    let title = search.heading().unwrap_or_else(|| "Results".to_string());
    let block = Block::bordered().title(title);

    let body: Vec<Row> = rows(search.slopes())
        .into_iter()
        .map(|row| {
            let style = level_style(row.level);
            Row::new(vec![
                Cell::from(row.name.clone()),
                Cell::from(Span::styled(
                    row.status.clone(),
                    status_style(&row.slope_status),
                )),
                Cell::from(Line::from(vec![
                    Span::styled(format!("[{}] ", row.level), style),
                    Span::raw(row.conditions.clone()),
                ])),
                Cell::from(row.snow_depth.clone()),
                Cell::from(row.website_label().to_string()),
            ])
        })
        .collect();

    let header = Row::new(COLUMN_TITLES).style(Style::new().add_modifier(Modifier::BOLD));
    let table = Table::new(
        body,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(12),
            Constraint::Percentage(33),
            Constraint::Percentage(10),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn level_style(level: ConditionLevel) -> Style {
    match level {
        ConditionLevel::Good => Style::new().fg(Color::Green),
        ConditionLevel::Fair => Style::new().fg(Color::Yellow),
        ConditionLevel::Bad => Style::new().fg(Color::Red),
        ConditionLevel::Unknown => Style::new().fg(Color::DarkGray),
    }
}

fn status_style(status: &SlopeStatus) -> Style {
    match status {
        SlopeStatus::Open => Style::new().fg(Color::Green),
        SlopeStatus::Partial => Style::new().fg(Color::Yellow),
        SlopeStatus::Closed => Style::new().fg(Color::Red),
        SlopeStatus::Unknown => Style::new().fg(Color::DarkGray),
        SlopeStatus::Other(_) => Style::new(),
    }
}

fn place_cursor(frame: &mut Frame, area: Rect, text: &str) {
    let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let x = area
        .x
        .saturating_add(1)
        .saturating_add(width)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position((x, area.y + 1));
}
