use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::event_popup::EventPopup;
use crate::components::match_tree::{MatchLeaf, TreeRow};
use crate::state::app_state::{Focus, FormField};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, centered_rect};
use match_api::DisplayStatus;

const KEY_HINTS: &str =
    "Tab focus  F5 fetch  Enter open/toggle  o/O expand/collapse  \" logs  f full screen  q quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_form(f, layout.form, app);
            draw_status(f, layout.status, app);
        }
        draw_tree(f, layout.tree, app);

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        if let Some(popup) = app.state.popup.as_ref() {
            draw_popup(f, f.area(), &popup.popup, popup.scroll_offset);
        }
        if let Some(alert) = app.state.alert.as_deref() {
            draw_alert(f, f.area(), alert);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn focus_color(app: &App, pane: Focus) -> Color {
    if app.state.focus == pane { Color::White } else { Color::DarkGray }
}

// ---------------------------------------------------------------------------
// Query form
// ---------------------------------------------------------------------------

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(focus_color(app, Focus::Form)).title(" Query ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let form = &app.state.form;
    let mut lines = Vec::with_capacity(FormField::ALL.len() * 2 + 2);
    for field in FormField::ALL {
        let selected = app.state.focus == Focus::Form && form.selected == field;
        let label_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if selected { "> " } else { "  " };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", field.label()),
            label_style,
        )));

        let mut value = form.value(field).to_string();
        if selected && form.editing {
            value.push('▏');
        }
        let value_style = if selected && form.editing {
            Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!("    {value}"), value_style)));
    }

    lines.push(Line::from(""));
    let hint = if form.editing {
        "Type to edit  Enter/Esc done"
    } else {
        "i edit  Enter fetch"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Accordion tree
// ---------------------------------------------------------------------------

fn draw_tree(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.state.tree.tree.as_ref() {
        Some(tree) if !tree.is_empty() => format!(" Matches ({}) ", tree.match_count()),
        _ => " Matches ".to_string(),
    };
    let block = default_border(focus_color(app, Focus::Tree)).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(tree) = app.state.tree.tree.as_ref() else {
        draw_placeholder(f, inner, "No matches loaded. Fill in the query and press F5.");
        return;
    };
    if tree.is_empty() {
        draw_placeholder(f, inner, "No matches found.");
        return;
    }

    let selected = match app.state.tree.selected_row() {
        Some(TreeRow::Match(leaf)) if app.state.focus == Focus::Tree => Some(leaf),
        _ => None,
    };
    let (list_area, detail_area) = if selected.is_some() && inner.height > 6 {
        let [list, detail] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(inner);
        (list, Some(detail))
    } else {
        (inner, None)
    };

    let rows = tree.visible_rows();
    let height = list_area.height as usize;
    let cursor = app.state.tree.cursor;
    let offset = (cursor + 1).saturating_sub(height.max(1));

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, row)| {
            let is_cursor = idx == cursor && app.state.focus == Focus::Tree;
            tree_row_line(*row, is_cursor)
        })
        .collect();
    f.render_widget(Paragraph::new(lines), list_area);

    if let (Some(leaf), Some(detail)) = (selected, detail_area) {
        draw_match_detail(f, detail, leaf);
    }
}

fn tree_row_line(row: TreeRow<'_>, is_cursor: bool) -> Line<'_> {
    let indent = "  ".repeat(row.depth());
    let mut spans = vec![Span::raw(indent)];

    match row {
        TreeRow::Competition(c) => spans.push(Span::styled(
            c.name.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TreeRow::Group(g) => spans.push(Span::styled(
            g.name.as_str(),
            Style::default().fg(Color::LightBlue),
        )),
        TreeRow::Round(r) => spans.push(Span::styled(
            r.name.as_str(),
            Style::default().fg(Color::Blue),
        )),
        TreeRow::Matchday(md) => {
            let arrow = if md.expanded { "▾ " } else { "▸ " };
            spans.push(Span::raw(arrow));
            spans.push(Span::styled(
                md.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", md.range_label),
                Style::default().fg(Color::DarkGray),
            ));
        }
        TreeRow::Day(d) => spans.push(Span::styled(
            d.day.as_str(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        )),
        TreeRow::Match(leaf) => spans.extend(match_spans(leaf)),
    }

    let line = Line::from(spans);
    if is_cursor {
        line.style(Style::default().add_modifier(Modifier::REVERSED))
    } else {
        line
    }
}

/// Colour per status category.
const STATUS_COLORS: [(&str, Color); 3] = [
    ("match-finished", Color::Green),
    ("match-live", Color::Red),
    ("match-scheduled", Color::Yellow),
];

fn status_style(status: DisplayStatus) -> Style {
    let color = STATUS_COLORS
        .iter()
        .find(|(class, _)| *class == status.class_name())
        .map_or(Color::White, |(_, color)| *color);
    let style = Style::default().fg(color);
    if status == DisplayStatus::Live {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn match_spans(leaf: &MatchLeaf) -> Vec<Span<'_>> {
    let mut spans = vec![
        Span::styled(format!("[{:<4}] ", leaf.status.short_label()), status_style(leaf.status)),
        Span::raw(leaf.home.name.as_str()),
        Span::styled(
            format!("  {}  ", leaf.score),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(leaf.away.name.as_str()),
        Span::styled(
            format!("  {}", leaf.kickoff_label),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(full_time) = leaf.full_time_label.as_deref() {
        spans.push(Span::styled(
            format!("  {full_time}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}

fn draw_match_detail(f: &mut Frame, area: Rect, leaf: &MatchLeaf) {
    let dim = Style::default().fg(Color::DarkGray);
    let hint = if leaf.is_selectable() {
        "Enter: show match events"
    } else {
        "Events appear once the match is finished"
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{}: ", leaf.home.logo_alt), dim),
            Span::raw(leaf.home.logo_url.as_str()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", leaf.away.logo_alt), dim),
            Span::raw(leaf.away.logo_url.as_str()),
        ]),
        Line::from(Span::styled(
            format!("{}  {hint}", leaf.record.status.label()),
            dim,
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn draw_popup(f: &mut Frame, area: Rect, popup: &EventPopup, scroll_offset: u16) {
    let width = (area.width / 10 * 7).max(40);
    let height = (area.height / 10 * 7).max(12);
    let rect = centered_rect(width, height, area);
    f.render_widget(Clear, rect);

    let block = default_border(Color::Yellow)
        .title(format!(" {} ", popup.title))
        .title_bottom(Line::from(" Esc close  j/k scroll ").alignment(Alignment::Right));
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled("Red Cards", heading))];

    if let Some(placeholder) = popup.red_cards_placeholder() {
        lines.push(Line::from(Span::styled(placeholder, dim)));
    }
    for card in &popup.red_cards {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(Color::Red)),
            Span::raw(format!("{} ", card.entry.player_name)),
            Span::styled(format!("({}) ", card.team_name), dim),
            Span::raw(card.entry.time_label.as_str()),
        ]));
        lines.push(Line::from(Span::styled(format!("  {}", card.entry.image_url), dim)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Scorers", heading)));

    if let Some(placeholder) = popup.scorers_placeholder() {
        lines.push(Line::from(Span::styled(placeholder, dim)));
    }
    for team in &popup.scorers {
        lines.push(Line::from(Span::styled(
            team.team_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for scorer in &team.players {
            lines.push(Line::from(vec![
                Span::raw(format!("  ⚽ {} ", scorer.player_name)),
                Span::raw(scorer.time_label.as_str()),
            ]));
            lines.push(Line::from(Span::styled(format!("    {}", scorer.image_url), dim)));
        }
    }

    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll_offset, 0)),
        inner,
    );
}

fn draw_alert(f: &mut Frame, area: Rect, message: &str) {
    let rect = centered_rect(60, 6, area);
    f.render_widget(Clear, rect);

    let block = default_border(Color::Red).title(" Error ");
    let inner = block.inner(rect);
    f.render_widget(block, rect);

    let lines = vec![
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if let Some(message) = app.state.status_message.as_deref() {
        spans.push(Span::styled(message, Style::default().fg(Color::White)));
        spans.push(Span::raw("  "));
    }
    if let Some(loaded_at) = app.state.tree.loaded_at {
        spans.push(Span::styled(
            format!("updated {}  ", loaded_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Green))
        .style_trace(Style::default().fg(Color::Magenta));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 0, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_category_has_its_own_colour() {
        let statuses = [DisplayStatus::Finished, DisplayStatus::Live, DisplayStatus::Scheduled];
        let colors: Vec<_> = statuses.iter().map(|s| status_style(*s).fg).collect();
        assert_eq!(colors[0], Some(Color::Green));
        assert_eq!(colors[1], Some(Color::Red));
        assert_eq!(colors[2], Some(Color::Yellow));
        assert!(status_style(DisplayStatus::Live).add_modifier.contains(Modifier::BOLD));
    }
}
