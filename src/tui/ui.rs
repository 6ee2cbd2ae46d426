//! UI rendering for the TUI.
//!
//! Every frame is drawn straight from the dashboard model, so the playbook
//! on screen is always the playbook in memory.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::layout::{Regions, REMOVE_MARKER_WIDTH};
use crate::app::{AppMode, EditorField, Focus};
use crate::core::COMPLETION_MESSAGE;
use crate::App;

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    if app.mode == AppMode::Help {
        draw_help_screen(frame, app);
        return;
    }

    let regions = Regions::new(frame.area());

    draw_header(frame, app, regions.header);
    draw_catalog(frame, app, regions.catalog);
    draw_playbook(frame, app, regions.playbook);
    draw_log(frame, app, regions.log);
    draw_status_bar(frame, app, regions.status);

    match app.mode {
        AppMode::Prompt(kind) => draw_prompt_overlay(frame, app, kind.title()),
        AppMode::Editor => draw_editor_overlay(frame, app),
        AppMode::Normal | AppMode::Help => {}
    }
}

fn panel<'a>(app: &App, title: &'a str, focused: bool) -> Block<'a> {
    let theme = &app.theme;
    let border = if focused { theme.primary } else { theme.border };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
        .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD))
}

/// Draw the header.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let playbook = app.dashboard.playbook();

    let state = if app.is_running() {
        Span::styled(" ● running ", Style::default().fg(theme.secondary))
    } else {
        Span::styled(" ○ idle ", Style::default().fg(theme.text_muted))
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} pipelines in catalog ", app.dashboard.catalog().len()),
            Style::default().fg(theme.text_dim),
        ),
        Span::styled("│", Style::default().fg(theme.border)),
        Span::styled(
            format!(" {} in playbook ", playbook.len()),
            Style::default().fg(theme.text),
        ),
        Span::styled("│", Style::default().fg(theme.border)),
        state,
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .title(" playdeck ")
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
    );

    frame.render_widget(header, area);
}

/// Draw the pipeline catalog.
fn draw_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let catalog = app.dashboard.catalog();
    let focused = app.focus == Focus::Catalog;

    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .filter_map(|&index| catalog.get(index))
        .map(|p| {
            let marker = if app.dashboard.playbook().contains_pipeline(p.id) { "✓ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.secondary)),
                Span::styled(p.name.clone(), Style::default().fg(theme.text)),
                Span::styled(format!("  {}", p.params), Style::default().fg(theme.text_dim)),
            ]))
        })
        .collect();

    let title = if app.filter.is_empty() {
        " Pipelines ".to_string()
    } else {
        format!(" Pipelines [{}] ", app.filter)
    };

    let list = List::new(items)
        .block(panel(app, &title, focused))
        .highlight_style(highlight(app, focused));

    let mut state = ListState::default()
        .with_offset(app.catalog_offset)
        .with_selected((!app.filtered.is_empty()).then_some(app.catalog_selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the playbook list.
fn draw_playbook(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let playbook = app.dashboard.playbook();
    let focused = app.focus == Focus::Playbook;

    if playbook.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "Empty. Select a pipeline and press Enter to add it.",
            Style::default().fg(theme.text_muted),
        )))
        .wrap(Wrap { trim: true })
        .block(panel(app, " Playbook ", focused));
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = playbook
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let grabbed = app.grabbed == Some(item.unique_id);
            let name_style = if grabbed {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let remove = format!("{:<width$}", "[x]", width = REMOVE_MARKER_WIDTH as usize);

            ListItem::new(Line::from(vec![
                Span::styled(remove, Style::default().fg(theme.warning)),
                Span::styled(format!("{}. ", index + 1), Style::default().fg(theme.text_muted)),
                Span::styled(item.name().to_string(), name_style),
                Span::styled(
                    format!("  {}", item.pipeline.params),
                    Style::default().fg(theme.text_dim),
                ),
            ]))
        })
        .collect();

    let title = if app.grabbed.is_some() { " Playbook (moving) " } else { " Playbook " };
    let list = List::new(items)
        .block(panel(app, title, focused))
        .highlight_style(highlight(app, focused));

    let mut state = ListState::default()
        .with_offset(app.playbook_offset)
        .with_selected(Some(app.playbook_selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn highlight(app: &App, focused: bool) -> Style {
    if focused {
        Style::default().bg(app.theme.selected_bg).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Draw the activity log, pinned to the newest line.
fn draw_log(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let show_stamps = app.config.ui.log_timestamps;

    let mut lines: Vec<Line> = Vec::with_capacity(app.dashboard.log().row_count());
    for entry in app.dashboard.log().lines() {
        let color = if entry.message == COMPLETION_MESSAGE {
            theme.success
        } else if entry.message.starts_with('⏹') || entry.message.contains("already in") {
            theme.warning
        } else {
            theme.text
        };

        for (i, text) in entry.message.split('\n').enumerate() {
            let stamp = if show_stamps && i == 0 {
                format!("{} ", entry.stamp())
            } else if show_stamps {
                " ".repeat(9)
            } else {
                String::new()
            };
            lines.push(Line::from(vec![
                Span::styled(stamp, Style::default().fg(theme.text_muted)),
                Span::styled(text.to_string(), Style::default().fg(color)),
            ]));
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible);

    let log = Paragraph::new(lines)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
        .block(panel(app, " Log ", false));
    frame.render_widget(log, area);
}

/// Draw the status bar.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let text = app.status_message.clone().unwrap_or_else(|| match app.focus {
        Focus::Catalog => {
            "Enter add  e edit  / filter  o file  Tab playbook  r run  x stop  t schedule  w save  ? help"
                .to_string()
        }
        Focus::Playbook => {
            "Space grab/drop  Shift+↑↓ move  d remove  Tab catalog  r run  x stop  t schedule  w save  ? help"
                .to_string()
        }
    });

    let status = Paragraph::new(Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(theme.text_dim),
    )));
    frame.render_widget(status, area);
}

/// Draw a one-line prompt over the main screen.
fn draw_prompt_overlay(frame: &mut Frame, app: &App, title: &str) {
    let theme = &app.theme;
    let area = centered_rect(60, 3, frame.area());

    frame.render_widget(Clear, area);
    let prompt = Paragraph::new(Line::from(Span::styled(
        app.input.as_str(),
        Style::default().fg(theme.text),
    )))
    .block(panel(app, title, true));
    frame.render_widget(prompt, area);

    let cursor = u16::try_from(app.cursor_position).unwrap_or(u16::MAX);
    frame.set_cursor_position((area.x + 1 + cursor, area.y + 1));
}

/// Draw the pipeline edit form.
fn draw_editor_overlay(frame: &mut Frame, app: &App) {
    let Some(form) = app.editor.as_ref() else {
        return;
    };
    let theme = &app.theme;
    let area = centered_rect(60, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = panel(app, " Edit pipeline ", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(inner);

    for (rect, label, value, field) in [
        (rows[0], " Name ", form.name.as_str(), EditorField::Name),
        (rows[1], " Params ", form.params.as_str(), EditorField::Params),
    ] {
        let active = form.field == field;
        let border = if active { theme.primary } else { theme.border };
        let input = Paragraph::new(value).style(Style::default().fg(theme.text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(label),
        );
        frame.render_widget(input, rect);

        if active {
            let col = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
            frame.set_cursor_position((rect.x + 1 + col, rect.y + 1));
        }
    }
}

/// Draw help screen with keyboard shortcuts.
fn draw_help_screen(frame: &mut Frame, app: &App) {
    let theme = &app.theme;

    let sections: [(&str, &[(&str, &str)]); 4] = [
        (
            "Catalog",
            &[
                ("↑/↓ j/k", "Select pipeline"),
                ("Enter / click", "Add to playbook"),
                ("/", "Filter pipelines"),
                ("e", "Edit pipeline"),
            ],
        ),
        (
            "Playbook",
            &[
                ("Space", "Grab / drop entry"),
                ("Shift+↑/↓ K/J", "Move entry"),
                ("drag", "Reorder with the mouse"),
                ("d / Del / [x]", "Remove entry"),
                ("o", "Add pipeline file"),
            ],
        ),
        (
            "Run",
            &[
                ("r", "Run playbook"),
                ("x", "Stop run"),
                ("t", "Schedule playbook"),
                ("w", "Save configuration to log"),
            ],
        ),
        ("General", &[("Tab", "Switch panel"), ("?", "Toggle help"), ("q / Esc", "Quit")]),
    ];

    let mut lines = Vec::new();
    for (section, keys) in sections {
        lines.push(Line::from(Span::styled(
            section,
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<16}"), Style::default().fg(theme.accent)),
                Span::styled(*description, Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::default());
    }

    let help = Paragraph::new(lines).block(panel(app, " Help ", true));
    frame.render_widget(help, frame.area());
}

/// A rectangle of fixed height centered in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = u16::try_from(u32::from(area.width) * u32::from(percent_x) / 100)
        .unwrap_or(area.width)
        .min(area.width);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}
