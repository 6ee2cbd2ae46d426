//! Input handling for the TUI.
//!
//! Processes keyboard and mouse events and turns them into `App` calls.
//! Mouse events go through a single handler for the whole screen: the
//! pointer position is resolved to a row with [`hit_test`] and the row's
//! playbook key decides what happens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::layout::{hit_test, panel_at};
use crate::app::{AppMode, Focus, PromptKind};
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Help => handle_help_mode(key, app),
        AppMode::Prompt(_) => handle_prompt_mode(key, app),
        AppMode::Editor => handle_editor_mode(key, app),
        AppMode::Normal => handle_normal_mode(key, app),
    }
}

/// Handle mouse events.
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    if !app.config.ui.mouse || app.mode != AppMode::Normal {
        return;
    }

    let hit = hit_test(app, mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(hit),
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_drag(hit),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(hit),
        MouseEventKind::ScrollUp => scroll_under_pointer(mouse, app, -1),
        MouseEventKind::ScrollDown => scroll_under_pointer(mouse, app, 1),
        _ => {}
    }
}

/// The wheel scrolls the list under the pointer, not the focused one.
fn scroll_under_pointer(mouse: MouseEvent, app: &mut App, delta: isize) {
    if let Some(list) = panel_at(app, mouse.column, mouse.row) {
        app.step_selection(list, delta);
    }
}

/// Handle input in help mode.
fn handle_help_mode(key: KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::Enter) {
        app.toggle_help();
    }
}

/// Handle input while a prompt is open.
fn handle_prompt_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => app.clear_input(),
        KeyCode::Char(c) => app.enter_char(c),
        _ => {}
    }
}

/// Handle input in the pipeline editor.
fn handle_editor_mode(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => app.save_editor(),
        KeyCode::Esc => app.cancel_editor(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.editor_next_field(),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Char(c) => app.enter_char(c),
        _ => {}
    }
}

/// Handle input in normal mode.
fn handle_normal_mode(key: KeyEvent, app: &mut App) {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if app.grabbed.is_some() {
                app.cancel_grab();
            } else {
                app.quit();
            }
        }
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('?') => app.toggle_help(),

        // Reordering
        KeyCode::Up if shift && app.focus == Focus::Playbook => app.move_selected(-1),
        KeyCode::Down if shift && app.focus == Focus::Playbook => app.move_selected(1),
        KeyCode::Char('K') if app.focus == Focus::Playbook => app.move_selected(-1),
        KeyCode::Char('J') if app.focus == Focus::Playbook => app.move_selected(1),
        KeyCode::Char(' ') if app.focus == Focus::Playbook => app.toggle_grab(),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),

        // Catalog
        KeyCode::Enter if app.focus == Focus::Catalog => app.add_selected(),
        KeyCode::Char('e') if app.focus == Focus::Catalog => app.open_editor(),
        KeyCode::Char('/') => app.open_prompt(PromptKind::Filter),

        // Playbook
        KeyCode::Char('d') | KeyCode::Delete if app.focus == Focus::Playbook => {
            app.remove_selected();
        }
        KeyCode::Char('o') => app.open_prompt(PromptKind::File),

        // Run controls
        KeyCode::Char('r') => app.run(),
        KeyCode::Char('x') => app.stop(),
        KeyCode::Char('t') => app.open_prompt(PromptKind::Schedule),
        KeyCode::Char('w') => app.save_configuration(),

        _ => {}
    }
}
