//! TUI application runner.
//!
//! Handles the main event loop and terminal setup/teardown.

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use super::{draw, handle_events, handle_mouse};
use crate::App;

/// Run the dashboard until the user quits.
pub fn run_tui(mut app: App) -> Result<()> {
    let mouse = app.config.ui.mouse;
    setup_terminal(mouse)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_main_loop(&mut terminal, &mut app);

    restore_terminal(mouse)?;

    result
}

/// Setup the terminal for TUI mode.
fn setup_terminal(mouse: bool) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    if mouse {
        execute!(stdout(), EnableMouseCapture)?;
    }

    // Restore the terminal before the panic message is printed
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(mouse);
        original_hook(panic_info);
    }));

    Ok(())
}

/// Restore the terminal to normal mode.
fn restore_terminal(mouse: bool) -> Result<()> {
    if mouse {
        execute!(stdout(), DisableMouseCapture)?;
    }
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Main event loop.
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        let size = terminal.size()?;
        app.resize(ratatui::layout::Rect::new(0, 0, size.width, size.height));

        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => handle_events(key, app),
                Event::Mouse(mouse) => handle_mouse(mouse, app),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }

        // Release run messages whose time has come
        app.tick();
    }

    Ok(())
}
