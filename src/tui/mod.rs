pub mod app;
pub mod ui;

use std::{error::Error, io};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::runtime::Handle;

use crate::client::ApiClient;
use app::{App, InputMode};
use ui::ui;

/// Runs the interactive UI against `api`. Requests are driven on `runtime`.
pub fn run_tui(api: ApiClient, runtime: Handle) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api, runtime);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.toggle_selected(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
                KeyCode::Char('f') => app.cycle_filter(),
                KeyCode::Char('/') => app.start_search(),
                KeyCode::Char('r') => app.reload(),
                _ => {}
            },
            InputMode::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
                KeyCode::Char(c) => app.search_push(c),
                KeyCode::Backspace => app.search_pop(),
                _ => {}
            },
            InputMode::Form => match key.code {
                KeyCode::Esc => app.form_cancel(),
                KeyCode::Enter => app.form_enter(),
                KeyCode::Tab | KeyCode::Down => app.form_next_field(),
                KeyCode::BackTab | KeyCode::Up => app.form_previous_field(),
                KeyCode::Left => app.form_cycle_project(false),
                KeyCode::Right => app.form_cycle_project(true),
                KeyCode::Delete => app.form_delete_project(),
                KeyCode::Char(c) => app.form_input(c),
                KeyCode::Backspace => app.form_backspace(),
                _ => {}
            },
        }
    }
}
