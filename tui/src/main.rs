//! MedSearch: interactive Ratatui front end.
//!
//! Layout:
//!   ┌─── header: route, view tabs, signed-in user ───────────────────────┐
//!   ├─── view ───────────────────────────────────────────────────────────┤
//!   │  Login | Search | Drug details | Dashboard | Upload                │
//!   ├────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                             │
//!   └────────────────────────────────────────────────────────────────────┘
//!
//! Usage:
//!   cargo run -p medsearch-tui [-- path/to/medsearch.toml]
//!
//! Suggestion lookups run on a background tokio runtime; finished lookups are
//! applied on the next frame.

mod app;
mod ui;

use std::{io, path::PathBuf, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use medsearch_catalog::InMemoryCatalog;
use medsearch_contracts::navigation::Route;
use medsearch_core::MedSearchConfig;

use crate::app::{App, LoginField, Screen};

const TICK_MS: u64 = 50;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Key handling ──────────────────────────────────────────────────────────────

/// Returns false when the user asked to quit.
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if let KeyCode::Char('c') = code {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
    }

    if app.session.is_authenticated() {
        match code {
            KeyCode::F(1) => return nav(app, Route::Search),
            KeyCode::F(2) => return nav(app, Route::Dashboard),
            KeyCode::F(3) => return nav(app, Route::Upload),
            KeyCode::F(4) => {
                app.logout();
                return true;
            }
            _ => {}
        }
    }

    match &mut app.screen {
        Screen::Login(form) => match code {
            KeyCode::Esc => return false,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.field = match form.field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Enter => app.submit_login(),
            KeyCode::Backspace => {
                match form.field {
                    LoginField::Email => form.email.pop(),
                    LoginField::Password => form.password.pop(),
                };
            }
            KeyCode::Char(c) => match form.field {
                LoginField::Email => form.email.push(c),
                LoginField::Password => form.password.push(c),
            },
            _ => {}
        },
        Screen::Search(_) => match code {
            KeyCode::Tab => app.cycle_focus(),
            KeyCode::Up => app.move_cursor(false),
            KeyCode::Down => app.move_cursor(true),
            KeyCode::Enter => app.activate(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        },
        Screen::Details(_) => {
            if matches!(code, KeyCode::Esc | KeyCode::Backspace) {
                app.open(Route::Search);
            }
        }
        Screen::Dashboard(_) => {
            if matches!(code, KeyCode::Char('r') | KeyCode::Char('R')) {
                app.open(Route::Dashboard);
            }
        }
        Screen::Upload(_) => match code {
            KeyCode::Enter => app.submit_upload(),
            KeyCode::Backspace => app.upload_edit(None),
            KeyCode::Char(c) => app.upload_edit(Some(c)),
            _ => {}
        },
    }
    true
}

fn nav(app: &mut App, route: Route) -> bool {
    app.open(route);
    true
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    // Config and data problems are reported before the terminal is taken over.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let loaded = MedSearchConfig::load(config_path.as_deref()).and_then(|config| {
        let catalog = InMemoryCatalog::from_settings(&config.catalog)?;
        Ok((config, catalog))
    });
    let (config, catalog) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("medsearch-tui: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()?;
    let handle = runtime.handle().clone();
    let _entered = handle.enter();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(runtime, config, catalog);

    loop {
        app.tick();
        terminal.draw(|f| ui::ui(f, &app))?;

        if event::poll(Duration::from_millis(TICK_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(&mut app, key.code, key.modifiers) {
                    break;
                }
            }
        }
    }

    if let Screen::Search(view) = &mut app.screen {
        view.workflow.teardown();
    }
    restore_terminal(&mut terminal)?;
    Ok(())
}
