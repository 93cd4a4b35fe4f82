use std::{
    env,
    error::Error,
    fs,
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mytodo_core::{ApiClient, SessionStore};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::transport::UreqTransport;

mod app;
mod transport;
mod ui;

#[derive(Parser)]
#[command(name = "mytodo", about = "Terminal client for the myToDo API", version)]
struct Args {
    /// Base URL of the todo API.
    #[arg(long, env = "MYTODO_API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Where the session token is stored. Defaults to ~/.mytodo/session.json.
    #[arg(long, env = "MYTODO_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Log file. Defaults to ~/.mytodo/mytodo.log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let dir = data_dir()?;
    init_logging(&args.log_file.clone().unwrap_or_else(|| dir.join("mytodo.log")))?;
    let session_path = args
        .session_file
        .unwrap_or_else(|| dir.join("session.json"));

    let app = App::new(
        ApiClient::new(&args.base_url),
        SessionStore::new(session_path),
        UreqTransport::new(),
    );

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, app);
    restore_terminal(&mut terminal)?;
    result
}

fn data_dir() -> Result<PathBuf, Box<dyn Error>> {
    let home: PathBuf = env::var_os("HOME")
        .ok_or("could not determine home directory")?
        .into();
    let dir = home.join(".mytodo");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// The terminal owns stdout/stderr, so logs go to a file.
fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, Box<dyn Error>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(terminal.show_cursor()?)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App<UreqTransport>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if app.on_key(key.code) {
                    break;
                }
            }
        }
    }
    Ok(())
}
