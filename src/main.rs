use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use acorn_dash::data::{DashboardData, MemoryRegion};
use acorn_dash::logging::init_logging;
use acorn_dash::settings::Settings;
use acorn_dash::ui::CONTENT_START_ROW;
use acorn_dash::{events, ui, App, DataSource, FileSource, HttpSource, StatusClient};

#[derive(Parser, Debug)]
#[command(name = "acorn-dash")]
#[command(about = "Terminal dashboard for a unikernel web appliance's status API")]
struct Args {
    /// Base URL of the appliance to poll (e.g. http://10.0.0.42)
    #[arg(short = 'u', long, conflicts_with = "file")]
    endpoint: Option<String>,

    /// Read snapshots from a JSON file instead of polling an appliance
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Poll interval (e.g., "1s", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Number of samples kept in the CPU chart
    #[arg(long)]
    cpu_window: Option<usize>,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Show memory regions named N/A
    #[arg(long)]
    show_hidden: bool,

    /// Export current state to JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,
}

/// Snapshot file read when neither an endpoint nor a file is given.
const DEFAULT_FILE: &str = "dashboard.json";

impl Args {
    /// Layer the command line over the loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref endpoint) = self.endpoint {
            settings.endpoint = Some(endpoint.clone());
        }
        if self.file.is_some() {
            settings.endpoint = None;
        }
        if let Some(ref refresh) = self.refresh {
            settings.refresh = refresh.clone();
        }
        if let Some(cpu_window) = self.cpu_window {
            settings.cpu_window = cpu_window;
        }
        if let Some(ref log_file) = self.log_file {
            settings.log_file = log_file.clone();
        }
        if self.show_hidden {
            settings.show_hidden_regions = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    let refresh = settings.refresh_interval()?;

    init_logging(&settings.log_file)?;
    info!(?settings, "starting acorn-dash");

    let file = args.file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return match settings.endpoint {
            Some(ref endpoint) => export_from_endpoint(endpoint, export_path),
            None => export_from_file(&file, export_path),
        };
    }

    match settings.endpoint.clone() {
        Some(endpoint) => run_with_http(&endpoint, &settings, refresh),
        None => run_with_file(&file, &settings, refresh),
    }
}

/// Run with a file-based data source
fn run_with_file(path: &Path, settings: &Settings, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, settings, refresh)
}

/// Run against a live appliance
fn run_with_http(endpoint: &str, settings: &Settings, refresh: Duration) -> Result<()> {
    // Build a tokio runtime for the poller; it must outlive the source
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let source = HttpSource::spawn(endpoint, refresh)
        .with_context(|| format!("failed to create client for {}", endpoint))?;

    // The poller paces itself; the UI just picks up whatever has arrived
    run_tui(Box::new(source), settings, Duration::from_millis(100))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    settings: &Settings,
    refresh_interval: Duration,
) -> Result<()> {
    // Create app before touching the terminal so a bad setting fails cleanly
    let mut app = App::new(source, settings.cpu_window)?;
    app.show_hidden_regions = settings.show_hidden_regions;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);
    if let Err(ref e) = result {
        error!(error = %e, "UI loop failed");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("shutting down");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, CONTENT_START_ROW),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export one snapshot read from a file
fn export_from_file(snapshot_path: &Path, export_path: &Path) -> Result<()> {
    let data = DashboardData::load(snapshot_path)
        .with_context(|| format!("failed to load {}", snapshot_path.display()))?;
    write_export(&data, &data.memmap, export_path)
}

/// Fetch one snapshot (and the memory map) from a live appliance and export it
fn export_from_endpoint(endpoint: &str, export_path: &Path) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let client = StatusClient::new(endpoint)?;

    let (snapshot, memmap) = rt.block_on(async {
        let snapshot = client.fetch_snapshot().await?;
        let memmap = client.fetch_memmap().await.ok();
        Ok::<_, anyhow::Error>((snapshot, memmap))
    })?;

    let data = DashboardData::from_snapshot(snapshot)?;
    let regions = match memmap {
        Some(entries) if data.memmap.is_empty() => MemoryRegion::from_entries(&entries),
        _ => data.memmap.clone(),
    };
    write_export(&data, &regions, export_path)
}

fn write_export(data: &DashboardData, memmap: &[MemoryRegion], export_path: &Path) -> Result<()> {
    let export = data.to_export(memmap, None);
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(export_path, json)?;

    info!(path = %export_path.display(), "exported dashboard state");
    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_settings() {
        let args = Args::parse_from([
            "acorn-dash",
            "--endpoint",
            "http://10.0.0.42",
            "--refresh",
            "250ms",
            "--cpu-window",
            "5",
            "--show-hidden",
        ]);
        let mut settings = Settings::default();
        args.apply(&mut settings);

        assert_eq!(settings.endpoint.as_deref(), Some("http://10.0.0.42"));
        assert_eq!(settings.refresh_interval().unwrap(), Duration::from_millis(250));
        assert_eq!(settings.cpu_window, 5);
        assert!(settings.show_hidden_regions);
    }

    #[test]
    fn file_flag_wins_over_configured_endpoint() {
        let args = Args::parse_from(["acorn-dash", "--file", "saved.json"]);
        let mut settings = Settings {
            endpoint: Some("http://10.0.0.42".to_string()),
            ..Default::default()
        };
        args.apply(&mut settings);
        assert!(settings.endpoint.is_none());
    }

    #[test]
    fn endpoint_and_file_conflict() {
        let result = Args::try_parse_from([
            "acorn-dash",
            "--endpoint",
            "http://10.0.0.42",
            "--file",
            "saved.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn export_from_file_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("dashboard.json");
        let export = dir.path().join("export.json");
        std::fs::write(
            &snapshot,
            r#"{"statman": [{"name": "net.recv", "value": 3}], "logger": ["boot"]}"#,
        )
        .unwrap();

        export_from_file(&snapshot, &export).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
        assert_eq!(written["summary"]["metrics"], 1);
        assert_eq!(written["logger"][0], "boot");
    }
}
