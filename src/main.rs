use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::{info, warn};

use metrics_dash::{
    events, logging, ui, App, ChartLoader, MetricsClient, Preferences, Settings,
    WebSocketConnector,
};

/// Minimum terminal size for usable display
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 6;

#[derive(Parser, Debug)]
#[command(name = "metrics-dash")]
#[command(about = "Live terminal dashboard for a site's metrics feed")]
struct Args {
    /// Site URL; the feed is ws[s]://<host>/__metrics__/ws
    site: Option<String>,

    /// Config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Feed URL, used as-is instead of deriving it from the site
    #[arg(long)]
    feed_url: Option<String>,

    /// Seconds to wait before reconnecting after the feed closes
    #[arg(long, value_name = "SECS")]
    reconnect_delay: Option<u64>,

    /// Chart style asset (http(s) URL or file path)
    #[arg(long)]
    chart_url: Option<String>,

    /// Subresource-Integrity metadata for the chart style asset
    #[arg(long, value_name = "SRI")]
    chart_integrity: Option<String>,

    /// Preferences file
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Start with the expanded view open
    #[arg(short, long)]
    expanded: bool,
}

impl Args {
    /// Command-line flags override file and environment settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(site) = &self.site {
            settings.feed.site = site.clone();
        }
        if let Some(url) = &self.feed_url {
            settings.feed.url = Some(url.clone());
        }
        if let Some(secs) = self.reconnect_delay {
            settings.feed.reconnect_delay_secs = secs;
        }
        if let Some(url) = &self.chart_url {
            settings.chart.url = Some(url.clone());
        }
        if let Some(integrity) = &self.chart_integrity {
            settings.chart.integrity = Some(integrity.clone());
        }
        if let Some(path) = &self.state_file {
            settings.storage.path = Some(path.clone());
        }
        if let Some(path) = &self.log_file {
            settings.log.file = path.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);
    logging::init(&settings.log)?;

    // Configuration errors are fatal before the terminal is touched.
    let feed_url = settings.feed_url().context("invalid feed endpoint")?;
    let style_source = settings.style_source().context("invalid chart style settings")?;

    let prefs = match settings.preferences_path() {
        Some(path) => Preferences::load(path),
        None => {
            warn!("no data directory; view state will not be saved");
            Preferences::in_memory()
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    info!(feed = %feed_url, chart = %style_source.describe(), "starting");

    let mut client = MetricsClient::new(
        Box::new(WebSocketConnector::new(feed_url)),
        settings.reconnect_delay(),
    );
    client.start();

    let loader = Arc::new(ChartLoader::new(style_source));
    let theme = ui::Theme::auto_detect();
    let mut app = App::new(Box::new(client), loader, prefs, theme);
    if args.expanded && !app.expanded {
        app.set_expanded(true);
    }

    run_tui(&mut app)
}

/// Run the TUI until the user quits
fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal if anything panics
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let height = area.height.min(2);
                let centered = Rect::new(0, (area.height - height) / 2, area.width, height);
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}
