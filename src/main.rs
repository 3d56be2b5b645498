mod app;
mod braille;
mod color;
mod config;
mod error;
mod export;
mod grid;
mod renderer;
mod report;
mod settings;
mod simulation;
mod ui;
mod walker;

use app::App;
use clap::Parser;
use color::Palette;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::{LightningError, Result};
use grid::Grid;
use ratatui::{backend::CrosstermBackend, Terminal};
use renderer::{FrameBuffer, NullRenderer, Renderer};
use report::RunReport;
use settings::RunSettings;
use simulation::LightningSimulation;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info, warn, Level};
use walker::RandomDirections;

#[derive(Parser, Debug)]
#[command(name = "lightning-generator")]
#[command(about = "Lightning patterns grown by diffusion-limited aggregation")]
struct Args {
    /// Grid size in cells (even values are bumped to the next odd one)
    #[arg(long)]
    size: Option<u32>,

    /// Seed for a reproducible run (system entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Run without the terminal UI and print the report
    #[arg(long)]
    headless: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Walker steps per frame in the terminal UI
    #[arg(long)]
    speed: Option<usize>,

    /// Color palette (classic, plasma, ember, phosphor)
    #[arg(long)]
    palette: Option<String>,

    /// Pause after drawing the initial disc, in milliseconds
    #[arg(long = "start-delay-ms")]
    start_delay_ms: Option<u64>,

    /// Pause after the run completes, in milliseconds
    #[arg(long = "finish-delay-ms")]
    finish_delay_ms: Option<u64>,

    /// Save the final pattern as a PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Record the growth as an animated GIF
    #[arg(long)]
    gif: Option<PathBuf>,

    /// Freezes between GIF frames
    #[arg(long = "gif-every")]
    gif_every: Option<u64>,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long = "save-config")]
    save_config: bool,

    /// Debug logging (headless runs only)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR : {}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(args))
        .with_writer(io::stderr)
        .init();
}

fn log_level(args: &Args) -> Level {
    if !args.headless {
        // Anything chattier would scribble over the alternate screen
        Level::WARN
    } else if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn run(args: &Args) -> Result<()> {
    let settings = resolve_settings(args)?;

    let report = if args.headless {
        run_headless(args, &settings)?
    } else {
        run_terminal(args, settings)?
    };

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

/// Stored settings first, then command line overrides
fn resolve_settings(args: &Args) -> Result<RunSettings> {
    let config_path = args.config.clone().or_else(AppConfig::default_path);
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_default()?.unwrap_or_default(),
    };
    config.settings.sanitize();

    let settings = &mut config.settings;
    if let Some(size) = args.size {
        settings.size = size;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(speed) = args.speed {
        settings.set_steps_per_frame(speed);
    }
    if let Some(name) = &args.palette {
        settings.palette = Palette::parse(name)
            .ok_or_else(|| LightningError::Config(format!("unknown palette '{}'", name)))?;
    }
    if let Some(ms) = args.start_delay_ms {
        settings.start_delay_ms = ms;
    }
    if let Some(ms) = args.finish_delay_ms {
        settings.finish_delay_ms = ms;
    }
    if let Some(every) = args.gif_every {
        settings.set_gif_every(every);
    }

    // Checked before anything is written back
    settings.validate()?;

    if args.save_config {
        let path = config_path
            .ok_or_else(|| LightningError::Config("could not determine config directory".into()))?;
        config.save_to_file(&path)?;
        info!(path = %path.display(), "settings saved");
    }

    Ok(config.settings)
}

/// Run to completion without a UI. Pacing delays do not apply here.
fn run_headless(args: &Args, settings: &RunSettings) -> Result<RunReport> {
    let grid = Grid::new(settings.size)?;
    info!(
        side = grid.side(),
        radius = grid.radius(),
        seeded = settings.seed.is_some(),
        "starting headless run"
    );

    if args.png.is_none() && args.gif.is_none() {
        let mut canvas = NullRenderer;
        renderer::project(&grid, &mut canvas)?;
        return simulate(grid, settings, &mut canvas, |_| Ok(()));
    }

    let mut canvas = FrameBuffer::default();
    renderer::project(&grid, &mut canvas)?;
    let mut recorder = match &args.gif {
        Some(path) => Some(export::GifRecorder::create(
            path,
            &canvas,
            settings.palette,
            settings.gif_every,
        )?),
        None => None,
    };

    let report = simulate(grid, settings, &mut canvas, |canvas| match recorder.as_mut() {
        Some(recorder) => recorder.on_freeze(canvas),
        None => Ok(()),
    })?;
    debug!(refreshes = canvas.refreshes(), "canvas refreshed");

    if let Some(recorder) = recorder {
        recorder.finish(&canvas)?;
    }
    if let Some(path) = &args.png {
        export::save_png(&canvas, settings.palette, path)?;
    }
    Ok(report)
}

/// Run the engine on an already projected canvas, mirroring every freeze
fn simulate<R, F>(grid: Grid, settings: &RunSettings, canvas: &mut R, mut after_freeze: F) -> Result<RunReport>
where
    R: Renderer,
    F: FnMut(&R) -> Result<()>,
{
    let source = RandomDirections::from_seed_option(settings.seed);
    let mut simulation = LightningSimulation::new(grid, source);
    simulation.run(|x, y| {
        renderer::project_freeze(&mut *canvas, x, y)?;
        after_freeze(&*canvas)
    })?;
    let report = simulation.report();
    info!(
        steps = report.steps,
        freezes = report.freezes,
        elapsed_ms = report.elapsed_ms,
        "run finished"
    );
    Ok(report)
}

fn run_terminal(args: &Args, settings: RunSettings) -> Result<RunReport> {
    // Build the run before touching the terminal so size errors print cleanly
    let mut app = App::new(settings)?;
    if let Some(path) = &args.gif {
        app.start_recording(path)?;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    if let Err(err) = disable_raw_mode() {
        warn!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        warn!(?err, "failed to leave alternate screen");
    }
    terminal.show_cursor()?;
    res?;

    if let Some(frames) = app.finish_recording()? {
        info!(frames, "GIF written");
    }
    if let Some(path) = &args.png {
        export::save_png(&app.canvas, app.settings.palette, path)?;
    }
    Ok(app.report())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Char(' ') => app.toggle_pause(),
                    KeyCode::Char('r') | KeyCode::Char('R') => app.restart()?,
                    KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                    KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => app.toggle_help(),
                    KeyCode::Char('c') | KeyCode::Char('C') => app.cycle_palette(),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.increase_speed(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.decrease_speed(),
                    KeyCode::Char('j') | KeyCode::Char('J') if app.show_help => {
                        app.scroll_help_down(ui::help_max_scroll())
                    }
                    KeyCode::Char('k') | KeyCode::Char('K') if app.show_help => app.scroll_help_up(),
                    KeyCode::Esc if app.show_help => app.toggle_help(),
                    _ => {}
                }
            }
        }

        app.tick()?;
    }

    Ok(())
}
