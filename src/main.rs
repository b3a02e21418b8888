use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    terminal, ExecutableCommand,
};
use tracing::{error, info};

use amor_fati::compute::ScreenRect;
use amor_fati::config::Config;
use amor_fati::display::terminal::{translate, HostInput, TerminalCanvas};
use amor_fati::entities::SpriteTable;
use amor_fati::error::GameResult;
use amor_fati::session::Session;

fn init_logging(config: &Config) -> GameResult<()> {
    let file = File::create(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_sprites(config: &Config) -> GameResult<SpriteTable> {
    match &config.sprites {
        Some(path) => SpriteTable::from_toml(&std::fs::read_to_string(path)?),
        None => SpriteTable::embedded(),
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    canvas: &mut TerminalCanvas,
    rx: &mpsc::Receiver<Event>,
) -> GameResult<()> {
    let frame = Duration::from_millis(session.config.frame_ms);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        while let Ok(ev) = rx.try_recv() {
            match translate(ev) {
                HostInput::Event(input) => session.push(input),
                HostInput::Quit => return Ok(()),
                HostInput::Ignore => {}
            }
        }

        let dt = last.elapsed().as_secs_f64() * 1000.0;
        last = Instant::now();

        session.step(dt);
        session.render(canvas, dt);
        canvas.flush(out)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> GameResult<()> {
    let config = Config::load(&Config::default_path())?;
    init_logging(&config)?;
    let sprites = load_sprites(&config)?;
    info!(bpm = config.bpm, frame_ms = config.frame_ms, "starting");

    let mut canvas = TerminalCanvas::new(
        config.canvas.width,
        config.canvas.height,
        config.cell.width,
        config.cell.height,
        sprites.clone(),
    );
    let (cols, rows) = canvas.grid();
    let mut session = Session::new(config, sprites);
    // Pointer events arrive in terminal cells.
    session.viewport = ScreenRect {
        x: 0.0,
        y: 0.0,
        width: cols as f64,
        height: rows as f64,
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut session, &mut canvas, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!(error = %e, "frame loop failed");
    }
    info!("bye");
    result
}
