mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::ops::ControlFlow;
use std::sync::{mpsc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

use space_shooter::assets::{ArtDirectory, AssetLoader, BuiltinArt, SpriteId, Sprites};
use space_shooter::config::{check_playfield, Config};
use space_shooter::entities::Playfield;
use space_shooter::game::{Game, Phase};
use space_shooter::input::KeyStatus;
use space_shooter::scheduler::Scheduler;

use display::TermSurface;

/// Why the frame schedule stopped.
enum Exit {
    Quit,
    GameOver,
    Failed(std::io::Error),
}

enum AfterGameOver {
    Restart,
    Quit,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so logs only go to a file.
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Drain all pending events (non-blocking) into the held-key set.
fn drain_input(rx: &mpsc::Receiver<Event>, keys: &mut KeyStatus, frame: u64) -> Option<Exit> {
    while let Ok(event) = rx.try_recv() {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                if is_quit(&code, modifiers) {
                    return Some(Exit::Quit);
                }
                keys.key_down(&code, frame);
            }
            KeyEventKind::Repeat => {
                keys.key_down(&code, frame);
            }
            KeyEventKind::Release => {
                keys.key_up(&code);
            }
        }
    }
    None
}

/// Block until the player restarts or quits.
fn wait_for_restart(rx: &mpsc::Receiver<Event>) -> AfterGameOver {
    while let Ok(event) = rx.recv() {
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event
        {
            match code {
                KeyCode::Char('r') | KeyCode::Char('R') => return AfterGameOver::Restart,
                _ if is_quit(&code, modifiers) => return AfterGameOver::Quit,
                _ => {}
            }
        }
    }
    AfterGameOver::Quit
}

// ── Game ──────────────────────────────────────────────────────────────────────

fn load_sprites(config: &Config, field: Playfield, rng: &mut StdRng) -> Result<Sprites> {
    let mut builtin = BuiltinArt::new(field, rng);
    let sprites = match &config.assets {
        Some(dir) => AssetLoader::new().download_all(&mut ArtDirectory::new(dir, builtin)),
        None => AssetLoader::new().download_all(&mut builtin),
    };
    sprites.context("loading sprites")
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &Config) -> Result<()> {
    let (cols, rows) = terminal::size().context("reading terminal size")?;
    let game_config = config.game_config(cols, rows);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sprites = load_sprites(config, game_config.field, &mut rng)?;
    let ship = sprites.get(SpriteId::Ship);
    check_playfield(game_config.field, ship.width(), ship.height())?;

    let mut surface = TermSurface::new(cols, rows, config.hard);
    let mut scheduler = Scheduler::new(config.fps);
    let mut game = Game::new(game_config, rng);
    game.assets_loaded(sprites, scheduler.now_ms(), &mut surface);

    let mut keys = KeyStatus::new();
    let mut frame: u64 = 0;

    loop {
        let exit = scheduler.run(|now| {
            frame += 1;
            if let Some(exit) = drain_input(rx, &mut keys, frame) {
                return ControlFlow::Break(exit);
            }
            let phase = game.frame(now, keys.controls(frame), &mut surface);
            if let Err(err) = surface.present(out) {
                return ControlFlow::Break(Exit::Failed(err));
            }
            if phase == Phase::GameOver {
                ControlFlow::Break(Exit::GameOver)
            } else {
                ControlFlow::Continue(())
            }
        });

        match exit {
            Exit::Quit => break,
            Exit::Failed(err) => return Err(err).context("drawing frame"),
            Exit::GameOver => match wait_for_restart(rx) {
                AfterGameOver::Restart => {
                    keys.release_all();
                    game.restart(scheduler.now_ms(), &mut surface);
                }
                AfterGameOver::Quit => break,
            },
        }
    }

    info!(score = game.score(), "exiting");
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;
    init_logging(&config)?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // A dedicated thread does the blocking event reads and forwards them, so
    // the frame loop never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
