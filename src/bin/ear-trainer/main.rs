//! ear-trainer - read notes off a treble staff and play them back
//!
//! Run with: cargo run
//! Debug logging to a file: EAR_TRAINER_LOG=trainer.log cargo run

mod app;
mod audio;
mod keys;
mod trainer;
mod ui;

use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
};
use rtrb::RingBuffer;
use std::io::stdout;

use app::App;
use audio::CpalHost;
use ear_trainer::{EngineConfig, ToneEngine};

/// Audio callback -> scope ring buffer size
const SCOPE_CAPACITY: usize = 8192;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_CAPACITY);
    let engine = ToneEngine::new(CpalHost::new(scope_tx), EngineConfig::default());

    let mut terminal = ratatui::init();
    let key_release = enable_key_release();

    let result = App::new(engine, scope_rx, key_release).run(&mut terminal);

    if key_release {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
    }
    ratatui::restore();
    result
}

/// Log to the file named by EAR_TRAINER_LOG; the terminal belongs to the UI.
fn init_logging() -> color_eyre::Result<()> {
    let Some(path) = std::env::var_os("EAR_TRAINER_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(&path).wrap_err("failed to create log file")?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Ask the terminal to report key releases. Without them every key press
/// plays a short fixed-length tone instead of a held one.
fn enable_key_release() -> bool {
    let supported = matches!(crossterm::terminal::supports_keyboard_enhancement(), Ok(true));
    supported
        && execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )
        .is_ok()
}
