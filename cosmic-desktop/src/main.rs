mod setup;
mod config_gen;
mod console;
#[cfg(feature = "tui")]
mod tui;

use std::env;
use cosmic_audio::AudioBackend;
use cosmic_core::{CosmicConfig, GameEngine, LoggingLink};

fn main() {
    let args: Vec<String> = env::args().collect();
    let arg_console = args.iter().any(|a| a == "--console");

    let is_tui_mode = cfg!(feature = "tui") && !arg_console;

    setup::init(is_tui_mode);
    log::info!(">>> Cosmic Explorer Client Started (TUI: {}) <<<", is_tui_mode);

    let cfg = CosmicConfig::load();
    let mut engine = GameEngine::new(&cfg, audio_backend(), Box::new(LoggingLink::default()));

    #[cfg(feature = "tui")]
    if is_tui_mode {
        log::info!("Mode: TUI");
        if let Err(e) = tui::run(&mut engine, &cfg) {
            log::error!("Terminal UI failed: {:#}", e);
            eprintln!("Terminal UI failed: {:#}", e);
        }
        return;
    }

    log::info!("Mode: Console");
    console::run(&mut engine, &cfg);
}

#[cfg(feature = "audio")]
fn audio_backend() -> Option<Box<dyn AudioBackend>> {
    match cosmic_audio::KiraBackend::new() {
        Ok(backend) => Some(Box::new(backend)),
        Err(e) => {
            log::warn!("Audio output unavailable, falling back to silent backend: {:#}", e);
            Some(Box::new(cosmic_audio::SilentBackend::new()))
        }
    }
}

/// 没有声卡输出时用静音后端，界面状态和可视化照常
#[cfg(not(feature = "audio"))]
fn audio_backend() -> Option<Box<dyn AudioBackend>> {
    Some(Box::new(cosmic_audio::SilentBackend::new()))
}
