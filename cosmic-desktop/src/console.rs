use std::collections::BTreeMap;
use std::io::{stdin, stdout, Write};
use std::time::Instant;

use cosmic_audio::{LayerKey, MusicContext, TrackId};
use cosmic_core::{CosmicConfig, GameEngine, GameEvent, GameState, ScreenId, UiCommand};
use cosmic_ui::input::Key;

const HELP: &str = "\
Music:
  status                 show music engine status
  play [track]           play a track (exploration, station, danger, combat, pod)
  stop | toggle          stop / toggle music
  volume [0-1]           show or set music volume
  mute | unmute
  simulate <state>       exploration | station | danger | combat | pod
  visualizer             sample five frames of spectrum data
Modals:
  modal valid|empty|invalid|close|state
  choose <n>             pick choice n of the top modal
UI:
  screen <name>          loading | mainMenu | game | settings
  click <control-id>
  key <1-9|esc|f5|f9>
  event <json>           feed a game event
  state <json>           feed a game state
  tick <secs>            advance the clock
  ui                     show screen, modals, toasts and event log
  config                 dump the loaded configuration
  help | exit";

/// 行式调试控制台。每条命令之前按真实时间推进引擎
pub fn run(engine: &mut GameEngine, cfg: &CosmicConfig) {
    println!("Cosmic Explorer debug console. Type 'help' for commands.");
    let mut console = Console { saved_volume: None, last: Instant::now() };

    loop {
        print!("cosmic> ");
        if stdout().flush().is_err() {
            return;
        }
        let mut buf = String::new();
        match stdin().read_line(&mut buf) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                log::error!("Console read failed: {}", e);
                return;
            }
        }

        let now = Instant::now();
        engine.update(now.duration_since(console.last).as_secs_f32());
        console.last = now;

        if !console.execute(engine, cfg, buf.trim()) || engine.should_quit() {
            return;
        }
    }
}

struct Console {
    saved_volume: Option<f32>,
    last: Instant,
}

impl Console {
    /// 返回 false 表示退出
    fn execute(&mut self, engine: &mut GameEngine, cfg: &CosmicConfig, line: &str) -> bool {
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => {}
            "help" => println!("{}", HELP),
            "exit" | "quit" => return false,
            "status" => status(engine),
            "play" => play(engine, arg),
            "stop" => engine.audio_mut().pause_music(),
            "toggle" => engine.dispatch(UiCommand::ToggleMusic),
            "volume" => self.volume(engine, arg),
            "mute" => {
                self.saved_volume = Some(engine.audio().music_volume());
                engine.audio_mut().set_music_volume(0.0);
                println!("Music muted");
            }
            "unmute" => {
                let level = self.saved_volume.take().unwrap_or(0.5);
                engine.audio_mut().set_music_volume(level);
                println!("Music unmuted ({}%)", (level * 100.0).round());
            }
            "simulate" => simulate(engine, arg),
            "visualizer" => visualizer(engine),
            "modal" => modal(engine, arg),
            "choose" => match arg.parse::<usize>() {
                Ok(n) => engine.select_choice(n),
                Err(_) => println!("Usage: choose <n>"),
            },
            "screen" => {
                engine.ui_mut().show_screen(arg);
                settle(engine);
                println!("Current screen: {}", engine.ui().current_screen());
            }
            "click" => {
                engine.click(arg);
                settle(engine);
            }
            "key" => match parse_key(arg) {
                Some(key) => {
                    engine.key(key);
                    settle(engine);
                }
                None => println!("Unknown key '{}'", arg),
            },
            "event" => match serde_json::from_str::<GameEvent>(arg) {
                Ok(event) => engine.handle_game_event(event),
                Err(e) => println!("Bad event: {}", e),
            },
            "state" => match serde_json::from_str::<GameState>(arg) {
                Ok(state) => engine.handle_game_state(state),
                Err(e) => println!("Bad state: {}", e),
            },
            "tick" => match arg.parse::<f32>() {
                Ok(secs) if secs >= 0.0 => {
                    // 按帧推进，保证淡入淡出按顺序结算
                    let mut left = secs;
                    while left > 0.0 {
                        let dt = left.min(1.0 / 60.0);
                        engine.update(dt);
                        left -= dt;
                    }
                }
                _ => println!("Usage: tick <secs>"),
            },
            "ui" => ui(engine),
            "config" => match toml::to_string_pretty(cfg) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("Failed to serialize config: {}", e),
            },
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
        true
    }

    fn volume(&mut self, engine: &mut GameEngine, arg: &str) {
        if arg.is_empty() {
            println!("Current volume: {}%", (engine.audio().music_volume() * 100.0).round());
            return;
        }
        match arg.parse::<f32>() {
            Ok(level) => {
                engine.audio_mut().set_music_volume(level);
                println!("Music volume set to: {}%", (engine.audio().music_volume() * 100.0).round());
            }
            Err(_) => println!("Usage: volume <0-1>"),
        }
    }
}

/// 让正在进行的屏幕切换走完
fn settle(engine: &mut GameEngine) {
    for _ in 0..10 {
        if !engine.ui().screens().is_transitioning() {
            break;
        }
        engine.update(0.05);
    }
}

fn status(engine: &GameEngine) {
    let audio = engine.audio();
    let music = audio.music();
    let track = music.current_track();

    println!("=== Music System Status ===");
    println!("Playing:       {}", if music.is_playing() { "yes" } else { "no" });
    println!("Current Track: {} ({})", track, audio.get_current_track_info().name);
    println!("Volume:        {}%", (music.volume() * 100.0).round());
    println!("Active Layers: {}", music.active_layer_count());
    println!("Audio Context: {}", match (music.has_audio_context(), music.is_suspended()) {
        (false, _) => "none",
        (true, true) => "suspended",
        (true, false) => "running",
    });
    println!("Chord Index:   {}", music.chord_index());
    println!("Intensity:     {:.2}", music.intensity());

    let Some(spec) = music.track(track) else { return };
    let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
    for (i, layer) in spec.layers.iter().enumerate() {
        if music.layer_gain(LayerKey::new(track, i)).is_some() {
            *kinds.entry(format!("{:?}", layer.kind)).or_default() += 1;
        }
    }
    if !kinds.is_empty() {
        println!("Layer Types:");
        for (kind, count) in kinds {
            println!("  {:<12} {}", kind, count);
        }
    }
}

fn play(engine: &mut GameEngine, arg: &str) {
    let names: Vec<&str> = TrackId::ALL.iter().map(|t| t.as_str()).collect();
    if arg.is_empty() {
        println!("Available tracks: {}", names.join(", "));
        return;
    }
    match arg.parse::<TrackId>() {
        Ok(track) => {
            println!("Playing {} music...", track);
            engine.audio_mut().play_music(track);
        }
        Err(_) => println!("Invalid track! Use: {}", names.join(", ")),
    }
}

fn simulate(engine: &mut GameEngine, arg: &str) {
    let ctx = match arg {
        "exploration" => MusicContext::default(),
        "station" => MusicContext { at_repair_location: true, ..Default::default() },
        "danger" => MusicContext { health: 25.0, ..Default::default() },
        "combat" => MusicContext { health: 75.0, in_combat: true, ..Default::default() },
        "pod" => MusicContext { in_pod_mode: true, ..Default::default() },
        _ => {
            println!("Usage: simulate exploration|station|danger|combat|pod");
            return;
        }
    };
    engine.audio_mut().update_music_for_game_state(&ctx);
    println!("Simulating {} -> {}", arg, engine.audio().current_music_track());
}

fn visualizer(engine: &mut GameEngine) {
    let band = |data: &[u8]| {
        if data.is_empty() {
            0
        } else {
            data.iter().map(|&v| v as u32).sum::<u32>() / data.len() as u32
        }
    };

    for frame in 0..5 {
        match engine.audio().get_visualization_data() {
            Some(data) => println!(
                "Frame {}: Bass: {}, Mid: {}, High: {}",
                frame,
                band(&data[..10]),
                band(&data[50..80]),
                band(&data[100..])
            ),
            None => {
                println!("No audio context, visualizer idle");
                return;
            }
        }
        engine.update(0.2);
    }
}

fn modal(engine: &mut GameEngine, arg: &str) {
    let ui = engine.ui_mut();
    match arg {
        "valid" => {
            let shown = ui.show_choice_modal("Test Modal - Should Work", &["Option 1", "Option 2", "Option 3"], |choice| {
                log::info!("User selected choice: {}", choice);
                None
            });
            println!("Shown: {}", shown);
        }
        "empty" => {
            let none: [&str; 0] = [];
            let shown = ui.show_choice_modal("Test Modal - Should NOT Appear", &none, |_| None);
            println!("Shown: {}", shown);
        }
        "invalid" => {
            let raw = [
                serde_json::Value::Null,
                serde_json::json!(""),
                serde_json::json!("   "),
                serde_json::json!(0),
                serde_json::json!(false),
            ];
            let shown = ui.show_choice_modal_json("Test Modal - Should NOT Appear", &raw, |_| None);
            println!("Shown: {}", shown);
        }
        "close" => {
            ui.close_all_modals();
            println!("All modals closed");
        }
        "state" | "" => modal_state(engine),
        _ => println!("Usage: modal valid|empty|invalid|close|state"),
    }
}

fn modal_state(engine: &GameEngine) {
    let modals = engine.ui().modals();
    println!("Z baseline: {}", modals.current_modal_z_index());
    if modals.active_modals().is_empty() {
        println!("No active modals");
    }
    for modal in modals.active_modals() {
        println!("[{}] '{}' z={}", modal.id, modal.title, modal.z_index);
        for label in modal.choice_labels() {
            println!("    {}", label);
        }
    }
}

fn ui(engine: &GameEngine) {
    let ui = engine.ui();
    println!("Screen: {} ({})", ui.current_screen(), ui.screens().active_element_id());
    if let Some(target) = ui.screens().phase().target() {
        println!("Transitioning to: {}", target);
    }
    println!("Active game: {}", ui.has_active_game());

    let controls = match ui.current_screen() {
        ScreenId::MainMenu => Some(ui.menu_controls()),
        ScreenId::Settings => Some(ui.settings_controls()),
        ScreenId::Game => Some(ui.action_panel()),
        ScreenId::Loading => None,
    };
    if let Some(controls) = controls {
        for c in controls.visible() {
            let flag = if c.disabled { " (disabled)" } else if c.primary { " *" } else { "" };
            println!("  [{}] {}{}", c.id, c.label, flag);
        }
    }

    modal_state(engine);
    for toast in ui.notices().toasts() {
        println!("Toast [{}] {} ({:.1}s)", toast.kind.as_str(), toast.message, toast.remaining);
    }
    for entry in ui.notices().event_log() {
        println!("[{}] {}", entry.timestamp, entry.message);
    }
}

fn parse_key(arg: &str) -> Option<Key> {
    match arg.to_ascii_lowercase().as_str() {
        "esc" | "escape" => Some(Key::Escape),
        "enter" => Some(Key::Enter),
        "tab" => Some(Key::Tab),
        s if s.len() > 1 && s.starts_with('f') => s[1..].parse().ok().map(Key::F),
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
    }
}
