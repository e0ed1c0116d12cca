mod canvas;
mod starfield;
mod view;

use std::time::{Duration, Instant};
use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use cosmic_core::{CosmicConfig, GameEngine, ScreenId, UiCommand, VolumeSlider};
use cosmic_ui::input::Key;

use canvas::CellCanvas;
use starfield::Starfield;
use view::Palette;

const SLIDER_STEP: f32 = 0.05;

/// 可以用方向键选中的条目
#[derive(Debug, Clone, PartialEq)]
enum Focusable {
    Control(String),
    Slider(VolumeSlider),
}

pub struct TuiState {
    focus: usize,
    sky: CellCanvas,
    viz: CellCanvas,
    starfield: Starfield,
    palette: Palette,
}

pub fn run(engine: &mut GameEngine, cfg: &CosmicConfig) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, engine, cfg);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, engine: &mut GameEngine, cfg: &CosmicConfig) -> Result<()> {
    let mut state = TuiState {
        focus: 0,
        sky: CellCanvas::new(1.0, 1.0),
        // 每格 8x8 逻辑单位，和八分块的精度一致
        viz: CellCanvas::new(8.0, 8.0),
        starfield: Starfield::new(&cfg.visuals, &cfg.colors),
        palette: Palette::new(&cfg.colors),
    };

    let frame_time = Duration::from_secs_f32(1.0 / cfg.canvas.fps.max(1) as f32);
    let mut last = Instant::now();

    loop {
        terminal.draw(|frame| view::draw(frame, engine, &mut state))?;

        let timeout = frame_time.saturating_sub(last.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(engine, &mut state, key);
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        engine.update(dt);
        state.starfield.update(dt);

        if engine.should_quit() {
            log::info!("Terminal UI closed");
            return Ok(());
        }
    }
}

fn focus_targets(engine: &GameEngine) -> Vec<Focusable> {
    let ui = engine.ui();
    let controls = match ui.current_screen() {
        ScreenId::MainMenu => ui.menu_controls(),
        ScreenId::Settings => ui.settings_controls(),
        ScreenId::Game => ui.action_panel(),
        ScreenId::Loading => return Vec::new(),
    };

    let mut targets = Vec::new();
    if ui.current_screen() == ScreenId::Settings {
        targets.extend([VolumeSlider::Master, VolumeSlider::Sfx, VolumeSlider::Music].map(Focusable::Slider));
    }
    targets.extend(controls.visible().map(|c| Focusable::Control(c.id.clone())));
    targets
}

fn handle_key(engine: &mut GameEngine, state: &mut TuiState, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        engine.dispatch(UiCommand::Quit);
        return;
    }

    let modal_open = engine.ui().modals().top().is_some();
    let targets = focus_targets(engine);
    if !targets.is_empty() {
        state.focus = state.focus.min(targets.len() - 1);
    }

    // 弹窗打开时所有按键交给快捷键表 (数字选择 / Esc 关闭)
    if !modal_open {
        match key.code {
            KeyCode::Up | KeyCode::BackTab if !targets.is_empty() => {
                state.focus = (state.focus + targets.len() - 1) % targets.len();
                return;
            }
            KeyCode::Down | KeyCode::Tab if !targets.is_empty() => {
                state.focus = (state.focus + 1) % targets.len();
                return;
            }
            KeyCode::Enter => {
                if let Some(Focusable::Control(id)) = targets.get(state.focus) {
                    engine.click(id);
                    state.focus = 0;
                }
                return;
            }
            KeyCode::Left | KeyCode::Right => {
                if let Some(Focusable::Slider(slider)) = targets.get(state.focus) {
                    let step = if key.code == KeyCode::Left { -SLIDER_STEP } else { SLIDER_STEP };
                    let current = view::slider_value(engine, *slider);
                    engine.set_volume_slider(*slider, current + step);
                }
                return;
            }
            KeyCode::Char('q') if engine.ui().current_screen() == ScreenId::MainMenu => {
                engine.dispatch(UiCommand::Quit);
                return;
            }
            KeyCode::Char('m') => {
                engine.dispatch(UiCommand::ToggleMusic);
                return;
            }
            _ => {}
        }
    }

    if let Some(key) = map_key(key.code) {
        engine.key(key);
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Tab => Key::Tab,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    })
}
