use ratatui::layout::{Alignment as TermAlign, Constraint, Layout, Rect as TermRect};
use ratatui::style::{Color as TermColor, Modifier, Style as TermStyle, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Frame;

use cosmic_core::config::ColorsConfig;
use cosmic_core::controls::*;
use cosmic_core::{GameEngine, NoticeKind, ScreenId, VolumeSlider};
use cosmic_ui::{Color, Control, UiRenderer};

use super::canvas::term_color;
use super::starfield::hex_or;
use super::{focus_targets, Focusable, TuiState};

const HINT: TermColor = TermColor::DarkGray;

pub struct Palette {
    primary: TermColor,
    secondary: TermColor,
    accent: TermColor,
    danger: TermColor,
    success: TermColor,
    healthy: TermColor,
    damaged: TermColor,
    critical: TermColor,
}

impl Palette {
    pub fn new(colors: &ColorsConfig) -> Self {
        let pick = |hex: &str, fallback: Color| term_color(hex_or(hex, fallback));
        Self {
            primary: pick(&colors.primary, Color::CYAN),
            secondary: pick(&colors.secondary, Color::MAGENTA),
            accent: pick(&colors.accent, Color::YELLOW),
            danger: pick(&colors.danger, Color::rgb(255, 51, 51)),
            success: pick(&colors.success, Color::rgb(51, 255, 51)),
            healthy: pick(&colors.ship.healthy, Color::rgb(51, 255, 51)),
            damaged: pick(&colors.ship.damaged, Color::rgb(255, 170, 51)),
            critical: pick(&colors.ship.critical, Color::rgb(255, 51, 51)),
        }
    }

    fn notice(&self, kind: NoticeKind) -> TermColor {
        match kind {
            NoticeKind::Info => self.primary,
            NoticeKind::Success => self.success,
            NoticeKind::Warning => self.accent,
            NoticeKind::Danger | NoticeKind::Error => self.danger,
            NoticeKind::Quest => self.secondary,
        }
    }

    fn hull(&self, health: f32) -> TermColor {
        if health > 60.0 {
            self.healthy
        } else if health > 30.0 {
            self.damaged
        } else {
            self.critical
        }
    }
}

pub fn slider_value(engine: &GameEngine, slider: VolumeSlider) -> f32 {
    let s = engine.volume_sliders();
    match slider {
        VolumeSlider::Master => s.master_volume,
        VolumeSlider::Sfx => s.sfx_volume,
        VolumeSlider::Music => s.music_volume,
    }
}

pub fn draw(frame: &mut Frame, engine: &mut GameEngine, state: &mut TuiState) {
    let area = frame.area();
    state.sky.resize(area.width, area.height);
    state.starfield.paint(&mut state.sky);
    frame.render_widget(&state.sky, area);

    let focused = focus_targets(engine).get(state.focus).cloned();
    let focused = focused.as_ref();

    match engine.ui().current_screen() {
        ScreenId::Loading => draw_loading(frame, area, &state.palette),
        ScreenId::MainMenu => draw_menu(frame, area, engine, focused, &state.palette),
        ScreenId::Settings => draw_settings(frame, area, engine, focused, &state.palette),
        ScreenId::Game => draw_game(frame, area, engine, state, focused),
    }

    draw_modals(frame, area, engine, &state.palette);
    draw_toasts(frame, area, engine, &state.palette);
}

fn centered(area: TermRect, w: u16, h: u16) -> TermRect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    TermRect::new(area.x + (area.width - w) / 2, area.y + (area.height - h) / 2, w, h)
}

fn is_focused(focused: Option<&Focusable>, id: &str) -> bool {
    matches!(focused, Some(Focusable::Control(f)) if f == id)
}

fn button_span<C>(control: &Control<C>, label: String, focused: bool, p: &Palette) -> Span<'static> {
    let mut style = TermStyle::default().fg(if control.primary { p.accent } else { p.primary });
    if control.primary {
        style = style.add_modifier(Modifier::BOLD);
    }
    if control.disabled {
        style = style.fg(HINT);
    }
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Span::styled(label, style)
}

fn title_lines(p: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::from("C O S M I C").fg(p.primary).bold(),
        Line::from("E X P L O R E R").fg(p.secondary).bold(),
        Line::from(""),
    ]
}

fn draw_loading(frame: &mut Frame, area: TermRect, p: &Palette) {
    let mut lines = title_lines(p);
    lines.push(Line::from("Loading...").fg(p.accent));
    let h = lines.len() as u16;
    frame.render_widget(Paragraph::new(lines).alignment(TermAlign::Center), centered(area, 40, h));
}

fn draw_menu(frame: &mut Frame, area: TermRect, engine: &GameEngine, focused: Option<&Focusable>, p: &Palette) {
    let mut lines = title_lines(p);
    for c in engine.ui().menu_controls().visible() {
        let span = button_span(c, format!("  {}  ", c.label), is_focused(focused, &c.id), p);
        lines.push(Line::from(span));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("↑/↓ select · Enter confirm · m music · q quit").fg(HINT));

    let h = lines.len() as u16;
    frame.render_widget(Paragraph::new(lines).alignment(TermAlign::Center), centered(area, 60, h));
}

fn draw_settings(frame: &mut Frame, area: TermRect, engine: &GameEngine, focused: Option<&Focusable>, p: &Palette) {
    let mut lines = vec![Line::from("S E T T I N G S").fg(p.primary).bold(), Line::from("")];

    for (slider, label) in [
        (VolumeSlider::Master, "Master Volume"),
        (VolumeSlider::Sfx, "Effects Volume"),
        (VolumeSlider::Music, "Music Volume"),
    ] {
        let value = slider_value(engine, slider);
        let filled = (value * 20.0).round() as usize;
        let bar = format!("{:<15} [{}{}] {:>3}%", label, "█".repeat(filled), "·".repeat(20 - filled.min(20)), (value * 100.0).round());
        let mut style = TermStyle::default().fg(p.primary);
        if focused == Some(&Focusable::Slider(slider)) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(bar, style)));
    }

    let glyph = engine.ui().visualizer().toggle_glyph();
    lines.push(Line::from(""));
    for c in engine.ui().settings_controls().visible() {
        let label = if c.id == MUSIC_TOGGLE { format!("  {} {}  ", glyph, c.label) } else { format!("  {}  ", c.label) };
        lines.push(Line::from(button_span(c, label, is_focused(focused, &c.id), p)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("↑/↓ select · ←/→ adjust · Enter confirm").fg(HINT));

    let h = lines.len() as u16;
    frame.render_widget(Paragraph::new(lines).alignment(TermAlign::Center), centered(area, 60, h));
}

fn quick_key(id: &str) -> Option<u8> {
    [NAVIGATE_BTN, SCAN_BTN, REPAIR_BTN, INVENTORY_BTN, QUESTS_BTN, STAR_MAP_BTN]
        .iter()
        .position(|k| *k == id)
        .map(|i| i as u8 + 1)
}

fn draw_game(frame: &mut Frame, area: TermRect, engine: &mut GameEngine, state: &mut TuiState, focused: Option<&Focusable>) {
    let p = &state.palette;
    let [hud, middle, panel] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(6), Constraint::Length(3)]).areas(area);
    let [space, side] = Layout::horizontal([Constraint::Min(20), Constraint::Length(42)]).areas(middle);
    let [log_area, viz_area] = Layout::vertical([Constraint::Min(4), Constraint::Length(8)]).areas(side);

    // HUD
    let stats = engine.state().map(|s| s.player_stats.clone()).unwrap_or_default();
    let location = engine
        .state()
        .and_then(|s| s.current_location.as_ref())
        .map(|l| l.name.clone())
        .unwrap_or_else(|| "Deep Space".into());
    let mut hud_spans = vec![
        Span::styled(format!(" HULL {:>3.0}% ", stats.health), TermStyle::default().fg(p.hull(stats.health)).bold()),
        Span::styled(format!("│ CREDITS {} ", stats.wealth), TermStyle::default().fg(p.accent)),
        Span::styled(format!("│ {} ", location), TermStyle::default().fg(p.primary)),
    ];
    if stats.in_pod_mode {
        hud_spans.push(Span::styled("│ ESCAPE POD ", TermStyle::default().fg(p.danger).bold()));
    }
    frame.render_widget(Paragraph::new(Line::from(hud_spans)).bg(TermColor::Black), hud);

    // 飞船
    let ship = if stats.in_pod_mode { "◆" } else { "▲" };
    frame.render_widget(
        Paragraph::new(Line::from(ship).fg(p.hull(stats.health)).bold()).alignment(TermAlign::Center),
        centered(space, 3, 1),
    );

    // 事件日志
    let log_lines: Vec<Line> = engine
        .ui()
        .notices()
        .event_log()
        .map(|e| {
            Line::from(vec![
                Span::styled(format!("[{}] ", e.timestamp), TermStyle::default().fg(HINT)),
                Span::styled(e.message.clone(), TermStyle::default().fg(p.notice(e.kind))),
            ])
        })
        .collect();
    frame.render_widget(Clear, log_area);
    frame.render_widget(
        Paragraph::new(log_lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(" Event Log ").border_style(TermStyle::default().fg(p.primary))),
        log_area,
    );

    // 可视化
    let viz_block = Block::bordered().border_style(TermStyle::default().fg(p.secondary));
    let inner = viz_block.inner(viz_area);
    state.viz.resize(inner.width, inner.height);
    let logical = state.viz.logical_area();
    let (ui, audio) = engine.parts_mut();
    ui.render_visualizer(Some(&mut state.viz as &mut dyn UiRenderer), logical, Some(audio));
    let title = format!(" {} {} ", ui.visualizer().toggle_glyph(), ui.visualizer().track_name());
    frame.render_widget(viz_block.title(title), viz_area);
    frame.render_widget(&state.viz, inner);

    // 操作栏
    let p = &state.palette;
    let mut spans = Vec::new();
    for c in engine.ui().action_panel().visible() {
        let label = match quick_key(&c.id) {
            Some(n) => format!(" [{}] {} ", n, c.label),
            None => format!(" {} ", c.label),
        };
        spans.push(button_span(c, label, is_focused(focused, &c.id), p));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Clear, panel);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(
            Block::bordered()
                .title(" Actions · Tab select · Esc menu · F5 save · F9 load · m music ")
                .border_style(TermStyle::default().fg(p.primary)),
        ),
        panel,
    );
}

fn draw_modals(frame: &mut Frame, area: TermRect, engine: &GameEngine, p: &Palette) {
    for (depth, modal) in engine.ui().modals().active_modals().iter().enumerate() {
        let width = 56u16.min(area.width.saturating_sub(4)).max(10);
        let text_w = width.saturating_sub(2).max(1) as usize;
        let title_rows = modal.title.chars().count().div_ceil(text_w) as u16;
        let height = title_rows + modal.choices.len() as u16 + 5;

        let mut rect = centered(area, width, height);
        // 叠放的弹窗稍微错开
        rect.x = rect.x.saturating_add(depth as u16 * 2).min(area.right().saturating_sub(rect.width));
        rect.y = rect.y.saturating_add(depth as u16).min(area.bottom().saturating_sub(rect.height));

        let mut lines = vec![Line::from(modal.title.clone()).fg(p.accent).bold(), Line::from("")];
        lines.extend(modal.choice_labels().map(|label| Line::from(label).fg(p.primary)));
        lines.push(Line::from(""));
        lines.push(Line::from("1-9 choose · Esc close").fg(HINT));

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::bordered().border_style(TermStyle::default().fg(p.secondary))),
            rect,
        );
    }
}

fn draw_toasts(frame: &mut Frame, area: TermRect, engine: &GameEngine, p: &Palette) {
    let width = 46u16.min(area.width);
    let mut y = area.y;
    for toast in engine.ui().notices().toasts() {
        let text_w = width.saturating_sub(2).max(1) as usize;
        let height = toast.message.chars().count().div_ceil(text_w) as u16 + 2;
        if y + height > area.bottom() {
            break;
        }
        let rect = TermRect::new(area.right() - width, y, width, height);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(toast.message.clone())
                .wrap(Wrap { trim: true })
                .fg(p.notice(toast.kind))
                .block(Block::bordered().border_style(TermStyle::default().fg(p.notice(toast.kind)))),
            rect,
        );
        y += height;
    }
}
