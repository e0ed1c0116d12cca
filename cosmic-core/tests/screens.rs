use cosmic_core::command::UiCommand;
use cosmic_core::controls::{self, CONTINUE_BTN, NEW_GAME_BTN};
use cosmic_core::screen::TransitionPhase;
use cosmic_core::{ModalManager, ScreenId, ScreenManager, ShowOutcome, UiConfig, UiSounds};
use cosmic_ui::ControlSet;

struct Rig {
    screens: ScreenManager,
    modals: ModalManager,
    menu: ControlSet<UiCommand>,
}

fn rig() -> Rig {
    let cfg = UiConfig::default();
    Rig {
        screens: ScreenManager::new(&cfg),
        modals: ModalManager::new(&cfg),
        menu: controls::main_menu_controls(&UiSounds::muted()),
    }
}

impl Rig {
    fn step(&mut self, dt: f32, has_active_game: bool) -> Option<ScreenId> {
        self.screens.update(dt, &mut self.modals, &mut self.menu, has_active_game)
    }

    fn settle(&mut self) {
        for _ in 0..10 {
            self.step(0.05, false);
        }
    }
}

#[test]
fn test_unknown_screen_is_noop() {
    let mut r = rig();
    for name in ["", "credits", "GAME", "main-menu", "game-screen"] {
        assert_eq!(r.screens.show_screen_named(name, &mut r.modals), ShowOutcome::Rejected);
    }
    assert_eq!(r.screens.get_current_screen(), ScreenId::Loading);
    assert_eq!(r.screens.phase(), TransitionPhase::Idle);
    assert!(r.step(1.0, false).is_none());
}

#[test]
fn test_single_active_screen_after_delay() {
    let mut r = rig();
    assert_eq!(r.screens.show_screen_named("game", &mut r.modals), ShowOutcome::Started);

    // 延迟期间旧屏幕保持激活
    assert!(r.step(0.0, false).is_none());
    assert!(r.screens.is_screen_active("loading"));
    assert!(r.step(0.02, false).is_none());
    assert!(r.screens.is_screen_active("loading"));

    assert_eq!(r.step(0.05, false), Some(ScreenId::Game));
    let active: Vec<_> = ScreenId::ALL
        .into_iter()
        .filter(|s| r.screens.is_screen_active(s.name()))
        .collect();
    assert_eq!(active, vec![ScreenId::Game]);
    assert_eq!(r.screens.active_element_id(), "game-screen");
    assert!(!r.screens.is_transitioning());
}

#[test]
fn test_closed_modals_never_return_after_transition() {
    let mut r = rig();
    r.modals.show_choice_modal("Event", &["A", "B"], |_| None);
    r.modals.close_all_modals();

    r.screens.show(ScreenId::Game, &mut r.modals);
    r.settle();
    assert!(r.modals.active_modals().is_empty());

    r.screens.show(ScreenId::MainMenu, &mut r.modals);
    r.settle();
    assert!(r.modals.active_modals().is_empty());
}

#[test]
fn test_transition_closes_modals_opened_during_delay() {
    let mut r = rig();
    r.modals.show_choice_modal("Before", &["A"], |_| None);
    r.screens.show(ScreenId::Game, &mut r.modals);
    assert!(r.modals.active_modals().is_empty());

    r.modals.show_choice_modal("During", &["B"], |_| None);
    r.step(0.0, false);
    assert!(r.modals.active_modals().is_empty());
    assert_eq!(r.modals.current_modal_z_index(), 1000);
}

#[test]
fn test_modal_opened_while_activating_is_closed() {
    let mut r = rig();
    r.screens.show(ScreenId::Game, &mut r.modals);
    assert_eq!(r.step(0.01, false), None);
    assert!(matches!(r.screens.phase(), TransitionPhase::Activating { .. }));

    r.modals.show_choice_modal("Late", &["C"], |_| None);
    assert_eq!(r.step(0.1, false), Some(ScreenId::Game));
    assert!(r.modals.active_modals().is_empty());
    assert_eq!(r.modals.current_modal_z_index(), 1000);
}

#[test]
fn test_requests_during_transition_queue_latest_wins() {
    let mut r = rig();
    assert_eq!(r.screens.show(ScreenId::MainMenu, &mut r.modals), ShowOutcome::Started);
    assert_eq!(r.screens.show(ScreenId::Settings, &mut r.modals), ShowOutcome::Queued);
    assert_eq!(r.screens.show(ScreenId::Game, &mut r.modals), ShowOutcome::Queued);
    assert_eq!(r.screens.show(ScreenId::Game, &mut r.modals), ShowOutcome::Ignored);
    assert_eq!(r.screens.queued(), Some(ScreenId::Game));

    assert_eq!(r.step(0.1, false), Some(ScreenId::MainMenu));
    assert_eq!(r.screens.phase(), TransitionPhase::ClosingModals { target: ScreenId::Game });

    r.step(0.0, false);
    assert_eq!(r.step(0.1, false), Some(ScreenId::Game));
    assert_eq!(r.screens.get_current_screen(), ScreenId::Game);
    assert_eq!(r.screens.queued(), None);
}

#[test]
fn test_request_for_in_flight_target_drops_queue() {
    let mut r = rig();
    r.screens.show(ScreenId::Game, &mut r.modals);
    r.screens.show(ScreenId::Settings, &mut r.modals);
    assert_eq!(r.screens.show(ScreenId::Game, &mut r.modals), ShowOutcome::Ignored);
    assert_eq!(r.screens.queued(), None);

    r.settle();
    assert_eq!(r.screens.get_current_screen(), ScreenId::Game);
}

#[test]
fn test_main_menu_updates_continue_button() {
    let mut r = rig();
    r.screens.show(ScreenId::MainMenu, &mut r.modals);
    r.step(0.0, true);
    r.step(0.1, true);

    assert!(r.menu.get(CONTINUE_BTN).unwrap().visible);
    assert!(!r.menu.get(NEW_GAME_BTN).unwrap().primary);

    r.screens.show(ScreenId::Game, &mut r.modals);
    r.step(0.0, false);
    r.step(0.1, false);
    r.screens.show(ScreenId::MainMenu, &mut r.modals);
    r.step(0.0, false);
    r.step(0.1, false);

    assert!(!r.menu.get(CONTINUE_BTN).unwrap().visible);
    assert!(r.menu.get(NEW_GAME_BTN).unwrap().primary);
}

#[test]
fn test_force_skips_state_machine() {
    let mut r = rig();
    r.screens.show(ScreenId::Game, &mut r.modals);
    r.screens.force(ScreenId::MainMenu);
    assert!(!r.screens.is_transitioning());
    assert!(r.screens.is_screen_active("mainMenu"));
    assert!(r.step(1.0, false).is_none());
}
