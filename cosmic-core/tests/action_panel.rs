use cosmic_core::command::{GameAction, UiCommand};
use cosmic_core::controls::{self, ActionButtons, *};
use cosmic_core::event::{GameState, PlayerStats};
use cosmic_core::UiSounds;

fn ids(panel: &cosmic_ui::ControlSet<UiCommand>) -> Vec<String> {
    panel.visible().map(|c| c.id.clone()).collect()
}

fn docked(wealth: i64) -> GameState {
    GameState {
        at_repair_location: true,
        player_stats: PlayerStats { wealth, ..Default::default() },
        ..Default::default()
    }
}

#[test]
fn test_panel_order_ends_with_star_map() {
    let panel = controls::action_panel(&UiSounds::muted());
    assert_eq!(
        ids(&panel),
        vec![NAVIGATE_BTN, SCAN_BTN, REPAIR_BTN, INVENTORY_BTN, QUESTS_BTN, STAR_MAP_BTN]
    );
}

#[test]
fn test_pod_mods_inserted_before_star_map() {
    let buttons = ActionButtons::new(UiSounds::muted());
    let mut panel = controls::action_panel(&UiSounds::muted());
    buttons.show_pod_mods_button(&mut panel, false);

    let order = ids(&panel);
    assert_eq!(order[order.len() - 2], POD_MODS_BTN);
    assert_eq!(order.last().map(String::as_str), Some(STAR_MAP_BTN));
    assert_eq!(panel.click(POD_MODS_BTN), Some(UiCommand::Game(GameAction::PodMods)));
}

#[test]
fn test_pod_mods_navigate_first_state() {
    let buttons = ActionButtons::new(UiSounds::muted());
    let mut panel = controls::action_panel(&UiSounds::muted());
    buttons.show_pod_mods_button(&mut panel, true);

    let btn = panel.get(POD_MODS_BTN).unwrap();
    assert!(btn.disabled);
    assert_eq!(btn.label, "Pod Mods (Navigate First)");
    assert!(btn.title.is_some());
    assert_eq!(panel.click(POD_MODS_BTN), None);

    // 航行一次之后恢复可用，按钮不会重复插入
    buttons.show_pod_mods_button(&mut panel, false);
    assert_eq!(panel.iter().filter(|c| c.id == POD_MODS_BTN).count(), 1);
    assert!(!panel.get(POD_MODS_BTN).unwrap().disabled);
    assert_eq!(panel.get(POD_MODS_BTN).unwrap().label, "Pod Mods");
}

#[test]
fn test_refresh_repair_needs_credits_and_dock() {
    let buttons = ActionButtons::new(UiSounds::muted());
    let mut panel = controls::action_panel(&UiSounds::muted());

    buttons.refresh(&mut panel, &docked(50));
    assert!(panel.get(REPAIR_BTN).unwrap().disabled);

    buttons.refresh(&mut panel, &docked(150));
    assert!(!panel.get(REPAIR_BTN).unwrap().disabled);

    buttons.refresh(&mut panel, &GameState::default());
    assert!(panel.get(REPAIR_BTN).unwrap().disabled);
}

#[test]
fn test_refresh_buy_pod_and_ship() {
    let buttons = ActionButtons::new(UiSounds::muted());
    let mut panel = controls::action_panel(&UiSounds::muted());

    buttons.refresh(&mut panel, &docked(600));
    assert!(panel.get(BUY_POD_BTN).is_some_and(|b| b.visible));
    assert!(!panel.get(BUY_SHIP_BTN).is_some_and(|b| b.visible));

    let mut pod = docked(450);
    pod.player_stats.in_pod_mode = true;
    pod.player_stats.has_flight_pod = true;
    buttons.refresh(&mut panel, &pod);
    assert!(!panel.get(BUY_POD_BTN).unwrap().visible);
    assert!(panel.get(BUY_SHIP_BTN).unwrap().visible);
    for id in [SCAN_BTN, REPAIR_BTN, INVENTORY_BTN, QUESTS_BTN] {
        assert!(panel.get(id).unwrap().disabled, "{id} should be disabled in pod mode");
    }
    assert!(!panel.get(POD_MODS_BTN).is_some_and(|b| b.visible));

    buttons.refresh(&mut panel, &docked(0));
    assert!(!panel.get(BUY_SHIP_BTN).unwrap().visible);
    assert!(!panel.get(SCAN_BTN).unwrap().disabled);
}

#[test]
fn test_refresh_shows_pod_mods_when_docked_with_pod() {
    let buttons = ActionButtons::new(UiSounds::muted());
    let mut panel = controls::action_panel(&UiSounds::muted());

    let mut state = docked(0);
    state.player_stats.has_flight_pod = true;
    state.player_stats.just_bought_pod = true;
    buttons.refresh(&mut panel, &state);
    assert!(panel.get(POD_MODS_BTN).unwrap().disabled);

    state.at_repair_location = false;
    buttons.refresh(&mut panel, &state);
    assert!(!panel.get(POD_MODS_BTN).unwrap().visible);
}

#[test]
fn test_main_menu_defaults() {
    let menu = controls::main_menu_controls(&UiSounds::muted());
    assert!(!menu.get(CONTINUE_BTN).unwrap().visible);
    assert!(menu.get(NEW_GAME_BTN).unwrap().primary);
    assert!(menu.iter().all(|c| c.sound_attached()));
}
