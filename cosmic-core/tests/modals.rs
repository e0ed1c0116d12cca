use crossbeam_channel::unbounded;
use serde_json::json;
use cosmic_audio::SoundCue;
use cosmic_core::command::{GameAction, SaveLoadMode, UiCommand};
use cosmic_core::modal::{normalize_choices, ModalKind, CHOICE_MODAL_ID, SAVE_LOAD_MODAL_ID};
use cosmic_core::{ModalManager, UiConfig, UiSounds};

fn modals() -> ModalManager {
    ModalManager::new(&UiConfig::default())
}

#[test]
fn test_empty_choices_never_shown() {
    let mut m = modals();
    let none: [&str; 0] = [];
    assert!(!m.show_choice_modal("Nothing", &none, |_| None));
    assert!(!m.show_choice_modal("Blank", &["", "   ", "\t"], |_| None));
    assert!(m.active_modals().is_empty());
    assert_eq!(m.current_modal_z_index(), 1000);
}

#[test]
fn test_invalid_json_choices_never_shown() {
    let raw = vec![json!(null), json!(""), json!("   "), json!(0), json!(false)];
    assert!(normalize_choices(&raw).is_empty());

    let mut m = modals();
    assert!(!m.show_choice_modal_json("Event", &raw, |_| None));
    assert!(m.top().is_none());
}

#[test]
fn test_json_choices_are_stringified() {
    let raw = vec![json!(" Trade "), json!(3), json!(true), json!(null), json!(1.5)];
    let expected: Vec<(usize, String)> =
        [(1, "Trade"), (2, "3"), (3, "true"), (5, "1.5")].iter().map(|(i, s)| (*i, s.to_string())).collect();
    assert_eq!(normalize_choices(&raw), expected);
}

#[test]
fn test_two_choices_shown() {
    let mut m = modals();
    assert!(m.show_choice_modal("Distress signal", &["A", "B"], |_| None));

    let top = m.top().unwrap();
    assert_eq!(top.id, CHOICE_MODAL_ID);
    assert_eq!(top.kind, ModalKind::Choice);
    assert_eq!(top.choices.len(), 2);
    assert_eq!(top.choice_labels().collect::<Vec<_>>(), vec!["1. A", "2. B"]);
}

#[test]
fn test_local_choices_number_by_display() {
    let mut m = modals();
    m.show_choice_modal("Mixed", &["", "Dock", "  ", "Leave"], |i| Some(UiCommand::Game(GameAction::Choice(i))));
    assert_eq!(m.top().unwrap().choices, vec!["Dock", "Leave"]);

    assert_eq!(m.select_choice(2), Some(UiCommand::Game(GameAction::Choice(2))));
    assert!(m.active_modals().is_empty());
}

#[test]
fn test_server_choices_keep_server_numbering() {
    let mut m = modals();
    let raw = vec![json!(null), json!("Attack"), json!("  "), json!("Flee")];
    assert!(m.show_choice_modal_json("Pirates", &raw, |i| Some(UiCommand::Game(GameAction::Choice(i)))));
    assert_eq!(m.top().unwrap().choice_labels().collect::<Vec<_>>(), vec!["1. Attack", "2. Flee"]);

    // 显示第 1 项 "Attack"，服务端列表里是第 2 项
    assert_eq!(m.select_choice(1), Some(UiCommand::Game(GameAction::Choice(2))));

    m.show_choice_modal_json("Pirates", &raw, |i| Some(UiCommand::Game(GameAction::Choice(i))));
    assert_eq!(m.select_choice(2), Some(UiCommand::Game(GameAction::Choice(4))));
}

#[test]
fn test_choice_click_plays_sound_before_callback() {
    let (tx, rx) = unbounded();
    let mut m = modals().with_sounds(UiSounds::new(tx));
    let rx_in_callback = rx.clone();
    m.show_choice_modal("Derelict", &["Board", "Leave"], move |_| {
        assert_eq!(rx_in_callback.try_recv().ok(), Some(SoundCue::UiClick));
        None
    });

    // 越界的选择不算点击
    assert_eq!(m.select_choice(5), None);
    assert!(rx.try_recv().is_err());

    m.select_choice(1);
    assert!(m.active_modals().is_empty());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_z_index_stacks_and_resets() {
    let mut m = modals();
    m.show_choice_modal("One", &["A"], |_| None);
    assert_eq!(m.top().unwrap().z_index, 1010);
    m.show_save_load(SaveLoadMode::Save);
    assert_eq!(m.top().unwrap().z_index, 1020);
    assert_eq!(m.current_modal_z_index(), 1020);

    assert_eq!(m.close_top_modal(), Some(SAVE_LOAD_MODAL_ID));
    assert_eq!(m.current_modal_z_index(), 1020);
    assert_eq!(m.close_top_modal(), Some(CHOICE_MODAL_ID));
    assert_eq!(m.current_modal_z_index(), 1000);
    assert_eq!(m.close_top_modal(), None);
}

#[test]
fn test_reshowing_choice_modal_replaces_it() {
    let mut m = modals();
    m.show_choice_modal("First", &["A"], |_| None);
    m.show_choice_modal("Second", &["B", "C"], |_| None);
    assert_eq!(m.active_modals().len(), 1);
    assert_eq!(m.top().unwrap().title, "Second");
}

#[test]
fn test_out_of_range_selection_keeps_modal() {
    let mut m = modals();
    m.show_choice_modal("Event", &["A", "B"], |_| Some(UiCommand::Quit));
    assert_eq!(m.select_choice(0), None);
    assert_eq!(m.select_choice(3), None);
    assert!(m.is_open(CHOICE_MODAL_ID));
    assert_eq!(m.select_choice(1), Some(UiCommand::Quit));
}

#[test]
fn test_save_load_slots() {
    let mut m = modals();
    m.show_save_load(SaveLoadMode::Load);
    let top = m.top().unwrap();
    assert_eq!(top.kind, ModalKind::SaveLoad(SaveLoadMode::Load));
    assert_eq!(top.choices.len(), 5);
    assert_eq!(top.choices[0], "Slot 0");

    assert_eq!(m.select_choice(3), Some(UiCommand::Game(GameAction::LoadGame(2))));
}

#[test]
fn test_close_all_modals() {
    let mut m = modals();
    m.show_choice_modal("A", &["x"], |_| None);
    m.show_save_load(SaveLoadMode::Save);
    m.close_all_modals();
    assert!(m.active_modals().is_empty());
    assert_eq!(m.current_modal_z_index(), 1000);
    assert_eq!(m.select_choice(1), None);
}

#[test]
fn test_hide_choice_modal_keeps_other_modals() {
    let mut m = modals();
    m.show_save_load(SaveLoadMode::Save);
    assert!(m.show_choice_modal("Derelict", &["Board", "Leave"], |_| None));
    assert_eq!(m.active_modals().len(), 2);

    m.hide_choice_modal();
    assert!(!m.is_open(CHOICE_MODAL_ID));
    assert!(m.is_open(SAVE_LOAD_MODAL_ID));
    assert_eq!(m.active_modals().len(), 1);
}
