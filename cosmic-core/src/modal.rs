use log::{debug, warn};
use serde_json::Value;

use crate::command::{GameAction, SaveLoadMode, UiCommand};
use crate::config::UiConfig;
use crate::sounds::UiSounds;

pub const CHOICE_MODAL_ID: &str = "choice-modal";
pub const SAVE_LOAD_MODAL_ID: &str = "save-load-modal";

/// 选择回调，参数是显示列表中从 1 开始的序号
pub type ChoiceCallback = Box<dyn FnMut(usize) -> Option<UiCommand>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Choice,
    SaveLoad(SaveLoadMode),
}

pub struct Modal {
    pub id: &'static str,
    pub kind: ModalKind,
    pub title: String,
    pub choices: Vec<String>,
    pub z_index: u32,
    on_select: ChoiceCallback,
}

impl Modal {
    /// 按钮上显示的文字，如 "1. Attack"
    pub fn choice_labels(&self) -> impl Iterator<Item = String> + '_ {
        self.choices.iter().enumerate().map(|(i, c)| format!("{}. {}", i + 1, c))
    }
}

/// 弹窗栈，后打开的在上层
pub struct ModalManager {
    z_base: u32,
    z_step: u32,
    current_z: u32,
    active: Vec<Modal>,
    save_slots: usize,
    sounds: UiSounds,
}

/// 去掉空白项，其余去首尾空格
pub fn usable_choices<S: AsRef<str>>(choices: &[S]) -> Vec<String> {
    choices
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// 服务端发来的选项：null / false / 0 / 空串 视为无效。
/// 保留每项在服务端列表中从 1 开始的序号，回传时用它而不是显示位置
pub fn normalize_choices(values: &[Value]) -> Vec<(usize, String)> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let label = match v {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) if n.as_f64().is_some_and(|f| f == 0.0) => return None,
                Value::Number(n) => n.to_string(),
                Value::Bool(true) => "true".to_string(),
                _ => return None,
            };
            (!label.is_empty()).then_some((i + 1, label))
        })
        .collect()
}

impl ModalManager {
    pub fn new(cfg: &UiConfig) -> Self {
        Self {
            z_base: cfg.modal_z_base,
            z_step: cfg.modal_z_step,
            current_z: cfg.modal_z_base,
            active: Vec::new(),
            save_slots: cfg.save_slots,
            sounds: UiSounds::muted(),
        }
    }

    /// 选项按钮的点击音效
    pub fn with_sounds(mut self, sounds: UiSounds) -> Self {
        self.sounds = sounds;
        self
    }

    fn track(&mut self, mut modal: Modal) {
        // 同一个弹窗再次打开时换内容并置顶
        self.active.retain(|m| m.id != modal.id);
        self.current_z += self.z_step;
        modal.z_index = self.current_z;
        debug!("Modal '{}' shown at z {}", modal.id, modal.z_index);
        self.active.push(modal);
    }

    fn untrack(&mut self, id: &str) -> Option<Modal> {
        let idx = self.active.iter().position(|m| m.id == id)?;
        let modal = self.active.remove(idx);
        if self.active.is_empty() {
            self.current_z = self.z_base;
        }
        Some(modal)
    }

    /// 没有可用选项时不显示，返回 false
    pub fn show_choice_modal<S: AsRef<str>>(
        &mut self,
        title: &str,
        choices: &[S],
        on_select: impl FnMut(usize) -> Option<UiCommand> + 'static,
    ) -> bool {
        let choices = usable_choices(choices);
        if choices.is_empty() {
            debug!("Choice modal '{}' has no usable choices, not shown", title);
            return false;
        }
        self.track(Modal {
            id: CHOICE_MODAL_ID,
            kind: ModalKind::Choice,
            title: title.to_string(),
            choices,
            z_index: 0,
            on_select: Box::new(on_select),
        });
        true
    }

    /// 服务端选项。回调收到的是服务端列表中的序号，被丢弃的项不影响后面的编号
    pub fn show_choice_modal_json(
        &mut self,
        title: &str,
        choices: &[Value],
        mut on_select: impl FnMut(usize) -> Option<UiCommand> + 'static,
    ) -> bool {
        let (indices, labels): (Vec<usize>, Vec<String>) = normalize_choices(choices).into_iter().unzip();
        self.show_choice_modal(title, &labels, move |shown| {
            let index = indices.get(shown.checked_sub(1)?).copied()?;
            on_select(index)
        })
    }

    pub fn hide_choice_modal(&mut self) {
        self.untrack(CHOICE_MODAL_ID);
    }

    /// 存档槽列表，选择后发出存/读档动作
    pub fn show_save_load(&mut self, mode: SaveLoadMode) {
        let title = match mode {
            SaveLoadMode::Save => "Save Game",
            SaveLoadMode::Load => "Load Game",
        };
        let choices = (0..self.save_slots).map(|slot| format!("Slot {slot}")).collect();
        self.track(Modal {
            id: SAVE_LOAD_MODAL_ID,
            kind: ModalKind::SaveLoad(mode),
            title: title.to_string(),
            choices,
            z_index: 0,
            on_select: Box::new(move |index| {
                let slot = index - 1;
                Some(UiCommand::Game(match mode {
                    SaveLoadMode::Save => GameAction::SaveGame(slot),
                    SaveLoadMode::Load => GameAction::LoadGame(slot),
                }))
            }),
        });
    }

    /// 选择最上层弹窗的第 index 项 (从 1 开始)；弹窗先关闭再回调
    pub fn select_choice(&mut self, index: usize) -> Option<UiCommand> {
        let top = self.active.last()?;
        if index == 0 || index > top.choices.len() {
            warn!("Choice {} out of range for modal '{}'", index, top.id);
            return None;
        }
        let id = top.id;
        self.sounds.click();
        let mut modal = self.untrack(id)?;
        (modal.on_select)(index)
    }

    pub fn close_top_modal(&mut self) -> Option<&'static str> {
        let id = self.active.last()?.id;
        self.untrack(id);
        Some(id)
    }

    pub fn close_all_modals(&mut self) {
        if !self.active.is_empty() {
            debug!("Closing {} modal(s)", self.active.len());
        }
        self.active.clear();
        self.current_z = self.z_base;
    }

    pub fn active_modals(&self) -> &[Modal] {
        &self.active
    }

    pub fn top(&self) -> Option<&Modal> {
        self.active.last()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.active.iter().any(|m| m.id == id)
    }

    pub fn current_modal_z_index(&self) -> u32 {
        self.current_z
    }
}
