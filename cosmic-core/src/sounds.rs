use crossbeam_channel::Sender;
use cosmic_audio::SoundCue;
use cosmic_ui::{Control, ControlSet};

/// 给控件挂上点击音效。音效先于原回调发出，
/// 禁用或隐藏的控件两者都不会触发。
#[derive(Clone)]
pub struct UiSounds {
    tx: Option<Sender<SoundCue>>,
}

impl UiSounds {
    pub fn new(tx: Sender<SoundCue>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn muted() -> Self {
        Self { tx: None }
    }

    /// 直接发出一次点击音效，给不是 Control 的可点击项用 (弹窗选项)
    pub fn click(&self) {
        if let Some(tx) = &self.tx {
            if tx.send(SoundCue::UiClick).is_err() {
                log::debug!("Click cue dropped, audio side is gone");
            }
        }
    }

    pub fn register<C: 'static>(&self, control: &mut Control<C>) {
        if control.sound_attached() {
            return;
        }
        let sounds = self.clone();
        let mut original = control.take_handler();
        control.set_handler(Box::new(move || {
            sounds.click();
            original.as_mut().and_then(|h| h())
        }));
        control.mark_sound_attached();
    }

    pub fn register_all<C: 'static>(&self, controls: &mut ControlSet<C>) {
        for control in controls.iter_mut() {
            self.register(control);
        }
    }
}
