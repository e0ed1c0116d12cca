use std::collections::VecDeque;
use serde::{Deserialize, Serialize};
use crate::config::UiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Danger,
    Error,
    Quest,
}

impl NoticeKind {
    /// 服务端事件类型也会作为消息类型传进来，认不出的一律按 info
    pub fn from_event_type(kind: &str) -> Self {
        match kind {
            "success" | "victory" | "repair" | "trade" => NoticeKind::Success,
            "warning" => NoticeKind::Warning,
            "danger" | "combat" | "combat_start" | "combat_end" | "damage" | "game_over" => NoticeKind::Danger,
            "error" => NoticeKind::Error,
            "quest" => NoticeKind::Quest,
            _ => NoticeKind::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Danger => "danger",
            NoticeKind::Error => "error",
            NoticeKind::Quest => "quest",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: NoticeKind,
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventEntry {
    pub message: String,
    pub kind: NoticeKind,
    /// 自启动起的 mm:ss
    pub timestamp: String,
}

pub struct NotificationManager {
    toasts: Vec<Toast>,
    log: VecDeque<EventEntry>,
    max_log: usize,
    default_secs: f32,
    clock: f32,
}

impl NotificationManager {
    pub fn new(cfg: &UiConfig) -> Self {
        Self {
            toasts: Vec::new(),
            log: VecDeque::new(),
            max_log: cfg.event_log_size.max(1),
            default_secs: cfg.toast_ms as f32 / 1000.0,
            clock: 0.0,
        }
    }

    pub fn show_notification(&mut self, message: &str, kind: NoticeKind, duration_ms: Option<u32>) {
        let remaining = duration_ms.map_or(self.default_secs, |ms| ms as f32 / 1000.0);
        log::debug!("Toast [{}]: {}", kind.as_str(), message);
        self.toasts.push(Toast { message: message.to_string(), kind, remaining });
    }

    pub fn add_event_message(&mut self, message: &str, kind: NoticeKind) {
        let secs = self.clock as u64;
        let timestamp = format!("{:02}:{:02}", secs / 60, secs % 60);
        self.log.push_back(EventEntry { message: message.to_string(), kind, timestamp });
        while self.log.len() > self.max_log {
            self.log.pop_front();
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.clock += dt;
        for toast in &mut self.toasts {
            toast.remaining -= dt;
        }
        self.toasts.retain(|t| t.remaining > 0.0);
    }

    pub fn clear_notifications(&mut self) {
        self.toasts.clear();
    }

    pub fn clear_event_log(&mut self) {
        self.log.clear();
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn event_log(&self) -> impl Iterator<Item = &EventEntry> {
        self.log.iter()
    }

    pub fn event_log_len(&self) -> usize {
        self.log.len()
    }
}
