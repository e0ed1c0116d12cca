/// 前端无关的按键表示，由具体前端 (终端 / 窗口) 转换而来
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Tab,
    F(u8),
}

impl Key {
    /// 数字键 1~9 对应的序号
    pub fn digit(&self) -> Option<usize> {
        match self {
            Key::Char(c) => c.to_digit(10).map(|d| d as usize).filter(|d| *d > 0),
            _ => None,
        }
    }
}
