/// 点击回调：返回值交给上层分发 (例如 UI 指令)
pub type ClickHandler<C> = Box<dyn FnMut() -> Option<C>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlClass {
    Action,
    Menu,
    Choice,
    Button,
}

pub struct Control<C> {
    pub id: String,
    pub label: String,
    pub class: ControlClass,
    pub disabled: bool,
    pub visible: bool,
    /// 主按钮高亮
    pub primary: bool,
    pub title: Option<String>,

    handler: Option<ClickHandler<C>>,
    sound_attached: bool,
}

impl<C> Control<C> {
    pub fn new(id: &str, label: &str, class: ControlClass) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            class,
            disabled: false,
            visible: true,
            primary: false,
            title: None,
            handler: None,
            sound_attached: false,
        }
    }

    pub fn on_click(mut self, handler: impl FnMut() -> Option<C> + 'static) -> Self {
        self.set_handler(Box::new(handler));
        self
    }

    /// 换掉回调后音效需要重新挂载
    pub fn set_handler(&mut self, handler: ClickHandler<C>) {
        self.handler = Some(handler);
        self.sound_attached = false;
    }

    pub fn take_handler(&mut self) -> Option<ClickHandler<C>> {
        self.handler.take()
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn sound_attached(&self) -> bool {
        self.sound_attached
    }

    pub fn mark_sound_attached(&mut self) {
        self.sound_attached = true;
    }

    /// 禁用或隐藏的控件不响应点击
    pub fn click(&mut self) -> Option<C> {
        if self.disabled || !self.visible {
            return None;
        }
        self.handler.as_mut().and_then(|h| h())
    }
}

/// 有序控件表 (对应一个面板里的按钮顺序)
pub struct ControlSet<C> {
    controls: Vec<Control<C>>,
}

impl<C> ControlSet<C> {
    pub fn new() -> Self {
        Self { controls: Vec::new() }
    }

    /// 同 id 的控件已存在时替换它，位置不变
    pub fn insert(&mut self, control: Control<C>) -> &mut Control<C> {
        let idx = match self.position(&control.id) {
            Some(idx) => {
                self.controls[idx] = control;
                idx
            }
            None => {
                self.controls.push(control);
                self.controls.len() - 1
            }
        };
        &mut self.controls[idx]
    }

    /// 插到 `before` 之前；`before` 不存在时追加到末尾
    pub fn insert_before(&mut self, before: &str, control: Control<C>) -> &mut Control<C> {
        if self.contains(&control.id) {
            return self.insert(control);
        }
        let idx = self.position(before).unwrap_or(self.controls.len());
        self.controls.insert(idx, control);
        &mut self.controls[idx]
    }

    pub fn get(&self, id: &str) -> Option<&Control<C>> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Control<C>> {
        self.controls.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<Control<C>> {
        self.position(id).map(|idx| self.controls.remove(idx))
    }

    pub fn click(&mut self, id: &str) -> Option<C> {
        match self.get_mut(id) {
            Some(control) => control.click(),
            None => {
                log::warn!("Click on unknown control '{}'", id);
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control<C>> {
        self.controls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Control<C>> {
        self.controls.iter_mut()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Control<C>> {
        self.controls.iter().filter(|c| c.visible)
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.controls.iter().position(|c| c.id == id)
    }
}

impl<C> Default for ControlSet<C> {
    fn default() -> Self {
        Self::new()
    }
}
