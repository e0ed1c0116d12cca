pub mod input;
pub mod types;
pub mod control;

pub use types::{Rect, Color, Alignment, Style, Background, Border, GradientDirection};
pub use control::{Control, ControlClass, ControlSet, ClickHandler};

pub trait UiRenderer {
    /// 画布的逻辑尺寸
    fn size(&self) -> (f32, f32);

    /// 绘制实心矩形
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// 绘制样式盒子 (背景 + 边框)
    fn draw_style(&mut self, rect: Rect, style: &Style);

    /// 绘制文字
    fn draw_text(&mut self, text: &str, rect: Rect, color: Color, size: f32, align: Alignment);
}
