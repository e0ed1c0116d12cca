#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };
    pub const CYAN: Self = Self { r: 0, g: 255, b: 255, a: 255 };
    pub const MAGENTA: Self = Self { r: 255, g: 0, b: 255, a: 255 };
    pub const YELLOW: Self = Self { r: 255, g: 255, b: 0, a: 255 };

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(mut self, a: u8) -> Self {
        self.a = a;
        self
    }

    /// CSS 风格的透明度 (0.0 ~ 1.0)
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// 解析 "#rrggbb" / "#rgb"，失败返回 None
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        // 先保证全是十六进制字符，下面按字节切片才安全
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |c: &str| channel(c).map(|v| v * 17);
                Some(Self::rgb(
                    expand(&digits[0..1])?,
                    expand(&digits[1..2])?,
                    expand(&digits[2..3])?,
                ))
            }
            _ => None,
        }
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Start,
    Center,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientDirection {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Background {
    None,
    Solid(Color),
    /// 色标位置 0.0 ~ 1.0，按升序排列
    LinearGradient {
        dir: GradientDirection,
        stops: Vec<(f32, Color)>,
    },
}

impl Background {
    /// 取渐变在 t 处的颜色
    pub fn sample(&self, t: f32) -> Option<Color> {
        match self {
            Background::None => None,
            Background::Solid(c) => Some(*c),
            Background::LinearGradient { stops, .. } => {
                let (first, last) = (stops.first()?, stops.last()?);
                if t <= first.0 {
                    return Some(first.1);
                }
                if t >= last.0 {
                    return Some(last.1);
                }
                stops.windows(2).find_map(|w| {
                    let ((p0, c0), (p1, c1)) = (w[0], w[1]);
                    if t >= p0 && t <= p1 {
                        let span = (p1 - p0).max(f32::EPSILON);
                        Some(c0.lerp(c1, (t - p0) / span))
                    } else {
                        None
                    }
                })
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub color: Color,
    pub width: f32,
    pub radius: f32,
}

impl Default for Border {
    fn default() -> Self {
        Self { color: Color::TRANSPARENT, width: 0.0, radius: 0.0 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub background: Background,
    pub border: Border,
}

impl Default for Style {
    fn default() -> Self {
        Self { background: Background::None, border: Border::default() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w &&
            y >= self.y && y < self.y + self.h
    }

    pub fn split_top(&self, height: f32) -> (Rect, Rect) {
        let h = height.min(self.h);
        let top = Rect::new(self.x, self.y, self.w, h);
        let rest = Rect::new(self.x, self.y + h, self.w, self.h - h);
        (top, rest)
    }

    // 返回 (切出的底部, 上面的剩余)
    pub fn split_bottom(&self, height: f32) -> (Rect, Rect) {
        let h = height.min(self.h);
        let rest_h = self.h - h;
        let rest = Rect::new(self.x, self.y, self.w, rest_h);
        let bottom = Rect::new(self.x, self.y + rest_h, self.w, h);
        (bottom, rest)
    }

    pub fn split_left(&self, width: f32) -> (Rect, Rect) {
        let w = width.min(self.w);
        let left = Rect::new(self.x, self.y, w, self.h);
        let rest = Rect::new(self.x + w, self.y, self.w - w, self.h);
        (left, rest)
    }

    pub fn shrink(&self, amount: f32) -> Rect {
        // 缩没了就返回 0 大小
        if self.w <= amount * 2.0 || self.h <= amount * 2.0 {
            return Rect::new(self.x, self.y, 0.0, 0.0);
        }
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.w - amount * 2.0,
            self.h - amount * 2.0,
        )
    }

    pub fn center(&self, target_w: f32, target_h: f32) -> Rect {
        let new_x = self.x + (self.w - target_w) / 2.0;
        let new_y = self.y + (self.h - target_h) / 2.0;
        Rect::new(new_x, new_y, target_w, target_h)
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}
