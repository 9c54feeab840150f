//! Floating-label text input.
//!
//! A text field whose placeholder doubles as a label. While the field is
//! empty and unfocused the label rests in place, invisible behind the
//! placeholder. Focusing an empty field floats the label above the field;
//! leaving it empty again lets the label settle back.
//!
//! ```text
//!            focus (text empty)
//!   RESTING ───────────────────▶ FLOATED
//!   alpha 0 ◀─────────────────── alpha 1, y -= float_offset
//!            blur (text empty)
//! ```
//!
//! Label changes animate linearly over [`FloatingLabelStyle::animation_ms`];
//! the owner drives the animation with [`FloatingLabelInput::tick`]. The
//! border color follows focus and is independent of the label animation.

use crate::config::InputConfig;

/// Border stroke width of the field.
pub const BORDER_WIDTH: f32 = 1.0;
/// Corner radius of the field's border.
pub const CORNER_RADIUS: f32 = 8.0;

/// An opaque-or-translucent RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const LIGHT_GRAY: Color = Color::rgb(0xd3, 0xd3, 0xd3);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#rrggbb`. Returns `None` for anything else.
    ///
    /// ```
    /// # use masonry_gallery::floating_label::Color;
    /// assert_eq!(Color::from_hex("#0000ff"), Some(Color::BLUE));
    /// assert_eq!(Color::from_hex("blue"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Where the label sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    Resting,
    Floated,
}

/// Rendered label properties. `translate_y` is negative when raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAppearance {
    pub alpha: f32,
    pub translate_y: f32,
}

impl LabelAppearance {
    pub const RESTING: LabelAppearance = LabelAppearance {
        alpha: 0.0,
        translate_y: 0.0,
    };

    pub fn floated(offset: f32) -> Self {
        Self {
            alpha: 1.0,
            translate_y: -offset,
        }
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            alpha: self.alpha + (other.alpha - self.alpha) * t,
            translate_y: self.translate_y + (other.translate_y - self.translate_y) * t,
        }
    }
}

/// Colors and motion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingLabelStyle {
    pub active_border: Color,
    pub inactive_border: Color,
    pub background: Color,
    pub animation_ms: u32,
    pub float_offset: f32,
}

impl Default for FloatingLabelStyle {
    fn default() -> Self {
        Self {
            active_border: Color::BLUE,
            inactive_border: Color::LIGHT_GRAY,
            background: Color::WHITE,
            animation_ms: 300,
            float_offset: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Transition {
    from: LabelAppearance,
    to: LabelAppearance,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl Transition {
    fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    fn value(&self) -> LabelAppearance {
        self.from.lerp(&self.to, self.progress())
    }
}

#[derive(Debug, Clone)]
pub struct FloatingLabelInput {
    placeholder: String,
    text: String,
    focused: bool,
    state: LabelState,
    style: FloatingLabelStyle,
    border_color: Color,
    settled: LabelAppearance,
    transition: Option<Transition>,
}

impl FloatingLabelInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self::with_style(placeholder, FloatingLabelStyle::default())
    }

    /// Input styled from the `[input]` section of `config.toml`.
    pub fn from_config(placeholder: impl Into<String>, config: &InputConfig) -> Self {
        Self::with_style(placeholder, config.to_style())
    }

    pub fn with_style(placeholder: impl Into<String>, style: FloatingLabelStyle) -> Self {
        let border_color = style.inactive_border;
        Self {
            placeholder: placeholder.into(),
            text: String::new(),
            focused: false,
            state: LabelState::Resting,
            style,
            border_color,
            settled: LabelAppearance::RESTING,
            transition: None,
        }
    }

    /// Placeholder text, also shown by the floating label.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the field contents, as typing would.
    ///
    /// The label only moves on focus changes, never on edits.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn label_state(&self) -> LabelState {
        self.state
    }

    pub fn style(&self) -> &FloatingLabelStyle {
        &self.style
    }

    /// Editing began.
    pub fn focus(&mut self) {
        if self.focused {
            return;
        }
        self.focused = true;
        if self.text.is_empty() {
            self.animate_to(LabelState::Floated);
        }
        self.border_color = self.style.active_border;
    }

    /// Editing ended.
    pub fn blur(&mut self) {
        if !self.focused {
            return;
        }
        self.focused = false;
        if self.text.is_empty() {
            self.animate_to(LabelState::Resting);
        }
        self.border_color = self.style.inactive_border;
    }

    fn animate_to(&mut self, state: LabelState) {
        let target = match state {
            LabelState::Resting => LabelAppearance::RESTING,
            LabelState::Floated => LabelAppearance::floated(self.style.float_offset),
        };
        // A reversal mid-flight starts from wherever the label is now.
        let from = self.label_appearance();
        self.state = state;
        if self.style.animation_ms == 0 {
            self.settled = target;
            self.transition = None;
            return;
        }
        self.transition = Some(Transition {
            from,
            to: target,
            duration_ms: self.style.animation_ms as f32,
            elapsed_ms: 0.0,
        });
    }

    /// Advance the label animation by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: f32) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };
        transition.elapsed_ms += dt_ms;
        if transition.progress() >= 1.0 {
            self.settled = transition.to;
            self.transition = None;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Current (possibly mid-animation) label alpha and offset.
    pub fn label_appearance(&self) -> LabelAppearance {
        match &self.transition {
            Some(transition) => transition.value(),
            None => self.settled,
        }
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn background_color(&self) -> Color {
        self.style.background
    }

    pub fn set_active_border_color(&mut self, color: Color) {
        self.style.active_border = color;
        self.refresh_border();
    }

    pub fn set_inactive_border_color(&mut self, color: Color) {
        self.style.inactive_border = color;
        self.refresh_border();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.style.background = color;
    }

    fn refresh_border(&mut self) {
        self.border_color = if self.focused {
            self.style.active_border
        } else {
            self.style.inactive_border
        };
    }
}
