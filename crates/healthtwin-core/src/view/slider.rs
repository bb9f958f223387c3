//! Range slider cosmetics: filled track and the stress label.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderView {
    pub percentage: f64,
    pub background: String,
    /// Only sliders with a `.stress-label` sibling show this.
    pub stress_label: String,
}

/// How far along the track `value` sits, in percent. 0 for a zero `max`.
pub fn fill_percentage(value: u32, max: u32) -> f64 {
    if max == 0 {
        return 0.0;
    }
    f64::from(value) * 100.0 / f64::from(max)
}

pub fn track_gradient(percentage: f64) -> String {
    format!(
        "linear-gradient(to right, var(--color-primary) 0%, var(--color-primary) {p}%, var(--color-secondary) {p}%, var(--color-secondary) 100%)",
        p = percentage
    )
}

pub fn stress_emoji(value: u32) -> &'static str {
    match value {
        0..=3 => "😌",
        4..=6 => "📚",
        7..=8 => "😰",
        _ => "🔥",
    }
}

pub fn stress_label(value: u32) -> String {
    format!("{value}/10 {}", stress_emoji(value))
}

pub fn render(value: u32, max: u32) -> SliderView {
    let percentage = fill_percentage(value, max);
    SliderView {
        percentage,
        background: track_gradient(percentage),
        stress_label: stress_label(value),
    }
}
