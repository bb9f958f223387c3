//! Avatar cosmetics: breathing, hover, the rainbow glow and the click
//! easter egg. Mood classes live with the demo steps.

use serde::{Deserialize, Serialize};

use super::particles::ParticleGenerator;

pub const BREATHE_ANIMATION: &str = "breathe 4s ease-in-out infinite";
pub const BREATHE_MAX_DELAY_MS: u64 = 2_000;
pub const EASTER_EGG_MESSAGE: &str =
    "You discovered the avatar easter egg! Keep clicking for health! 🥳";
pub const DEFAULT_EASTER_EGG_CLICKS: u32 = 7;
/// The demo avatar pops to this scale whenever its mood is set.
pub const MOOD_PULSE_SCALE: f64 = 1.1;
pub const MOOD_PULSE_MS: u64 = 300;

/// Staggered start for each avatar's breathing loop.
pub fn breathing_delays(generator: &mut ParticleGenerator, avatars: usize) -> Vec<u64> {
    (0..avatars)
        .map(|_| generator.jitter_ms(BREATHE_MAX_DELAY_MS))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverStyle {
    pub avatar_transform: &'static str,
    pub transition: Option<&'static str>,
    pub glow_transform: &'static str,
    /// `None` clears the inline opacity back to the stylesheet value.
    pub glow_opacity: Option<&'static str>,
}

pub fn hover_style(hovered: bool) -> HoverStyle {
    if hovered {
        HoverStyle {
            avatar_transform: "scale(1.1) rotate(5deg)",
            transition: Some("all 0.3s ease"),
            glow_transform: "scale(1.2)",
            glow_opacity: Some("1"),
        }
    } else {
        HoverStyle {
            avatar_transform: "scale(1) rotate(0deg)",
            transition: None,
            glow_transform: "scale(1)",
            glow_opacity: None,
        }
    }
}

/// Rainbow glows only spin while on screen.
pub fn rainbow_glow_animation(visible: bool) -> &'static str {
    if visible {
        "rotate 3s linear infinite, pulse 2s ease-in-out infinite"
    } else {
        "pulse 2s ease-in-out infinite"
    }
}

/// Counts clicks on any avatar; every `threshold`-th click is a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarClickCounter {
    threshold: u32,
    clicks: u32,
}

impl AvatarClickCounter {
    /// A threshold of 0 is treated as 1.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            clicks: 0,
        }
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    /// Register a click. Returns the click count when it hits the threshold,
    /// after which the counter starts over.
    pub fn click(&mut self) -> Option<u32> {
        self.clicks += 1;
        if self.clicks < self.threshold {
            return None;
        }
        let hit = self.clicks;
        self.clicks = 0;
        Some(hit)
    }
}

impl Default for AvatarClickCounter {
    fn default() -> Self {
        Self::new(DEFAULT_EASTER_EGG_CLICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easter_egg_every_seventh_click() {
        let mut counter = AvatarClickCounter::default();
        let hits: Vec<usize> = (1..=15)
            .filter_map(|i| counter.click().map(|_| i))
            .collect();
        assert_eq!(hits, vec![7, 14]);
        assert_eq!(counter.clicks(), 1);
    }

    #[test]
    fn zero_threshold_fires_every_click() {
        let mut counter = AvatarClickCounter::new(0);
        assert_eq!(counter.click(), Some(1));
        assert_eq!(counter.click(), Some(1));
    }

    #[test]
    fn hover_enter_and_leave() {
        let enter = hover_style(true);
        assert_eq!(enter.avatar_transform, "scale(1.1) rotate(5deg)");
        assert_eq!(enter.glow_opacity, Some("1"));
        let leave = hover_style(false);
        assert_eq!(leave.glow_transform, "scale(1)");
        assert_eq!(leave.glow_opacity, None);
    }

    #[test]
    fn breathing_delays_bounded() {
        let mut generator = ParticleGenerator::new(Some(11));
        let delays = breathing_delays(&mut generator, 6);
        assert_eq!(delays.len(), 6);
        assert!(delays.iter().all(|d| *d < BREATHE_MAX_DELAY_MS));
    }

    #[test]
    fn rainbow_spins_only_when_visible() {
        assert!(rainbow_glow_animation(true).starts_with("rotate"));
        assert!(!rainbow_glow_animation(false).contains("rotate"));
    }
}
