//! Scroll-triggered reveal animations.
//!
//! Elements start transparent and offset, then get the `animate-in` class
//! the first time enough of them scrolls into view. Reveals are one-way.

use serde::{Deserialize, Serialize};

pub const ANIMATE_IN_CLASS: &str = "animate-in";
pub const REVEAL_THRESHOLD: f64 = 0.1;
/// The observer's root box is shrunk by this much at the bottom.
pub const REVEAL_BOTTOM_MARGIN_PX: f64 = 50.0;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealGroup {
    FeatureCards,
    AvatarStates,
    /// Social feed and leaderboard; slide in from alternating sides.
    SocialCards,
}

impl RevealGroup {
    pub fn selector(self) -> &'static str {
        match self {
            RevealGroup::FeatureCards => ".feature-card",
            RevealGroup::AvatarStates => ".avatar-state",
            RevealGroup::SocialCards => ".social-feed, .global-leaderboard",
        }
    }

    fn stagger_ms(self) -> u64 {
        match self {
            RevealGroup::FeatureCards | RevealGroup::AvatarStates => 100,
            RevealGroup::SocialCards => 200,
        }
    }
}

impl std::str::FromStr for RevealGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature-cards" => Ok(RevealGroup::FeatureCards),
            "avatar-states" => Ok(RevealGroup::AvatarStates),
            "social-cards" => Ok(RevealGroup::SocialCards),
            other => Err(format!("unknown reveal group: {other}")),
        }
    }
}

/// Inline style an element starts with before it is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealStyle {
    pub opacity: String,
    pub transform: String,
    pub transition: String,
}

pub fn initial_style(group: RevealGroup, index: usize) -> RevealStyle {
    let transform = match group {
        RevealGroup::SocialCards if index % 2 == 0 => "translateX(-30px)",
        RevealGroup::SocialCards => "translateX(30px)",
        _ => "translateY(30px)",
    };
    let delay_ms = group.stagger_ms() * index as u64;
    RevealStyle {
        opacity: "0".into(),
        transform: transform.into(),
        transition: format!("all 0.6s ease {}", format_seconds(delay_ms)),
    }
}

/// `1200` -> `"1.2s"`, `0` -> `"0s"`.
fn format_seconds(ms: u64) -> String {
    let whole = ms / 1000;
    let frac = ms % 1000;
    if frac == 0 {
        return format!("{whole}s");
    }
    let frac = format!("{frac:03}");
    format!("{whole}.{}s", frac.trim_end_matches('0'))
}

/// Fraction of an element inside the observer's root box.
///
/// `top` is relative to the viewport's top edge.
pub fn visible_ratio(top: f64, height: f64, viewport_height: f64) -> f64 {
    let root_bottom = (viewport_height - REVEAL_BOTTOM_MARGIN_PX).max(0.0);
    let bottom = top + height;
    if height <= 0.0 {
        return if (0.0..=root_bottom).contains(&top) { 1.0 } else { 0.0 };
    }
    let overlap = bottom.min(root_bottom) - top.max(0.0);
    (overlap / height).clamp(0.0, 1.0)
}

/// Which elements of a group have been revealed so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTracker {
    group: RevealGroup,
    revealed: Vec<bool>,
}

impl RevealTracker {
    pub fn new(group: RevealGroup, count: usize) -> Self {
        Self {
            group,
            revealed: vec![false; count],
        }
    }

    /// Feed an observation. Returns `true` only the first time `index`
    /// crosses the threshold.
    pub fn observe(&mut self, index: usize, ratio: f64) -> bool {
        let Some(slot) = self.revealed.get_mut(index) else {
            return false;
        };
        if *slot || ratio <= 0.0 || ratio < REVEAL_THRESHOLD {
            return false;
        }
        *slot = true;
        true
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| **r).count()
    }
}
