//! Decorative particles: the floating hero dots and the confetti burst.
//!
//! Randomness comes from a seedable PCG so a fixed seed reproduces the
//! exact same layout.

use std::f64::consts::PI;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

pub const CELEBRATION_GLYPHS: [&str; 5] = ["🎉", "✨", "🎊", "⭐", "🌟"];
pub const CELEBRATION_EASING: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";

/// A floating dot in the hero section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroParticle {
    pub left_pct: f64,
    pub top_pct: f64,
    pub size_px: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl HeroParticle {
    /// Inline style for the particle element.
    pub fn style(&self) -> String {
        format!(
            "left: {:.2}%; top: {:.2}%; width: {:.2}px; height: {:.2}px; animation-duration: {:.2}s; animation-delay: {:.2}s",
            self.left_pct, self.top_pct, self.size_px, self.size_px, self.duration_s, self.delay_s
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub transform: String,
    pub opacity: f64,
    /// Position in the animation (0..1); `None` lets the browser space it.
    pub offset: Option<f64>,
}

/// One glyph of the celebration burst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiParticle {
    pub glyph: String,
    pub font_size_px: f64,
    pub angle_rad: f64,
    pub distance_px: f64,
    pub keyframes: Vec<Keyframe>,
}

impl ConfettiParticle {
    /// Landing point relative to the burst origin, before the fall.
    pub fn final_offset(&self) -> (f64, f64) {
        (
            self.angle_rad.cos() * self.distance_px,
            self.angle_rad.sin() * self.distance_px,
        )
    }
}

#[derive(Debug, Clone)]
pub struct ParticleGenerator {
    rng: Mcg128Xsl64,
}

impl ParticleGenerator {
    /// `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self { rng }
    }

    pub fn hero(&mut self, count: usize) -> Vec<HeroParticle> {
        (0..count)
            .map(|_| HeroParticle {
                left_pct: self.rng.gen_range(0.0..100.0),
                top_pct: self.rng.gen_range(0.0..100.0),
                size_px: self.rng.gen_range(4.0..10.0),
                duration_s: self.rng.gen_range(6.0..14.0),
                delay_s: self.rng.gen_range(0.0..4.0),
            })
            .collect()
    }

    /// Burst of `count` glyphs spread evenly around the circle.
    pub fn celebration(&mut self, count: usize) -> Vec<ConfettiParticle> {
        (0..count)
            .map(|i| {
                let glyph = CELEBRATION_GLYPHS[self.rng.gen_range(0..CELEBRATION_GLYPHS.len())];
                let font_size_px = self.rng.gen_range(15.0..25.0);
                let angle_rad = 2.0 * PI * i as f64 / count as f64;
                let distance_px = self.rng.gen_range(150.0..450.0);
                let x = angle_rad.cos() * distance_px;
                let y = angle_rad.sin() * distance_px;
                ConfettiParticle {
                    glyph: glyph.to_string(),
                    font_size_px,
                    angle_rad,
                    distance_px,
                    keyframes: vec![
                        Keyframe {
                            transform: "translate(-50%, -50%) scale(0) rotate(0deg)".into(),
                            opacity: 1.0,
                            offset: None,
                        },
                        Keyframe {
                            transform: format!(
                                "translate({:.1}px, {:.1}px) scale(1) rotate(360deg)",
                                x - 50.0,
                                y - 50.0
                            ),
                            opacity: 1.0,
                            offset: Some(0.7),
                        },
                        Keyframe {
                            transform: format!(
                                "translate({:.1}px, {:.1}px) scale(0) rotate(720deg)",
                                x - 50.0,
                                y + 200.0 - 50.0
                            ),
                            opacity: 0.0,
                            offset: None,
                        },
                    ],
                }
            })
            .collect()
    }

    /// Uniform delay in `[0, max_ms)`, 0 when `max_ms` is 0.
    pub fn jitter_ms(&mut self, max_ms: u64) -> u64 {
        if max_ms == 0 {
            return 0;
        }
        self.rng.gen_range(0..max_ms)
    }
}
