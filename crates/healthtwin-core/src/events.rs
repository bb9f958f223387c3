use serde::{Deserialize, Serialize};

use crate::demo::{ActivationCause, Mood};
use crate::view::notify::{NotificationKind, RemovalReason};
use crate::view::particles::ConfettiParticle;

/// Every state change on the page produces an Event.
/// Hosts render from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StepActivated {
        step_index: usize,
        mood: Mood,
        cause: ActivationCause,
        /// Set when a manual selection paused auto-advance.
        resume_at_ms: Option<u64>,
        at_ms: u64,
    },
    AutoAdvanceResumed {
        step_index: usize,
        /// `None` once the clock has no room for another interval.
        next_tick_at_ms: Option<u64>,
        at_ms: u64,
    },
    /// A step selector was clicked. Purely cosmetic.
    SelectorPressed {
        step_index: usize,
        scale: f64,
        released_at_ms: u64,
        panel_visible_at_ms: u64,
        at_ms: u64,
    },
    /// The demo avatar pops briefly as its mood is set. Purely cosmetic.
    AvatarPulsed {
        mood: Mood,
        scale: f64,
        settled_at_ms: u64,
        at_ms: u64,
    },
    NotificationShown {
        id: u64,
        kind: NotificationKind,
        message: String,
        at_ms: u64,
    },
    /// Banner finished sliding in.
    NotificationVisible {
        id: u64,
        at_ms: u64,
    },
    /// Banner started sliding out.
    NotificationLeaving {
        id: u64,
        at_ms: u64,
    },
    NotificationRemoved {
        id: u64,
        reason: RemovalReason,
        at_ms: u64,
    },
    SignupStarted {
        email: String,
        completes_at_ms: u64,
        at_ms: u64,
    },
    SignupRejected {
        reason: String,
        at_ms: u64,
    },
    SignupCompleted {
        email: String,
        at_ms: u64,
    },
    CelebrationBurst {
        duration_ms: u64,
        particles: Vec<ConfettiParticle>,
        at_ms: u64,
    },
    EasterEggFound {
        clicks: u32,
        at_ms: u64,
    },
}

impl Event {
    /// Clock time the event happened at.
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::StepActivated { at_ms, .. }
            | Event::AutoAdvanceResumed { at_ms, .. }
            | Event::SelectorPressed { at_ms, .. }
            | Event::AvatarPulsed { at_ms, .. }
            | Event::NotificationShown { at_ms, .. }
            | Event::NotificationVisible { at_ms, .. }
            | Event::NotificationLeaving { at_ms, .. }
            | Event::NotificationRemoved { at_ms, .. }
            | Event::SignupStarted { at_ms, .. }
            | Event::SignupRejected { at_ms, .. }
            | Event::SignupCompleted { at_ms, .. }
            | Event::CelebrationBurst { at_ms, .. }
            | Event::EasterEggFound { at_ms, .. } => *at_ms,
        }
    }
}
