//! View-side effects of the step cycler.
//!
//! The cycler never touches a rendering surface directly. It drives a
//! [`ViewSink`], which in a browser would toggle `.active` on the demo
//! panels and swap the avatar's mood class. [`PanelRegistry`] is the
//! in-memory sink used by the page runtime and the CLI.

use serde::{Deserialize, Serialize};

use super::steps::{DemoFlow, Mood};

/// A clicked selector presses in to this scale, then springs back.
pub const SELECTOR_PRESS_SCALE: f64 = 0.98;
pub const SELECTOR_PRESS_MS: u64 = 150;
/// A clicked step's panel fades in this long after the click.
pub const PANEL_SWAP_DELAY_MS: u64 = 100;

/// Capability the cycler needs from the view layer.
pub trait ViewSink {
    /// Mark panel `index` active and every other panel inactive.
    fn activate(&mut self, index: usize);

    /// Point the shared mood indicator at `mood`.
    fn set_mood(&mut self, mood: Mood);
}

impl<S: ViewSink + ?Sized> ViewSink for &mut S {
    fn activate(&mut self, index: usize) {
        (**self).activate(index);
    }

    fn set_mood(&mut self, mood: Mood) {
        (**self).set_mood(mood);
    }
}

impl<S: ViewSink + ?Sized> ViewSink for Box<S> {
    fn activate(&mut self, index: usize) {
        (**self).activate(index);
    }

    fn set_mood(&mut self, mood: Mood) {
        (**self).set_mood(mood);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub label: String,
    pub active: bool,
    /// How many times this panel has been activated.
    pub activations: u32,
}

/// Index-to-panel mapping plus the avatar mood indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
    mood: Mood,
}

impl PanelRegistry {
    pub fn new(flow: &DemoFlow) -> Self {
        let panels = flow
            .steps()
            .iter()
            .map(|step| Panel {
                label: step.label.clone(),
                active: false,
                activations: 0,
            })
            .collect();
        Self {
            panels,
            mood: Mood::default(),
        }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn active_index(&self) -> Option<usize> {
        self.panels.iter().position(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.panels.iter().filter(|p| p.active).count()
    }

    pub fn total_activations(&self) -> u32 {
        self.panels.iter().map(|p| p.activations).sum()
    }
}

impl ViewSink for PanelRegistry {
    fn activate(&mut self, index: usize) {
        for panel in &mut self.panels {
            panel.active = false;
        }
        match self.panels.get_mut(index) {
            Some(panel) => {
                panel.active = true;
                panel.activations += 1;
                tracing::debug!(index, label = %panel.label, "panel activated");
            }
            None => tracing::warn!(index, "no panel registered for index"),
        }
    }

    fn set_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }
}
