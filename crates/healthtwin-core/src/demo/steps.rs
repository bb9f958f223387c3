use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Avatar mood shown next to the demo. Cosmetic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Tired,
    Stressed,
    #[default]
    Energized,
    LeveledUp,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Tired, Mood::Stressed, Mood::Energized, Mood::LeveledUp];

    /// Mood for a zero-based step index. Anything past the fifth step is
    /// `Energized`.
    pub fn for_step(index: usize) -> Self {
        match index {
            0 => Mood::Tired,
            1 => Mood::Stressed,
            2 => Mood::Tired,
            3 => Mood::Energized,
            4 => Mood::LeveledUp,
            _ => Mood::Energized,
        }
    }

    /// CSS class applied to the avatar element.
    pub fn css_class(self) -> &'static str {
        match self {
            Mood::Tired => "tired",
            Mood::Stressed => "stressed",
            Mood::Energized => "energized",
            Mood::LeveledUp => "leveled-up",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_class())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoStep {
    pub index: usize,
    pub label: String,
    pub mood: Mood,
}

/// The fixed set of demo steps. Built once; never grows or shrinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoFlow {
    steps: Vec<DemoStep>,
}

impl DemoFlow {
    /// Build a flow with one step per selector label.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyCollection`] if `labels` is empty.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<DemoStep> = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| DemoStep {
                index,
                label: label.into(),
                mood: Mood::for_step(index),
            })
            .collect();
        if steps.is_empty() {
            return Err(ValidationError::EmptyCollection("demo steps".into()));
        }
        Ok(Self { steps })
    }

    pub fn default_labels() -> Vec<String> {
        [
            "Morning Check-In",
            "Stress Spike",
            "Recovery Plan",
            "Energy Restored",
            "Level Up",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a constructed flow; present for clippy's sake.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DemoStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[DemoStep] {
        &self.steps
    }

    /// Index after `index`, wrapping to 0 past the last step.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.steps.len()
    }
}

impl Default for DemoFlow {
    fn default() -> Self {
        let steps = Self::default_labels()
            .into_iter()
            .enumerate()
            .map(|(index, label)| DemoStep {
                index,
                label,
                mood: Mood::for_step(index),
            })
            .collect();
        Self { steps }
    }
}
