//! # HealthTwin Core Library
//!
//! Behaviour behind the HealthTwin landing page, with no browser attached.
//! Everything runs on a caller-supplied millisecond clock: commands take the
//! current time, and `advance_to` fires whatever timers fell due since the
//! last call. The `healthtwin-cli` binary drives the same code from a
//! terminal.
//!
//! ## Architecture
//!
//! - **Demo**: the step cycler that walks through the demo flow every few
//!   seconds and pauses after a manual selection
//! - **View**: notifications, the sign-up form, particle effects and the
//!   smaller presentational helpers
//! - **Page**: [`LandingPage`], which owns all of the above and interleaves
//!   their timers
//! - **Config**: TOML settings for intervals, labels and effects
//!
//! ## Key Components
//!
//! - [`StepCycler`]: auto-advance / manual-selection state machine
//! - [`ViewSink`]: where step activations and mood changes are rendered
//! - [`LandingPage`]: the whole page runtime
//! - [`Config`]: application configuration

pub mod config;
pub mod demo;
pub mod error;
pub mod events;
pub mod page;
pub mod timers;
pub mod view;

pub use config::Config;
pub use demo::{
    ActivationCause, CyclerTiming, DemoFlow, DemoStep, Mood, Panel, PanelRegistry, StepCycler,
    ViewSink,
};
pub use error::{ConfigError, CoreError, SignupError, ValidationError};
pub use events::Event;
pub use page::{LandingPage, PageSnapshot};
pub use timers::{TimerHandle, TimerQueue};
