mod cycler;
mod sink;
mod steps;

pub use cycler::{
    ActivationCause, CyclerTimer, CyclerTiming, StepCycler, DEFAULT_RESUME_PAUSE_MS,
    DEFAULT_TICK_INTERVAL_MS,
};
pub use sink::{
    Panel, PanelRegistry, ViewSink, PANEL_SWAP_DELAY_MS, SELECTOR_PRESS_MS, SELECTOR_PRESS_SCALE,
};
pub use steps::{DemoFlow, DemoStep, Mood};
