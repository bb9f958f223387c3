//! Demo step cycler.
//!
//! Exactly one demo step is active at a time. While auto-advancing, a
//! periodic tick moves to the next step (wrapping at the end). A manual
//! selection jumps straight to the chosen step, stops the ticking and arms a
//! single resume timer; when that timer fires, ticking restarts from
//! whatever step is active then.
//!
//! ## State Transitions
//!
//! ```text
//! Step(k) --tick--------> Step((k+1) mod N)        (auto-advancing only)
//! Step(k) --select(j)---> Step(j), paused, resume armed for now + P
//! paused  --resume------> auto-advancing, next tick at resume + T
//! ```
//!
//! Like the rest of the core, the cycler has no thread of its own. The
//! caller moves time forward with [`StepCycler::advance_to`].

use serde::{Deserialize, Serialize};

use super::sink::ViewSink;
use super::steps::{DemoFlow, Mood};
use crate::error::ValidationError;
use crate::events::Event;
use crate::timers::{Fired, TimerHandle, TimerQueue};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 6_000;
pub const DEFAULT_RESUME_PAUSE_MS: u64 = 10_000;

/// Timer actions owned by the cycler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclerTimer {
    Tick,
    Resume,
}

/// Why a step became active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationCause {
    Start,
    Tick,
    Selection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclerTiming {
    /// Interval between automatic advances.
    pub tick_interval_ms: u64,
    /// Quiet period after a manual selection before ticking resumes.
    pub resume_pause_ms: u64,
}

impl CyclerTiming {
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroInterval`] if either interval is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tick_interval_ms == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "tick_interval_ms".into(),
            });
        }
        if self.resume_pause_ms == 0 {
            return Err(ValidationError::ZeroInterval {
                field: "resume_pause_ms".into(),
            });
        }
        Ok(())
    }
}

impl Default for CyclerTiming {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            resume_pause_ms: DEFAULT_RESUME_PAUSE_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepCycler<S> {
    flow: DemoFlow,
    timing: CyclerTiming,
    sink: S,
    current: usize,
    auto_advancing: bool,
    started: bool,
    now_ms: u64,
    timers: TimerQueue<CyclerTimer>,
    tick_timer: Option<TimerHandle>,
    resume_timer: Option<TimerHandle>,
}

impl<S: ViewSink> StepCycler<S> {
    /// Create a cycler at `Step(0)` with auto-advance on. Nothing is shown
    /// and no timer runs until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is empty or either interval is zero.
    pub fn new(flow: DemoFlow, timing: CyclerTiming, sink: S) -> Result<Self, ValidationError> {
        if flow.is_empty() {
            return Err(ValidationError::EmptyCollection("demo steps".into()));
        }
        timing.validate()?;
        Ok(Self {
            flow,
            timing,
            sink,
            current: 0,
            auto_advancing: true,
            started: false,
            now_ms: 0,
            timers: TimerQueue::new(),
            tick_timer: None,
            resume_timer: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn current_mood(&self) -> Mood {
        Mood::for_step(self.current)
    }

    pub fn step_count(&self) -> usize {
        self.flow.len()
    }

    pub fn flow(&self) -> &DemoFlow {
        &self.flow
    }

    pub fn timing(&self) -> CyclerTiming {
        self.timing
    }

    pub fn is_auto_advancing(&self) -> bool {
        self.auto_advancing
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// When the next automatic advance is due, if ticking.
    pub fn next_tick_at(&self) -> Option<u64> {
        self.tick_timer.and_then(|h| self.timers.deadline_of(h))
    }

    /// When auto-advance resumes, if paused by a selection.
    pub fn resume_at(&self) -> Option<u64> {
        self.resume_timer.and_then(|h| self.timers.deadline_of(h))
    }

    /// Number of timers currently armed. Never more than one.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Show the initial step and start ticking.
    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.started {
            return None;
        }
        self.observe(now_ms);
        self.started = true;
        self.auto_advancing = true;
        self.activate(self.current);
        self.arm_tick(self.now_ms);
        tracing::debug!(step = self.current, "demo flow started");
        Some(self.activated(ActivationCause::Start, None))
    }

    /// Jump to step `index`, pausing auto-advance for the resume period.
    ///
    /// Re-selecting the active step still runs the activation side effect
    /// and restarts the pause. Out-of-range indices are ignored.
    pub fn select_step(&mut self, index: usize, now_ms: u64) -> Option<Event> {
        if index >= self.flow.len() {
            tracing::warn!(
                index,
                step_count = self.flow.len(),
                "ignoring selection of unknown demo step"
            );
            return None;
        }
        self.observe(now_ms);
        self.started = true;

        self.current = index;
        self.activate(index);

        if self.auto_advancing {
            tracing::info!(step = index, "auto-advance paused by selection");
        }
        self.auto_advancing = false;
        if let Some(tick) = self.tick_timer.take() {
            self.timers.cancel(tick);
        }
        let resume_at = self.schedule_resume();

        Some(self.activated(ActivationCause::Selection, resume_at))
    }

    /// Advance to the next step. Does nothing while paused.
    ///
    /// This is what the periodic timer runs; it does not re-arm the timer.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.started || !self.auto_advancing {
            return None;
        }
        self.current = self.flow.next_index(self.current);
        self.activate(self.current);
        Some(self.activated(ActivationCause::Tick, None))
    }

    /// Move the clock to `now_ms`, firing every timer that falls due on the
    /// way in deadline order.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(now_ms) {
            self.observe(fired.deadline_ms);
            events.extend(self.fire(fired));
        }
        self.observe(now_ms);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn fire(&mut self, fired: Fired<CyclerTimer>) -> Option<Event> {
        match fired.action {
            CyclerTimer::Tick => {
                if self.tick_timer != Some(fired.handle) {
                    return None;
                }
                self.tick_timer = None;
                let event = self.tick();
                if self.auto_advancing {
                    self.arm_tick(fired.deadline_ms);
                }
                event
            }
            CyclerTimer::Resume => {
                if self.resume_timer != Some(fired.handle) {
                    return None;
                }
                self.resume_timer = None;
                self.auto_advancing = true;
                let next_tick_at_ms = self.arm_tick(fired.deadline_ms);
                tracing::info!(step = self.current, ?next_tick_at_ms, "auto-advance resumed");
                Some(Event::AutoAdvanceResumed {
                    step_index: self.current,
                    next_tick_at_ms,
                    at_ms: self.now_ms,
                })
            }
        }
    }

    /// Replace any pending resume with a fresh one. Returns its deadline,
    /// or `None` when the pause would run past the end of the clock.
    fn schedule_resume(&mut self) -> Option<u64> {
        if let Some(previous) = self.resume_timer.take() {
            self.timers.cancel(previous);
        }
        self.resume_timer =
            self.timers
                .try_schedule(self.now_ms, self.timing.resume_pause_ms, CyclerTimer::Resume);
        if self.resume_timer.is_none() {
            tracing::warn!(now_ms = self.now_ms, "clock exhausted, auto-advance stays paused");
        }
        self.resume_timer.and_then(|h| self.timers.deadline_of(h))
    }

    /// Arm the next tick one interval after `from_ms`. Left unarmed when
    /// that would run past the end of the clock.
    fn arm_tick(&mut self, from_ms: u64) -> Option<u64> {
        if let Some(previous) = self.tick_timer.take() {
            self.timers.cancel(previous);
        }
        self.tick_timer =
            self.timers
                .try_schedule(from_ms, self.timing.tick_interval_ms, CyclerTimer::Tick);
        if self.tick_timer.is_none() {
            tracing::warn!(from_ms, "clock exhausted, no further ticks");
        }
        self.tick_timer.and_then(|h| self.timers.deadline_of(h))
    }

    fn activate(&mut self, index: usize) {
        self.sink.activate(index);
        self.sink.set_mood(Mood::for_step(index));
        tracing::debug!(step = index, mood = %Mood::for_step(index), "demo step activated");
    }

    fn activated(&self, cause: ActivationCause, resume_at_ms: Option<u64>) -> Event {
        Event::StepActivated {
            step_index: self.current,
            mood: Mood::for_step(self.current),
            cause,
            resume_at_ms,
            at_ms: self.now_ms,
        }
    }

    fn observe(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::sink::PanelRegistry;
    use proptest::prelude::*;

    const T: u64 = DEFAULT_TICK_INTERVAL_MS;
    const P: u64 = DEFAULT_RESUME_PAUSE_MS;

    /// Records every call so tests can count side effects.
    #[derive(Debug, Default)]
    struct RecordingSink {
        activations: Vec<usize>,
        moods: Vec<Mood>,
    }

    impl ViewSink for RecordingSink {
        fn activate(&mut self, index: usize) {
            self.activations.push(index);
        }

        fn set_mood(&mut self, mood: Mood) {
            self.moods.push(mood);
        }
    }

    fn recording(n: usize) -> StepCycler<RecordingSink> {
        let labels: Vec<String> = (0..n).map(|i| format!("step {i}")).collect();
        let flow = DemoFlow::from_labels(labels).unwrap();
        StepCycler::new(flow, CyclerTiming::default(), RecordingSink::default()).unwrap()
    }

    fn registry() -> StepCycler<PanelRegistry> {
        let flow = DemoFlow::default();
        let sink = PanelRegistry::new(&flow);
        StepCycler::new(flow, CyclerTiming::default(), sink).unwrap()
    }

    #[test]
    fn starts_at_step_zero_auto_advancing() {
        let mut c = registry();
        assert_eq!(c.current_step(), 0);
        assert!(c.is_auto_advancing());
        assert_eq!(c.pending_timers(), 0);

        let event = c.start(0).unwrap();
        assert!(matches!(
            event,
            Event::StepActivated {
                step_index: 0,
                cause: ActivationCause::Start,
                ..
            }
        ));
        assert_eq!(c.sink().active_index(), Some(0));
        assert_eq!(c.sink().mood(), Mood::Tired);
        assert_eq!(c.next_tick_at(), Some(T));
        assert!(c.start(5).is_none());
    }

    #[test]
    fn tick_advances_every_interval() {
        let mut c = registry();
        c.start(0);
        assert!(c.advance_to(T - 1).is_empty());

        let events = c.advance_to(T);
        assert_eq!(events.len(), 1);
        assert_eq!(c.current_step(), 1);

        let events = c.advance_to(3 * T);
        assert_eq!(events.len(), 2);
        assert_eq!(c.current_step(), 3);
        assert_eq!(c.sink().mood(), Mood::Energized);
    }

    #[test]
    fn tick_wraps_from_last_step() {
        let mut c = recording(3);
        c.start(0);
        c.select_step(2, 0);
        c.advance_to(P);
        assert_eq!(c.current_step(), 2);

        c.advance_to(P + T);
        assert_eq!(c.current_step(), 0);
    }

    #[test]
    fn manual_selection_beats_pending_tick() {
        let mut c = registry();
        c.start(0);
        c.advance_to(T - 10);

        c.select_step(3, T - 10);
        let events = c.advance_to(T);
        assert!(events.is_empty());
        assert_eq!(c.current_step(), 3);
        assert_eq!(c.sink().active_index(), Some(3));
    }

    #[test]
    fn resume_after_pause_continues_from_current_step() {
        let mut c = registry();
        c.start(0);
        c.select_step(2, 1_000);
        assert!(!c.is_auto_advancing());
        assert_eq!(c.resume_at(), Some(1_000 + P));

        // Nothing moves during the pause.
        assert!(c.advance_to(1_000 + P - 1).is_empty());
        assert_eq!(c.current_step(), 2);

        let events = c.advance_to(1_000 + P);
        assert!(matches!(
            events.as_slice(),
            [Event::AutoAdvanceResumed { step_index: 2, .. }]
        ));
        assert!(c.is_auto_advancing());

        c.advance_to(1_000 + P + T);
        assert_eq!(c.current_step(), 3);
    }

    #[test]
    fn rapid_selections_keep_a_single_resume() {
        let mut c = recording(5);
        c.start(0);
        c.select_step(1, 100);
        c.select_step(2, 200);
        c.select_step(3, 300);
        assert_eq!(c.pending_timers(), 1);
        assert_eq!(c.resume_at(), Some(300 + P));

        // The first two resumes were cancelled, so nothing fires at their deadlines.
        assert!(c.advance_to(200 + P).is_empty());
        assert!(!c.is_auto_advancing());

        let events = c.advance_to(300 + P);
        assert_eq!(events.len(), 1);
        assert_eq!(c.pending_timers(), 1);

        // One ticking schedule, not three.
        let events = c.advance_to(300 + P + T);
        assert_eq!(events.len(), 1);
        assert_eq!(c.current_step(), 4);
    }

    #[test]
    fn reselecting_active_step_activates_once() {
        let mut c = recording(5);
        c.start(0);
        c.select_step(2, 100);
        let before = c.sink().activations.len();

        let event = c.select_step(2, 200);
        assert!(event.is_some());
        assert_eq!(c.current_step(), 2);
        assert_eq!(c.sink().activations.len(), before + 1);
        assert_eq!(c.sink().moods.len(), before + 1);
        assert_eq!(c.sink().activations.last(), Some(&2));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut c = recording(5);
        c.start(0);
        let tick_at = c.next_tick_at();
        let calls = c.sink().activations.len();

        assert!(c.select_step(5, 100).is_none());
        assert!(c.select_step(usize::MAX, 100).is_none());
        assert_eq!(c.current_step(), 0);
        assert!(c.is_auto_advancing());
        assert_eq!(c.next_tick_at(), tick_at);
        assert_eq!(c.sink().activations.len(), calls);
    }

    #[test]
    fn tick_does_nothing_while_paused() {
        let mut c = recording(5);
        c.start(0);
        c.select_step(1, 0);
        assert!(c.tick().is_none());
        assert_eq!(c.current_step(), 1);
    }

    #[test]
    fn single_step_flow_ticks_in_place() {
        let mut c = recording(1);
        c.start(0);
        c.advance_to(2 * T);
        assert_eq!(c.current_step(), 0);
        assert_eq!(c.sink().activations, vec![0, 0, 0]);
    }

    #[test]
    fn zero_interval_rejected() {
        let flow = DemoFlow::default();
        let timing = CyclerTiming {
            tick_interval_ms: 0,
            resume_pause_ms: P,
        };
        let err = StepCycler::new(flow, timing, RecordingSink::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ZeroInterval {
                field: "tick_interval_ms".into()
            }
        );
    }

    #[test]
    fn selection_before_start_shows_step_and_arms_resume() {
        let mut c = registry();
        c.select_step(4, 0);
        assert!(c.is_started());
        assert_eq!(c.sink().active_index(), Some(4));
        assert_eq!(c.resume_at(), Some(P));
        assert!(c.next_tick_at().is_none());
    }

    #[test]
    fn tick_at_end_of_clock_does_not_rearm() {
        let mut c = registry();
        c.start(u64::MAX - T);
        assert_eq!(c.next_tick_at(), Some(u64::MAX));

        let events = c.advance_to(u64::MAX);
        assert_eq!(events.len(), 1);
        assert_eq!(c.current_step(), 1);
        assert_eq!(c.pending_timers(), 0);
        assert!(c.advance_to(u64::MAX).is_empty());
    }

    #[test]
    fn selection_near_end_of_clock_stays_paused() {
        let mut c = registry();
        c.start(0);
        let event = c.select_step(2, u64::MAX - 1).unwrap();
        assert!(matches!(
            event,
            Event::StepActivated {
                step_index: 2,
                resume_at_ms: None,
                ..
            }
        ));
        assert!(!c.is_auto_advancing());
        assert_eq!(c.pending_timers(), 0);
        assert!(c.advance_to(u64::MAX).is_empty());
    }

    #[test]
    fn resume_at_end_of_clock_reports_no_tick() {
        let mut c = registry();
        c.start(0);
        c.select_step(1, u64::MAX - P);
        let events = c.advance_to(u64::MAX);
        assert!(matches!(
            events.as_slice(),
            [Event::AutoAdvanceResumed {
                step_index: 1,
                next_tick_at_ms: None,
                ..
            }]
        ));
        assert_eq!(c.pending_timers(), 0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(usize),
        Wait(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..7).prop_map(Op::Select),
            (0u64..15_000).prop_map(Op::Wait),
        ]
    }

    proptest! {
        #[test]
        fn exactly_one_panel_active_after_every_transition(ops in prop::collection::vec(op(), 1..60)) {
            let mut c = registry();
            let mut now = 0;
            c.start(now);
            for op in ops {
                match op {
                    Op::Select(j) => { c.select_step(j, now); }
                    Op::Wait(dt) => { now += dt; c.advance_to(now); }
                }
                prop_assert_eq!(c.sink().active_count(), 1);
                prop_assert_eq!(c.sink().active_index(), Some(c.current_step()));
                prop_assert_eq!(c.sink().mood(), Mood::for_step(c.current_step()));
            }
        }

        #[test]
        fn at_most_one_timer_armed(ops in prop::collection::vec(op(), 1..60)) {
            let mut c = registry();
            let mut now = 0;
            c.start(now);
            for op in ops {
                match op {
                    Op::Select(j) => { c.select_step(j, now); }
                    Op::Wait(dt) => { now += dt; c.advance_to(now); }
                }
                prop_assert_eq!(c.pending_timers(), 1);
                prop_assert_eq!(c.is_auto_advancing(), c.next_tick_at().is_some());
                prop_assert_eq!(!c.is_auto_advancing(), c.resume_at().is_some());
            }
        }
    }
}
