//! Landing page runtime.
//!
//! Owns every stateful piece of the page and interleaves their timers on a
//! single clock. Each interaction first brings the clock up to the
//! interaction's time, so a timer due at or before a click fires before the
//! click is handled.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::demo::{
    ActivationCause, DemoFlow, Mood, Panel, PanelRegistry, StepCycler, PANEL_SWAP_DELAY_MS,
    SELECTOR_PRESS_MS, SELECTOR_PRESS_SCALE,
};
use crate::error::Result;
use crate::events::Event;
use crate::view::avatar::{AvatarClickCounter, EASTER_EGG_MESSAGE, MOOD_PULSE_MS, MOOD_PULSE_SCALE};
use crate::view::notify::{BannerView, Notification, NotificationCenter, NotificationKind};
use crate::view::particles::{HeroParticle, ParticleGenerator};
use crate::view::signup::{SignupForm, SignupView, SUCCESS_MESSAGE};

/// Full state snapshot for rendering or inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub now_ms: u64,
    pub step_index: usize,
    pub mood: Mood,
    pub auto_advancing: bool,
    pub next_tick_at_ms: Option<u64>,
    pub resume_at_ms: Option<u64>,
    pub panels: Vec<Panel>,
    pub notification: Option<Notification>,
    /// Paintable form of `notification`.
    pub banner: Option<BannerView>,
    pub signup: SignupView,
    pub hero_particles: Vec<HeroParticle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Cycler,
    Notifications,
    Signup,
}

pub struct LandingPage {
    cycler: StepCycler<PanelRegistry>,
    notifications: NotificationCenter,
    signup: SignupForm,
    avatar_clicks: AvatarClickCounter,
    particles: ParticleGenerator,
    hero: Vec<HeroParticle>,
    celebration_particles: usize,
    celebration_duration_ms: u64,
    now_ms: u64,
}

impl LandingPage {
    /// Build the page from configuration. Nothing runs until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has no steps or zero intervals.
    pub fn new(config: &Config) -> Result<Self> {
        let flow: DemoFlow = config.flow()?;
        let panels = PanelRegistry::new(&flow);
        let cycler = StepCycler::new(flow, config.cycler_timing(), panels)?;
        let mut particles = ParticleGenerator::new(config.effects.seed);
        let hero = particles.hero(config.effects.hero_particles);

        Ok(Self {
            cycler,
            notifications: NotificationCenter::new(config.notification_timing()),
            signup: SignupForm::new(config.signup_options()),
            avatar_clicks: AvatarClickCounter::new(config.effects.easter_egg_clicks),
            particles,
            hero,
            celebration_particles: config.effects.celebration_particles,
            celebration_duration_ms: config.effects.celebration_duration_ms,
            now_ms: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn cycler(&self) -> &StepCycler<PanelRegistry> {
        &self.cycler
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn signup_view(&self) -> SignupView {
        self.signup.view()
    }

    pub fn hero_particles(&self) -> &[HeroParticle] {
        &self.hero
    }

    /// Earliest pending timer across the page.
    pub fn next_deadline(&self) -> Option<u64> {
        self.next_due().map(|(deadline, _)| deadline)
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            now_ms: self.now_ms,
            step_index: self.cycler.current_step(),
            mood: self.cycler.sink().mood(),
            auto_advancing: self.cycler.is_auto_advancing(),
            next_tick_at_ms: self.cycler.next_tick_at(),
            resume_at_ms: self.cycler.resume_at(),
            panels: self.cycler.sink().panels().to_vec(),
            notification: self.notifications.current().cloned(),
            banner: self.notifications.current().map(Notification::view),
            signup: self.signup.view(),
            hero_particles: self.hero.clone(),
        }
    }

    // ── Interactions ─────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        if let Some(event) = self.cycler.start(self.now_ms) {
            with_feedback(&mut events, event);
        }
        events
    }

    /// A step selector was clicked.
    pub fn select_step(&mut self, index: usize, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        if let Some(event) = self.cycler.select_step(index, self.now_ms) {
            with_feedback(&mut events, event);
        }
        events
    }

    /// The sign-up form was submitted with `raw` in the email field.
    pub fn submit_signup(&mut self, raw: &str, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        let now = self.now_ms;
        match self.signup.submit(raw, now) {
            Ok(started) => events.extend(started),
            Err(e) => {
                let reason = e.to_string();
                events.push(Event::SignupRejected {
                    reason: reason.clone(),
                    at_ms: now,
                });
                events.extend(self.notifications.show(NotificationKind::Error, reason, now));
            }
        }
        events
    }

    /// Any avatar was clicked.
    pub fn click_avatar(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        let now = self.now_ms;
        if let Some(clicks) = self.avatar_clicks.click() {
            tracing::info!(clicks, "avatar easter egg found");
            events.push(Event::EasterEggFound { clicks, at_ms: now });
            events.extend(
                self.notifications
                    .show(NotificationKind::Success, EASTER_EGG_MESSAGE, now),
            );
            events.push(self.celebrate(now));
        }
        events
    }

    /// The close button on the banner with `id` was clicked.
    pub fn dismiss_notification(&mut self, id: u64, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        events.extend(self.notifications.dismiss(id, self.now_ms));
        events
    }

    /// Move the clock to `now_ms`, firing all due timers in deadline order.
    /// Time never moves backwards.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some((deadline, component)) = self.next_due().filter(|(d, _)| *d <= now_ms) {
            self.now_ms = self.now_ms.max(deadline);
            match component {
                Component::Cycler => {
                    for event in self.cycler.advance_to(deadline) {
                        with_feedback(&mut events, event);
                    }
                }
                Component::Notifications => events.extend(self.notifications.advance_to(deadline)),
                Component::Signup => {
                    for event in self.signup.advance_to(deadline) {
                        let completed = matches!(event, Event::SignupCompleted { .. });
                        events.push(event);
                        if completed {
                            events.extend(self.notifications.show(
                                NotificationKind::Success,
                                SUCCESS_MESSAGE,
                                deadline,
                            ));
                            events.push(self.celebrate(deadline));
                        }
                    }
                }
            }
        }
        self.now_ms = self.now_ms.max(now_ms);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn next_due(&self) -> Option<(u64, Component)> {
        [
            (self.cycler.next_deadline(), Component::Cycler),
            (self.notifications.next_deadline(), Component::Notifications),
            (self.signup.next_deadline(), Component::Signup),
        ]
        .into_iter()
        .filter_map(|(deadline, component)| deadline.map(|d| (d, component)))
        .min_by_key(|(deadline, _)| *deadline)
    }

    fn celebrate(&mut self, at_ms: u64) -> Event {
        Event::CelebrationBurst {
            duration_ms: self.celebration_duration_ms,
            particles: self.particles.celebration(self.celebration_particles),
            at_ms,
        }
    }
}

/// Push a cycler event followed by its cosmetic follow-ups. Every
/// activation pulses the avatar; a clicked selector also presses in and its
/// panel fades in after a short delay.
fn with_feedback(events: &mut Vec<Event>, event: Event) {
    let mut extra = Vec::new();
    if let Event::StepActivated {
        step_index,
        mood,
        cause,
        at_ms,
        ..
    } = &event
    {
        extra.push(Event::AvatarPulsed {
            mood: *mood,
            scale: MOOD_PULSE_SCALE,
            settled_at_ms: at_ms.saturating_add(MOOD_PULSE_MS),
            at_ms: *at_ms,
        });
        if *cause == ActivationCause::Selection {
            extra.push(Event::SelectorPressed {
                step_index: *step_index,
                scale: SELECTOR_PRESS_SCALE,
                released_at_ms: at_ms.saturating_add(SELECTOR_PRESS_MS),
                panel_visible_at_ms: at_ms.saturating_add(PANEL_SWAP_DELAY_MS),
                at_ms: *at_ms,
            });
        }
    }
    events.push(event);
    events.extend(extra);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> LandingPage {
        let mut config = Config::default();
        config.effects.seed = Some(1);
        LandingPage::new(&config).unwrap()
    }

    #[test]
    fn start_shows_first_step() {
        let mut page = page();
        let events = page.start(0);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[1],
            Event::AvatarPulsed {
                mood: Mood::Tired,
                settled_at_ms: 300,
                ..
            }
        ));
        let snap = page.snapshot();
        assert_eq!(snap.step_index, 0);
        assert_eq!(snap.mood, Mood::Tired);
        assert!(snap.panels[0].active);
        assert_eq!(snap.next_tick_at_ms, Some(6_000));
        assert_eq!(snap.hero_particles.len(), 8);
    }

    #[test]
    fn click_after_due_tick_sees_tick_first() {
        let mut page = page();
        page.start(0);
        let events = page.select_step(4, 6_000);
        let causes: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::StepActivated { step_index, cause, .. } => Some((*step_index, *cause)),
                _ => None,
            })
            .collect();
        assert_eq!(
            causes,
            vec![(1, ActivationCause::Tick), (4, ActivationCause::Selection)]
        );
    }

    #[test]
    fn invalid_signup_shows_error_banner() {
        let mut page = page();
        let events = page.submit_signup("   ", 100);
        assert!(matches!(&events[0], Event::SignupRejected { reason, .. } if reason == "Please enter your email address"));
        let banner = page.notification().unwrap();
        assert_eq!(banner.kind, NotificationKind::Error);
        assert!(!page.signup_view().button_disabled);
    }

    #[test]
    fn signup_completion_celebrates() {
        let mut page = page();
        page.start(0);
        page.submit_signup("ada@example.com", 1_000);
        assert!(page.signup_view().button_disabled);

        let events = page.advance_to(3_000);
        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                Event::SignupCompleted { .. } => "completed",
                Event::NotificationShown { .. } => "shown",
                Event::CelebrationBurst { .. } => "burst",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["completed", "shown", "burst"]);
        assert_eq!(page.notification().unwrap().message, SUCCESS_MESSAGE);
        assert!(page.signup_view().input.is_empty());
        match events.last() {
            Some(Event::CelebrationBurst { particles, duration_ms, .. }) => {
                assert_eq!(particles.len(), 25);
                assert_eq!(*duration_ms, 3_000);
            }
            other => panic!("expected burst, got {other:?}"),
        }
    }

    #[test]
    fn seventh_avatar_click_finds_easter_egg() {
        let mut page = page();
        for t in 0..6 {
            assert!(page.click_avatar(t).is_empty());
        }
        let events = page.click_avatar(6);
        assert!(matches!(events[0], Event::EasterEggFound { clicks: 7, .. }));
        assert_eq!(page.notification().unwrap().message, EASTER_EGG_MESSAGE);
    }

    #[test]
    fn timers_interleave_in_deadline_order() {
        let mut page = page();
        page.start(0);
        page.submit_signup("nope", 5_000);
        // Banner visible at 5100, tick (and pulse) at 6000, banner leaving at
        // 10000, removed at 10400, tick (and pulse) at 12000.
        let events = page.advance_to(12_000);
        let stamps: Vec<u64> = events.iter().map(Event::at_ms).collect();
        assert_eq!(stamps, vec![5_100, 6_000, 6_000, 10_000, 10_400, 12_000, 12_000]);
        assert!(page.notification().is_none());
    }

    #[test]
    fn dismiss_closes_banner() {
        let mut page = page();
        page.submit_signup("", 0);
        let id = page.notification().unwrap().id;
        let events = page.dismiss_notification(id, 50);
        assert_eq!(events.len(), 1);
        assert!(page.notification().is_none());
        assert!(page.next_deadline().is_none());
    }

    #[test]
    fn selection_presses_selector_and_pulses_avatar() {
        let mut page = page();
        page.start(0);
        let events = page.select_step(3, 1_000);
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[1],
            Event::AvatarPulsed {
                mood: Mood::Energized,
                settled_at_ms: 1_300,
                ..
            }
        ));
        match &events[2] {
            Event::SelectorPressed {
                step_index,
                scale,
                released_at_ms,
                panel_visible_at_ms,
                at_ms,
            } => {
                assert_eq!(*step_index, 3);
                assert_eq!(*scale, 0.98);
                assert_eq!(*released_at_ms, 1_150);
                assert_eq!(*panel_visible_at_ms, 1_100);
                assert_eq!(*at_ms, 1_000);
            }
            other => panic!("expected selector press, got {other:?}"),
        }

        // Ticks pulse the avatar but press nothing.
        let events = page.advance_to(17_000);
        assert!(events.iter().any(|e| matches!(e, Event::AvatarPulsed { .. })));
        assert!(!events.iter().any(|e| matches!(e, Event::SelectorPressed { .. })));
    }

    #[test]
    fn snapshot_carries_paintable_banner() {
        let mut page = page();
        assert!(page.snapshot().banner.is_none());
        page.submit_signup("nope", 0);
        page.advance_to(100);
        let banner = page.snapshot().banner.unwrap();
        assert_eq!(banner.transform, "translateX(0)");
        assert!(banner.html.contains("Please enter a valid email address"));
    }

    #[test]
    fn run_to_end_of_clock_terminates() {
        let mut page = page();
        page.start(u64::MAX - 6_000);
        page.submit_signup("ada@example.com", u64::MAX - 10);
        let events = page.advance_to(u64::MAX);
        assert!(events.len() < 20);
        assert_eq!(page.now_ms(), u64::MAX);
        assert!(page.advance_to(u64::MAX).is_empty());
        assert_eq!(page.snapshot().next_tick_at_ms, None);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut page = page();
        page.advance_to(5_000);
        page.advance_to(1_000);
        assert_eq!(page.now_ms(), 5_000);
        let events = page.start(2_000);
        assert_eq!(events[0].at_ms(), 5_000);
    }
}
