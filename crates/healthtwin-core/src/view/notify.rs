//! Transient notification banners.
//!
//! At most one banner is on screen. Showing a new one removes the old one
//! on the spot. A banner slides in shortly after it is created, stays for the
//! display period, slides out, and is removed once the exit transition ends.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::timers::TimerQueue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            NotificationKind::Success => "notification--success",
            NotificationKind::Error => "notification--error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    /// Created off-screen, about to slide in.
    Entering,
    Visible,
    /// Sliding out; removed when the exit transition ends.
    Leaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    Expired,
    Replaced,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: NotificationPhase,
    pub shown_at_ms: u64,
}

/// Everything a host needs to paint the banner as it is right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerView {
    pub id: u64,
    pub class: String,
    pub html: String,
    pub transform: String,
}

impl Notification {
    pub fn view(&self) -> BannerView {
        BannerView {
            id: self.id,
            class: format!("notification {}", self.kind.css_class()),
            html: self.render_html(),
            transform: self.transform().to_string(),
        }
    }

    /// Inner markup of the banner. The message is escaped.
    pub fn render_html(&self) -> String {
        format!(
            concat!(
                "<div class=\"notification-content\">",
                "<span class=\"notification-icon\">{icon}</span>",
                "<span class=\"notification-message\">{message}</span>",
                "<button class=\"notification-close\" data-notification-id=\"{id}\">×</button>",
                "</div>"
            ),
            icon = self.kind.icon(),
            message = escape_html(&self.message),
            id = self.id,
        )
    }

    /// Horizontal offset for the current phase: off-screen unless visible.
    pub fn transform(&self) -> &'static str {
        match self.phase {
            NotificationPhase::Visible => "translateX(0)",
            NotificationPhase::Entering | NotificationPhase::Leaving => "translateX(100%)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTiming {
    pub enter_delay_ms: u64,
    pub display_ms: u64,
    pub exit_ms: u64,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            enter_delay_ms: 100,
            display_ms: 5_000,
            exit_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BannerTimer {
    SlideIn(u64),
    SlideOut(u64),
    Remove(u64),
}

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    timing: NotificationTiming,
    current: Option<Notification>,
    timers: TimerQueue<BannerTimer>,
    next_id: u64,
}

impl NotificationCenter {
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            timing,
            current: None,
            timers: TimerQueue::new(),
            next_id: 1,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Put up a banner, replacing whatever is showing.
    pub fn show(&mut self, kind: NotificationKind, message: impl Into<String>, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(old) = self.current.take() {
            events.push(Event::NotificationRemoved {
                id: old.id,
                reason: RemovalReason::Replaced,
                at_ms: now_ms,
            });
        }
        self.timers.clear();

        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(id, ?kind, %message, "notification shown");

        self.timers
            .schedule(now_ms, self.timing.enter_delay_ms, BannerTimer::SlideIn(id));
        self.timers
            .schedule(now_ms, self.timing.display_ms, BannerTimer::SlideOut(id));
        self.current = Some(Notification {
            id,
            kind,
            message: message.clone(),
            phase: NotificationPhase::Entering,
            shown_at_ms: now_ms,
        });
        events.push(Event::NotificationShown {
            id,
            kind,
            message,
            at_ms: now_ms,
        });
        events
    }

    /// Close button. Ignores ids that are no longer on screen.
    pub fn dismiss(&mut self, id: u64, now_ms: u64) -> Option<Event> {
        if self.current.as_ref()?.id != id {
            return None;
        }
        self.current = None;
        self.timers.clear();
        Some(Event::NotificationRemoved {
            id,
            reason: RemovalReason::Dismissed,
            at_ms: now_ms,
        })
    }

    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(now_ms) {
            let at_ms = fired.deadline_ms;
            match fired.action {
                BannerTimer::SlideIn(id) => {
                    if let Some(n) = self.current.as_mut().filter(|n| n.id == id) {
                        if n.phase == NotificationPhase::Entering {
                            n.phase = NotificationPhase::Visible;
                            events.push(Event::NotificationVisible { id, at_ms });
                        }
                    }
                }
                BannerTimer::SlideOut(id) => {
                    if let Some(n) = self.current.as_mut().filter(|n| n.id == id) {
                        n.phase = NotificationPhase::Leaving;
                        self.timers
                            .schedule(at_ms, self.timing.exit_ms, BannerTimer::Remove(id));
                        events.push(Event::NotificationLeaving { id, at_ms });
                    }
                }
                BannerTimer::Remove(id) => {
                    if self.current.as_ref().is_some_and(|n| n.id == id) {
                        self.current = None;
                        events.push(Event::NotificationRemoved {
                            id,
                            reason: RemovalReason::Expired,
                            at_ms,
                        });
                    }
                }
            }
        }
        events
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotificationTiming::default())
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
