//! Simulated early-access sign-up.
//!
//! Nothing is sent anywhere. A plausible address puts the form into a busy
//! state for a fixed delay, after which it resets and the page celebrates.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SignupError;
use crate::events::Event;
use crate::timers::{TimerHandle, TimerQueue};

pub const SUCCESS_MESSAGE: &str = "Welcome to HealthTwin! Check your email for early access. 🎉";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// Coarse syntactic check: something@something.something, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Trim and check a raw form value.
///
/// # Errors
///
/// [`SignupError::EmptyEmail`] for blank input, [`SignupError::InvalidEmail`]
/// when the address is not plausible.
pub fn validate_email(raw: &str) -> Result<String, SignupError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(SignupError::EmptyEmail);
    }
    if !is_valid_email(email) {
        return Err(SignupError::InvalidEmail);
    }
    Ok(email.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupOptions {
    pub submit_delay_ms: u64,
    pub idle_label: String,
    pub busy_label: String,
}

impl Default for SignupOptions {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2_000,
            idle_label: "Get Early Access".into(),
            busy_label: "Joining...".into(),
        }
    }
}

/// What the form currently looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupView {
    pub input: String,
    pub button_label: String,
    pub button_disabled: bool,
}

#[derive(Debug, Clone)]
struct Pending {
    email: String,
    handle: TimerHandle,
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    options: SignupOptions,
    input: String,
    pending: Option<Pending>,
    timers: TimerQueue<()>,
}

impl SignupForm {
    pub fn new(options: SignupOptions) -> Self {
        Self {
            options,
            input: String::new(),
            pending: None,
            timers: TimerQueue::new(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn view(&self) -> SignupView {
        let busy = self.is_submitting();
        SignupView {
            input: self.input.clone(),
            button_label: if busy {
                self.options.busy_label.clone()
            } else {
                self.options.idle_label.clone()
            },
            button_disabled: busy,
        }
    }

    /// Submit `raw` as typed into the email field.
    ///
    /// Returns `Ok(None)` if a submission is already in flight, since the
    /// button is disabled then.
    ///
    /// # Errors
    ///
    /// Returns the validation failure. The typed input is kept; nothing else
    /// changes.
    pub fn submit(&mut self, raw: &str, now_ms: u64) -> Result<Option<Event>, SignupError> {
        if self.is_submitting() {
            tracing::debug!("sign-up already in flight, ignoring submit");
            return Ok(None);
        }
        self.input = raw.to_string();
        let email = validate_email(raw).inspect_err(|e| {
            tracing::warn!(reason = %e, "sign-up rejected");
        })?;

        let handle = self.timers.schedule(now_ms, self.options.submit_delay_ms, ());
        let completes_at_ms = now_ms.saturating_add(self.options.submit_delay_ms);
        self.pending = Some(Pending {
            email: email.clone(),
            handle,
        });
        Ok(Some(Event::SignupStarted {
            email,
            completes_at_ms,
            at_ms: now_ms,
        }))
    }

    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(fired) = self.timers.pop_due(now_ms) {
            if self.pending.as_ref().map(|p| p.handle) != Some(fired.handle) {
                continue;
            }
            let Some(pending) = self.pending.take() else {
                continue;
            };
            self.input.clear();
            tracing::info!(email = %pending.email, "sign-up completed");
            events.push(Event::SignupCompleted {
                email: pending.email,
                at_ms: fired.deadline_ms,
            });
        }
        events
    }
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new(SignupOptions::default())
    }
}
