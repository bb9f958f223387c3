//! Stateless or short-lived view helpers around the demo cycler.

pub mod avatar;
pub mod notify;
pub mod particles;
pub mod reveal;
pub mod scroll;
pub mod signup;
pub mod slider;
pub mod styles;

pub use notify::{BannerView, Notification, NotificationCenter, NotificationKind, NotificationTiming};
pub use particles::{ConfettiParticle, HeroParticle, ParticleGenerator};
pub use signup::{SignupForm, SignupOptions, SignupView};
