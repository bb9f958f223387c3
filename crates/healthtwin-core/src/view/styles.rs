//! Page stylesheet.

/// Stylesheet injected once at page load: keyframes, reveal and banner
/// classes, slider thumbs.
pub const ANIMATION_CSS: &str = include_str!("../../assets/animations.css");

/// The stylesheet wrapped for insertion into `<head>`.
pub fn style_tag() -> String {
    format!("<style>\n{ANIMATION_CSS}</style>")
}
