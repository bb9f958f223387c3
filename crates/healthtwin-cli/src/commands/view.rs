use clap::Subcommand;
use healthtwin_core::view::avatar::{breathing_delays, hover_style, rainbow_glow_animation};
use healthtwin_core::view::particles::ParticleGenerator;
use healthtwin_core::view::reveal::{
    initial_style, visible_ratio, RevealGroup, RevealTracker, ANIMATE_IN_CLASS,
};
use healthtwin_core::view::scroll::{scroll_target, PageLayout};
use healthtwin_core::view::{slider, styles};
use serde_json::json;

#[derive(Subcommand)]
pub enum ViewAction {
    /// Render a range slider's track fill and stress label
    Slider {
        value: u32,
        #[arg(long, default_value = "10")]
        max: u32,
    },
    /// Scroll offset that brings a section below the navbar
    ///
    /// Give a raw `--top`, or describe the page with `--section` and
    /// resolve a nav link (`--href`) or the call-to-action (`--cta`).
    /// Prints `none` when nothing scrolls.
    Scroll {
        /// Section top in document pixels
        #[arg(long, conflicts_with_all = ["href", "cta"])]
        top: Option<f64>,
        /// Nav link target, e.g. "#features"
        #[arg(long, conflicts_with = "cta")]
        href: Option<String>,
        /// Scroll for a call-to-action button
        #[arg(long)]
        cta: bool,
        /// The button sits inside the sign-up form
        #[arg(long, requires = "cta")]
        inside_form: bool,
        /// Measured section: <id>=<top px>
        #[arg(long = "section", value_parser = parse_section)]
        sections: Vec<(String, f64)>,
        #[arg(long)]
        nav_height: f64,
        /// Gap between navbar and section (default from config)
        #[arg(long)]
        gap: Option<f64>,
    },
    /// Avatar cosmetics
    Avatar {
        #[command(subcommand)]
        action: AvatarView,
    },
    /// Generate particle layouts
    Particles {
        /// Seed for reproducible output (default from config, else random)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of particles (default from config)
        #[arg(long)]
        count: Option<usize>,
        /// Celebration confetti instead of hero dots
        #[arg(long)]
        celebration: bool,
    },
    /// Scroll-reveal state for a group of elements
    Reveal {
        /// feature-cards, avatar-states or social-cards
        group: RevealGroup,
        count: usize,
        /// Element position relative to the viewport: <index>=<top>:<height>
        #[arg(long = "visible", value_parser = parse_box)]
        observations: Vec<(usize, f64, f64)>,
        #[arg(long, default_value = "800")]
        viewport_height: f64,
    },
    /// Print the injected stylesheet
    Css {
        /// Wrap it in a <style> element
        #[arg(long)]
        tag: bool,
    },
}

#[derive(Subcommand)]
pub enum AvatarView {
    /// Inline styles while hovered, or after the pointer leaves
    Hover {
        #[arg(long)]
        off: bool,
    },
    /// Staggered start delays for each avatar's breathing loop
    Breathing {
        count: usize,
        /// Seed for reproducible output (default from config, else random)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Animation of a rainbow glow
    Rainbow {
        /// The glow is scrolled out of view
        #[arg(long)]
        hidden: bool,
    },
}

fn parse_section(raw: &str) -> Result<(String, f64), String> {
    let (id, top) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected <id>=<top>, got '{raw}'"))?;
    let top = top
        .parse::<f64>()
        .map_err(|_| format!("invalid top '{top}' in '{raw}'"))?;
    Ok((id.to_string(), top))
}

fn parse_box(raw: &str) -> Result<(usize, f64, f64), String> {
    let malformed = || format!("expected <index>=<top>:<height>, got '{raw}'");
    let (index, rest) = raw.split_once('=').ok_or_else(malformed)?;
    let (top, height) = rest.split_once(':').ok_or_else(malformed)?;
    Ok((
        index.parse().map_err(|_| malformed())?,
        top.parse().map_err(|_| malformed())?,
        height.parse().map_err(|_| malformed())?,
    ))
}

pub fn run(action: ViewAction, source: &super::ConfigSource) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ViewAction::Slider { value, max } => {
            let view = slider::render(value, max);
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        ViewAction::Scroll {
            top,
            href,
            cta,
            inside_form,
            sections,
            nav_height,
            gap,
        } => {
            let gap = match gap {
                Some(gap) => gap,
                None => source.load()?.layout.scroll_gap_px,
            };
            let target = if let Some(top) = top {
                Some(scroll_target(top, nav_height, gap))
            } else {
                let layout = sections
                    .into_iter()
                    .fold(PageLayout::new(nav_height, gap), |layout, (id, top)| {
                        layout.with_section(id, top)
                    });
                match href {
                    Some(href) => layout.scroll_for_link(&href),
                    None if cta => layout.scroll_for_cta(inside_form),
                    None => return Err("one of --top, --href or --cta is required".into()),
                }
            };
            match target {
                Some(y) => println!("{y}"),
                None => println!("none"),
            }
        }
        ViewAction::Avatar { action } => match action {
            AvatarView::Hover { off } => {
                println!("{}", serde_json::to_string_pretty(&hover_style(!off))?);
            }
            AvatarView::Breathing { count, seed } => {
                let seed = match seed {
                    Some(seed) => Some(seed),
                    None => source.load()?.effects.seed,
                };
                let mut generator = ParticleGenerator::new(seed);
                let delays = breathing_delays(&mut generator, count);
                println!("{}", serde_json::to_string(&delays)?);
            }
            AvatarView::Rainbow { hidden } => {
                println!("{}", rainbow_glow_animation(!hidden));
            }
        },
        ViewAction::Particles {
            seed,
            count,
            celebration,
        } => {
            let effects = source.load()?.effects;
            let mut generator = ParticleGenerator::new(seed.or(effects.seed));
            let json = if celebration {
                let count = count.unwrap_or(effects.celebration_particles);
                serde_json::to_string_pretty(&generator.celebration(count))?
            } else {
                let count = count.unwrap_or(effects.hero_particles);
                serde_json::to_string_pretty(&generator.hero(count))?
            };
            println!("{json}");
        }
        ViewAction::Reveal {
            group,
            count,
            observations,
            viewport_height,
        } => {
            let mut tracker = RevealTracker::new(group, count);
            for (index, top, height) in observations {
                let ratio = visible_ratio(top, height, viewport_height);
                if tracker.observe(index, ratio) {
                    tracing::debug!(index, ratio, "element revealed");
                }
            }
            tracing::debug!(?group, revealed = tracker.revealed_count(), "reveal state");
            let elements: Vec<_> = (0..count)
                .map(|index| {
                    let revealed = tracker.is_revealed(index);
                    json!({
                        "index": index,
                        "revealed": revealed,
                        "class": revealed.then_some(ANIMATE_IN_CLASS),
                        "style": initial_style(group, index),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&elements)?);
        }
        ViewAction::Css { tag } => {
            if tag {
                println!("{}", styles::style_tag());
            } else {
                print!("{}", styles::ANIMATION_CSS);
            }
        }
    }
    Ok(())
}
