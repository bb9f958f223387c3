use std::str::FromStr;
use std::time::Duration;

use clap::Subcommand;
use healthtwin_core::timers::wall_clock_ms;
use healthtwin_core::{Event, LandingPage, Mood};

#[derive(Subcommand)]
pub enum DemoAction {
    /// Run the page on a virtual clock and print events as JSON lines
    Simulate {
        /// Stop the clock here
        #[arg(long)]
        until_ms: u64,
        /// Click a step selector: <index>@<ms>
        #[arg(long = "select", value_parser = parse_at::<usize>)]
        selections: Vec<(usize, u64)>,
        /// Submit the sign-up form: <email>@<ms>
        #[arg(long = "signup", value_parser = parse_at::<String>)]
        signups: Vec<(String, u64)>,
        /// Click an avatar at this time
        #[arg(long = "avatar-click")]
        avatar_clicks: Vec<u64>,
        /// Particle seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,
        /// Print the final page state after the events
        #[arg(long)]
        snapshot: bool,
    },
    /// Run the page in real time until interrupted
    Play {
        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Print the mood tag for a step
    Mood {
        index: usize,
    },
    /// List the configured steps
    Steps,
}

#[derive(Debug)]
enum Interaction {
    Select(usize),
    Signup(String),
    AvatarClick,
}

/// Parse `<value>@<ms>`. Splits on the last `@` so emails work.
fn parse_at<T: FromStr>(raw: &str) -> Result<(T, u64), String> {
    let (value, at) = raw
        .rsplit_once('@')
        .ok_or_else(|| format!("expected <value>@<ms>, got '{raw}'"))?;
    let at = at
        .parse::<u64>()
        .map_err(|_| format!("invalid time '{at}' in '{raw}'"))?;
    let value = value
        .parse::<T>()
        .map_err(|_| format!("invalid value '{value}' in '{raw}'"))?;
    Ok((value, at))
}

pub fn run(action: DemoAction, source: &super::ConfigSource) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DemoAction::Simulate {
            until_ms,
            selections,
            signups,
            avatar_clicks,
            seed,
            snapshot,
        } => {
            let mut config = source.load()?;
            if seed.is_some() {
                config.effects.seed = seed;
            }
            let mut page = LandingPage::new(&config)?;

            let mut script: Vec<(u64, Interaction)> = selections
                .into_iter()
                .map(|(index, at)| (at, Interaction::Select(index)))
                .chain(signups.into_iter().map(|(email, at)| (at, Interaction::Signup(email))))
                .chain(avatar_clicks.into_iter().map(|at| (at, Interaction::AvatarClick)))
                .collect();
            // Stable: same-time interactions keep command-line group order.
            script.sort_by_key(|(at, _)| *at);

            emit(&page.start(0))?;
            for (at, interaction) in script {
                if at > until_ms {
                    tracing::warn!(at, until_ms, ?interaction, "interaction after end of run skipped");
                    continue;
                }
                let events = match interaction {
                    Interaction::Select(index) => page.select_step(index, at),
                    Interaction::Signup(email) => page.submit_signup(&email, at),
                    Interaction::AvatarClick => page.click_avatar(at),
                };
                emit(&events)?;
            }
            emit(&page.advance_to(until_ms))?;

            if snapshot {
                println!("{}", serde_json::to_string(&page.snapshot())?);
            }
        }
        DemoAction::Play { seconds } => {
            let config = source.load()?;
            let page = LandingPage::new(&config)?;
            let limit_ms = seconds.map(|s| s.saturating_mul(1_000));
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(play(page, limit_ms))?;
        }
        DemoAction::Mood { index } => {
            println!("{}", Mood::for_step(index));
        }
        DemoAction::Steps => {
            let config = source.load()?;
            for step in config.flow()?.steps() {
                println!("{}\t{}\t{}", step.index, step.mood, step.label);
            }
        }
    }
    Ok(())
}

/// Drive the page from the wall clock, sleeping until each deadline.
async fn play(mut page: LandingPage, limit_ms: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let origin = wall_clock_ms();
    let elapsed = || wall_clock_ms().saturating_sub(origin);
    tracing::info!(origin, ?limit_ms, "demo playback started");

    emit(&page.start(0))?;
    loop {
        let target = match (page.next_deadline(), limit_ms) {
            (Some(next), Some(limit)) => next.min(limit),
            (Some(next), None) => next,
            (None, Some(limit)) => limit,
            (None, None) => break,
        };
        let wait = Duration::from_millis(target.saturating_sub(elapsed()));
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("demo playback interrupted");
                break;
            }
        }
        let now = elapsed().max(target);
        emit(&page.advance_to(now))?;
        if limit_ms.is_some_and(|limit| now >= limit) {
            break;
        }
    }
    Ok(())
}

fn emit(events: &[Event]) -> Result<(), serde_json::Error> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
