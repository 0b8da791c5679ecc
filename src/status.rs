use std::time::Duration;

use client::Outcome;
use input::InputKind;

#[cfg(feature = "cli")]
pub use spinner::StatusLine;

#[cfg(feature = "cli")]
mod spinner {
    use std::time::Duration;

    use client::{LoadingObserver, Outcome};
    use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
    use input::InputKind;

    use super::{finished_message, started_message};

    const TICK: Duration = Duration::from_millis(100);

    /// Terminal loading indicator: a spinner while the request is out, one
    /// closing line when it settles. Draws on stderr so stdout stays clean.
    pub struct StatusLine {
        bar: ProgressBar,
    }

    impl StatusLine {
        pub fn stderr() -> Self {
            Self::with_target(ProgressDrawTarget::stderr())
        }

        /// Indicator that tracks state without drawing anything.
        pub fn hidden() -> Self {
            Self::with_target(ProgressDrawTarget::hidden())
        }

        fn with_target(target: ProgressDrawTarget) -> Self {
            let bar = ProgressBar::with_draw_target(None, target);
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            bar.set_style(style);
            Self { bar }
        }
    }

    impl LoadingObserver for StatusLine {
        fn loading_started(&self, kind: InputKind) {
            self.bar.reset();
            self.bar.set_message(started_message(kind));
            self.bar.enable_steady_tick(TICK);
        }

        fn loading_finished(&self, _kind: InputKind, outcome: Outcome, elapsed: Duration) {
            match outcome {
                Outcome::Succeeded => self
                    .bar
                    .finish_with_message(finished_message(outcome, elapsed)),
                Outcome::Failed => self
                    .bar
                    .abandon_with_message(finished_message(outcome, elapsed)),
                Outcome::Cancelled => self.bar.finish_and_clear(),
            }
        }
    }

}

pub fn started_message(kind: InputKind) -> String {
    format!("Analyzing {kind}...")
}

pub fn finished_message(outcome: Outcome, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    match outcome {
        Outcome::Succeeded => format!("Done in {secs:.2}s"),
        Outcome::Failed => format!("Failed after {secs:.2}s"),
        Outcome::Cancelled => "Cancelled".to_string(),
    }
}
