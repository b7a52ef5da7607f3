use crate::error::StandupError;
use crate::github::collector::CollectObserver;
use crate::github::ActivityKind;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

/// Start a stderr spinner showing `message`
pub fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Renders one spinner per search while activity is collected
#[derive(Default)]
pub struct SearchSpinners {
    current: RefCell<Option<ProgressBar>>,
}

impl SearchSpinners {
    fn finish(&self, message: String) {
        if let Some(spinner) = self.current.borrow_mut().take() {
            spinner.finish_with_message(message);
        }
    }
}

impl CollectObserver for SearchSpinners {
    fn search_started(&self, kind: ActivityKind) {
        let spinner = spinner(format!("Searching for {}...", kind.plural()));
        *self.current.borrow_mut() = Some(spinner);
    }

    fn search_finished(&self, kind: ActivityKind, found: usize) {
        self.finish(format!("✅ Found {} {}", found, kind.plural()));
    }

    fn search_skipped(&self, kind: ActivityKind, _error: &StandupError) {
        self.finish(format!(
            "⚠️  Skipped {} (search may be restricted)",
            kind.plural()
        ));
    }

    fn search_failed(&self, kind: ActivityKind, _error: &StandupError) {
        if let Some(spinner) = self.current.borrow_mut().take() {
            spinner.abandon_with_message(format!("❌ Searching for {} failed", kind.plural()));
        }
    }
}
