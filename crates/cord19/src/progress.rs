use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Builds [ProgressBar]s drawn to `stderr`.
///
/// A bar without a length is rendered as a spinner. If `quiet` is set,
/// the bar is hidden.
#[derive(Debug)]
pub struct ProgressBarBuilder {
    template: String,
    quiet: bool,
    len: Option<u64>,
}

impl ProgressBarBuilder {
    pub fn new<S: Into<String>>(template: S, quiet: bool) -> Self {
        Self {
            template: template.into(),
            quiet,
            len: None,
        }
    }

    pub fn len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub fn build(self) -> ProgressBar {
        let pbar = match self.len {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };

        if self.quiet {
            pbar.set_draw_target(ProgressDrawTarget::hidden());
            return pbar;
        }

        let style = ProgressStyle::with_template(&self.template)
            .unwrap_or_else(|e| {
                log::warn!("invalid progress template: {e}");
                ProgressStyle::default_bar()
            });

        pbar.set_style(style);
        pbar.enable_steady_tick(Duration::from_millis(200));
        pbar
    }
}
