use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tubekit_core::{GenerationError, GenerationStep, ProgressSink};

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = d.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Progress bar over the enabled generation steps.
pub struct StepProgress {
    bar: ProgressBar,
    step_start: Instant,
}

impl StepProgress {
    pub fn new(total_steps: usize) -> anyhow::Result<Self> {
        let bar = ProgressBar::new(total_steps as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                .template("{spinner:.cyan} [{bar:24.cyan/dim}] {pos}/{len} {msg}")?
                .progress_chars("━╸ "),
        );
        bar.enable_steady_tick(Duration::from_millis(80));

        Ok(Self {
            bar,
            step_start: Instant::now(),
        })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for StepProgress {
    fn step_started(&mut self, step: GenerationStep) {
        self.step_start = Instant::now();
        self.bar
            .set_message(format!("Generating {}...", step.name()));
    }

    fn step_finished(
        &mut self,
        step: GenerationStep,
        completed: usize,
        _total: usize,
        error: Option<&GenerationError>,
    ) {
        self.bar.set_position(completed as u64);
        let line = match error {
            None => format!(
                "{} {} generated {}",
                style("✓").green().bold(),
                capitalize(step.name()),
                style(format!("[{}]", format_duration(self.step_start.elapsed()))).dim()
            ),
            Some(error) => format!(
                "{} {} failed: {}",
                style("✗").red().bold(),
                capitalize(step.name()),
                style(error).red()
            ),
        };
        self.bar.println(line);
    }
}
