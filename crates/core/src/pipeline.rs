//! Runs the enabled generation steps for one request and writes the results
//! into a [`SessionState`].

use chrono::Local;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::{
    analyzer::analyze,
    client::{GenerationClient, GenerationError, RetryPolicy, generate_with_retry},
    error::{Result, TubekitError},
    parse::{DEFAULT_MAX_TITLES, extract_tags, extract_titles},
    prompt::{description_prompt, tags_prompt, thumbnail_prompt, title_prompt},
    session::{SessionState, StepFailure},
    types::{GenerationRequest, GenerationStep, HistoryEntry, TagSet},
};

/// Which steps to run and what to record around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub titles: bool,
    pub description: bool,
    pub tags: bool,
    pub thumbnails: bool,
    /// Store [`crate::types::ContentMetrics`] for the input text.
    pub analytics: bool,
    /// Append a history entry after the run.
    pub history: bool,
    pub max_titles: usize,
    /// Generate all enabled steps concurrently instead of one after another.
    pub parallel: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            titles: true,
            description: true,
            tags: true,
            thumbnails: true,
            analytics: true,
            history: true,
            max_titles: DEFAULT_MAX_TITLES,
            parallel: false,
        }
    }
}

impl GenerationOptions {
    pub fn is_enabled(&self, step: GenerationStep) -> bool {
        match step {
            GenerationStep::Titles => self.titles,
            GenerationStep::Description => self.description,
            GenerationStep::Tags => self.tags,
            GenerationStep::Thumbnails => self.thumbnails,
        }
    }

    /// Enabled steps in pipeline order.
    pub fn enabled_steps(&self) -> Vec<GenerationStep> {
        GenerationStep::ORDER
            .into_iter()
            .filter(|step| self.is_enabled(*step))
            .collect()
    }
}

/// Receives progress while a run is in flight. Both hooks default to no-ops.
pub trait ProgressSink {
    fn step_started(&mut self, _step: GenerationStep) {}

    /// `completed` out of `total` enabled steps are done, `step` being the latest.
    fn step_finished(
        &mut self,
        _step: GenerationStep,
        _completed: usize,
        _total: usize,
        _error: Option<&GenerationError>,
    ) {
    }
}

impl ProgressSink for () {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: GenerationStep,
    pub error: Option<GenerationError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per enabled step, in pipeline order.
    pub steps: Vec<StepReport>,
}

impl RunReport {
    pub fn all_succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.error.is_none())
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| s.error.is_some())
    }
}

enum StepOutput {
    Titles(Vec<String>),
    Description(String),
    Tags(TagSet),
    Thumbnails(String),
}

pub struct Pipeline<C> {
    client: C,
    retry: RetryPolicy,
}

impl<C: GenerationClient> Pipeline<C> {
    pub fn new(client: C, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Generates every enabled step and stores the outcome in `session`.
    ///
    /// Blank content is rejected before anything is touched. Otherwise a failed
    /// step leaves its slot empty, is recorded in `session.failures` and does
    /// not stop the remaining steps.
    pub async fn run(
        &self,
        session: &mut SessionState,
        request: &GenerationRequest,
        options: &GenerationOptions,
        progress: &mut impl ProgressSink,
    ) -> Result<RunReport> {
        if request.content.trim().is_empty() {
            return Err(TubekitError::EmptyContent);
        }

        session.failures.clear();
        if options.analytics {
            session.metrics = Some(analyze(&request.content));
        }

        let steps = options.enabled_steps();
        let total = steps.len();
        let mut report = RunReport::default();
        info!(steps = total, parallel = options.parallel, "starting generation run");

        if options.parallel {
            let mut pending: FuturesUnordered<_> = steps
                .iter()
                .map(|&step| {
                    progress.step_started(step);
                    self.execute(step, request, options)
                })
                .collect();

            while let Some((step, result)) = pending.next().await {
                let error = store(session, step, result);
                report.steps.push(StepReport { step, error });
                progress.step_finished(step, report.steps.len(), total, last_error(&report));
            }
            report.steps.sort_by_key(|s| s.step);
        } else {
            for step in steps {
                progress.step_started(step);
                let (step, result) = self.execute(step, request, options).await;
                let error = store(session, step, result);
                report.steps.push(StepReport { step, error });
                progress.step_finished(step, report.steps.len(), total, last_error(&report));
            }
        }

        if options.history {
            session.push_history(HistoryEntry {
                timestamp: Local::now(),
                video_type: request.video_type,
                keywords: request.keywords.clone(),
                generated: session.summary(),
            });
        }

        info!(
            failed = report.failed_steps().count(),
            "generation run finished"
        );
        Ok(report)
    }

    async fn execute(
        &self,
        step: GenerationStep,
        request: &GenerationRequest,
        options: &GenerationOptions,
    ) -> (GenerationStep, std::result::Result<StepOutput, GenerationError>) {
        let prompt = match step {
            GenerationStep::Titles => title_prompt(request, options.max_titles),
            GenerationStep::Description => description_prompt(request),
            GenerationStep::Tags => tags_prompt(request),
            GenerationStep::Thumbnails => thumbnail_prompt(request),
        };
        debug!(step = step.name(), prompt_chars = prompt.len(), "generating");

        let result = generate_with_retry(&self.client, &prompt, &self.retry)
            .await
            .map(|text| match step {
                GenerationStep::Titles => {
                    StepOutput::Titles(extract_titles(&text, options.max_titles))
                }
                GenerationStep::Description => StepOutput::Description(text),
                GenerationStep::Tags => StepOutput::Tags(extract_tags(&text)),
                GenerationStep::Thumbnails => StepOutput::Thumbnails(text),
            });
        (step, result)
    }
}

fn last_error(report: &RunReport) -> Option<&GenerationError> {
    report.steps.last().and_then(|s| s.error.as_ref())
}

/// Writes one step's outcome into its own slot of the session.
fn store(
    session: &mut SessionState,
    step: GenerationStep,
    result: std::result::Result<StepOutput, GenerationError>,
) -> Option<GenerationError> {
    match result {
        Ok(StepOutput::Titles(titles)) => session.titles = titles,
        Ok(StepOutput::Description(text)) => session.description = text,
        Ok(StepOutput::Tags(tags)) => session.tags = tags,
        Ok(StepOutput::Thumbnails(text)) => session.thumbnail_concepts = text,
        Err(error) => {
            warn!(step = step.name(), %error, "step failed");
            match step {
                GenerationStep::Titles => session.titles.clear(),
                GenerationStep::Description => session.description.clear(),
                GenerationStep::Tags => session.tags = TagSet::default(),
                GenerationStep::Thumbnails => session.thumbnail_concepts.clear(),
            }
            session.failures.push(StepFailure {
                step,
                error: error.clone(),
            });
            return Some(error);
        }
    }
    None
}
