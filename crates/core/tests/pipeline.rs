use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use tubekit_core::{
    FailureKind, GenerationClient, GenerationOptions, GenerationRequest, GenerationStep,
    Pipeline, ProgressSink, RetryPolicy, SessionState, TubekitError, VideoType,
    client::{AttemptFailure, GenerationError},
};

const TITLES: &str = "Here you go:\n1. Build a Home Lab for Under $300 (budget hook)\n2. Proxmox in 10 Minutes (speed)\n3. My Mini PC Cluster Tour";
const DESCRIPTION: &str = "Ever wanted a home lab that sips power? In this video...";
const TAGS: &str = "Primary tags: home lab, proxmox\nSecondary tags: mini pc; self hosting\nTrending tags: ai server";
const THUMBNAILS: &str = "Concept 1: three glowing mini PCs on a desk";

/// Answers by recognizing which template a prompt came from.
#[derive(Default)]
struct ScriptedClient {
    failing: Vec<GenerationStep>,
    calls: Mutex<HashMap<GenerationStep, u32>>,
}

impl ScriptedClient {
    fn failing(steps: &[GenerationStep]) -> Self {
        Self {
            failing: steps.to_vec(),
            ..Self::default()
        }
    }

    fn calls(&self, step: GenerationStep) -> u32 {
        self.calls.lock().unwrap().get(&step).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> u32 {
        self.calls.lock().unwrap().values().sum()
    }
}

fn step_of(prompt: &str) -> GenerationStep {
    if prompt.contains("click-worthy titles") {
        GenerationStep::Titles
    } else if prompt.contains("SEO-optimized description") {
        GenerationStep::Description
    } else if prompt.contains("strategic YouTube tags") {
        GenerationStep::Tags
    } else {
        GenerationStep::Thumbnails
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, AttemptFailure> {
        let step = step_of(prompt);
        *self.calls.lock().unwrap().entry(step).or_default() += 1;

        if self.failing.contains(&step) {
            return Err(AttemptFailure::new(
                FailureKind::Api { status: 503 },
                "API error (503): overloaded",
            ));
        }

        Ok(match step {
            GenerationStep::Titles => TITLES,
            GenerationStep::Description => DESCRIPTION,
            GenerationStep::Tags => TAGS,
            GenerationStep::Thumbnails => THUMBNAILS,
        }
        .to_string())
    }
}

#[derive(Default)]
struct RecordingProgress {
    started: Vec<GenerationStep>,
    finished: Vec<(GenerationStep, usize, usize, bool)>,
}

impl ProgressSink for RecordingProgress {
    fn step_started(&mut self, step: GenerationStep) {
        self.started.push(step);
    }

    fn step_finished(
        &mut self,
        step: GenerationStep,
        completed: usize,
        total: usize,
        error: Option<&GenerationError>,
    ) {
        self.finished.push((step, completed, total, error.is_some()));
    }
}

fn pipeline(client: ScriptedClient) -> Pipeline<ScriptedClient> {
    Pipeline::new(
        client,
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        },
    )
}

fn request() -> GenerationRequest {
    GenerationRequest {
        content: "A walkthrough of my home lab built from three mini PCs running Proxmox".into(),
        video_type: VideoType::Tutorial,
        keywords: "home lab, proxmox".into(),
        ..GenerationRequest::default()
    }
}

#[tokio::test]
async fn full_run_fills_every_slot() {
    let pipeline = pipeline(ScriptedClient::default());
    let mut session = SessionState::new();
    let mut progress = RecordingProgress::default();

    let report = pipeline
        .run(&mut session, &request(), &GenerationOptions::default(), &mut progress)
        .await
        .unwrap();

    assert!(report.all_succeeded());
    assert_eq!(
        session.titles,
        vec![
            "Build a Home Lab for Under $300",
            "Proxmox in 10 Minutes",
            "My Mini PC Cluster Tour"
        ]
    );
    assert_eq!(session.description, DESCRIPTION);
    assert_eq!(session.tags.primary, vec!["home lab", "proxmox"]);
    assert_eq!(session.tags.all.len(), 5);
    assert_eq!(session.thumbnail_concepts, THUMBNAILS);
    assert_eq!(session.metrics.as_ref().unwrap().word_count, 13);

    assert_eq!(progress.started, GenerationStep::ORDER.to_vec());
    assert_eq!(
        progress.finished,
        vec![
            (GenerationStep::Titles, 1, 4, false),
            (GenerationStep::Description, 2, 4, false),
            (GenerationStep::Tags, 3, 4, false),
            (GenerationStep::Thumbnails, 4, 4, false),
        ]
    );

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].keywords, "home lab, proxmox");
    assert_eq!(history[0].generated.titles, 3);
    assert_eq!(history[0].generated.tags, 5);
    assert!(history[0].generated.description);
    assert!(history[0].generated.thumbnails);
}

#[tokio::test]
async fn blank_content_is_rejected_before_any_call() {
    let pipeline = pipeline(ScriptedClient::default());
    let mut session = SessionState::new();
    session.titles = vec!["keep me".into()];
    let req = GenerationRequest {
        content: " \n\t ".into(),
        ..request()
    };

    let err = pipeline
        .run(&mut session, &req, &GenerationOptions::default(), &mut ())
        .await
        .unwrap_err();

    assert!(matches!(err, TubekitError::EmptyContent));
    assert_eq!(pipeline.client().total_calls(), 0);
    assert_eq!(session.titles, vec!["keep me"]);
    assert!(session.metrics.is_none());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn failed_step_does_not_block_later_steps() {
    let pipeline = pipeline(ScriptedClient::failing(&[GenerationStep::Description]));
    let mut session = SessionState::new();
    session.description = "stale description".into();

    let report = pipeline
        .run(&mut session, &request(), &GenerationOptions::default(), &mut ())
        .await
        .unwrap();

    assert!(!report.all_succeeded());
    let failed: Vec<GenerationStep> = report.failed_steps().map(|s| s.step).collect();
    assert_eq!(failed, vec![GenerationStep::Description]);

    assert_eq!(pipeline.client().calls(GenerationStep::Description), 3);
    assert_eq!(pipeline.client().calls(GenerationStep::Thumbnails), 1);
    assert_eq!(session.description, "");
    assert_eq!(session.thumbnail_concepts, THUMBNAILS);

    assert_eq!(session.failures.len(), 1);
    let error = &session.failures[0].error;
    assert_eq!(error.attempts, 3);
    assert_eq!(error.kind, FailureKind::Api { status: 503 });
    assert!(error.to_string().starts_with("Error:"));

    assert!(!session.history()[0].generated.description);
}

#[tokio::test]
async fn disabled_steps_are_skipped() {
    let pipeline = pipeline(ScriptedClient::default());
    let mut session = SessionState::new();
    let options = GenerationOptions {
        description: false,
        thumbnails: false,
        analytics: false,
        history: false,
        ..GenerationOptions::default()
    };
    let mut progress = RecordingProgress::default();

    let report = pipeline
        .run(&mut session, &request(), &options, &mut progress)
        .await
        .unwrap();

    assert_eq!(report.steps.len(), 2);
    assert_eq!(pipeline.client().calls(GenerationStep::Description), 0);
    assert_eq!(pipeline.client().calls(GenerationStep::Thumbnails), 0);
    assert_eq!(progress.finished.last(), Some(&(GenerationStep::Tags, 2, 2, false)));
    assert!(session.metrics.is_none());
    assert!(session.history().is_empty());
    assert!(session.description.is_empty());
}

#[tokio::test]
async fn max_titles_caps_parsed_titles() {
    let pipeline = pipeline(ScriptedClient::default());
    let mut session = SessionState::new();
    let options = GenerationOptions {
        max_titles: 2,
        ..GenerationOptions::default()
    };

    pipeline
        .run(&mut session, &request(), &options, &mut ())
        .await
        .unwrap();

    assert_eq!(session.titles.len(), 2);
}

#[tokio::test]
async fn parallel_run_matches_sequential_results() {
    let sequential = pipeline(ScriptedClient::failing(&[GenerationStep::Tags]));
    let parallel = pipeline(ScriptedClient::failing(&[GenerationStep::Tags]));
    let mut seq_session = SessionState::new();
    let mut par_session = SessionState::new();
    let mut progress = RecordingProgress::default();

    let seq_report = sequential
        .run(&mut seq_session, &request(), &GenerationOptions::default(), &mut ())
        .await
        .unwrap();
    let par_report = parallel
        .run(
            &mut par_session,
            &request(),
            &GenerationOptions {
                parallel: true,
                ..GenerationOptions::default()
            },
            &mut progress,
        )
        .await
        .unwrap();

    assert_eq!(seq_report, par_report);
    assert_eq!(seq_session.titles, par_session.titles);
    assert_eq!(seq_session.description, par_session.description);
    assert_eq!(seq_session.tags, par_session.tags);
    assert_eq!(seq_session.thumbnail_concepts, par_session.thumbnail_concepts);
    assert_eq!(seq_session.failures, par_session.failures);

    assert_eq!(progress.finished.len(), 4);
    let counters: Vec<usize> = progress.finished.iter().map(|f| f.1).collect();
    assert_eq!(counters, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn history_accumulates_across_runs() {
    let pipeline = pipeline(ScriptedClient::default());
    let mut session = SessionState::new();

    for keywords in ["first", "second", "third"] {
        let req = GenerationRequest {
            keywords: keywords.into(),
            ..request()
        };
        pipeline
            .run(&mut session, &req, &GenerationOptions::default(), &mut ())
            .await
            .unwrap();
    }

    let newest_first: Vec<&str> = session
        .recent_history()
        .map(|e| e.keywords.as_str())
        .collect();
    assert_eq!(newest_first, vec!["third", "second", "first"]);
}
