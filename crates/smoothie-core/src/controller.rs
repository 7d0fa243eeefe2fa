//! Submission controller — input → lookup → normalize → render
//!
//! # States
//!
//! ```text
//! Idle ─submit (non-blank)→ AwaitingResponse ─success→ Rendered
//!                                   └──────── failure → Idle
//! ```
//!
//! Two flavours of submission:
//!
//! - [`SubmissionController::submit`] issues the lookup and renders.
//! - [`SubmissionController::submit_with_progress`] additionally stores the
//!   name, blanks the content, runs the simulated progress bar and preloads
//!   the image before rendering.
//!
//! Every submission takes `&mut self`, so a second one cannot start while the
//! first is still waiting for its response. Each is numbered for the logs.
//!
//! Failures are logged and reported through [`SubmitOutcome`]; nothing is
//! rendered for a failed submission.

use std::cell::Cell;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use crate::config::Timing;
use crate::dictionary::Normalizer;
use crate::document::Document;
use crate::lookup::{Lookup, LookupResult};
use crate::preload::{ImagePreloader, SkipPreload};
use crate::progress::{random_factor, Phase, ProgressSimulator};
use crate::storage::{MemoryStorage, Storage, LAST_NAME_KEY};
use crate::text::title_case_hyphen_join;
use crate::tokenizer::prepare_ingredients;
use crate::Error;

// ── Types ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingResponse,
    Rendered,
}

/// User interaction on the input field or submit control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Click,
    /// Key pressed in the input field, by key name (`"Enter"`, `"a"`, ...)
    Key(String),
}

impl InputEvent {
    pub fn submits(&self) -> bool {
        match self {
            InputEvent::Click => true,
            InputEvent::Key(key) => key == "Enter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input or a non-submitting event; no request issued
    Ignored,
    Rendered {
        sequence: u64,
        ingredients: Vec<String>,
    },
    Failed {
        sequence: u64,
        error: Error,
    },
}

// Completion signals shared between the lookup task and the animation.
#[derive(Default)]
struct Signals {
    lookup_done: Cell<bool>,
    lookup_failed: Cell<bool>,
    preload_done: Cell<bool>,
}

// ── Controller ─────────────────────────────────────────────

pub struct SubmissionController<D: Document> {
    normalizer: Normalizer,
    lookup: Box<dyn Lookup>,
    preloader: Box<dyn ImagePreloader>,
    storage: Box<dyn Storage>,
    document: D,
    timing: Timing,
    rng: StdRng,
    state: ControllerState,
    sequence: u64,
}

impl<D: Document> SubmissionController<D> {
    pub fn new(normalizer: Normalizer, lookup: Box<dyn Lookup>, document: D) -> Self {
        SubmissionController {
            normalizer,
            lookup,
            preloader: Box::new(SkipPreload),
            storage: Box::new(MemoryStorage::new()),
            document,
            timing: Timing::default(),
            rng: StdRng::from_entropy(),
            state: ControllerState::Idle,
            sequence: 0,
        }
    }

    pub fn with_preloader(mut self, preloader: Box<dyn ImagePreloader>) -> Self {
        self.preloader = preloader;
        self
    }

    pub fn with_storage(mut self, storage: Box<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Make the progress animation reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_document(self) -> D {
        self.document
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    // ── Baseline submission ────────────────────────────

    /// Submit on click or Enter; every other event is ignored
    pub async fn handle_event(&mut self, event: &InputEvent, input: &str) -> SubmitOutcome {
        if !event.submits() {
            return SubmitOutcome::Ignored;
        }
        self.submit(input).await
    }

    /// Look up `input` and render the result
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let Some(sequence) = self.begin(input) else {
            return SubmitOutcome::Ignored;
        };

        match self.lookup.lookup(input).await {
            Ok(result) => self.render(sequence, &result),
            Err(e) => self.fail(sequence, e),
        }
    }

    // ── Progress submission ────────────────────────────

    /// Submit with storage, content fade, progress bar and image preload
    pub async fn submit_with_progress(&mut self, input: &str) -> SubmitOutcome {
        let Some(sequence) = self.begin(input) else {
            return SubmitOutcome::Ignored;
        };

        if let Err(e) = self.storage.set(LAST_NAME_KEY, input) {
            warn!(sequence, error = %e, "could not store submitted name");
        }

        self.document.set_blank(true);

        let signals = Signals::default();
        let lookup = self.lookup.as_ref();
        let preloader = self.preloader.as_ref();
        let document = &mut self.document;
        let rng = &mut self.rng;
        let timing = self.timing;

        let work = async {
            let result = lookup.lookup(input).await;
            signals.lookup_done.set(true);

            let data = match result {
                Ok(data) => data,
                Err(e) => {
                    signals.lookup_failed.set(true);
                    return Err(e);
                }
            };

            // image URL is known now, fetch it while the bar keeps running
            match tokio::time::timeout(timing.preload_timeout, preloader.preload(&data.image_url))
                .await
            {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(sequence, url = %data.image_url, error = %e, "image preload failed")
                }
                Err(_) => warn!(
                    sequence,
                    url = %data.image_url,
                    timeout_ms = timing.preload_timeout.as_millis() as u64,
                    "image preload timed out"
                ),
            }
            signals.preload_done.set(true);
            Ok(data)
        };

        let animation = animate(document, &signals, timing, rng);
        let (result, mut progress) = tokio::join!(work, animation);

        let outcome = match result {
            Ok(data) => {
                let outcome = self.render(sequence, &data);
                tokio::time::sleep(self.timing.pulse).await;
                progress.hold_elapsed();
                outcome
            }
            Err(e) => self.fail(sequence, e),
        };

        debug!(sequence, phase = ?progress.phase(), "progress finished");
        self.document.set_pulse(false);
        self.document.hide_progress();
        self.document.set_blank(false);

        outcome
    }

    /// Resubmit the stored name after the replay delay
    pub async fn replay(&mut self) -> SubmitOutcome {
        match self.storage.get(LAST_NAME_KEY) {
            Some(name) if !name.trim().is_empty() => {
                info!(name = %name, "replaying last submission");
                tokio::time::sleep(self.timing.replay_delay).await;
                self.submit_with_progress(&name).await
            }
            _ => {
                debug!("no stored submission to replay");
                SubmitOutcome::Ignored
            }
        }
    }

    // ── Shared steps ───────────────────────────────────

    fn begin(&mut self, input: &str) -> Option<u64> {
        if input.trim().is_empty() {
            warn!("Please enter a smoothie name");
            return None;
        }

        self.sequence += 1;
        self.state = ControllerState::AwaitingResponse;
        info!(sequence = self.sequence, name = %input, "submitting");
        Some(self.sequence)
    }

    fn render(&mut self, sequence: u64, result: &LookupResult) -> SubmitOutcome {
        let label = title_case_hyphen_join(&result.name);
        let ingredients = prepare_ingredients(&result.ingredients, &self.normalizer);

        self.document.set_image(&result.image_url, &label);
        self.document.set_headline(&label);
        self.document.set_category(&result.category);
        self.document.replace_ingredients(&ingredients);

        self.state = ControllerState::Rendered;
        info!(sequence, name = %result.name, ingredients = ingredients.len(), "rendered");
        SubmitOutcome::Rendered {
            sequence,
            ingredients,
        }
    }

    fn fail(&mut self, sequence: u64, e: Error) -> SubmitOutcome {
        match &e {
            Error::Status(status) => warn!(sequence, status, "Something went wrong"),
            other => error!(sequence, error = %other, "lookup failed"),
        }
        self.state = ControllerState::Idle;
        SubmitOutcome::Failed { sequence, error: e }
    }
}

/// Run the progress bar until it reaches 100% or the lookup fails
///
/// Pulse is switched on at 100%. The returned simulator is `Holding` on
/// success and still `Running`/`Catchup` after a failure.
async fn animate<D: Document>(
    document: &mut D,
    signals: &Signals,
    timing: Timing,
    rng: &mut StdRng,
) -> ProgressSimulator {
    let mut progress = ProgressSimulator::new();
    progress.start();
    document.show_progress(0);

    let mut frames = tokio::time::interval(timing.frame);
    loop {
        frames.tick().await;

        if signals.lookup_failed.get() {
            return progress;
        }
        if signals.lookup_done.get() {
            progress.lookup_completed();
        }
        if signals.preload_done.get() {
            progress.preload_resolved();
        }

        progress.tick(random_factor(rng));
        document.show_progress(progress.display_percent());

        if progress.phase() == Phase::Holding {
            document.set_pulse(true);
            return progress;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const DICTIONARY: &str = r#"{"zutaten": [
        {"standard": "Banane", "eingabe": ["banane", "bananen"]},
        {"standard": "Apfel", "eingabe": ["apfel", "äpfel"]},
        {"standard": "Honig", "eingabe": ["honig", "bienenhonig"]}
    ]}"#;

    // ── Fakes ──────────────────────────────────────────

    #[derive(Clone)]
    struct FakeLookup {
        response: Result<LookupResult>,
        delay: Duration,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeLookup {
        fn ok(ingredients: &[&str]) -> Self {
            FakeLookup {
                response: Ok(LookupResult {
                    name: "green smoothie".into(),
                    image_url: "https://img.example/green.png".into(),
                    category: "fruchtig".into(),
                    ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                }),
                delay: Duration::ZERO,
                requests: Arc::default(),
            }
        }

        fn failing(error: Error) -> Self {
            FakeLookup {
                response: Err(error),
                ..Self::ok(&[])
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Lookup for FakeLookup {
        async fn lookup(&self, name: &str) -> Result<LookupResult> {
            self.requests.lock().unwrap().push(name.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.response.clone()
        }
    }

    struct FakePreloader {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl ImagePreloader for FakePreloader {
        async fn preload(&self, _url: &str) -> Result<()> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(Error::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    fn controller(lookup: &FakeLookup) -> SubmissionController<Page> {
        SubmissionController::new(
            Normalizer::from_json(DICTIONARY),
            Box::new(lookup.clone()),
            Page::new(),
        )
        .with_rng_seed(42)
    }

    fn assert_monotonic(history: &[u8]) {
        for pair in history.windows(2) {
            assert!(pair[0] <= pair[1], "progress went backwards: {:?}", pair);
        }
        assert!(history.iter().all(|&p| p <= 100));
    }

    // ── Baseline ───────────────────────────────────────

    #[tokio::test]
    async fn test_blank_input_issues_no_request() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut controller = controller(&lookup);

        assert_eq!(controller.submit("").await, SubmitOutcome::Ignored);
        assert_eq!(controller.submit("   \t ").await, SubmitOutcome::Ignored);
        assert_eq!(controller.submit_with_progress("  ").await, SubmitOutcome::Ignored);

        assert_eq!(lookup.request_count(), 0);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.document().is_empty());
    }

    #[tokio::test]
    async fn test_submit_renders_normalized_record() {
        let lookup = FakeLookup::ok(&["frische Bananen Apfel", "Bienenhonig", "Zimt"]);
        let mut controller = controller(&lookup);

        let outcome = controller.submit("green smoothie").await;
        assert_eq!(
            outcome,
            SubmitOutcome::Rendered {
                sequence: 1,
                ingredients: vec!["Banane".into(), "Apfel".into(), "Honig".into(), "Zimt".into()],
            }
        );
        assert_eq!(controller.state(), ControllerState::Rendered);

        let page = controller.document();
        assert_eq!(page.headline, "Green-Smoothie");
        assert_eq!(page.image.src, "https://img.example/green.png");
        assert_eq!(page.image.alt, "Green-Smoothie");
        assert_eq!(page.image.title, "Green-Smoothie");
        assert_eq!(page.category, "fruchtig");
        assert_eq!(page.ingredients, vec!["Banane", "Apfel", "Honig", "Zimt"]);
        assert_eq!(*lookup.requests.lock().unwrap(), vec!["green smoothie"]);
    }

    #[tokio::test]
    async fn test_submit_replaces_previous_list() {
        let first = FakeLookup::ok(&["Bananen", "Honig", "Zimt"]);
        let mut controller = controller(&first);
        controller.submit("green smoothie").await;
        assert_eq!(controller.document().ingredients.len(), 3);

        controller.lookup = Box::new(FakeLookup::ok(&["Apfel"]));
        let outcome = controller.submit("apple").await;
        assert!(matches!(outcome, SubmitOutcome::Rendered { sequence: 2, .. }));
        assert_eq!(controller.document().ingredients, vec!["Apfel"]);
    }

    #[tokio::test]
    async fn test_failed_lookup_renders_nothing() {
        let lookup = FakeLookup::failing(Error::Status(500));
        let mut controller = controller(&lookup);

        let outcome = controller.submit("green smoothie").await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                sequence: 1,
                error: Error::Status(500)
            }
        );
        assert_eq!(controller.state(), ControllerState::Idle);
        assert!(controller.document().is_empty());
    }

    #[tokio::test]
    async fn test_without_dictionary_only_trailing_fields_survive() {
        let lookup = FakeLookup::ok(&["frische Bananen", "Honig"]);
        let mut controller = SubmissionController::new(
            Normalizer::unavailable(),
            Box::new(lookup.clone()),
            Page::new(),
        );
        controller.submit("green smoothie").await;
        assert_eq!(controller.document().ingredients, vec!["Honig"]);
    }

    #[tokio::test]
    async fn test_events() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut controller = controller(&lookup);

        let typed = controller.handle_event(&InputEvent::Key("g".into()), "green").await;
        assert_eq!(typed, SubmitOutcome::Ignored);
        assert_eq!(lookup.request_count(), 0);

        let enter = controller.handle_event(&InputEvent::Key("Enter".into()), "green").await;
        assert!(matches!(enter, SubmitOutcome::Rendered { sequence: 1, .. }));

        let click = controller.handle_event(&InputEvent::Click, "green").await;
        assert!(matches!(click, SubmitOutcome::Rendered { sequence: 2, .. }));
        assert_eq!(lookup.request_count(), 2);
    }

    // ── Progress variant ───────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_progress_renders_and_restores_page() {
        let lookup = FakeLookup::ok(&["Bananen", "Honig"]).delayed(Duration::from_millis(400));
        let mut controller = controller(&lookup).with_preloader(Box::new(FakePreloader {
            delay: Duration::from_millis(300),
            fail: false,
        }));

        let outcome = controller.submit_with_progress("green smoothie").await;
        assert!(matches!(outcome, SubmitOutcome::Rendered { sequence: 1, .. }));

        let page = controller.document();
        assert_eq!(page.ingredients, vec!["Banane", "Honig"]);
        assert_eq!(page.progress, None);
        assert!(!page.blank);
        assert!(!page.pulsing);
        assert_eq!(page.progress_history.first(), Some(&0));
        assert_eq!(page.progress_history.last(), Some(&100));
        assert_monotonic(&page.progress_history);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_stores_submitted_name() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut controller = controller(&lookup);

        controller.submit_with_progress("green smoothie").await;
        controller.submit_with_progress("mango lassi").await;
        assert_eq!(
            controller.storage().get(LAST_NAME_KEY).as_deref(),
            Some("mango lassi")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_waits_at_90_for_slow_lookup() {
        let lookup = FakeLookup::ok(&["Bananen"]).delayed(Duration::from_secs(5));
        let mut controller = controller(&lookup);

        controller.submit_with_progress("green smoothie").await;

        let history = &controller.document().progress_history;
        assert_monotonic(history);
        let plateau = history.iter().filter(|&&p| p == 90).count();
        assert!(plateau > 10, "expected the bar to hold at 90, got {:?}", history);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_survives_failed_preload() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut controller = controller(&lookup).with_preloader(Box::new(FakePreloader {
            delay: Duration::from_millis(50),
            fail: true,
        }));

        let outcome = controller.submit_with_progress("green smoothie").await;
        assert!(matches!(outcome, SubmitOutcome::Rendered { .. }));
        assert_eq!(controller.document().image.src, "https://img.example/green.png");
        assert_eq!(controller.document().progress, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_gives_up_on_hanging_preload() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut controller = controller(&lookup).with_preloader(Box::new(FakePreloader {
            delay: Duration::from_secs(3600),
            fail: false,
        }));
        let timeout = controller.timing.preload_timeout;

        let started = tokio::time::Instant::now();
        let outcome = controller.submit_with_progress("green smoothie").await;
        let elapsed = started.elapsed();

        assert!(matches!(outcome, SubmitOutcome::Rendered { .. }));
        assert!(elapsed >= timeout, "finished before the timeout: {:?}", elapsed);
        assert!(
            elapsed < timeout + Duration::from_secs(5),
            "preload timeout not applied: {:?}",
            elapsed
        );

        let page = controller.document();
        assert_eq!(page.progress_history.last(), Some(&100));
        assert_eq!(page.progress, None);
        assert!(!page.blank);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_failed_lookup_restores_page() {
        let lookup = FakeLookup::failing(Error::Transport("offline".into()))
            .delayed(Duration::from_millis(200));
        let mut controller = controller(&lookup);

        let outcome = controller.submit_with_progress("green smoothie").await;
        assert!(matches!(outcome, SubmitOutcome::Failed { sequence: 1, .. }));

        let page = controller.document();
        assert!(page.headline.is_empty());
        assert!(page.ingredients.is_empty());
        assert_eq!(page.progress, None);
        assert!(!page.blank);
        assert!(!page.pulsing);
        assert!(page.progress_history.iter().all(|&p| p < 100));
        assert_eq!(controller.state(), ControllerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_resubmits_stored_name() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut storage = MemoryStorage::new();
        storage.set(LAST_NAME_KEY, "mango lassi").unwrap();
        let mut controller = controller(&lookup).with_storage(Box::new(storage));

        let outcome = controller.replay().await;
        assert!(matches!(outcome, SubmitOutcome::Rendered { .. }));
        assert_eq!(*lookup.requests.lock().unwrap(), vec!["mango lassi"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_without_stored_name() {
        let lookup = FakeLookup::ok(&["Bananen"]);
        let mut controller = controller(&lookup);

        assert_eq!(controller.replay().await, SubmitOutcome::Ignored);
        assert_eq!(lookup.request_count(), 0);
    }
}
