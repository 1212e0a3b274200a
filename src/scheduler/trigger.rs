//! Exploratory trigger scheduler — debounce, coalesce, roll back.
//!
//! Several independent events (a slide being accepted, an audience question
//! being answered, a presenter typing a prompt) each want to provoke
//! "generate something interesting next". Issuing one generation call per
//! event would create unordered, overlapping requests competing to fill the
//! same bounded channel. This scheduler coalesces them:
//!
//! * triggers inside the debounce window collapse into a single deferred
//!   dispatch (one replaceable timer, not one per event);
//! * at dispatch time the pending context is **atomically swapped** for an
//!   empty one, so events arriving during the network call accumulate into
//!   a fresh batch instead of being lost or double-sent;
//! * a failed batch is merged back in front of whatever arrived meanwhile
//!   and `last_dispatch` is not advanced, so the batch is retried on the
//!   next trigger rather than silently dropped;
//! * presenter prompts force an immediate dispatch — the presenter is
//!   actively waiting; passive triggers take the debounced path.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::config::SchedulerConfig;
use crate::generate::GenerationAdapter;
use crate::session::SharedSession;
use crate::slide::PresenterPrompt;

use super::pending::{PendingContext, Trigger};

// ---------------------------------------------------------------------------
// ExploratoryScheduler
// ---------------------------------------------------------------------------

/// Coalesces exploratory triggers into batched, time-debounced dispatches.
pub struct ExploratoryScheduler {
    session: SharedSession,
    adapter: Arc<GenerationAdapter>,
    interval: Duration,
    inner: Mutex<SchedulerInner>,
}

struct SchedulerInner {
    pending: PendingContext,
    /// Initialized to the session-start instant so a burst of passive
    /// triggers right after start coalesces instead of the first one
    /// dispatching alone.
    last_dispatch: Option<Instant>,
    /// The single outstanding debounce timer, if any.
    timer: Option<JoinHandle<()>>,
    paused: bool,
}

impl ExploratoryScheduler {
    pub fn new(
        session: SharedSession,
        adapter: Arc<GenerationAdapter>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            session,
            adapter,
            interval: Duration::from_millis(config.debounce_ms),
            inner: Mutex::new(SchedulerInner {
                pending: PendingContext::default(),
                last_dispatch: Some(Instant::now()),
                timer: None,
                paused: false,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Trigger intake
    // -----------------------------------------------------------------------

    /// Record a trigger and (maybe) dispatch. Presenter prompts dispatch
    /// immediately; everything else debounces.
    pub fn enqueue(self: &Arc<Self>, trigger: Trigger) {
        let force = trigger.is_forced();
        self.inner.lock().unwrap().pending.push(trigger);
        self.request_dispatch(force);
    }

    /// Dispatch the pending context now, or schedule a deferred dispatch.
    ///
    /// No-op when nothing is pending or while paused (context keeps
    /// accumulating silently).
    pub fn request_dispatch(self: &Arc<Self>, force: bool) {
        let batch = {
            let mut inner = self.inner.lock().unwrap();
            if inner.pending.is_empty() {
                return;
            }
            if inner.paused {
                return;
            }

            if !force {
                if let Some(last) = inner.last_dispatch {
                    let elapsed = last.elapsed();
                    if elapsed < self.interval {
                        // Within the window: (re)schedule a single deferred
                        // dispatch for the remaining time, replacing any
                        // previous timer so bursts collapse to one.
                        let remaining = self.interval - elapsed;
                        if let Some(timer) = inner.timer.take() {
                            timer.abort();
                        }
                        let scheduler = Arc::clone(self);
                        inner.timer = Some(tokio::spawn(async move {
                            tokio::time::sleep(remaining).await;
                            scheduler.request_dispatch(true);
                        }));
                        return;
                    }
                }
            }

            if let Some(timer) = inner.timer.take() {
                timer.abort();
            }
            // Atomic swap: new events during the network call accumulate
            // into a fresh pending context.
            std::mem::take(&mut inner.pending)
        };

        log::debug!("scheduler: dispatching batch of {} trigger(s)", batch.len());
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            scheduler.dispatch(batch).await;
        });
    }

    async fn dispatch(&self, batch: PendingContext) {
        match self.adapter.run_exploratory(&batch).await {
            Ok(()) => {
                self.inner.lock().unwrap().last_dispatch = Some(Instant::now());
            }
            Err(e) => {
                // Merge the failed batch back in front of whatever arrived
                // during the call; last_dispatch stays put so the retry is
                // not debounced away.
                log::warn!(
                    "scheduler: dispatch of {} trigger(s) failed ({e}); re-queued",
                    batch.len()
                );
                self.inner.lock().unwrap().pending.merge_front(batch);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Stop dispatching. Triggers are still recorded while paused.
    pub fn pause(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.paused = true;
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
    }

    /// Resume dispatching. Any narration accumulated during the pause is
    /// folded in as one presenter-prompt-shaped entry, then a dispatch is
    /// forced if anything is pending.
    pub fn resume(self: &Arc<Self>) {
        self.inner.lock().unwrap().paused = false;

        let leftover = {
            let mut session = self.session.lock().unwrap();
            if session.transcript.is_empty() {
                None
            } else {
                let text = session.transcript.snapshot();
                session.transcript.clear();
                Some(text)
            }
        };
        if let Some(text) = leftover {
            self.inner
                .lock()
                .unwrap()
                .pending
                .push(Trigger::PresenterPrompt(PresenterPrompt {
                    prompt: text,
                    current_slide: None,
                }));
        }

        self.request_dispatch(true);
    }

    /// Return to initial state: timer cancelled, pending context discarded
    /// (not flushed), dispatch clock restarted, paused flag cleared.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(timer) = inner.timer.take() {
            timer.abort();
        }
        inner.pending = PendingContext::default();
        inner.last_dispatch = Some(Instant::now());
        inner.paused = false;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    /// Number of triggers currently awaiting dispatch.
    pub fn pending_len(&self) -> usize {
        self.inner.lock().unwrap().pending.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::generate::{
        FollowupIdea, FollowupRequest, FollowupService, GeneratedSlide, GenerationRequest,
        GenerationService, ServiceError,
    };
    use crate::session::new_shared_session;
    use crate::slide::{Slide, SlideContent, SlideSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    const DEBOUNCE_MS: u64 = 200;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Records every follow-up request; fails the first `fail_first` calls.
    struct RecordingFollowups {
        requests: StdMutex<Vec<FollowupRequest>>,
        fail_first: AtomicUsize,
    }

    impl RecordingFollowups {
        fn new() -> Self {
            Self {
                requests: StdMutex::new(Vec::new()),
                fail_first: AtomicUsize::new(0),
            }
        }

        fn failing_first(n: usize) -> Self {
            Self {
                requests: StdMutex::new(Vec::new()),
                fail_first: AtomicUsize::new(n),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        fn request(&self, n: usize) -> FollowupRequest {
            self.requests.lock().unwrap()[n].clone()
        }
    }

    #[async_trait]
    impl FollowupService for RecordingFollowups {
        async fn followups(
            &self,
            request: &FollowupRequest,
        ) -> Result<Vec<FollowupIdea>, ServiceError> {
            self.requests.lock().unwrap().push(request.clone());
            if self
                .fail_first
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ServiceError::Timeout);
            }
            Ok(vec![FollowupIdea {
                headline: "next".into(),
                subheadline: None,
                bullets: Vec::new(),
                visual_description: "v".into(),
                category: "exploratory".into(),
            }])
        }
    }

    struct UnusedGeneration;

    #[async_trait]
    impl GenerationService for UnusedGeneration {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GeneratedSlide, ServiceError> {
            panic!("generation service must not be called");
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_scheduler(
        followup: Arc<RecordingFollowups>,
    ) -> (Arc<ExploratoryScheduler>, SharedSession) {
        let config = AppConfig::default();
        let session = new_shared_session(&config);
        let adapter = Arc::new(GenerationAdapter::new(
            session.clone(),
            Arc::new(UnusedGeneration),
            followup,
            config.generate,
        ));
        let scheduler = Arc::new(ExploratoryScheduler::new(
            session.clone(),
            adapter,
            &SchedulerConfig {
                debounce_ms: DEBOUNCE_MS,
            },
        ));
        (scheduler, session)
    }

    fn audience_slide(headline: &str) -> Slide {
        Slide::from_content(
            &SlideContent {
                headline: headline.into(),
                subheadline: None,
                bullets: Vec::new(),
                visual_description: "v".into(),
                category: "question".into(),
                source_transcript: None,
            },
            SlideSource::Audience,
        )
    }

    fn prompt(text: &str) -> Trigger {
        Trigger::PresenterPrompt(PresenterPrompt {
            prompt: text.into(),
            current_slide: None,
        })
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    // -----------------------------------------------------------------------
    // Coalescing
    // -----------------------------------------------------------------------

    /// A burst of passive triggers inside one debounce window produces
    /// exactly one dispatch containing the union of all payloads.
    #[tokio::test]
    async fn burst_coalesces_into_one_dispatch_with_union() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.enqueue(Trigger::AudienceAnswered(audience_slide("q1")));
        scheduler.enqueue(Trigger::AudienceAnswered(audience_slide("q2")));
        scheduler.enqueue(Trigger::AudienceAnswered(audience_slide("q3")));

        // Still inside the window: nothing dispatched yet.
        sleep_ms(DEBOUNCE_MS / 4).await;
        assert_eq!(followup.calls(), 0);

        // Past the window: the single deferred dispatch fired.
        sleep_ms(DEBOUNCE_MS * 2).await;
        assert_eq!(followup.calls(), 1);
        assert_eq!(followup.request(0).audience_context, vec!["q1", "q2", "q3"]);
        assert_eq!(scheduler.pending_len(), 0);
    }

    /// Accepted-slide triggers coalesce the same way; the dispatched request
    /// summarizes them through the session ledger.
    #[tokio::test]
    async fn accepted_slide_burst_coalesces() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, session) = make_scheduler(followup.clone());

        for n in 0..3 {
            let slide = audience_slide(&format!("accepted {n}"));
            session.lock().unwrap().history.record(&slide);
            scheduler.enqueue(Trigger::SlideAccepted(slide));
        }

        sleep_ms(DEBOUNCE_MS * 2).await;

        assert_eq!(followup.calls(), 1);
        let history = followup.request(0).slide_history_context;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].headline, "accepted 0");
        assert_eq!(history[2].headline, "accepted 2");
    }

    /// A presenter prompt skips the debounce entirely.
    #[tokio::test]
    async fn presenter_prompt_dispatches_immediately() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.enqueue(prompt("explain the risks"));

        sleep_ms(50).await;
        assert_eq!(followup.calls(), 1);
        assert_eq!(
            followup.request(0).prompt.as_deref(),
            Some("explain the risks")
        );
    }

    /// With nothing pending, a dispatch request is a no-op.
    #[tokio::test]
    async fn empty_context_is_a_noop() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.request_dispatch(true);
        sleep_ms(50).await;

        assert_eq!(followup.calls(), 0);
    }

    // -----------------------------------------------------------------------
    // Rollback
    // -----------------------------------------------------------------------

    /// A failed batch is merged back and retried on the next trigger; the
    /// retry context is a superset of the failed batch.
    #[tokio::test]
    async fn failed_dispatch_rolls_back_and_retries_as_superset() {
        let followup = Arc::new(RecordingFollowups::failing_first(1));
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.enqueue(Trigger::AudienceAnswered(audience_slide("q1")));
        scheduler.enqueue(prompt("first prompt"));

        sleep_ms(50).await;
        // One (failed) call happened; the batch is pending again.
        assert_eq!(followup.calls(), 1);
        assert_eq!(scheduler.pending_len(), 2);

        scheduler.enqueue(prompt("second prompt"));
        sleep_ms(50).await;

        assert_eq!(followup.calls(), 2);
        let retry = followup.request(1);
        // The failed batch's audience question survived the rollback …
        assert_eq!(retry.audience_context, vec!["q1"]);
        // … and the freshest explicit intent wins the prompt slot.
        assert_eq!(retry.prompt.as_deref(), Some("second prompt"));
        assert_eq!(scheduler.pending_len(), 0);
    }

    // -----------------------------------------------------------------------
    // Pause / resume
    // -----------------------------------------------------------------------

    /// While paused, even a forced trigger is recorded but not dispatched;
    /// resume fires exactly one dispatch containing it.
    #[tokio::test]
    async fn paused_records_then_resume_dispatches_once() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.pause();
        assert!(scheduler.is_paused());

        scheduler.enqueue(prompt("explain the risks"));
        sleep_ms(50).await;
        assert_eq!(followup.calls(), 0);
        assert_eq!(scheduler.pending_len(), 1);

        scheduler.resume();
        sleep_ms(50).await;

        assert_eq!(followup.calls(), 1);
        assert_eq!(
            followup.request(0).prompt.as_deref(),
            Some("explain the risks")
        );
        assert!(!scheduler.is_paused());
    }

    /// Narration accumulated across a pause is folded in as a
    /// presenter-prompt-shaped entry on resume.
    #[tokio::test]
    async fn resume_folds_leftover_transcript() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, session) = make_scheduler(followup.clone());

        scheduler.pause();
        session
            .lock()
            .unwrap()
            .transcript
            .append_final("the part nobody heard");

        scheduler.resume();
        sleep_ms(50).await;

        assert_eq!(followup.calls(), 1);
        assert_eq!(
            followup.request(0).prompt.as_deref(),
            Some("the part nobody heard")
        );
        // The folded-in narration was consumed, not double-delivered.
        assert!(session.lock().unwrap().transcript.is_empty());
    }

    /// Resume with nothing pending and no leftover narration stays quiet.
    #[tokio::test]
    async fn resume_with_nothing_pending_is_quiet() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.pause();
        scheduler.resume();
        sleep_ms(50).await;

        assert_eq!(followup.calls(), 0);
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Reset discards pending context and cancels the deferred dispatch.
    #[tokio::test]
    async fn reset_discards_pending_and_cancels_timer() {
        let followup = Arc::new(RecordingFollowups::new());
        let (scheduler, _session) = make_scheduler(followup.clone());

        scheduler.enqueue(Trigger::AudienceAnswered(audience_slide("q1")));
        scheduler.reset();

        sleep_ms(DEBOUNCE_MS * 2).await;

        assert_eq!(followup.calls(), 0);
        assert_eq!(scheduler.pending_len(), 0);
        assert!(!scheduler.is_paused());
    }
}
