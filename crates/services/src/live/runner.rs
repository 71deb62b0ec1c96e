use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use course_core::live::{LiveSession, LiveSnapshot, LiveStage};
use course_core::model::{LiveQuiz, OptionId};
use course_core::session::AnswerOutcome;

use crate::error::LiveSessionError;

const TICK: Duration = Duration::from_secs(1);

/// Drives a `LiveSession` in real time.
///
/// The runner owns at most one timer task: the "get ready" pause or the
/// question countdown. Any transition that leaves the state a timer was armed
/// for aborts it and bumps the epoch, and a firing whose epoch no longer
/// matches is discarded. Dropping the runner aborts the timer.
pub struct LiveSessionRunner {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<RunnerState>,
    snapshots: watch::Sender<LiveSnapshot>,
    runtime: Handle,
    get_ready: Duration,
}

struct RunnerState {
    live: LiveSession,
    epoch: u64,
    timer: Option<AbortHandle>,
}

#[derive(Debug, Clone, Copy)]
enum Firing {
    StartQuestion,
    Tick,
}

impl RunnerState {
    fn cancel_timer(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl LiveSessionRunner {
    /// Open a live quiz in the lobby. No timer runs until `launch`.
    ///
    /// # Errors
    ///
    /// Returns `LiveSessionError::NoRuntime` outside a Tokio runtime, or a
    /// precondition error for a locked, empty or untimed quiz.
    pub fn new(quiz: LiveQuiz, get_ready: Duration) -> Result<Self, LiveSessionError> {
        let runtime = Handle::try_current().map_err(|_| LiveSessionError::NoRuntime)?;
        let live = LiveSession::new(quiz)?;
        let (snapshots, _) = watch::channel(live.snapshot());
        tracing::info!(week = %live.week_id(), title = live.title(), "live session opened");
        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(RunnerState {
                    live,
                    epoch: 0,
                    timer: None,
                }),
                snapshots,
                runtime,
                get_ready,
            }),
        })
    }

    /// Receive every published snapshot, starting with the current one.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LiveSnapshot> {
        self.inner.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> LiveSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Leave the lobby; the first question opens after the "get ready" pause.
    ///
    /// # Errors
    ///
    /// Returns a precondition error outside the lobby.
    pub fn launch(&self) -> Result<LiveStage, LiveSessionError> {
        let mut state = self.inner.lock()?;
        let stage = state.live.launch()?;
        Inner::arm(&self.inner, &mut state, Firing::StartQuestion);
        self.inner.publish(&state);
        Ok(stage)
    }

    /// Submit the local answer. An accepted answer stops the countdown.
    ///
    /// # Errors
    ///
    /// Returns a precondition error unless a question is open or its results showing.
    pub fn answer(&self, option: &OptionId) -> Result<AnswerOutcome, LiveSessionError> {
        let mut state = self.inner.lock()?;
        let outcome = state.live.answer(option)?;
        if outcome.accepted {
            state.cancel_timer();
            tracing::debug!(correct = outcome.record.is_correct, "live answer accepted");
        }
        self.inner.publish(&state);
        Ok(outcome)
    }

    /// Presenter reveals the answer after voting closed.
    ///
    /// # Errors
    ///
    /// Returns a precondition error unless voting is closed.
    pub fn reveal(&self) -> Result<LiveStage, LiveSessionError> {
        let mut state = self.inner.lock()?;
        let stage = state.live.reveal()?;
        state.cancel_timer();
        self.inner.publish(&state);
        Ok(stage)
    }

    /// Move on from the results screen.
    ///
    /// # Errors
    ///
    /// Returns a precondition error unless results are showing.
    pub fn next_slide(&self) -> Result<LiveStage, LiveSessionError> {
        let mut state = self.inner.lock()?;
        let stage = state.live.next_slide()?;
        state.cancel_timer();
        match stage {
            LiveStage::GetReady => Inner::arm(&self.inner, &mut state, Firing::StartQuestion),
            LiveStage::Summary => {
                if let Some(result) = state.live.session().result() {
                    tracing::info!(
                        week = %state.live.week_id(),
                        score = result.score,
                        total = result.total,
                        percent = result.percent,
                        "live session finished"
                    );
                }
            }
            _ => {}
        }
        self.inner.publish(&state);
        Ok(stage)
    }
}

impl Drop for LiveSessionRunner {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.cancel_timer();
        }
    }
}

impl Inner {
    fn lock(&self) -> Result<MutexGuard<'_, RunnerState>, LiveSessionError> {
        self.state
            .lock()
            .map_err(|e| LiveSessionError::Poisoned(e.to_string()))
    }

    fn publish(&self, state: &RunnerState) {
        self.snapshots.send_replace(state.live.snapshot());
    }

    /// Replace any running timer with a new one for `firing`.
    fn arm(this: &Arc<Self>, state: &mut RunnerState, firing: Firing) {
        state.cancel_timer();
        let epoch = state.epoch;
        let weak = Arc::downgrade(this);
        let handle = match firing {
            Firing::StartQuestion => {
                let delay = this.get_ready;
                this.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Inner::fire(&weak, epoch, Firing::StartQuestion);
                })
            }
            Firing::Tick => this.runtime.spawn(async move {
                loop {
                    tokio::time::sleep(TICK).await;
                    if !Inner::fire(&weak, epoch, Firing::Tick) {
                        break;
                    }
                }
            }),
        };
        state.timer = Some(handle.abort_handle());
    }

    /// Apply a timer firing. Returns whether the timer should keep running.
    fn fire(weak: &Weak<Self>, epoch: u64, firing: Firing) -> bool {
        let Some(this) = weak.upgrade() else {
            return false;
        };
        let Ok(mut state) = this.state.lock() else {
            return false;
        };
        if state.epoch != epoch {
            tracing::debug!(epoch, current = state.epoch, "stale live timer ignored");
            return false;
        }

        let keep_running = match firing {
            Firing::StartQuestion => {
                state.timer = None;
                match state.live.start_question() {
                    Ok(_) => {
                        Inner::arm(&this, &mut state, Firing::Tick);
                        tracing::debug!(
                            index = state.live.session().current_index(),
                            secs = state.live.remaining_secs(),
                            "live question opened"
                        );
                    }
                    Err(err) => tracing::warn!(%err, "live question could not open"),
                }
                false
            }
            Firing::Tick => match state.live.tick() {
                Ok(LiveStage::Question { .. }) => true,
                Ok(stage) => {
                    state.timer = None;
                    tracing::debug!(%stage, "live countdown ended");
                    false
                }
                Err(err) => {
                    state.timer = None;
                    tracing::warn!(%err, "live tick rejected");
                    false
                }
            },
        };
        this.publish(&state);
        keep_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{AnswerOption, Question, QuestionId, WeekId};

    fn quiz() -> LiveQuiz {
        let questions = (0..2)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}"),
                    vec![
                        AnswerOption::new("red", "Right", true),
                        AnswerOption::new("blue", "Wrong", false),
                    ],
                    "",
                )
                .unwrap()
                .with_time_limit(10)
                .unwrap()
            })
            .collect();
        LiveQuiz {
            week_id: WeekId::new(2),
            title: "Warm-up".into(),
            questions,
            is_locked: false,
        }
    }

    fn epoch(runner: &LiveSessionRunner) -> u64 {
        runner.inner.state.lock().unwrap().epoch
    }

    #[tokio::test(start_paused = true)]
    async fn stale_firings_leave_later_states_alone() {
        let runner = LiveSessionRunner::new(quiz(), Duration::from_secs(3)).unwrap();
        let mut rx = runner.subscribe();
        let weak = Arc::downgrade(&runner.inner);

        runner.launch().unwrap();
        let get_ready_epoch = epoch(&runner);
        rx.wait_for(|s| matches!(s.stage, LiveStage::Question { .. }))
            .await
            .unwrap();
        let countdown_epoch = epoch(&runner);
        assert_ne!(countdown_epoch, get_ready_epoch);

        // A tick from the first countdown lands after the answer.
        runner.answer(&OptionId::new("red")).unwrap();
        let answered = runner.snapshot();
        assert!(!Inner::fire(&weak, countdown_epoch, Firing::Tick));
        assert_eq!(runner.snapshot(), answered);

        // The first "get ready" firing lands during the second pause.
        assert_eq!(runner.next_slide().unwrap(), LiveStage::GetReady);
        assert!(!Inner::fire(&weak, get_ready_epoch, Firing::StartQuestion));
        let waiting = runner.snapshot();
        assert_eq!(waiting.stage, LiveStage::GetReady);
        assert_eq!(waiting.question_index, 1);
        assert_eq!(waiting.score, 1);

        // An old tick cannot shorten the second countdown.
        rx.wait_for(|s| matches!(s.stage, LiveStage::Question { .. }))
            .await
            .unwrap();
        assert!(!Inner::fire(&weak, countdown_epoch, Firing::Tick));
        let open = runner.snapshot();
        assert_eq!(open.stage, LiveStage::Question { remaining_secs: 10 });
        assert_eq!(open.question_index, 1);
        assert_eq!(open.score, 1);
    }
}
