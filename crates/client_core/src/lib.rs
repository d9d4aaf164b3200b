use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use shared::{
    domain::{SessionId, SimulationState},
    protocol::Action,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

pub mod error;
mod ticker;
pub mod transport;
pub mod validation;
pub mod view;

pub use error::{ControllerError, Notice, NoticeKind, ValidationError};
pub use transport::{HttpSessionApi, MissingSessionApi, SessionApi};

use ticker::ElapsedTicker;
use validation::validate_action;
use view::{
    activity_entry, format_elapsed, render_results, render_state, ActivityEntry, ResultsView,
    SimulationView,
};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// View-model updates published for the presentation layer.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    SessionStarted {
        session_id: SessionId,
        created_at: DateTime<Utc>,
    },
    Clock(String),
    StateRendered(SimulationView),
    ActivityLogged(ActivityEntry),
    ResultsReady(ResultsView),
    Notice(Notice),
    SessionEnded,
}

#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    started: Instant,
}

#[derive(Default)]
struct ControllerState {
    /// Bumped on every teardown. A response is committed only if the
    /// generation it was requested under is still current.
    generation: u64,
    session: Option<ActiveSession>,
    ticker: Option<ElapsedTicker>,
    state: Option<SimulationState>,
    view: Option<SimulationView>,
    activity_log: Vec<ActivityEntry>,
    results_requested: bool,
    results: Option<ResultsView>,
}

/// Drives one simulation session: creates it, mirrors the remote state,
/// mediates user actions and surfaces the final results.
///
/// The server is authoritative. Every mutation is confirmed by a refresh and
/// the cached state is only ever replaced wholesale.
pub struct SessionController {
    api: Arc<dyn SessionApi>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

impl SessionController {
    pub fn new(api: Arc<dyn SessionApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            api,
            inner: Mutex::new(ControllerState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Ends any running session and starts a new one. If the controller is
    /// torn down or restarted while the request is pending, the new session
    /// is discarded and [`ControllerError::Superseded`] is returned.
    pub async fn start_session(&self) -> Result<SessionId, ControllerError> {
        let generation = self.end_session().await;

        let session_id = self
            .api
            .start_session()
            .await
            .map_err(|err| self.report(ControllerError::SessionStart(err)))?;

        let session = ActiveSession {
            id: session_id.clone(),
            created_at: Utc::now(),
            started: Instant::now(),
        };

        {
            let mut guard = self.inner.lock().await;
            if guard.generation != generation {
                debug!(session_id = %session_id, "session: start superseded, discarding");
                return Err(ControllerError::Superseded);
            }
            guard.session = Some(session.clone());
            let _ = self.events.send(ControllerEvent::SessionStarted {
                session_id: session_id.clone(),
                created_at: session.created_at,
            });
            guard.ticker = Some(ElapsedTicker::spawn(session.started, self.events.clone()));
        }
        info!(session_id = %session_id, "session: started");

        // A failed initial refresh is already reported; the session stays usable.
        let _ = self.refresh_in(&session_id, generation).await;

        Ok(session_id)
    }

    pub async fn refresh_state(&self) -> Result<SimulationView, ControllerError> {
        let (session_id, generation) = self.active_session().await?;
        self.refresh_in(&session_id, generation).await
    }

    pub async fn submit_action(&self, action: Action) -> Result<ActivityEntry, ControllerError> {
        if let Err(err) = validate_action(&action) {
            warn!(action = action.tag(), "session: action rejected: {err}");
            return Err(self.report(err.into()));
        }

        let (session_id, generation) = self.active_session().await?;

        let result = self
            .api
            .submit_action(&session_id, &action)
            .await
            .map_err(|reason| {
                self.report(ControllerError::ActionSubmit {
                    tag: action.tag(),
                    reason,
                })
            })?;

        let entry = {
            let mut guard = self.inner.lock().await;
            if guard.generation != generation {
                debug!(
                    session_id = %session_id,
                    action = action.tag(),
                    "session: dropping action result from an ended session"
                );
                return Err(ControllerError::Superseded);
            }
            let entry = activity_entry(&action, &result, guard.state.as_ref());
            guard.activity_log.push(entry.clone());
            let _ = self.events.send(ControllerEvent::ActivityLogged(entry.clone()));
            entry
        };
        info!(session_id = %session_id, action = action.tag(), "session: action applied");

        let _ = self.refresh_in(&session_id, generation).await;

        Ok(entry)
    }

    /// Fetches and renders the results summary. Called once by
    /// [`refresh_state`](Self::refresh_state) when the terminal phase is first
    /// observed.
    pub async fn fetch_results(&self) -> Result<ResultsView, ControllerError> {
        let (session_id, generation) = self.active_session().await?;
        self.fetch_results_in(&session_id, generation).await
    }

    /// Stops the clock and forgets the session. Safe to call repeatedly.
    /// Requests still in flight for the old session are dropped on arrival.
    pub async fn teardown(&self) {
        self.end_session().await;
    }

    pub async fn session(&self) -> Option<ActiveSession> {
        self.inner.lock().await.session.clone()
    }

    pub async fn session_id(&self) -> Option<SessionId> {
        self.inner
            .lock()
            .await
            .session
            .as_ref()
            .map(|session| session.id.clone())
    }

    pub async fn current_state(&self) -> Option<SimulationState> {
        self.inner.lock().await.state.clone()
    }

    pub async fn current_view(&self) -> Option<SimulationView> {
        self.inner.lock().await.view.clone()
    }

    pub async fn activity_log(&self) -> Vec<ActivityEntry> {
        self.inner.lock().await.activity_log.clone()
    }

    pub async fn results(&self) -> Option<ResultsView> {
        self.inner.lock().await.results.clone()
    }

    pub async fn elapsed(&self) -> Option<Duration> {
        self.inner
            .lock()
            .await
            .session
            .as_ref()
            .map(|session| session.started.elapsed())
    }

    pub async fn elapsed_label(&self) -> Option<String> {
        self.elapsed().await.map(format_elapsed)
    }

    pub async fn is_ticking(&self) -> bool {
        self.inner.lock().await.ticker.is_some()
    }

    async fn refresh_in(
        &self,
        session_id: &SessionId,
        generation: u64,
    ) -> Result<SimulationView, ControllerError> {
        let fetched = self
            .api
            .fetch_state(session_id)
            .await
            .map_err(|err| self.report(ControllerError::StateRefresh(err)))?;

        let view = render_state(&fetched);
        let terminal = fetched.phase.is_terminal();
        let first_terminal = {
            let mut guard = self.inner.lock().await;
            if guard.generation != generation {
                debug!(session_id = %session_id, "session: dropping state from an ended session");
                return Err(ControllerError::Superseded);
            }
            guard.state = Some(fetched);
            guard.view = Some(view.clone());
            let _ = self.events.send(ControllerEvent::StateRendered(view.clone()));
            if terminal && guard.ticker.take().is_some() {
                debug!(session_id = %session_id, "session: elapsed-time ticker stopped");
            }
            let first = terminal && !guard.results_requested;
            if first {
                guard.results_requested = true;
            }
            first
        };
        debug!(session_id = %session_id, phase = view.phase.as_str(), "session: state refreshed");

        if first_terminal {
            info!(session_id = %session_id, "session: reached terminal phase");
            // Reported inside; results are never fetched automatically again.
            let _ = self.fetch_results_in(session_id, generation).await;
        }

        Ok(view)
    }

    async fn fetch_results_in(
        &self,
        session_id: &SessionId,
        generation: u64,
    ) -> Result<ResultsView, ControllerError> {
        let results = self
            .api
            .fetch_results(session_id)
            .await
            .map_err(|err| self.report(ControllerError::ResultsFetch(err)))?;

        let view = render_results(&results);
        {
            let mut guard = self.inner.lock().await;
            if guard.generation != generation {
                debug!(session_id = %session_id, "session: dropping results from an ended session");
                return Err(ControllerError::Superseded);
            }
            guard.results = Some(view.clone());
            let _ = self.events.send(ControllerEvent::ResultsReady(view.clone()));
        }
        info!(
            session_id = %session_id,
            rating = view.rating.label(),
            mean = view.mean_score,
            "session: results ready"
        );

        Ok(view)
    }

    /// Resets all cached state, aborts the ticker and returns the new
    /// generation.
    async fn end_session(&self) -> u64 {
        let mut guard = self.inner.lock().await;
        let generation = guard.generation.wrapping_add(1);
        let previous = std::mem::replace(
            &mut *guard,
            ControllerState {
                generation,
                ..ControllerState::default()
            },
        );
        if previous.ticker.is_some() {
            debug!("session: elapsed-time ticker stopped");
        }
        if let Some(session) = previous.session {
            info!(session_id = %session.id, "session: torn down");
            let _ = self.events.send(ControllerEvent::SessionEnded);
        }
        generation
    }

    async fn active_session(&self) -> Result<(SessionId, u64), ControllerError> {
        let guard = self.inner.lock().await;
        let active = guard
            .session
            .as_ref()
            .map(|session| (session.id.clone(), guard.generation));
        drop(guard);
        active.ok_or_else(|| self.report(ControllerError::NoActiveSession))
    }

    fn report(&self, err: ControllerError) -> ControllerError {
        match err.kind() {
            NoticeKind::Validation | NoticeKind::NoSession => warn!("session: {err}"),
            _ => error!("session: {err}"),
        }
        let _ = self.events.send(ControllerEvent::Notice(Notice::from(&err)));
        err
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
