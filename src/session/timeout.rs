// src/session/timeout.rs
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use uuid::Uuid;

use super::activity::{ActivityBus, ActivityEvent};
use crate::app_log;

pub type SessionCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimeoutConfig {
    pub idle_timeout: Duration,
    pub warning_duration: Duration,
}

impl Default for SessionTimeoutConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            warning_duration: Duration::from_secs(2 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// Logged out, or the warning window ran out
    Inactive,
    Idle,
    Warned,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub phase: SessionPhase,
    pub logged_in: bool,
    pub warned_at: Option<DateTime<Utc>>,
    pub warning_remaining_ms: Option<u64>,
}

struct ArmedTimer {
    generation: u64,
    deadline: Instant,
    handle: JoinHandle<()>,
}

impl ArmedTimer {
    fn cancel(self) {
        self.handle.abort();
    }
}

struct TimeoutState {
    phase: SessionPhase,
    logged_in: bool,
    generation: u64,
    idle_timer: Option<ArmedTimer>,
    logout_timer: Option<ArmedTimer>,
    listener: Option<JoinHandle<()>>,
    warned_at: Option<DateTime<Utc>>,
}

impl TimeoutState {
    fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn disarm_idle(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            timer.cancel();
        }
    }

    fn disarm_logout(&mut self) {
        if let Some(timer) = self.logout_timer.take() {
            timer.cancel();
        }
    }

    fn disarm_all(&mut self) {
        self.disarm_idle();
        self.disarm_logout();
    }
}

/// Warns after a period without user activity and expires the session if the
/// warning is not acknowledged in time.
///
/// Once warned, activity no longer counts; only [`SessionTimeout::extend_session`]
/// dismisses the warning. Logging out tears down both timers and the activity
/// listener, and so does dropping the last handle.
#[derive(Clone)]
pub struct SessionTimeout {
    bus: ActivityBus,
    inner: Arc<TimeoutInner>,
}

/// Shared by every handle. Spawned tasks only hold a `Weak` to it.
struct TimeoutInner {
    id: Uuid,
    config: SessionTimeoutConfig,
    on_warning: SessionCallback,
    on_timeout: SessionCallback,
    state: Mutex<TimeoutState>,
}

impl Drop for TimeoutInner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        state.disarm_all();
        if let Some(listener) = state.listener.take() {
            listener.abort();
        }
        app_log!(debug, session = %self.id, "Session timeout dropped");
    }
}

impl SessionTimeout {
    pub fn new<W, T>(config: SessionTimeoutConfig, bus: ActivityBus, on_warning: W, on_timeout: T) -> Self
    where
        W: Fn() + Send + Sync + 'static,
        T: Fn() + Send + Sync + 'static,
    {
        Self {
            bus,
            inner: Arc::new(TimeoutInner {
                id: Uuid::new_v4(),
                config,
                on_warning: Arc::new(on_warning),
                on_timeout: Arc::new(on_timeout),
                state: Mutex::new(TimeoutState {
                    phase: SessionPhase::Inactive,
                    logged_in: false,
                    generation: 0,
                    idle_timer: None,
                    logout_timer: None,
                    listener: None,
                    warned_at: None,
                }),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> SessionTimeoutConfig {
        self.inner.config
    }

    /// Start or stop watching. Setting the current value again does nothing.
    pub async fn set_logged_in(&self, logged_in: bool) {
        let inner = &self.inner;
        let mut state = inner.state.lock().await;
        if state.logged_in == logged_in {
            return;
        }
        state.logged_in = logged_in;

        if logged_in {
            state.phase = SessionPhase::Idle;
            state.warned_at = None;
            state.listener = Some(spawn_listener(&self.bus, Arc::downgrade(inner), inner.id));
            inner.arm_idle(&mut state);
            app_log!(info, session = %inner.id, "Session timeout armed for {:?}", inner.config.idle_timeout);
        } else {
            state.disarm_all();
            if let Some(listener) = state.listener.take() {
                listener.abort();
            }
            state.phase = SessionPhase::Inactive;
            state.warned_at = None;
            app_log!(info, session = %inner.id, "Session timeout stopped");
        }
    }

    /// Restart the idle window. Ignored unless the session is idle.
    pub async fn record_activity(&self, event: ActivityEvent) {
        self.inner.record_activity(event).await;
    }

    /// Dismiss the warning and start a fresh idle window
    pub async fn extend_session(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock().await;
        if state.phase == SessionPhase::Inactive {
            app_log!(debug, session = %inner.id, "Extend requested on an inactive session");
            return;
        }
        state.disarm_logout();
        state.phase = SessionPhase::Idle;
        state.warned_at = None;
        inner.arm_idle(&mut state);
        app_log!(info, session = %inner.id, "Session extended");
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.state.lock().await.phase
    }

    /// Time left before the forced logout, while warned
    pub async fn warning_remaining(&self) -> Option<Duration> {
        let state = self.inner.state.lock().await;
        state
            .logout_timer
            .as_ref()
            .map(|t| t.deadline.saturating_duration_since(Instant::now()))
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state.lock().await;
        SessionSnapshot {
            id: self.inner.id,
            phase: state.phase,
            logged_in: state.logged_in,
            warned_at: state.warned_at,
            warning_remaining_ms: state
                .logout_timer
                .as_ref()
                .map(|t| t.deadline.saturating_duration_since(Instant::now()).as_millis() as u64),
        }
    }
}

impl TimeoutInner {
    async fn record_activity(self: &Arc<Self>, event: ActivityEvent) {
        let mut state = self.state.lock().await;
        if state.phase != SessionPhase::Idle {
            app_log!(trace, session = %self.id, "Ignoring {} while {:?}", event.dom_name(), state.phase);
            return;
        }
        self.arm_idle(&mut state);
    }

    fn arm_idle(self: &Arc<Self>, state: &mut TimeoutState) {
        state.disarm_idle();
        let generation = state.next_generation();
        let deadline = Instant::now() + self.config.idle_timeout;
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                inner.idle_elapsed(generation).await;
            }
        });
        state.idle_timer = Some(ArmedTimer {
            generation,
            deadline,
            handle,
        });
    }

    fn arm_logout(self: &Arc<Self>, state: &mut TimeoutState) {
        state.disarm_logout();
        let generation = state.next_generation();
        let deadline = Instant::now() + self.config.warning_duration;
        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                inner.logout_elapsed(generation).await;
            }
        });
        state.logout_timer = Some(ArmedTimer {
            generation,
            deadline,
            handle,
        });
    }

    async fn idle_elapsed(self: &Arc<Self>, generation: u64) {
        {
            let mut state = self.state.lock().await;
            let current = state.idle_timer.as_ref().map(|t| t.generation);
            if current != Some(generation) || state.phase != SessionPhase::Idle {
                return;
            }
            // Our own handle; dropping it detaches instead of aborting
            state.idle_timer = None;
            state.phase = SessionPhase::Warned;
            state.warned_at = Some(Utc::now());
            self.arm_logout(&mut state);
            app_log!(info, session = %self.id, "Idle for {:?}, warning before logout", self.config.idle_timeout);
        }
        (self.on_warning)();
    }

    async fn logout_elapsed(&self, generation: u64) {
        {
            let mut state = self.state.lock().await;
            let current = state.logout_timer.as_ref().map(|t| t.generation);
            if current != Some(generation) || state.phase != SessionPhase::Warned {
                return;
            }
            state.logout_timer = None;
            state.phase = SessionPhase::Inactive;
            state.warned_at = None;
            app_log!(info, session = %self.id, "Warning not acknowledged, session expired");
        }
        (self.on_timeout)();
    }
}

/// The listener owns only its receiver; it stops when the bus closes or the
/// coordinator is gone.
fn spawn_listener(bus: &ActivityBus, inner: Weak<TimeoutInner>, id: Uuid) -> JoinHandle<()> {
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // Missed events still mean the user was active
                    app_log!(debug, session = %id, "Activity listener lagged by {}", skipped);
                    ActivityEvent::PointerMove
                }
                Err(RecvError::Closed) => break,
            };
            let Some(inner) = inner.upgrade() else {
                break;
            };
            inner.record_activity(event).await;
        }
    })
}
