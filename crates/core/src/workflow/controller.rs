//! Drives a run: trigger, stream, choreography and reset.
//!
//! Each run is identified by a generation number kept in [`RunState`]. Every
//! task spawned for a run captures the generation it belongs to and compares
//! it with the current one, under the same lock, before touching the state.
//! `reset` bumps the generation and aborts the tasks while holding that lock,
//! so nothing scheduled before a reset can mutate the state after it.

use super::choreography::CHOREOGRAPHY;
use super::run::{EventOutcome, RunSnapshot, RunState};
use crate::api::{AnalysisApi, ApiError};
use crate::session::SessionState;
use ad_protocol::event_models::{EventKind, ProgressEvent};
use ad_protocol::ipc::{Event, FinishReason};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_stream::StreamExt;

struct Inner {
    run: RunState,
    tasks: Vec<JoinHandle<()>>,
}

struct Shared {
    api: Arc<dyn AnalysisApi>,
    session: Arc<SessionState>,
    events_tx: UnboundedSender<Event>,
    inner: Mutex<Inner>,
}

/// Owns the current run.
///
/// Dropping the controller aborts the stream and all pending timers.
pub struct RunController {
    shared: Arc<Shared>,
}

impl RunController {
    pub fn new(
        api: Arc<dyn AnalysisApi>,
        session: Arc<SessionState>,
        events_tx: UnboundedSender<Event>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                api,
                session,
                events_tx,
                inner: Mutex::new(Inner {
                    run: RunState::new(),
                    tasks: Vec::new(),
                }),
            }),
        }
    }

    /// Start a new run.
    ///
    /// Returns `false` without doing anything if a run is already in
    /// progress. Otherwise the agents are reset, both session flags are set,
    /// and the trigger request is issued on a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut inner = self.shared.lock();
        let Some(generation) = inner.run.begin() else {
            tracing::debug!("start ignored, a run is already in progress");
            return false;
        };
        inner.tasks.retain(|task| !task.is_finished());
        tracing::info!(generation, "run started");

        if let Err(error) = self.shared.session.set_visualization_started(true) {
            tracing::warn!(%error, "failed to persist visualizationStarted");
        }
        if let Err(error) = self.shared.session.set_has_workflow_run(true) {
            tracing::warn!(%error, "failed to persist hasWorkflowRun");
        }

        self.shared.emit(Event::RunStarted { generation });
        let handle = tokio::spawn(Arc::clone(&self.shared).drive(generation));
        inner.tasks.push(handle);
        true
    }

    /// Cancel the current run and restore every agent to pending.
    ///
    /// Pending timers and the stream connection are aborted before this
    /// returns. Safe to call at any time, including when idle.
    pub fn reset(&self) {
        let generation = {
            let mut inner = self.shared.lock();
            let generation = inner.run.reset();
            for task in inner.tasks.drain(..) {
                task.abort();
            }
            generation
        };
        tracing::info!(generation, "run reset");
        self.shared.emit(Event::RunReset { generation });
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.shared.lock().run.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().run.is_running()
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        for task in inner.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: Event) {
        if self.events_tx.send(event).is_err() {
            tracing::debug!("event receiver dropped");
        }
    }

    /// Trigger the backend and consume its progress stream.
    async fn drive(self: Arc<Self>, generation: u64) {
        let trigger = match self.api.trigger().await {
            Ok(trigger) => trigger,
            Err(error) => {
                self.fail(generation, &error);
                return;
            }
        };

        {
            let mut inner = self.lock();
            if inner.run.generation() != generation {
                return;
            }
            inner.run.set_analysis_id(trigger.analysis_id.clone());
            tracing::info!(generation, analysis_id = %trigger.analysis_id, "analysis triggered");
            self.emit(Event::RunTriggered {
                generation,
                analysis_id: trigger.analysis_id,
                stream_url: trigger.stream_url.clone(),
            });
        }

        let mut stream = match self.api.open_stream(&trigger.stream_url).await {
            Ok(stream) => stream,
            Err(error) => {
                self.fail(generation, &error);
                return;
            }
        };

        while let Some(item) = stream.next().await {
            match item {
                Ok(event) => {
                    if !self.handle_event(generation, event) {
                        tracing::debug!(generation, "closing progress stream");
                        return;
                    }
                }
                Err(error) => {
                    self.fail(generation, &error);
                    return;
                }
            }
        }

        self.finish(generation, FinishReason::StreamClosed);
    }

    /// Apply one stream event. Returns whether the stream should stay open.
    fn handle_event(self: &Arc<Self>, generation: u64, event: ProgressEvent) -> bool {
        let mut inner = self.lock();
        if inner.run.generation() != generation || !inner.run.is_running() {
            return false;
        }

        if event.kind == EventKind::Error {
            tracing::warn!(generation, message = %event.message, "backend reported an error");
        }
        self.emit(Event::ProgressReceived {
            generation,
            event: event.clone(),
        });

        let reason = match inner.run.record(event) {
            EventOutcome::Logged => return true,
            EventOutcome::StartChoreography => {
                tracing::info!(generation, "orchestration started, scheduling choreography");
                let handle = tokio::spawn(Arc::clone(self).choreograph(generation));
                inner.tasks.push(handle);
                return true;
            }
            EventOutcome::Completed => FinishReason::Completed,
            EventOutcome::StreamClosed => FinishReason::StreamClosed,
        };

        inner.run.finish();
        tracing::info!(generation, ?reason, "run finished");
        self.emit(Event::RunFinished { generation, reason });
        false
    }

    /// Walk the fixed timeline, measured from now.
    ///
    /// The timeline keeps going after the run finishes; only a newer
    /// generation stops it.
    async fn choreograph(self: Arc<Self>, generation: u64) {
        let origin = Instant::now();

        for step in &CHOREOGRAPHY {
            tokio::time::sleep_until(origin + step.delay).await;

            let mut inner = self.lock();
            if inner.run.generation() != generation {
                return;
            }
            for &(agent, status) in step.transitions {
                if inner.run.advance(agent, status) {
                    tracing::info!(generation, %agent, %status, "agent status changed");
                    self.emit(Event::AgentStatusChanged {
                        generation,
                        agent,
                        status,
                    });
                }
            }
        }
    }

    fn finish(&self, generation: u64, reason: FinishReason) {
        let mut inner = self.lock();
        if inner.run.generation() == generation && inner.run.finish() {
            tracing::info!(generation, ?reason, "run finished");
            self.emit(Event::RunFinished { generation, reason });
        }
    }

    fn fail(&self, generation: u64, error: &ApiError) {
        let mut inner = self.lock();
        if inner.run.generation() == generation && inner.run.fail(error.to_string()) {
            tracing::error!(generation, %error, "run failed");
            self.emit(Event::RunFailed {
                generation,
                error: error.to_string(),
            });
        }
    }
}
