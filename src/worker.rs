//! Background worker: the engine on a dedicated thread.
//!
//! All engine state lives on one worker thread and is mutated only by
//! requests received in arrival order; there is no shared mutable memory
//! and no locking. Callers hold a [`WorkerHandle`], send requests without
//! blocking, and read [`Event`]s off the receiver returned by [`spawn`].
//!
//! Every request is assigned a [`RequestId`] that is echoed on each event
//! it produces, so interleaved requests (several zone analyses in flight)
//! correlate safely. A request cannot be cancelled once sent; it runs to
//! completion and no internal timeouts apply.

use crate::config::EngineConfig;
use crate::engine::{Engine, ZoneReport};
use crate::error::{FiregridError, Result};
use crate::geometry::ZonePolygon;
use crate::records::{CoverageSummary, StationRecord};
use serde_json::Value;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// Correlation token attached to each request and echoed on its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
enum Command {
    BuildHydrantIndex(Vec<Value>),
    SetStations(Vec<StationRecord>),
    PrecomputeAddresses(Vec<Value>),
    AnalyzeZone(ZonePolygon),
}

struct Envelope {
    id: RequestId,
    command: Command,
}

/// A notification from the worker, tagged with its originating request.
#[derive(Debug)]
pub struct Event {
    pub id: RequestId,
    pub kind: EventKind,
}

#[derive(Debug)]
pub enum EventKind {
    HydrantIndexBuilt {
        count: usize,
        elapsed_ms: f64,
    },
    StationsSet {
        count: usize,
    },
    /// Emitted at chunk boundaries during the precompute pass.
    Progress {
        current: usize,
        total: usize,
    },
    AddressesPrecomputed {
        count: usize,
        elapsed_ms: f64,
        summary: CoverageSummary,
    },
    ZoneAnalyzed(Box<ZoneReport>),
    /// Human-readable failure report. The worker never panics the caller;
    /// retry policy belongs to the caller.
    Error(String),
}

/// Caller-side handle to a worker thread.
///
/// Requests are fire-and-forget: each method returns the [`RequestId`] to
/// match against incoming events. Dropping the handle shuts the worker
/// down after it drains requests already queued.
pub struct WorkerHandle {
    tx: Option<Sender<Envelope>>,
    thread: Option<JoinHandle<()>>,
}

/// Spawn a worker thread owning a fresh [`Engine`].
///
/// Returns the request handle and the event receiver. Events for one
/// request arrive in order; events for different requests never interleave
/// within a request because the worker executes requests one at a time.
pub fn spawn(config: EngineConfig) -> (WorkerHandle, Receiver<Event>) {
    let (tx, rx) = mpsc::channel::<Envelope>();
    let (event_tx, event_rx) = mpsc::channel::<Event>();

    let thread = thread::spawn(move || {
        let mut engine = Engine::new(config);
        while let Ok(envelope) = rx.recv() {
            handle_request(&mut engine, envelope, &event_tx);
        }
        log::debug!("Coverage worker shutting down");
    });

    (
        WorkerHandle {
            tx: Some(tx),
            thread: Some(thread),
        },
        event_rx,
    )
}

fn handle_request(engine: &mut Engine, envelope: Envelope, events: &Sender<Event>) {
    let Envelope { id, command } = envelope;

    let emit = |kind: EventKind| {
        // A caller that dropped its receiver no longer wants events.
        let _ = events.send(Event { id, kind });
    };

    match command {
        Command::BuildHydrantIndex(records) => match engine.build_hydrant_index(&records) {
            Ok(ack) => emit(EventKind::HydrantIndexBuilt {
                count: ack.count,
                elapsed_ms: ack.elapsed_ms,
            }),
            Err(e) => emit(EventKind::Error(e.to_string())),
        },
        Command::SetStations(records) => {
            let ack = engine.set_stations(records);
            emit(EventKind::StationsSet { count: ack.count });
        }
        Command::PrecomputeAddresses(records) => {
            let progress_events = events.clone();
            let result = engine.precompute_addresses(&records, |current, total| {
                let _ = progress_events.send(Event {
                    id,
                    kind: EventKind::Progress { current, total },
                });
            });
            match result {
                Ok(ack) => emit(EventKind::AddressesPrecomputed {
                    count: ack.count,
                    elapsed_ms: ack.elapsed_ms,
                    summary: ack.summary,
                }),
                Err(e) => emit(EventKind::Error(e.to_string())),
            }
        }
        Command::AnalyzeZone(zone) => {
            let report = engine.analyze_zone(&zone);
            emit(EventKind::ZoneAnalyzed(Box::new(report)));
        }
    }
}

impl WorkerHandle {
    /// Request a hydrant index rebuild from raw records.
    pub fn build_hydrant_index(&self, records: Vec<Value>) -> Result<RequestId> {
        self.send(Command::BuildHydrantIndex(records))
    }

    /// Request a station index rebuild.
    pub fn set_stations(&self, stations: Vec<StationRecord>) -> Result<RequestId> {
        self.send(Command::SetStations(stations))
    }

    /// Request the address distance precompute pass. Progress events are
    /// emitted under the returned request id.
    pub fn precompute_addresses(&self, records: Vec<Value>) -> Result<RequestId> {
        self.send(Command::PrecomputeAddresses(records))
    }

    /// Request analysis of one zone polygon.
    pub fn analyze_zone(&self, zone: ZonePolygon) -> Result<RequestId> {
        self.send(Command::AnalyzeZone(zone))
    }

    /// Shut the worker down, waiting for queued requests to finish.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn send(&self, command: Command) -> Result<RequestId> {
        let id = RequestId::new();
        let tx = self.tx.as_ref().ok_or(FiregridError::EngineClosed)?;
        tx.send(Envelope { id, command })
            .map_err(|_| FiregridError::EngineClosed)?;
        Ok(id)
    }

    fn close(&mut self) {
        self.tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.close();
    }
}
