use super::error::EmulationError;
use crate::bridge::{NativeBridge, Surface};
use statum::{machine, state};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

const WORKER_NAME: &str = "NativeEmulation";

#[state]
#[derive(Debug, Clone)]
pub enum EmulationState {
    Stopped,
    Running,
    Paused,
}

/// Observable state of an [`EmulationSession`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmulationStatus {
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for EmulationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmulationStatus::Stopped => "STOPPED",
            EmulationStatus::Running => "RUNNING",
            EmulationStatus::Paused => "PAUSED",
        };
        f.write_str(name)
    }
}

#[machine]
pub struct Emulation<S: EmulationState> {
    bridge: Arc<dyn NativeBridge>,
    game_path: String,

    // Thread blocked in the core's run call
    worker: Option<JoinHandle<()>>,
    workers_spawned: usize,
}

impl<S: EmulationState> Emulation<S> {
    fn spawn_worker(
        &mut self,
        program_index: i32,
        fresh_start: bool,
    ) -> Result<(), EmulationError> {
        let bridge = Arc::clone(&self.bridge);
        let path = self.game_path.clone();
        let handle = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || bridge.run(&path, program_index, fresh_start))
            .map_err(|e| EmulationError::WorkerSpawn(e.to_string()))?;

        self.worker = Some(handle);
        self.workers_spawned += 1;
        debug!(
            "Spawned emulation worker #{} for program {}",
            self.workers_spawned, program_index
        );
        Ok(())
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            debug!("Joining emulation worker");
            if handle.join().is_err() {
                error!("Emulation worker panicked");
            }
        }
    }
}

impl Emulation<Stopped> {
    pub fn create(bridge: Arc<dyn NativeBridge>, game_path: String) -> Self {
        Self::new(bridge, game_path, None, 0)
    }

    fn start(mut self, program_index: i32) -> Result<Emulation<Running>, (Self, EmulationError)> {
        self.join_worker();
        if let Err(e) = self.spawn_worker(program_index, true) {
            return Err((self, e));
        }
        info!("Emulation started");
        Ok(self.transition())
    }

    // The core survived a host restart, treat it as paused
    fn adopt_running_core(self) -> Emulation<Paused> {
        info!("Core is already running, resuming instead of starting");
        self.transition()
    }
}

impl Emulation<Running> {
    fn pause(self) -> Emulation<Paused> {
        self.bridge.pause_emulation();
        info!("Emulation paused");
        self.transition()
    }

    // Surface went away, the core keeps its thread
    fn demote(self) -> Emulation<Paused> {
        info!("Surface lost while running, emulation logically paused");
        self.transition()
    }

    fn stop(self) -> Emulation<Stopped> {
        self.bridge.stop_emulation();
        info!("Emulation stopped");
        self.transition()
    }
}

impl Emulation<Paused> {
    fn resume(self) -> Emulation<Running> {
        self.bridge.unpause_emulation();
        info!("Emulation resumed");
        self.transition()
    }

    fn stop(self) -> Emulation<Stopped> {
        self.bridge.stop_emulation();
        info!("Emulation stopped");
        self.transition()
    }
}

enum Slot {
    Stopped(Emulation<Stopped>),
    Running(Emulation<Running>),
    Paused(Emulation<Paused>),
}

impl Slot {
    fn status(&self) -> EmulationStatus {
        match self {
            Slot::Stopped(_) => EmulationStatus::Stopped,
            Slot::Running(_) => EmulationStatus::Running,
            Slot::Paused(_) => EmulationStatus::Paused,
        }
    }

    fn workers_spawned(&self) -> usize {
        match self {
            Slot::Stopped(m) => m.workers_spawned,
            Slot::Running(m) => m.workers_spawned,
            Slot::Paused(m) => m.workers_spawned,
        }
    }

    fn join_worker(&mut self) {
        match self {
            Slot::Stopped(m) => m.join_worker(),
            Slot::Running(m) => m.join_worker(),
            Slot::Paused(m) => m.join_worker(),
        }
    }
}

type StartPredicate = Box<dyn Fn() -> bool + Send + Sync>;

struct SessionInner {
    // None only while a transition is in flight
    slot: Option<Slot>,
    surface: Option<Surface>,
    run_intent: Option<i32>,
    bridge: Arc<dyn NativeBridge>,
    can_start: StartPredicate,
}

impl SessionInner {
    fn take_slot(&mut self) -> Result<Slot, EmulationError> {
        self.slot.take().ok_or(EmulationError::TransitionInFlight)
    }

    fn status(&self) -> Result<EmulationStatus, EmulationError> {
        self.slot
            .as_ref()
            .map(Slot::status)
            .ok_or(EmulationError::TransitionInFlight)
    }

    fn run_with_valid_surface(&mut self, program_index: i32) -> Result<(), EmulationError> {
        self.bridge.surface_changed(self.surface.as_ref());

        if !(self.can_start)() {
            info!("Emulation cannot start yet, waiting");
            return Ok(());
        }

        let (slot, result) = match self.take_slot()? {
            Slot::Stopped(machine) => match machine.start(program_index) {
                Ok(running) => (Slot::Running(running), Ok(())),
                Err((machine, e)) => {
                    error!("Failed to start emulation: {}", e);
                    (Slot::Stopped(machine), Err(e))
                }
            },
            Slot::Paused(machine) => (Slot::Running(machine.resume()), Ok(())),
            Slot::Running(machine) => {
                warn!("Run called while already running");
                (Slot::Running(machine), Ok(()))
            }
        };
        self.slot = Some(slot);
        result
    }
}

/// Emulation lifecycle tied to the rendering surface.
///
/// Every entry point takes the same lock, so at most one transition runs at a time.
/// Redundant calls log a warning and leave the state alone.
pub struct EmulationSession {
    inner: Mutex<SessionInner>,
}

impl EmulationSession {
    pub fn new(bridge: Arc<dyn NativeBridge>, game_path: impl Into<String>) -> Self {
        let machine = Emulation::create(Arc::clone(&bridge), game_path.into());
        Self {
            inner: Mutex::new(SessionInner {
                slot: Some(Slot::Stopped(machine)),
                surface: None,
                run_intent: None,
                bridge,
                can_start: Box::new(|| true),
            }),
        }
    }

    /// Predicate consulted before every start or resume
    pub fn set_can_start(
        &self,
        predicate: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Result<(), EmulationError> {
        self.lock()?.can_start = Box::new(predicate);
        Ok(())
    }

    pub fn status(&self) -> Result<EmulationStatus, EmulationError> {
        self.lock()?.status()
    }

    pub fn workers_spawned(&self) -> Result<usize, EmulationError> {
        let inner = self.lock()?;
        inner
            .slot
            .as_ref()
            .map(Slot::workers_spawned)
            .ok_or(EmulationError::TransitionInFlight)
    }

    pub fn has_surface(&self) -> Result<bool, EmulationError> {
        Ok(self.lock()?.surface.is_some())
    }

    /// Program index of a run waiting for a surface
    pub fn pending_run(&self) -> Result<Option<i32>, EmulationError> {
        Ok(self.lock()?.run_intent)
    }

    /// Starts or resumes. Without a surface the run is recorded and happens on attach.
    pub fn run(&self, is_recreated: bool, program_index: i32) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;

        if is_recreated {
            if inner.bridge.is_running() {
                let slot = match inner.take_slot()? {
                    Slot::Stopped(machine) => Slot::Paused(machine.adopt_running_core()),
                    other => other,
                };
                inner.slot = Some(slot);
            }
        } else {
            debug!("Starting emulation");
        }

        inner.run_intent = Some(program_index);
        if inner.surface.is_none() {
            info!("No surface attached, deferring run");
            return Ok(());
        }
        inner.run_with_valid_surface(program_index)
    }

    pub fn pause(&self) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;
        inner.run_intent = None;

        let slot = match inner.take_slot()? {
            Slot::Running(machine) => Slot::Paused(machine.pause()),
            Slot::Paused(machine) => {
                warn!("Pause called while already paused");
                Slot::Paused(machine)
            }
            Slot::Stopped(machine) => {
                warn!("Pause called while stopped");
                Slot::Stopped(machine)
            }
        };
        inner.slot = Some(slot);
        Ok(())
    }

    /// Signals teardown and returns without waiting for the worker
    pub fn stop(&self) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;
        inner.run_intent = None;

        let slot = match inner.take_slot()? {
            Slot::Running(machine) => Slot::Stopped(machine.stop()),
            Slot::Paused(machine) => Slot::Stopped(machine.stop()),
            Slot::Stopped(machine) => {
                warn!("Stop called while already stopped");
                Slot::Stopped(machine)
            }
        };
        inner.slot = Some(slot);
        Ok(())
    }

    /// Joins the previous worker, then runs `program_index` on a new one
    pub fn change_program(&self, program_index: i32) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;
        info!("Changing to program {}", program_index);

        let mut slot = inner.take_slot()?;
        let result = match &mut slot {
            Slot::Running(machine) => {
                machine.join_worker();
                machine.spawn_worker(program_index, false)
            }
            Slot::Paused(machine) => {
                machine.join_worker();
                machine.spawn_worker(program_index, false)
            }
            Slot::Stopped(_) => {
                warn!("Program change requested while stopped");
                Ok(())
            }
        };
        inner.slot = Some(slot);
        result
    }

    pub fn attach_surface(&self, surface: Surface) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;
        debug!("Surface {} attached", surface.id);
        inner.surface = Some(surface);

        match inner.run_intent {
            Some(program_index) => inner.run_with_valid_surface(program_index),
            None => {
                inner.bridge.surface_changed(inner.surface.as_ref());
                Ok(())
            }
        }
    }

    pub fn detach_surface(&self) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;
        if inner.surface.take().is_none() {
            warn!("Detach called without a surface");
            return Ok(());
        }
        inner.bridge.surface_changed(None);

        let slot = match inner.take_slot()? {
            Slot::Running(machine) => Slot::Paused(machine.demote()),
            other => {
                warn!("Surface detached while {}", other.status());
                other
            }
        };
        inner.slot = Some(slot);
        Ok(())
    }

    /// Re-sends the current surface to the core
    pub fn update_surface(&self) -> Result<(), EmulationError> {
        let inner = self.lock()?;
        if inner.surface.is_some() {
            inner.bridge.surface_changed(inner.surface.as_ref());
        }
        Ok(())
    }

    /// Blocks until the current worker returned from the core
    pub fn join_worker(&self) -> Result<(), EmulationError> {
        let mut inner = self.lock()?;
        let mut slot = inner.take_slot()?;
        slot.join_worker();
        inner.slot = Some(slot);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionInner>, EmulationError> {
        self.inner
            .lock()
            .map_err(|e| EmulationError::LockPoisoned(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::loopback::{BridgeCall, LoopbackBridge};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn surface() -> Surface {
        Surface {
            id: 7,
            width: 1920,
            height: 1080,
        }
    }

    fn session() -> (Arc<LoopbackBridge>, EmulationSession) {
        let bridge = Arc::new(LoopbackBridge::new());
        let session = EmulationSession::new(bridge.clone(), "/games/title.nsp");
        (bridge, session)
    }

    fn run_calls(bridge: &LoopbackBridge) -> usize {
        bridge.count_calls(|c| matches!(c, BridgeCall::Run { .. }))
    }

    #[test]
    fn run_without_surface_is_deferred() {
        let (bridge, session) = session();
        session.run(false, 0).expect("run");
        assert_eq!(session.status().expect("status"), EmulationStatus::Stopped);
        assert_eq!(session.pending_run().expect("intent"), Some(0));

        session.attach_surface(surface()).expect("attach");
        session.join_worker().expect("join");
        assert_eq!(session.status().expect("status"), EmulationStatus::Running);
        assert_eq!(run_calls(&bridge), 1);
    }

    #[test]
    fn attach_without_intent_does_not_start() {
        let (_bridge, session) = session();
        session.attach_surface(surface()).expect("attach");
        assert_eq!(session.status().expect("status"), EmulationStatus::Stopped);
        assert_eq!(session.workers_spawned().expect("count"), 0);
    }

    #[test]
    fn detach_demotes_and_reattach_resumes() {
        let (bridge, session) = session();
        session.attach_surface(surface()).expect("attach");
        session.run(false, 0).expect("run");

        session.detach_surface().expect("detach");
        assert_eq!(session.status().expect("status"), EmulationStatus::Paused);
        assert_eq!(bridge.count_calls(|c| *c == BridgeCall::Pause), 0);

        session.attach_surface(surface()).expect("attach");
        assert_eq!(session.status().expect("status"), EmulationStatus::Running);
        assert_eq!(session.workers_spawned().expect("count"), 1);
    }

    #[test]
    fn pause_clears_intent() {
        let (_bridge, session) = session();
        session.run(false, 0).expect("run");
        session.pause().expect("pause");
        assert_eq!(session.pending_run().expect("intent"), None);

        session.attach_surface(surface()).expect("attach");
        assert_eq!(session.status().expect("status"), EmulationStatus::Stopped);
    }

    #[test]
    fn blocked_start_waits_for_predicate() {
        let (_bridge, session) = session();
        let allowed = Arc::new(AtomicBool::new(false));
        let flag = allowed.clone();
        session
            .set_can_start(move || flag.load(Ordering::SeqCst))
            .expect("predicate");

        session.attach_surface(surface()).expect("attach");
        session.run(false, 0).expect("run");
        assert_eq!(session.status().expect("status"), EmulationStatus::Stopped);

        allowed.store(true, Ordering::SeqCst);
        session.run(false, 0).expect("run");
        assert_eq!(session.status().expect("status"), EmulationStatus::Running);
    }

    #[test]
    fn recreated_host_resumes_running_core() {
        let (bridge, session) = session();
        bridge.run("/games/title.nsp", 0, true);

        session.attach_surface(surface()).expect("attach");
        session.run(true, 0).expect("run");

        assert_eq!(session.status().expect("status"), EmulationStatus::Running);
        assert_eq!(session.workers_spawned().expect("count"), 0);
        assert_eq!(bridge.count_calls(|c| *c == BridgeCall::Unpause), 1);
    }

    #[test]
    fn change_program_spawns_without_fresh_start() {
        let (bridge, session) = session();
        session.attach_surface(surface()).expect("attach");
        session.run(false, 0).expect("run");
        session.change_program(2).expect("change");
        session.join_worker().expect("join");

        assert_eq!(session.workers_spawned().expect("count"), 2);
        assert!(bridge.calls().contains(&BridgeCall::Run {
            path: "/games/title.nsp".to_string(),
            program_index: 2,
            fresh_start: false,
        }));
    }

    #[test]
    fn redundant_calls_keep_state() {
        let (bridge, session) = session();
        session.stop().expect("stop");
        session.pause().expect("pause");
        session.detach_surface().expect("detach");
        assert_eq!(session.status().expect("status"), EmulationStatus::Stopped);
        assert_eq!(bridge.count_calls(|c| *c == BridgeCall::Stop), 0);
    }
}
