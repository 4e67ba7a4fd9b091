use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmulationError {
    #[error("Failed to spawn emulation worker: {0}")]
    WorkerSpawn(String),

    #[error("Emulation state lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Emulation state is mid-transition")]
    TransitionInFlight,
}
