//! Emulation lifecycle
//!
//! ```text
//! STOPPED ──run──► RUNNING ◄──run / pause──► PAUSED
//!    ▲                │                         │
//!    └──────stop──────┴───────────stop──────────┘
//! ```
//!
//! A run without a surface waits for [`session::EmulationSession::attach_surface`].
//! Losing the surface while running only pauses logically, the worker thread stays.

pub mod error;
pub mod session;

pub use error::EmulationError;
pub use session::{EmulationSession, EmulationStatus};
