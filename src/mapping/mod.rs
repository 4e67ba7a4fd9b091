//! Capturing input for rebind dialogs
//!
//! The [`session::MappingSession`] arms the core and polls candidates, a
//! [`capture::BindingCapture`] decides which candidate becomes the binding.
//!
//! ```text
//! raw pad event ──► NativeBridge ──► MappingSession::poll ──► BindingCapture::offer
//! ```

pub mod capture;
pub mod error;
pub mod session;

pub use capture::{BindingCapture, BindingTarget, CaptureOutcome, StickDirection};
pub use error::MappingError;
pub use session::{CaptureState, MappingSession};
