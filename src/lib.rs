//! Input and lifecycle layer between a host application and a native emulation core
//!
//! The host feeds touches, pad events and surface changes in, the crate talks to the
//! core through [`bridge::NativeBridge`].

pub mod bridge;
pub mod context;
pub mod controller;
pub mod emulation;
pub mod mapping;
pub mod overlay;
pub mod param_package;
pub mod persistence;

pub use context::{HostRequests, InputContext};
pub use param_package::ParamPackage;
