//! Session orchestration for the ShopSense client.
//!
//! This crate provides:
//! - An explicit FSM for the session lifecycle, replacing implicit state
//!   derivation from storage checks
//! - `SessionController`: the single writer that keeps the credential
//!   store, the request authorizer, and the exposed `Session` in lockstep
//! - `guard`: render-policy decisions for public and protected views

mod controller;
mod error;
pub mod guard;
mod machine;
mod session;

pub use controller::{SessionCallback, SessionController, DEFAULT_BOOTSTRAP_TIMEOUT};
pub use error::{SessionError, SessionResult};
pub use machine::session_machine;
pub use machine::{SessionMachine, SessionMachineInput, SessionMachineState, SessionStatus};
pub use session::Session;
