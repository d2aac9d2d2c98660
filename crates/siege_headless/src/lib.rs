//! Headless siege runner for scripted play and CI verification.
//!
//! This crate drives a [`siege_core`] simulation from JSON commands on
//! stdin, with responses on stdout. Two modes are provided:
//!
//! - **Stepped** ([`stepped`]): time advances only on `tick` and `elapse`
//!   requests, so sessions replay to identical state hashes
//! - **Real-time** ([`engine`], [`realtime`]): a tokio task ticks at a fixed
//!   frame rate and credits resources on its own wall-clock timer
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Requests from the controller (place, train, deploy, ...)
//! - **stdout**: One response per request (JSON)
//! - **stderr**: Logs (human-readable)
//!
//! See [`protocol`] module for the full request/response format.
//!
//! # Example
//!
//! ```bash
//! # Deterministic session
//! echo '{"cmd":"tick","count":60}' | cargo run -p siege_headless -- step
//!
//! # Real-time session at 30 Hz with custom tunables
//! cargo run -p siege_headless -- --config siege.ron run --tick-hz 30
//! ```

pub mod engine;
pub mod error;
pub mod protocol;
pub mod realtime;
pub mod stepped;

pub use engine::EngineHandle;
pub use error::HeadlessError;
pub use protocol::{Request, Response};
pub use stepped::SteppedRunner;
