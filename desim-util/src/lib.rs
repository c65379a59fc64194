//! Reusable helper components for `desim` simulation benches.
//!
//! `desim-util` provides the small, domain-agnostic components almost
//! every bench ends up needing: something to keep a bench alive past
//! quiescence ([`helper_models::Heartbeat`]), and something to record what
//! a port receives for later inspection ([`helper_models::Recorder`]).

#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

pub mod helper_models;
