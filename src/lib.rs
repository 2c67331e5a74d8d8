//! Prop controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection.  All Raspberry Pi-specific code is guarded by the `rpi`
//! feature within each module; everything else builds and runs on the
//! host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod runtime;
pub mod transport;
