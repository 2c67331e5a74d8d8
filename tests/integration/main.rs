//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no real
//! hardware required.

mod mock_hw;
// Uses the host-only simulation pins.
#[cfg(not(feature = "rpi"))]
mod pipeline_tests;
mod router_flow_tests;
