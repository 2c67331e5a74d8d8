//! Transport adapters and the channel plumbing between them and the core.
//!
//! The core's whole contract with a transport is two operations: a blocking
//! command receive and a fire-and-forget status send.  Both are realised as
//! bounded channels in [`channels`]; [`udp`] and [`mqtt`] are the two wire
//! adapters, and [`session`] holds the UDP framing and wake-up handshake
//! policy.

pub mod channels;
pub mod mqtt;
pub mod session;
pub mod udp;
