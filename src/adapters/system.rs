//! Host power control adapter.
//!
//! Reboot/shutdown are fire-and-forget: the command is handed to the OS
//! and the router acknowledges regardless — once the host actually goes
//! down there is nobody left to report to anyway.

use std::process::Command;

use log::{info, warn};

use crate::app::ports::SystemPort;

/// Delegates power control to `sudo reboot` / `sudo shutdown`.
pub struct OsSystem;

impl SystemPort for OsSystem {
    fn reboot(&mut self) {
        spawn_detached("reboot", &["sudo", "reboot"]);
    }

    fn shutdown(&mut self) {
        spawn_detached("shutdown", &["sudo", "shutdown", "-h", "now"]);
    }
}

fn spawn_detached(what: &str, argv: &[&str]) {
    info!("system {what}: {}", argv.join(" "));
    if let Err(e) = Command::new(argv[0]).args(&argv[1..]).spawn() {
        warn!("system {what} failed to start: {e}");
    }
}
