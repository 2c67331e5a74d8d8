//! UDP transport adapter — reactor-driven datagram bridge.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! multi-task scheduling and `async-io-mini` for reactor-driven timers
//! (no busy-spinning).  Two concurrent futures:
//!
//! 1. **Read** — polls the non-blocking socket every few ms via reactor
//!    timer, strips the transport marker, runs the wake-up session, and
//!    forwards operating-phase tokens to the command bus.
//! 2. **Write** — truly async via `lane.recv().await` (wakes instantly
//!    when the dispatch loop or sensor poller queues a status event).
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────────┐
//!  │  UDP I/O thread                                           │
//!  │  ┌─────────────────────────────────────────────────────┐  │
//!  │  │  block_on (drives reactor + futures)                │  │
//!  │  │  ┌─────────────────────────────────────────────────┐│  │
//!  │  │  │  edge_executor::LocalExecutor                   ││  │
//!  │  │  │  ┌──────────┐        ┌────────────────┐         ││  │
//!  │  │  │  │ Read     │        │ Write (async)  │         ││  │
//!  │  │  │  │ 5ms ⏱    │        │ wake-on-send   │         ││  │
//!  │  │  │  └──────────┘        └────────────────┘         ││  │
//!  │  │  └─────────────────────────────────────────────────┘│  │
//!  │  └─────────────────────────────────────────────────────┘  │
//!  └───────────────────────────────────────────────────────────┘
//! ```
//!
//! The peer is learned from the most recent inbound datagram and status
//! goes back to that host on the configured outbound port.  Until the
//! session has seen its wake-up `alive`, outbound status is suppressed.

use core::cell::RefCell;
use core::time::Duration;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::app::events::StatusEvent;
use crate::config::SystemConfig;
use crate::error::{Error, TransportError};
use crate::runtime::{ShutdownFlag, TransportHandle};
use crate::transport::channels::{CommandBus, StatusLane};
use crate::transport::session::{self, Session, Verdict};

const READ_BUF_SIZE: usize = 256;

/// Reactor-timer cadence for the read poll.
const READ_IDLE_POLL: Duration = Duration::from_millis(5);

/// Backoff after a socket error (transient by taxonomy — log and go on).
const READ_ERROR_BACKOFF: Duration = Duration::from_secs(1);

// ── Shared adapter state ─────────────────────────────────────

struct UdpState {
    socket: UdpSocket,
    session: Session,
    peer: Option<IpAddr>,
    port_out: u16,
}

type SharedState = Rc<RefCell<UdpState>>;

// ── Spawn ────────────────────────────────────────────────────

/// Bind the inbound socket and start the I/O thread.  Bind failure is a
/// startup error and surfaces to the caller; everything after that is
/// retried in-loop.
pub fn spawn(
    config: &SystemConfig,
    bus: CommandBus,
    lane: StatusLane,
    shutdown: ShutdownFlag,
) -> crate::error::Result<TransportHandle> {
    let bind = (config.udp_bind_addr.as_str(), config.udp_port_in);
    let socket = UdpSocket::bind(bind).map_err(|e| {
        error!(
            "UDP bind {}:{} failed: {e}",
            config.udp_bind_addr, config.udp_port_in
        );
        Error::Transport(TransportError::BindFailed)
    })?;
    socket
        .set_nonblocking(true)
        .map_err(|_| Error::Init("UDP non-blocking mode"))?;

    info!(
        "UDP listening on {}:{}, status to peer port {}",
        config.udp_bind_addr, config.udp_port_in, config.udp_port_out
    );

    let port_out = config.udp_port_out;
    let join = std::thread::Builder::new()
        .name("udp-io".into())
        .spawn(move || run_io_loop(socket, port_out, bus, lane, shutdown))
        .map_err(|_| Error::Init("UDP thread spawn"))?;

    Ok(TransportHandle {
        name: "udp-io",
        join,
        disconnect: None,
    })
}

// ── Async I/O loop ───────────────────────────────────────────

fn run_io_loop(
    socket: UdpSocket,
    port_out: u16,
    bus: CommandBus,
    lane: StatusLane,
    shutdown: ShutdownFlag,
) {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    let state: SharedState = Rc::new(RefCell::new(UdpState {
        socket,
        session: Session::new(),
        peer: None,
        port_out,
    }));

    executor.spawn(read_loop(state.clone(), bus)).detach();
    executor.spawn(write_loop(state.clone(), lane)).detach();

    info!("UDP I/O task started (awaiting wake-up)");

    // block_on drives the reactor while the executor drives both tasks;
    // the run-until future completes when the shutdown flag is raised.
    futures_lite::future::block_on(executor.run(shutdown.wait()));

    info!("UDP I/O task stopped");
}

/// Read task — polls the socket on a reactor timer.
async fn read_loop(state: SharedState, bus: CommandBus) {
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        let received = state.borrow().socket.recv_from(&mut buf);
        match received {
            Ok((len, addr)) => handle_datagram(&state, &bus, &buf[..len], addr),
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                async_io_mini::Timer::after(READ_IDLE_POLL).await;
            }
            Err(e) => {
                warn!("UDP receive error: {e}");
                async_io_mini::Timer::after(READ_ERROR_BACKOFF).await;
            }
        }
    }
}

/// Write task — wakes when a status event lands on this adapter's lane.
async fn write_loop(state: SharedState, lane: StatusLane) {
    loop {
        let event = lane.recv().await;
        let mut st = state.borrow_mut();
        if !st.session.is_operating() {
            debug!("UDP: dropping {event} before wake-up");
            continue;
        }
        send_status(&mut st, event);
    }
}

// ── Datagram handling ────────────────────────────────────────

fn handle_datagram(state: &SharedState, bus: &CommandBus, payload: &[u8], addr: SocketAddr) {
    let Ok(raw) = core::str::from_utf8(payload) else {
        warn!("UDP: non-UTF-8 datagram from {addr}, dropped");
        return;
    };
    let token = session::strip_marker(raw);

    let mut st = state.borrow_mut();
    match st.session.accept(token) {
        Verdict::Forward => {
            st.peer = Some(addr.ip());
            debug!("UDP rx {token:?} from {addr}");
            if let Err(e) = bus.submit("udp", token) {
                warn!("UDP: command {token:?} dropped: {e}");
            }
        }
        Verdict::WakeAck => {
            st.peer = Some(addr.ip());
            info!("UDP session woken by {addr}");
            send_status(&mut st, StatusEvent::Ok);
        }
        // Pre-wake tokens are dropped without side effects — not even the
        // peer address is learned from them.
        Verdict::Ignored => {
            debug!("UDP: pre-wake token {token:?} ignored");
        }
    }
}

fn send_status(st: &mut UdpState, event: StatusEvent) {
    let Some(peer) = st.peer else {
        debug!("UDP: no peer learned yet, dropping {event}");
        return;
    };
    let dest = SocketAddr::new(peer, st.port_out);
    let framed = session::frame_status(event.token());
    if let Err(e) = st.socket.send_to(framed.as_bytes(), dest) {
        warn!("UDP send of {event} to {dest} failed: {e}");
    }
}
