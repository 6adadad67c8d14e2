//! A congestion-unaware network backend for discrete-event simulation of distributed workloads.
//!
//! The question this crate answers is: for a point-to-point transfer between two simulated
//!  ranks, at which simulated time does the receiver observe completion, and which callbacks
//!  fire at that point?
//!
//! ## Model
//!
//! * Sends and receives are asynchronous and non-blocking. They may be issued in either order,
//!   and are paired up FIFO per (tag, src, dst, size) through chunk ids
//! * There is no handshake: a send computes its delay from the topology and schedules the
//!   chunk's arrival right away, regardless of whether a matching receive exists yet
//! * The delay is a pure function of the topology's per-dimension latency / bandwidth and the
//!   chunk size. Concurrent transfers do not influence each other (no link contention)
//! * Delivery is guaranteed - there is no notion of loss, retransmission or flow control
//!
//! ## Timeline of a single transfer
//!
//! ```ascii
//!  t0          sim_send: chunk id, tracker entry (or match), schedule arrival at t0+D
//!  t0 <= t1    sim_recv: chunk id, find entry -> register recv handler
//!  t0+D        arrival:  send handlers, then recv handlers fire; entry is removed
//! ```
//!
//! If the receive is issued only after `t0+D`, the send handlers fire at `t0+D` and the
//!  receive handlers fire as soon as `sim_recv` is called.
//!
//! Handlers are passed the network, which is how a workload issues its next send or receive
//!  once a transfer has completed.
//!
//! ## Collaborators
//!
//! The topology and the event scheduler are traits ([topology::Topology],
//!  [scheduler::EventScheduler]). The crate ships analytical topologies and a FIFO-stable event
//!  queue, but any implementation can be plugged in.
//!
//! The whole thing is single threaded by design: all work happens synchronously inside
//!  `sim_send` / `sim_recv` or while dispatching an event, so there is no locking.

pub mod config;
pub mod network;
pub mod scheduler;
pub mod topology;
