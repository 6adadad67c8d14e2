//! The congestion-unaware network: matching of sends and receives, and their completion on the
//!  simulated timeline.

pub mod callback_tracker;
pub mod chunk_id_generator;
pub mod network_api;
pub mod transfer_key;

use crate::network::transfer_key::{ChunkId, Tag, TransferKey};
use crate::scheduler::SimTime;
use crate::topology::Rank;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Side {
    Send,
    Recv,
}

/// Passed to a completion handler when it fires
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Completion {
    pub key: TransferKey,
    pub chunk_id: ChunkId,
    pub side: Side,
    pub time: SimTime,
}

/// Describes a send or receive on behalf of the workload layer. The network does not interpret
///  it, it is only traced.
#[derive(Clone, Debug, Default)]
pub struct SimRequest {
    pub src_rank: Rank,
    pub dst_rank: Rank,
    pub tag: Tag,
    pub vnet: i32,
    pub layer_num: i32,
}

/// The event that is scheduled when a chunk is sent, and dispatched when it arrives
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ChunkArrival {
    pub key: TransferKey,
    pub chunk_id: ChunkId,
}
