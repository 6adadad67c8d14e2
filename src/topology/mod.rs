//! Topologies answer a single question for the network: how long does it take to move a chunk
//!  of a given size from one NPU to another, assuming the network is otherwise idle?

pub mod basic_topology;
pub mod multi_dim_topology;

#[cfg(test)] use mockall::automock;

/// NPU id, i.e. the rank of a simulated process
pub type Rank = i32;
/// bytes
pub type ChunkSize = u64;
/// GB/s
pub type Bandwidth = f64;
/// ns
pub type Latency = f64;
/// ns
pub type EventTime = u64;

#[cfg_attr(test, automock)]
pub trait Topology: Send + Sync + 'static {
    fn npus_count(&self) -> usize;

    fn dims_count(&self) -> usize;

    /// link bandwidth for each dimension, in GB/s
    fn bandwidth_per_dim(&self) -> Vec<Bandwidth>;

    /// The time (in ns) it takes for a chunk of `size` bytes to travel from `src` to `dst`.
    ///
    /// This must be a pure function of the topology and its arguments.
    fn send(&self, src: Rank, dst: Rank, size: ChunkSize) -> EventTime;
}

/// Converts a rank to an index into a topology of `npus_count` NPUs. Ranks outside the topology
///  are an integration error, so they are fatal.
pub(crate) fn npu_index(rank: Rank, npus_count: usize) -> usize {
    assert!(rank >= 0, "negative rank {}", rank);
    let idx = rank as usize;
    assert!(idx < npus_count, "rank {} is outside of a topology with {} NPUs", rank, npus_count);
    idx
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npu_index() {
        assert_eq!(npu_index(0, 4), 0);
        assert_eq!(npu_index(3, 4), 3);
    }

    #[test]
    #[should_panic]
    fn test_npu_index_negative() {
        npu_index(-1, 4);
    }

    #[test]
    #[should_panic]
    fn test_npu_index_out_of_range() {
        npu_index(4, 4);
    }
}
