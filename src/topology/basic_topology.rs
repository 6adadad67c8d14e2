use std::fmt::{Display, Formatter};
use std::str::FromStr;
use anyhow::{anyhow, bail};
use crate::topology::{npu_index, Bandwidth, ChunkSize, EventTime, Latency, Rank, Topology};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TopologyKind {
    /// bidirectional ring: a chunk travels whichever way round is shorter
    Ring,
    UnidirectionalRing,
    FullyConnected,
    /// all NPUs are connected to a single switch, i.e. every transfer takes two hops
    Switch,
}

impl Display for TopologyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TopologyKind::Ring => "Ring",
            TopologyKind::UnidirectionalRing => "UnidirectionalRing",
            TopologyKind::FullyConnected => "FullyConnected",
            TopologyKind::Switch => "Switch",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TopologyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Ring" => Ok(TopologyKind::Ring),
            "UnidirectionalRing" => Ok(TopologyKind::UnidirectionalRing),
            "FullyConnected" => Ok(TopologyKind::FullyConnected),
            "Switch" => Ok(TopologyKind::Switch),
            other => Err(anyhow!("unsupported topology kind {:?}", other)),
        }
    }
}

/// A single-dimension analytical topology. The time to send a chunk is the sum of the link
///  latency for each hop, plus the time to serialize the chunk once at the link bandwidth:
///
/// ```ascii
/// delay = hops * latency + size / bandwidth
/// ```
#[derive(Clone, Debug)]
pub struct BasicTopology {
    kind: TopologyKind,
    npus_count: usize,
    bandwidth: Bandwidth,
    /// bandwidth converted to bytes per ns
    bandwidth_bpns: f64,
    latency: Latency,
}

impl BasicTopology {
    pub fn new(kind: TopologyKind, npus_count: usize, bandwidth: Bandwidth, latency: Latency) -> anyhow::Result<BasicTopology> {
        if npus_count < 2 {
            bail!("a {} topology needs at least 2 NPUs, got {}", kind, npus_count);
        }
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            bail!("bandwidth must be positive, got {}", bandwidth);
        }
        if !(latency.is_finite() && latency >= 0.0) {
            bail!("latency must not be negative, got {}", latency);
        }

        Ok(BasicTopology {
            kind,
            npus_count,
            bandwidth,
            bandwidth_bpns: Self::bandwidth_gbps_to_bpns(bandwidth),
            latency,
        })
    }

    /// GB/s to B/ns, where 1 GB = 2^30 bytes
    pub fn bandwidth_gbps_to_bpns(bandwidth: Bandwidth) -> f64 {
        bandwidth * (1u64 << 30) as f64 / 1e9
    }

    pub fn kind(&self) -> TopologyKind {
        self.kind
    }

    pub fn bandwidth(&self) -> Bandwidth {
        self.bandwidth
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// NB: `src` and `dst` are indexes into this dimension, which are not necessarily ranks
    pub fn hops_count(&self, src: usize, dst: usize) -> usize {
        if src == dst {
            return 0;
        }

        match self.kind {
            TopologyKind::Ring => {
                let distance = src.abs_diff(dst);
                distance.min(self.npus_count - distance)
            }
            TopologyKind::UnidirectionalRing => (dst + self.npus_count - src) % self.npus_count,
            TopologyKind::FullyConnected => 1,
            TopologyKind::Switch => 2,
        }
    }

    /// Delay in (fractional) ns between two indexes in this dimension
    pub fn delay_between(&self, src: usize, dst: usize, size: ChunkSize) -> f64 {
        assert!(src < self.npus_count && dst < self.npus_count);

        if src == dst {
            return 0.0;
        }

        let hops = self.hops_count(src, dst);
        hops as f64 * self.latency + size as f64 / self.bandwidth_bpns
    }
}

impl Topology for BasicTopology {
    fn npus_count(&self) -> usize {
        self.npus_count
    }

    fn dims_count(&self) -> usize {
        1
    }

    fn bandwidth_per_dim(&self) -> Vec<Bandwidth> {
        vec![self.bandwidth]
    }

    fn send(&self, src: Rank, dst: Rank, size: ChunkSize) -> EventTime {
        let src = npu_index(src, self.npus_count);
        let dst = npu_index(dst, self.npus_count);
        self.delay_between(src, dst, size) as EventTime
    }
}
