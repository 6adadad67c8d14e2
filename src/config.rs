use std::sync::Arc;
use anyhow::bail;
use tracing::info;
use crate::topology::basic_topology::{BasicTopology, TopologyKind};
use crate::topology::multi_dim_topology::MultiDimTopology;
use crate::topology::{Bandwidth, Latency, Topology};

#[derive(Clone, Debug, PartialEq)]
pub struct DimensionConfig {
    pub kind: TopologyKind,
    pub npus_count: usize,
    /// GB/s
    pub bandwidth: Bandwidth,
    /// ns per hop
    pub latency: Latency,
}

/// Network description for the congestion-unaware backend: one entry per dimension, dimension 0
///  being the innermost one (e.g. NPUs inside a node).
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub dims: Vec<DimensionConfig>,
}

impl NetworkConfig {
    /// a single bidirectional ring with 50 GB/s links and 500ns latency per hop
    pub fn default_ring(npus_count: usize) -> NetworkConfig {
        NetworkConfig {
            dims: vec![DimensionConfig {
                kind: TopologyKind::Ring,
                npus_count,
                bandwidth: 50.0,
                latency: 500.0,
            }],
        }
    }

    /// Builds a config from per-dimension lists, which is how network descriptions are usually
    ///  written down: `topology: [Ring, Switch]`, `npus_count: [4, 2]`, etc.
    pub fn from_lists(kinds: &[TopologyKind], npus_counts: &[usize], bandwidths: &[Bandwidth], latencies: &[Latency]) -> anyhow::Result<NetworkConfig> {
        let num_dims = kinds.len();
        if npus_counts.len() != num_dims || bandwidths.len() != num_dims || latencies.len() != num_dims {
            bail!("per-dimension lists differ in length: {} topologies, {} NPU counts, {} bandwidths, {} latencies",
                num_dims, npus_counts.len(), bandwidths.len(), latencies.len());
        }

        let dims = (0..num_dims)
            .map(|i| DimensionConfig {
                kind: kinds[i],
                npus_count: npus_counts[i],
                bandwidth: bandwidths[i],
                latency: latencies[i],
            })
            .collect();

        let result = NetworkConfig { dims };
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.dims.is_empty() {
            bail!("network needs at least one dimension");
        }

        for (i, dim) in self.dims.iter().enumerate() {
            if dim.npus_count < 2 {
                bail!("dimension {}: needs at least 2 NPUs, got {}", i, dim.npus_count);
            }
            if !(dim.bandwidth.is_finite() && dim.bandwidth > 0.0) {
                bail!("dimension {}: bandwidth must be positive, got {}", i, dim.bandwidth);
            }
            if !(dim.latency.is_finite() && dim.latency >= 0.0) {
                bail!("dimension {}: latency must not be negative, got {}", i, dim.latency);
            }
        }

        Ok(())
    }

    pub fn npus_count(&self) -> usize {
        self.dims.iter()
            .map(|d| d.npus_count)
            .product()
    }

    /// A single dimension becomes a [BasicTopology], anything else a [MultiDimTopology]
    pub fn build_topology(&self) -> anyhow::Result<Arc<dyn Topology>> {
        self.validate()?;

        let mut dims = self.dims.iter()
            .map(|d| BasicTopology::new(d.kind, d.npus_count, d.bandwidth, d.latency))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let topology: Arc<dyn Topology> = if dims.len() == 1 {
            Arc::new(dims.remove(0))
        }
        else {
            Arc::new(MultiDimTopology::new(dims)?)
        };

        info!("built topology from {:?}", self);
        Ok(topology)
    }
}
