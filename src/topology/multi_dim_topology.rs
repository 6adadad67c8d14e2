use anyhow::bail;
use tracing::debug;
use crate::topology::basic_topology::BasicTopology;
use crate::topology::{npu_index, Bandwidth, ChunkSize, EventTime, Rank, Topology};

/// A hierarchical topology built from a stack of [BasicTopology] dimensions, e.g. a ring of
///  NPUs inside a node, with nodes connected through a switch.
///
/// A rank is translated into one coordinate per dimension, with dimension 0 as the least
///  significant digit:
///
/// ```ascii
/// dims [4, 2]:   rank 5 -> (1, 1)     rank 2 -> (2, 0)
/// ```
///
/// A chunk is routed one dimension after another, and the delay is the sum of the per-dimension
///  delays for every dimension in which the coordinates of `src` and `dst` differ.
pub struct MultiDimTopology {
    dims: Vec<BasicTopology>,
    npus_count: usize,
}

impl MultiDimTopology {
    pub fn new(dims: Vec<BasicTopology>) -> anyhow::Result<MultiDimTopology> {
        if dims.is_empty() {
            bail!("a multi-dimensional topology needs at least one dimension");
        }

        let mut npus_count: usize = 1;
        for dim in &dims {
            npus_count = match npus_count.checked_mul(dim.npus_count()) {
                Some(n) => n,
                None => bail!("total number of NPUs overflows"),
            };
        }

        debug!("multi-dimensional topology with {} dimensions and {} NPUs", dims.len(), npus_count);
        Ok(MultiDimTopology {
            dims,
            npus_count,
        })
    }

    pub fn dims(&self) -> &[BasicTopology] {
        &self.dims
    }

    pub fn translate_address(&self, rank: Rank) -> Vec<usize> {
        let mut remainder = npu_index(rank, self.npus_count);

        self.dims.iter()
            .map(|dim| {
                let coordinate = remainder % dim.npus_count();
                remainder /= dim.npus_count();
                coordinate
            })
            .collect()
    }
}

impl Topology for MultiDimTopology {
    fn npus_count(&self) -> usize {
        self.npus_count
    }

    fn dims_count(&self) -> usize {
        self.dims.len()
    }

    fn bandwidth_per_dim(&self) -> Vec<Bandwidth> {
        self.dims.iter()
            .map(|d| d.bandwidth())
            .collect()
    }

    fn send(&self, src: Rank, dst: Rank, size: ChunkSize) -> EventTime {
        let src_address = self.translate_address(src);
        let dst_address = self.translate_address(dst);

        let delay: f64 = self.dims.iter()
            .zip(src_address.iter().zip(dst_address.iter()))
            .filter(|(_, (s, d))| s != d)
            .map(|(dim, (&s, &d))| dim.delay_between(s, d, size))
            .sum();
        delay as EventTime
    }
}
