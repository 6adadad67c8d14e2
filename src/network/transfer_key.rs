use std::fmt::{Display, Formatter};
use crate::topology::{ChunkSize, Rank};

pub type Tag = i32;

/// Identifies a *class* of transfers. Several transfers with identical keys may be in flight
///  at the same time - they are told apart by their [ChunkId].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TransferKey {
    pub tag: Tag,
    pub src: Rank,
    pub dst: Rank,
    pub size: ChunkSize,
}

impl Display for TransferKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}->{} tag {}, {} bytes]", self.src, self.dst, self.tag, self.size)
    }
}

impl TransferKey {
    pub fn new(tag: Tag, src: Rank, dst: Rank, size: ChunkSize) -> TransferKey {
        TransferKey { tag, src, dst, size }
    }
}

/// Position of a transfer among all transfers with the same [TransferKey], counted separately
///  for each side.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct ChunkId(pub(crate) u64);

impl Display for ChunkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl ChunkId {
    pub const ZERO: ChunkId = ChunkId(0);

    pub fn next(self) -> ChunkId {
        ChunkId(
            self.0.checked_add(1)
                .expect("chunk id overflow")
        )
    }
}
