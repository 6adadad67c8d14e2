use rustc_hash::FxHashMap;
use tracing::trace;
use crate::network::transfer_key::{ChunkId, TransferKey};

#[derive(Default)]
struct ChunkIdCounters {
    next_send: ChunkId,
    next_recv: ChunkId,
}

/// Hands out chunk ids per [TransferKey], with separate counters for the send and the receive
///  side. Both sides start at zero and count up, so the n-th send and the n-th receive for a key
///  end up with the same chunk id - that is what pairs them up in first-in-first-out order.
///
/// NB: Counters are never discarded. Dropping them when both sides are level would be unsafe
///  while a matched transfer is still waiting for its arrival event, because the next transfer
///  would reuse its chunk id.
#[derive(Default)]
pub struct ChunkIdGenerator {
    counters: FxHashMap<TransferKey, ChunkIdCounters>,
}

impl ChunkIdGenerator {
    pub fn new() -> ChunkIdGenerator {
        Default::default()
    }

    pub fn create_send_chunk_id(&mut self, key: &TransferKey) -> ChunkId {
        let counters = self.counters.entry(*key).or_default();
        let chunk_id = counters.next_send;
        counters.next_send = chunk_id.next();

        trace!("send chunk id {} for {}", chunk_id, key);
        chunk_id
    }

    pub fn create_recv_chunk_id(&mut self, key: &TransferKey) -> ChunkId {
        let counters = self.counters.entry(*key).or_default();
        let chunk_id = counters.next_recv;
        counters.next_recv = chunk_id.next();

        trace!("recv chunk id {} for {}", chunk_id, key);
        chunk_id
    }

    /// number of distinct transfer keys seen so far
    pub fn keys_count(&self) -> usize {
        self.counters.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_send_ids_are_distinct_and_monotonic() {
        let mut generator = ChunkIdGenerator::new();
        let key = TransferKey::new(5, 0, 1, 1024);

        let ids = (0..100)
            .map(|_| generator.create_send_chunk_id(&key))
            .collect::<Vec<_>>();

        assert_eq!(ids.iter().collect::<FxHashSet<_>>().len(), 100);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids[0], ChunkId::ZERO);
    }

    #[test]
    fn test_keys_are_independent() {
        let mut generator = ChunkIdGenerator::new();
        let a = TransferKey::new(5, 0, 1, 1024);
        let b = TransferKey::new(5, 0, 1, 2048);
        let c = TransferKey::new(6, 0, 1, 1024);

        assert_eq!(generator.create_send_chunk_id(&a), ChunkId(0));
        assert_eq!(generator.create_send_chunk_id(&a), ChunkId(1));
        assert_eq!(generator.create_send_chunk_id(&b), ChunkId(0));
        assert_eq!(generator.create_send_chunk_id(&c), ChunkId(0));
        assert_eq!(generator.create_send_chunk_id(&a), ChunkId(2));
        assert_eq!(generator.keys_count(), 3);
    }

    #[test]
    fn test_send_and_recv_counters_are_independent() {
        let mut generator = ChunkIdGenerator::new();
        let key = TransferKey::new(1, 2, 3, 64);

        assert_eq!(generator.create_recv_chunk_id(&key), ChunkId(0));
        assert_eq!(generator.create_recv_chunk_id(&key), ChunkId(1));
        assert_eq!(generator.create_send_chunk_id(&key), ChunkId(0));
        assert_eq!(generator.create_recv_chunk_id(&key), ChunkId(2));
        assert_eq!(generator.create_send_chunk_id(&key), ChunkId(1));
        assert_eq!(generator.keys_count(), 1);
    }
}
