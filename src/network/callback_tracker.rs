use std::collections::hash_map::Entry;
use std::fmt::{Debug, Formatter};
use rustc_hash::FxHashMap;
use tracing::trace;
use crate::network::transfer_key::{ChunkId, TransferKey};
use crate::network::Completion;

/// Called when one side of a transfer completes. `N` is whatever the handler needs to act on,
///  typically the network itself so that the handler can issue the next send or receive.
pub type CompletionHandler<N> = Box<dyn FnOnce(&Completion, &mut N)>;

/// Pairs the callbacks of a send with those of its matching receive.
///
/// Whichever side is issued first creates the entry, the other side finds it. The entry stays
///  in the tracker until the chunk has arrived *and* the receive was issued.
pub struct TrackerEntry<N> {
    key: TransferKey,
    chunk_id: ChunkId,
    send_callbacks: Vec<CompletionHandler<N>>,
    recv_callbacks: Vec<CompletionHandler<N>>,
    transmission_finished: bool,
}

impl<N> Debug for TrackerEntry<N> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerEntry")
            .field("key", &self.key)
            .field("chunk_id", &self.chunk_id)
            .field("send_callbacks", &self.send_callbacks.len())
            .field("recv_callbacks", &self.recv_callbacks.len())
            .field("transmission_finished", &self.transmission_finished)
            .finish()
    }
}

impl<N> TrackerEntry<N> {
    fn new(key: TransferKey, chunk_id: ChunkId) -> TrackerEntry<N> {
        TrackerEntry {
            key,
            chunk_id,
            send_callbacks: Vec::new(),
            recv_callbacks: Vec::new(),
            transmission_finished: false,
        }
    }

    pub fn key(&self) -> &TransferKey {
        &self.key
    }

    pub fn chunk_id(&self) -> ChunkId {
        self.chunk_id
    }

    pub fn register_send_callback(&mut self, handler: CompletionHandler<N>) {
        self.send_callbacks.push(handler);
    }

    pub fn register_recv_callback(&mut self, handler: CompletionHandler<N>) {
        self.recv_callbacks.push(handler);
    }

    pub fn both_callbacks_registered(&self) -> bool {
        !self.send_callbacks.is_empty() && !self.recv_callbacks.is_empty()
    }

    /// true if the chunk arrived before a receive was issued for it
    pub fn is_transmission_finished(&self) -> bool {
        self.transmission_finished
    }

    pub fn set_transmission_finished(&mut self) {
        self.transmission_finished = true;
    }

    /// removes the send callbacks in registration order
    pub fn take_send_callbacks(&mut self) -> Vec<CompletionHandler<N>> {
        std::mem::take(&mut self.send_callbacks)
    }

    /// removes the receive callbacks in registration order
    pub fn take_recv_callbacks(&mut self) -> Vec<CompletionHandler<N>> {
        std::mem::take(&mut self.recv_callbacks)
    }
}

/// Registry of transfers for which at least one side is still waiting for the other.
///
/// Entries are keyed by transfer key *and* chunk id. Since chunk ids are counted separately
///  for sends and receives, this amounts to first-in-first-out matching per transfer key.
pub struct CallbackTracker<N> {
    entries: FxHashMap<(TransferKey, ChunkId), TrackerEntry<N>>,
}

impl<N> Default for CallbackTracker<N> {
    fn default() -> Self {
        CallbackTracker {
            entries: FxHashMap::default(),
        }
    }
}

impl<N> CallbackTracker<N> {
    pub fn new() -> CallbackTracker<N> {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search_entry(&mut self, key: &TransferKey, chunk_id: ChunkId) -> Option<&mut TrackerEntry<N>> {
        self.entries.get_mut(&(*key, chunk_id))
    }

    /// Callers must check with [CallbackTracker::search_entry] first: creating an entry that
    ///  exists already is a bug.
    pub fn create_new_entry(&mut self, key: TransferKey, chunk_id: ChunkId) -> &mut TrackerEntry<N> {
        match self.entries.entry((key, chunk_id)) {
            Entry::Occupied(_) => panic!("tracker entry for {} {} exists already", key, chunk_id),
            Entry::Vacant(e) => {
                trace!("new tracker entry for {} {}", key, chunk_id);
                e.insert(TrackerEntry::new(key, chunk_id))
            }
        }
    }

    pub fn pop_entry(&mut self, key: &TransferKey, chunk_id: ChunkId) -> Option<TrackerEntry<N>> {
        self.entries.remove(&(*key, chunk_id))
    }
}
