use std::sync::Arc;
use tracing::{debug, info, trace};
use crate::network::callback_tracker::{CallbackTracker, CompletionHandler};
use crate::network::chunk_id_generator::ChunkIdGenerator;
use crate::network::transfer_key::{Tag, TransferKey};
use crate::network::{ChunkArrival, Completion, Side, SimRequest};
use crate::scheduler::event_queue::EventQueue;
use crate::scheduler::{EventScheduler, SimTime, TimeSpec};
use crate::topology::{npu_index, Bandwidth, ChunkSize, Rank, Topology};

/// State shared by all ranks of a simulation: the topology, chunk ids and tracker entries of
///  transfers in flight, and the scheduler that holds their arrival events.
///
/// Each rank talks to the network through a [NetworkApi] obtained from [Self::api]. Completion
///  handlers get the network passed in, so a handler can issue the next send or receive itself.
pub struct CongestionUnawareNetwork<S = EventQueue<ChunkArrival>> {
    topology: Arc<dyn Topology>,
    // cached when the topology is assigned, never re-queried
    dims_count: usize,
    bandwidth_per_dim: Vec<Bandwidth>,
    chunk_id_generator: ChunkIdGenerator,
    callback_tracker: CallbackTracker<CongestionUnawareNetwork<S>>,
    scheduler: S,
}

impl CongestionUnawareNetwork<EventQueue<ChunkArrival>> {
    pub fn with_event_queue(topology: Arc<dyn Topology>) -> Self {
        Self::new(topology, EventQueue::new())
    }
}

impl<S: EventScheduler<ChunkArrival>> CongestionUnawareNetwork<S> {
    pub fn new(topology: Arc<dyn Topology>, scheduler: S) -> Self {
        let dims_count = topology.dims_count();
        let bandwidth_per_dim = topology.bandwidth_per_dim();
        info!("congestion-unaware network with {} NPUs, {} dimension(s), bandwidth per dimension {:?} GB/s", topology.npus_count(), dims_count, bandwidth_per_dim);

        CongestionUnawareNetwork {
            topology,
            dims_count,
            bandwidth_per_dim,
            chunk_id_generator: ChunkIdGenerator::new(),
            callback_tracker: CallbackTracker::new(),
            scheduler,
        }
    }

    pub fn topology(&self) -> &Arc<dyn Topology> {
        &self.topology
    }

    pub fn dims_count(&self) -> usize {
        self.dims_count
    }

    pub fn bandwidth_per_dim(&self) -> &[Bandwidth] {
        &self.bandwidth_per_dim
    }

    pub fn current_time(&self) -> SimTime {
        self.scheduler.current_time()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// number of transfers for which the send, the receive or the arrival is still outstanding
    pub fn pending_entries(&self) -> usize {
        self.callback_tracker.len()
    }

    /// The network as seen from a given rank.
    pub fn api(&mut self, rank: Rank) -> NetworkApi<'_, S> {
        self.check_rank(rank);

        NetworkApi {
            rank,
            network: self,
        }
    }

    fn check_rank(&self, rank: Rank) {
        npu_index(rank, self.topology.npus_count());
    }

    /// Dispatches the next pending event, returning `false` if there was none.
    pub fn proceed(&mut self) -> bool {
        match self.scheduler.advance() {
            Some((_, arrival)) => {
                self.process_chunk_arrival(arrival);
                true
            }
            None => false,
        }
    }

    /// Dispatches events until there are none left, returning the number of dispatched events.
    pub fn run_until_idle(&mut self) -> usize {
        let mut num_events = 0;
        while self.proceed() {
            num_events += 1;
        }
        debug!("network idle at {} after {} event(s), {} tracker entries pending", self.current_time(), num_events, self.pending_entries());
        num_events
    }

    /// A chunk arrived at its destination. If the receive was issued already, both sides
    ///  complete now. Otherwise only the send side completes, and the receive side completes
    ///  as soon as the receive is issued.
    pub fn process_chunk_arrival(&mut self, arrival: ChunkArrival) {
        let ChunkArrival { key, chunk_id } = arrival;
        let now = self.scheduler.current_time();

        let entry = match self.callback_tracker.search_entry(&key, chunk_id) {
            Some(entry) => entry,
            None => panic!("chunk {} {} arrived without a tracker entry", key, chunk_id),
        };

        if entry.both_callbacks_registered() {
            debug!("chunk {} {} arrived at {}: completing both sides", key, chunk_id, now);

            if let Some(mut entry) = self.callback_tracker.pop_entry(&key, chunk_id) {
                self.invoke_callbacks(entry.take_send_callbacks(), Completion { key, chunk_id, side: Side::Send, time: now });
                self.invoke_callbacks(entry.take_recv_callbacks(), Completion { key, chunk_id, side: Side::Recv, time: now });
            }
        }
        else {
            debug!("chunk {} {} arrived at {} before the receive was issued", key, chunk_id, now);

            entry.set_transmission_finished();
            let send_callbacks = entry.take_send_callbacks();
            self.invoke_callbacks(send_callbacks, Completion { key, chunk_id, side: Side::Send, time: now });
        }
    }

    /// NB: callbacks must be detached from the tracker before they run, since they may send or
    ///  receive through `self`
    fn invoke_callbacks(&mut self, callbacks: Vec<CompletionHandler<Self>>, completion: Completion) {
        for callback in callbacks {
            callback(&completion, self);
        }
    }
}

/// The network from the perspective of a single rank.
pub struct NetworkApi<'a, S> {
    rank: Rank,
    network: &'a mut CongestionUnawareNetwork<S>,
}

impl<S: EventScheduler<ChunkArrival>> NetworkApi<'_, S> {
    pub fn sim_comm_get_rank(&self) -> Rank {
        self.rank
    }

    pub fn sim_get_time(&self) -> SimTime {
        self.network.current_time()
    }

    /// Sends `count` bytes to `dst`. This never blocks and never waits for the receiver: the
    ///  chunk's arrival is scheduled right away, after the delay the topology computes for it.
    ///  `handler` is called when the chunk has arrived.
    ///
    /// Returns 0 to signal that the send was accepted.
    pub fn sim_send(
        &mut self,
        count: ChunkSize,
        msg_type: i32,
        dst: Rank,
        tag: Tag,
        request: &SimRequest,
        handler: impl FnOnce(&Completion, &mut CongestionUnawareNetwork<S>) + 'static,
    ) -> i32 {
        let src = self.sim_comm_get_rank();
        let key = TransferKey::new(tag, src, dst, count);
        let network = &mut *self.network;
        network.check_rank(dst);

        let chunk_id = network.chunk_id_generator.create_send_chunk_id(&key);
        trace!("sim_send {} {} (type {}, {:?})", key, chunk_id, msg_type, request);

        match network.callback_tracker.search_entry(&key, chunk_id) {
            Some(entry) => {
                trace!("receive for {} {} was issued already", key, chunk_id);
                entry.register_send_callback(Box::new(handler));
            }
            None => {
                network.callback_tracker.create_new_entry(key, chunk_id)
                    .register_send_callback(Box::new(handler));
            }
        }

        let send_delay_ns = network.topology.send(src, dst, count);
        let delta = TimeSpec::ns(send_delay_ns as f64);
        trace!("chunk {} {} will arrive after {}ns", key, chunk_id, send_delay_ns);

        network.scheduler.schedule(delta, ChunkArrival { key, chunk_id });
        0
    }

    /// Receives `count` bytes from `src`. `handler` is called when the matching chunk has
    ///  arrived - immediately if that happened before this call.
    ///
    /// Returns 0 to signal that the receive was accepted.
    pub fn sim_recv(
        &mut self,
        count: ChunkSize,
        msg_type: i32,
        src: Rank,
        tag: Tag,
        request: &SimRequest,
        handler: impl FnOnce(&Completion, &mut CongestionUnawareNetwork<S>) + 'static,
    ) -> i32 {
        let dst = self.sim_comm_get_rank();
        let key = TransferKey::new(tag, src, dst, count);
        let network = &mut *self.network;
        network.check_rank(src);

        let chunk_id = network.chunk_id_generator.create_recv_chunk_id(&key);
        trace!("sim_recv {} {} (type {}, {:?})", key, chunk_id, msg_type, request);

        let transmission_finished = match network.callback_tracker.search_entry(&key, chunk_id) {
            Some(entry) => {
                entry.register_recv_callback(Box::new(handler));
                entry.is_transmission_finished()
            }
            None => {
                network.callback_tracker.create_new_entry(key, chunk_id)
                    .register_recv_callback(Box::new(handler));
                false
            }
        };

        if transmission_finished {
            let now = network.current_time();
            debug!("chunk {} {} had arrived already: completing the receive at {}", key, chunk_id, now);

            if let Some(mut entry) = network.callback_tracker.pop_entry(&key, chunk_id) {
                network.invoke_callbacks(entry.take_recv_callbacks(), Completion { key, chunk_id, side: Side::Recv, time: now });
            }
        }
        0
    }
}
