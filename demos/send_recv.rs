//! Point-to-point microbenchmark: a single send from `--src` to `--dst`, and the matching
//!  receive, on a configurable topology. Prints when each side completes.
//!
//! ```text
//! cargo run --example send_recv -- --npus-count 8 --msg-size 1 --src 0 --dst 5 \
//!     --topology Ring,Switch --dim-npus 4,2 --bandwidth 50,25 --latency 500,1000
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use anyhow::bail;
use clap::Parser;
use clap_derive::Parser;
use simnet::config::NetworkConfig;
use simnet::network::network_api::CongestionUnawareNetwork;
use simnet::network::{Completion, SimRequest};
use simnet::topology::basic_topology::TopologyKind;
use tracing::{info, Level};

#[derive(Parser)]
struct Args {
    #[clap(long)]
    npus_count: usize,

    /// message size in MB
    #[clap(long)]
    msg_size: u64,

    #[clap(long, default_value_t = 0)]
    src: i32,

    #[clap(long, default_value_t = 1)]
    dst: i32,

    #[clap(long, default_value_t = 0)]
    tag: i32,

    #[clap(long, value_delimiter = ',', default_value = "Ring")]
    topology: Vec<TopologyKind>,

    /// NPUs per dimension, defaults to a single dimension with `npus_count` NPUs
    #[clap(long, value_delimiter = ',')]
    dim_npus: Vec<usize>,

    /// GB/s per dimension
    #[clap(long, value_delimiter = ',', default_value = "50")]
    bandwidth: Vec<f64>,

    /// ns per hop, per dimension
    #[clap(long, value_delimiter = ',', default_value = "500")]
    latency: Vec<f64>,

    #[clap(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::TRACE } else { Level::INFO })
        .try_init()
        .ok();

    if args.npus_count < 2 {
        bail!("npus-count must be >= 2");
    }
    if args.src == args.dst {
        bail!("src and dst must be different");
    }
    if args.src < 0 || args.dst < 0 || args.src as usize >= args.npus_count || args.dst as usize >= args.npus_count {
        bail!("src/dst must be within [0, {})", args.npus_count);
    }
    if args.msg_size == 0 {
        bail!("msg-size must be > 0 (in MB)");
    }

    let dim_npus = if args.dim_npus.is_empty() {
        vec![args.npus_count]
    }
    else {
        args.dim_npus.clone()
    };

    let config = NetworkConfig::from_lists(&args.topology, &dim_npus, &args.bandwidth, &args.latency)?;
    if config.npus_count() != args.npus_count {
        bail!("topology has {} NPUs, but npus-count is {}", config.npus_count(), args.npus_count);
    }

    let mut network = CongestionUnawareNetwork::with_event_queue(config.build_topology()?);

    let size_bytes = args.msg_size * 1024 * 1024;
    let request = SimRequest {
        src_rank: args.src,
        dst_rank: args.dst,
        tag: args.tag,
        ..Default::default()
    };

    let completions = Rc::new(RefCell::new(Vec::new()));
    let on_send = completions.clone();
    let on_recv = completions.clone();

    network.api(args.src).sim_send(size_bytes, 0, args.dst, args.tag, &request, move |c: &Completion, _: &mut CongestionUnawareNetwork| on_send.borrow_mut().push(*c));
    network.api(args.dst).sim_recv(size_bytes, 0, args.src, args.tag, &request, move |c: &Completion, _: &mut CongestionUnawareNetwork| on_recv.borrow_mut().push(*c));

    network.run_until_idle();

    for c in completions.borrow().iter() {
        info!("{:?} of {} chunk {} completed at {}", c.side, c.key, c.chunk_id, c.time);
    }
    info!("finished at {} ({} tracker entries left)", network.current_time(), network.pending_entries());

    Ok(())
}
