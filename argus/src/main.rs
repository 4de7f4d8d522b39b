// region:    --- Modules
mod cli;
mod container;
mod daemon;
mod error;
mod event;
mod supervisor;
mod trx;
mod workers;
// endregion: --- Modules

use crate::{
	cli::args::{Cli, RunMode},
	container::ContainerManager,
	event::MinerEvent,
	supervisor::Supervisor,
	trx::new_channel,
	workers::{AlertSink, ContainerResolver, RingBufWorker},
};

pub use self::error::{Error, Result};
use aya::{
	maps::{MapData, RingBuf},
	programs::TracePoint,
	Ebpf,
};
use clap::Parser;
use std::time::Duration;
#[rustfmt::skip]
use tracing::{debug, warn};
use tokio::io::unix::AsyncFd;

#[tokio::main]
async fn main() -> Result<()> {
	let args = Cli::parse();

	if args.time.is_some() && args.mode != RunMode::Daemon {
		return Err(Error::InvalidTimeMode);
	}

	let _tracing_guard = match args.mode {
		RunMode::Monitor => {
			daemon::utils::init_console_tracing();
			None
		}
		RunMode::Daemon => {
			let guard = daemon::utils::init_file_tracing(&args.log_file);
			daemon::utils::daemonize_process(&args.log_file)?;
			Some(guard)
		}
	};

	// Bump the memlock rlimit. This is needed for older kernels that don't use the
	// new memcg based accounting, see https://lwn.net/Articles/837122/
	let rlim = libc::rlimit {
		rlim_cur: libc::RLIM_INFINITY,
		rlim_max: libc::RLIM_INFINITY,
	};
	let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
	if ret != 0 {
		debug!("remove limit on locked memory failed, ret is: {ret}");
	}

	let mut ebpf = aya::Ebpf::load(aya::include_bytes_aligned!(concat!(env!("OUT_DIR"), "/argus")))?;
	if let Err(e) = aya_log::EbpfLogger::init(&mut ebpf) {
		// This can happen if you remove all log statements from your eBPF program.
		warn!("failed to initialize eBPF logger: {e}");
	}

	let ringbuf_fd = load_tracer(&mut ebpf)?;
	let container_mgr = ContainerManager::new()?;

	let (raw_tx, raw_rx) = new_channel::<MinerEvent>("ringbuf");
	let (enriched_tx, enriched_rx) = new_channel::<MinerEvent>("enriched");

	let mut supervisor = Supervisor::new();
	daemon::utils::install_signal_handlers(supervisor.token()).await?;

	let ringbuf_worker = RingBufWorker::start(ringbuf_fd, raw_tx, supervisor.token())?;
	let resolver = ContainerResolver::start(enriched_tx, raw_rx, container_mgr, supervisor.token())?;
	let sink = AlertSink::start(enriched_rx, supervisor.token())?;
	supervisor.spawn(ringbuf_worker.run());
	supervisor.spawn(resolver.run());
	supervisor.spawn(sink.run());

	if let Some(secs) = args.time {
		let token = supervisor.token();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_secs(secs)).await;
			token.cancel();
		});
	}

	supervisor.token().cancelled().await;

	supervisor.shutdown().await?;

	Ok(())
}

pub fn load_tracer(ebpf: &mut Ebpf) -> Result<AsyncFd<RingBuf<MapData>>> {
	let tracepoint: &mut TracePoint = ebpf
		.program_mut("x86_fpu_regs_deactivated")
		.ok_or(Error::EbpfProgNotFound)?
		.try_into()?;
	tracepoint.load()?;
	tracepoint.attach("x86_fpu", "x86_fpu_regs_deactivated")?;

	let ring_buf = RingBuf::try_from(ebpf.take_map("EVENTS").ok_or(Error::EbpfProgNotFound)?)?;
	let fd = AsyncFd::new(ring_buf)?;
	Ok(fd)
}
