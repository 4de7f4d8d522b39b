use crate::{error::Result, event::MinerEvent, trx::Rx};

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Terminal stage: every event that makes it here is reported. Matching
/// tracepoint firings are reported independently, so a sustained miner
/// produces a stream of alerts rather than one.
pub struct AlertSink {
	pub rx: Rx<MinerEvent>,
	pub shutdown: CancellationToken,
}

impl AlertSink {
	pub fn start(rx: Rx<MinerEvent>, shutdown: CancellationToken) -> Result<Self> {
		Ok(AlertSink { rx, shutdown })
	}

	pub async fn run(self) -> Result<()> {
		loop {
			let evt = tokio::select! {
				_ = self.shutdown.cancelled() => break,
				evt = self.rx.recv() => match evt {
					Ok(evt) => evt,
					Err(_) => break,
				},
			};

			match &evt.container {
				Some(c) => {
					info!(
						target: "alert",
						"Possible crypto miner detected | PID:{} | PPID:{} | CMD:{} | MNTNS:{} | CONTAINER:{} ({:?})",
						evt.pid, evt.ppid, evt.comm, evt.mntns_id, c.container_id, c.runtime
					);
				}
				None => {
					info!(
						target: "alert",
						"Possible crypto miner detected | PID:{} | PPID:{} | CMD:{} | MNTNS:{} | host",
						evt.pid, evt.ppid, evt.comm, evt.mntns_id
					);
				}
			}
		}

		Ok(())
	}
}
