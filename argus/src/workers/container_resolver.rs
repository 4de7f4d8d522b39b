use crate::{
	container::ContainerManager,
	error::Result,
	event::MinerEvent,
	trx::{Rx, Tx},
};

use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct ContainerResolver {
	pub tx: Tx<MinerEvent>,
	pub rx: Rx<MinerEvent>,
	pub shutdown: CancellationToken,
	container_mgr: ContainerManager,
}

impl ContainerResolver {
	pub fn start(
		tx: Tx<MinerEvent>,
		rx: Rx<MinerEvent>,
		container_mgr: ContainerManager,
		shutdown: CancellationToken,
	) -> Result<Self> {
		Ok(ContainerResolver {
			tx,
			rx,
			shutdown,
			container_mgr,
		})
	}

	pub async fn run(mut self) -> Result<()> {
		loop {
			let mut evt = tokio::select! {
				_ = self.shutdown.cancelled() => break,
				evt = self.rx.recv() => match evt {
					Ok(evt) => evt,
					Err(_) => break,
				},
			};

			// mntns 0 means the kernel-side read failed; nothing to look up.
			if evt.mntns_id != 0 {
				if let Some(info) = self.container_mgr.resolve(evt.mntns_id) {
					evt.container = Some(info.clone());
					debug!("{info:?}");
				}
			}

			self.tx.send(evt).await?;
		}

		Ok(())
	}
}
