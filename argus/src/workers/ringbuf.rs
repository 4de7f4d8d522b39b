use crate::{
	error::{Error, Result},
	event::MinerEvent,
	trx::Tx,
};

use argus_common::RandomXEvent;
use aya::maps::{MapData, RingBuf};
use tokio::io::unix::AsyncFd;
use tokio_util::sync::CancellationToken;
use zerocopy::FromBytes;

pub struct RingBufWorker {
	pub ringbuf_fd: AsyncFd<RingBuf<MapData>>,
	pub tx: Tx<MinerEvent>,
	pub shutdown: CancellationToken,
}

impl RingBufWorker {
	pub fn start(ringbuf_fd: AsyncFd<RingBuf<MapData>>, tx: Tx<MinerEvent>, shutdown: CancellationToken) -> Result<Self> {
		Ok(RingBufWorker { ringbuf_fd, tx, shutdown })
	}

	pub async fn run(mut self) -> Result<()> {
		loop {
			let mut guard = tokio::select! {
				_ = self.shutdown.cancelled() => break,
				guard = self.ringbuf_fd.readable_mut() => match guard {
					Ok(guard) => guard,
					Err(_) => break,
				},
			};

			let ring_buf = guard.get_inner_mut();

			while let Some(item) = ring_buf.next() {
				let data = item.as_ref();

				match parse_event_from_bytes(data) {
					Ok(raw) => {
						self.tx.send(MinerEvent::from_raw(raw)).await?;
					}
					Err(_) => continue,
				}
			}

			guard.clear_ready();
		}
		Ok(())
	}
}

fn parse_event_from_bytes(data: &[u8]) -> Result<RandomXEvent> {
	let (evt, _rest) = RandomXEvent::read_from_prefix(data).map_err(|_| Error::InvalidEventSize)?;
	Ok(evt)
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;
	use argus_common::TASK_COMM_LEN;

	fn fx_record_bytes(timestamp: u64, mntns_id: u64, pid: u32, ppid: u32, comm: &[u8]) -> Vec<u8> {
		let mut comm_buf = [0u8; TASK_COMM_LEN];
		comm_buf[..comm.len()].copy_from_slice(comm);

		let mut data = Vec::with_capacity(40);
		data.extend_from_slice(&timestamp.to_le_bytes());
		data.extend_from_slice(&mntns_id.to_le_bytes());
		data.extend_from_slice(&pid.to_le_bytes());
		data.extend_from_slice(&ppid.to_le_bytes());
		data.extend_from_slice(&comm_buf);
		data
	}

	#[test]
	fn parse_event_roundtrips_exact_fields() -> Result<()> {
		// -- Setup & Fixtures
		let fx_data = fx_record_bytes(9_000_000_001, 4_026_532_567, 4321, 1234, b"xmrig\0");

		// -- Exec
		let evt = parse_event_from_bytes(&fx_data)?;

		// -- Check
		assert_eq!(evt.timestamp, 9_000_000_001);
		assert_eq!(evt.mntns_id, 4_026_532_567);
		assert_eq!(evt.pid, 4321);
		assert_eq!(evt.ppid, 1234);
		assert_eq!(&evt.comm[..6], b"xmrig\0");
		assert!(evt.comm[6..].iter().all(|&b| b == 0));

		Ok(())
	}

	#[test]
	fn parse_event_rejects_short_input() -> Result<()> {
		// -- Setup & Fixtures
		let fx_data = fx_record_bytes(1, 2, 3, 4, b"short");

		// -- Exec
		let res = parse_event_from_bytes(&fx_data[..39]);

		// -- Check
		assert!(matches!(res, Err(Error::InvalidEventSize)));

		Ok(())
	}

	#[test]
	fn parse_event_tolerates_trailing_bytes() -> Result<()> {
		// -- Setup & Fixtures
		let mut fx_data = fx_record_bytes(7, 8, 9, 10, b"cc1plus");
		fx_data.extend_from_slice(&[0xAA; 8]);

		// -- Exec
		let evt = parse_event_from_bytes(&fx_data)?;

		// -- Check
		assert_eq!(evt.timestamp, 7);
		assert_eq!(evt.pid, 9);

		Ok(())
	}
}

// endregion: --- Tests
