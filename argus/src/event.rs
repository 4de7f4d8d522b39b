use std::sync::Arc;

use argus_common::RandomXEvent;

use crate::container::ContainerInfo;

/// A decoded detection, ready for enrichment and reporting.
#[derive(Clone, Debug)]
pub struct MinerEvent {
	pub boot_ns: u64,
	pub wall_ns: u64,
	pub mntns_id: u64,
	pub pid: u32,
	pub ppid: u32,
	pub comm: Arc<str>,
	pub container: Option<ContainerInfo>,
}

impl MinerEvent {
	pub fn from_raw(raw: RandomXEvent) -> Self {
		let comm = Arc::from(String::from_utf8_lossy(&raw.comm).trim_end_matches('\0'));

		Self {
			boot_ns: raw.timestamp,
			wall_ns: wall_ns_from_boot(raw.timestamp),
			mntns_id: raw.mntns_id,
			pid: raw.pid,
			ppid: raw.ppid,
			comm,
			container: None,
		}
	}
}

/// Converts a boot-relative timestamp to wall-clock nanoseconds since the
/// unix epoch. The difference of the two clocks sampled "now" is the boot
/// epoch; the event offset is added on top.
pub fn wall_ns_from_boot(boot_ns: u64) -> u64 {
	wall_ns_from_parts(clock_ns(libc::CLOCK_REALTIME), clock_ns(libc::CLOCK_BOOTTIME), boot_ns)
}

fn wall_ns_from_parts(real_now_ns: u64, boot_now_ns: u64, event_boot_ns: u64) -> u64 {
	real_now_ns.saturating_sub(boot_now_ns).saturating_add(event_boot_ns)
}

fn clock_ns(clock: libc::clockid_t) -> u64 {
	let mut ts = libc::timespec { tv_sec: 0, tv_nsec: 0 };
	let ret = unsafe { libc::clock_gettime(clock, &mut ts) };
	if ret != 0 {
		return 0;
	}

	(ts.tv_sec as u64) * 1_000_000_000 + ts.tv_nsec as u64
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;
	use argus_common::TASK_COMM_LEN;

	fn fx_raw(comm: &[u8]) -> RandomXEvent {
		let mut comm_buf = [0u8; TASK_COMM_LEN];
		comm_buf[..comm.len()].copy_from_slice(comm);

		RandomXEvent {
			timestamp: 12_345,
			mntns_id: 4_026_531_840,
			pid: 77,
			ppid: 1,
			comm: comm_buf,
		}
	}

	#[test]
	fn from_raw_trims_padded_comm() -> Result<()> {
		// -- Exec
		let evt = MinerEvent::from_raw(fx_raw(b"xmrig\0"));

		// -- Check
		assert_eq!(&*evt.comm, "xmrig");
		assert_eq!(evt.pid, 77);
		assert_eq!(evt.ppid, 1);
		assert_eq!(evt.mntns_id, 4_026_531_840);
		assert!(evt.container.is_none());

		Ok(())
	}

	#[test]
	fn from_raw_keeps_full_width_comm() -> Result<()> {
		// -- Setup & Fixtures
		// 16 bytes, no NUL terminator.
		let fx_comm = b"sixteen-byte-nam";

		// -- Exec
		let evt = MinerEvent::from_raw(fx_raw(fx_comm));

		// -- Check
		assert_eq!(&*evt.comm, "sixteen-byte-nam");

		Ok(())
	}

	#[test]
	fn wall_clock_parts_are_exact_and_ordered() -> Result<()> {
		// -- Setup & Fixtures
		let fx_real_now = 1_700_000_000_000_000_000u64;
		let fx_boot_now = 5_000_000_000u64;

		// -- Exec
		let w1 = wall_ns_from_parts(fx_real_now, fx_boot_now, 1_000_000_000);
		let w2 = wall_ns_from_parts(fx_real_now, fx_boot_now, 2_000_000_000);

		// -- Check
		assert_eq!(w1, fx_real_now - fx_boot_now + 1_000_000_000);
		assert!(w2 > w1);
		assert_eq!(w2 - w1, 1_000_000_000);

		Ok(())
	}
}

// endregion: --- Tests
