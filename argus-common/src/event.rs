use zerocopy_derive::{FromBytes, Immutable, KnownLayout};

/// Kernel task name length. A name that fills all 16 bytes carries no NUL
/// terminator; shorter names are zero-padded by the kernel.
pub const TASK_COMM_LEN: usize = 16;

/// One detection record, written whole into the ring buffer by the BPF
/// program and decoded verbatim by the agent. 40 bytes, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, Immutable, KnownLayout)]
pub struct RandomXEvent {
	pub timestamp: u64,            // 0..8   | ns since boot
	pub mntns_id: u64,             // 8..16  | mount namespace inode
	pub pid: u32,                  // 16..20
	pub ppid: u32,                 // 20..24
	pub comm: [u8; TASK_COMM_LEN], // 24..40
}

#[cfg(feature = "user")]
unsafe impl aya::Pod for RandomXEvent {}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;

	#[test]
	fn event_layout_is_stable() -> Result<()> {
		// -- Check
		assert_eq!(core::mem::size_of::<RandomXEvent>(), 40);
		assert_eq!(core::mem::align_of::<RandomXEvent>(), 8);
		assert_eq!(core::mem::offset_of!(RandomXEvent, timestamp), 0);
		assert_eq!(core::mem::offset_of!(RandomXEvent, mntns_id), 8);
		assert_eq!(core::mem::offset_of!(RandomXEvent, pid), 16);
		assert_eq!(core::mem::offset_of!(RandomXEvent, ppid), 20);
		assert_eq!(core::mem::offset_of!(RandomXEvent, comm), 24);

		Ok(())
	}
}

// endregion: --- Tests
