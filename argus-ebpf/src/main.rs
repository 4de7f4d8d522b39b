#![no_std]
#![no_main]

use argus_common::{is_randomx_rounding, RandomXEvent};
use aya_ebpf::{
	helpers::{bpf_get_current_comm, bpf_get_current_pid_tgid, r#gen::bpf_ktime_get_boot_ns},
	macros::{map, tracepoint},
	maps::RingBuf,
	programs::TracePointContext,
};

mod utils;
mod vmlinux;

// 256KB of buffer space for events.
#[map]
static EVENTS: RingBuf = RingBuf::with_byte_size(256 * 1024, 0);

#[tracepoint]
pub fn x86_fpu_regs_deactivated(ctx: TracePointContext) -> u32 {
	match try_x86_fpu_regs_deactivated(ctx) {
		Ok(ret) => ret,
		Err(ret) => ret,
	}
}

fn try_x86_fpu_regs_deactivated(ctx: TracePointContext) -> Result<u32, u32> {
	let task = unsafe { utils::current_task() };
	if task.is_null() {
		return Ok(0);
	}

	let Some(mxcsr) = (unsafe { utils::read_mxcsr(&ctx) }) else {
		return Ok(0);
	};

	if !is_randomx_rounding(mxcsr) {
		return Ok(0);
	}

	let Some(ppid) = (unsafe { utils::task_ppid(task) }) else {
		return Ok(0);
	};

	let pid_tgid = bpf_get_current_pid_tgid();
	let comm = bpf_get_current_comm().unwrap_or([0u8; 16]);

	// Reservation failure means the buffer is full; the event is dropped.
	let Some(mut slot) = EVENTS.reserve::<RandomXEvent>(0) else {
		return Ok(0);
	};

	slot.write(RandomXEvent {
		timestamp: unsafe { bpf_ktime_get_boot_ns() },
		mntns_id: unsafe { utils::get_mnt_ns() },
		pid: (pid_tgid >> 32) as u32,
		ppid,
		comm,
	});
	slot.submit(0);

	Ok(0)
}

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
	loop {}
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 13] = *b"Dual MIT/GPL\0";
