use aya_ebpf::{
	helpers::{bpf_probe_read_kernel, r#gen::bpf_get_current_task},
	programs::TracePointContext,
};

use crate::vmlinux::{fpstate, fpu, mnt_namespace, nsproxy, task_struct};

// /sys/kernel/debug/tracing/events/x86_fpu/x86_fpu_regs_deactivated/format:
//   field:struct fpu * fpu;  offset:8;  size:8;  signed:0;
const TP_FPU_OFFSET: usize = 8;

pub unsafe fn current_task() -> *const task_struct {
	bpf_get_current_task() as *const task_struct
}

/// Parent pid of `task`, following `real_parent`. Any unreadable link yields
/// `None`; the caller reports nothing for this invocation.
pub unsafe fn task_ppid(task: *const task_struct) -> Option<u32> {
	let parent: *const task_struct = bpf_probe_read_kernel(&(*task).real_parent).ok()?;
	if parent.is_null() {
		return None;
	}

	let pid = bpf_probe_read_kernel(&(*parent).pid).ok()?;
	Some(pid as u32)
}

/// MXCSR word of the FPU state being deactivated, read out of the tracepoint
/// context: `ctx->fpu->fpstate->regs.i387.mxcsr`. One failed link aborts the
/// whole read.
pub unsafe fn read_mxcsr(ctx: &TracePointContext) -> Option<u32> {
	let fpu_ptr: u64 = ctx.read_at(TP_FPU_OFFSET).ok()?;
	if fpu_ptr == 0 {
		return None;
	}
	let fpu = fpu_ptr as *const fpu;

	let fpstate: *const fpstate = bpf_probe_read_kernel(&(*fpu).fpstate).ok()?;
	if fpstate.is_null() {
		return None;
	}

	bpf_probe_read_kernel(&(*fpstate).regs.i387.mxcsr).ok()
}

/// Mount-namespace inode of the current task, 0 when a link cannot be read.
pub unsafe fn get_mnt_ns() -> u64 {
	let task = current_task();
	if task.is_null() {
		return 0;
	}

	let nsproxy: *const nsproxy = match bpf_probe_read_kernel(&(*task).nsproxy) {
		Ok(p) => p,
		Err(_) => return 0,
	};
	if nsproxy.is_null() {
		return 0;
	}

	let mnt_ns: *const mnt_namespace = match bpf_probe_read_kernel(&(*nsproxy).mnt_ns) {
		Ok(p) => p,
		Err(_) => return 0,
	};
	if mnt_ns.is_null() {
		return 0;
	}

	match bpf_probe_read_kernel(&(*mnt_ns).ns.inum) {
		Ok(inum) => inum as u64,
		Err(_) => 0,
	}
}
