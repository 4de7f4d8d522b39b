//! Minimal kernel type layouts for the pointer chains this program reads:
//! `task_struct -> real_parent -> pid`, `task_struct -> nsproxy -> mnt_ns ->
//! ns.inum` and `fpu -> fpstate -> regs.i387.mxcsr`.
//!
//! Offsets match x86_64 6.8. Regenerate with
//! `aya-tool generate task_struct fpu nsproxy` when the target kernel
//! changes; only the fields that are actually traversed are kept, the rest
//! is padding.

#![allow(non_camel_case_types)]
#![allow(dead_code)]

use core::ffi::c_void;

pub type pid_t = i32;

#[repr(C)]
pub struct ns_common {
	pub stashed: *mut c_void,
	pub ops: *const c_void,
	pub inum: u32,
	pub count: u32,
}

#[repr(C)]
pub struct mnt_namespace {
	pub ns: ns_common,
}

#[repr(C)]
pub struct nsproxy {
	pub count: i32,
	pub uts_ns: *mut c_void,
	pub ipc_ns: *mut c_void,
	pub mnt_ns: *mut mnt_namespace,
	pub pid_ns_for_children: *mut c_void,
	pub net_ns: *mut c_void,
	pub time_ns: *mut c_void,
	pub time_ns_for_children: *mut c_void,
	pub cgroup_ns: *mut c_void,
}

#[repr(C)]
pub struct task_struct {
	pub _pad0: [u8; 2464],
	pub pid: pid_t,
	pub tgid: pid_t,
	pub _pad1: [u8; 8], // stack canary
	pub real_parent: *mut task_struct,
	pub parent: *mut task_struct,
	pub _pad2: [u8; 336],
	pub nsproxy: *mut nsproxy,
}

#[repr(C)]
pub struct fxregs_state {
	pub cwd: u16,
	pub swd: u16,
	pub twd: u16,
	pub fop: u16,
	pub rip: u64,
	pub rdp: u64,
	pub mxcsr: u32,
	pub mxcsr_mask: u32,
	pub st_space: [u32; 32],
	pub xmm_space: [u32; 64],
	pub padding: [u32; 12],
	pub sw_reserved: [u32; 12],
}

#[repr(C)]
pub struct xstate_header {
	pub xfeatures: u64,
	pub xcomp_bv: u64,
	pub reserved: [u64; 6],
}

#[repr(C, align(64))]
pub struct xregs_state {
	pub i387: fxregs_state,
	pub header: xstate_header,
	// extended state area follows, never read here
}

#[repr(C)]
pub struct fpstate {
	pub size: u32,
	pub user_size: u32,
	pub xfeatures: u64,
	pub user_xfeatures: u64,
	pub xfd: u64,
	pub flags: u32, // is_valloc / is_guest / is_confidential / in_use bitfield
	pub regs: xregs_state,
}

#[repr(C)]
pub struct fpu {
	pub last_cpu: u32,
	pub avx512_timestamp: u64,
	pub fpstate: *mut fpstate,
}
