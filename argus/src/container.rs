use crate::error::{Error, Result};
use std::{
	collections::{hash_map::Entry, HashMap},
	os::unix::fs::MetadataExt,
	path::{Path, PathBuf},
	sync::Arc,
};

#[derive(Debug, Clone)]
pub struct ContainerInfo {
	pub mntns_id: u64,
	pub container_id: Arc<str>,
	pub runtime: ContainerRuntime,
}

#[derive(Debug, Clone, Copy)]
pub enum ContainerRuntime {
	Docker,
	Containerd,
	Crio,
	Kubernetes,
	Unknown,
}

/// Maps mount-namespace inodes to container identities by scanning procfs.
/// Events carry the mntns inode, so a task sharing the namespace is located
/// via `/proc/<pid>/ns/mnt` and its `/proc/<pid>/cgroup` names the container.
pub struct ContainerManager {
	cache: HashMap<u64, ContainerInfo>,
	proc_root: PathBuf,
}

const PROC_DIR: &str = "/proc";

impl ContainerManager {
	pub fn new() -> Result<Self> {
		Self::with_proc_root(PathBuf::from(PROC_DIR))
	}

	pub fn with_proc_root(proc_root: PathBuf) -> Result<Self> {
		if !proc_root.exists() {
			return Err(Error::ProcFsNotMounted);
		}

		Ok(Self {
			cache: HashMap::with_capacity(1024),
			proc_root,
		})
	}

	pub fn resolve(&mut self, mntns_id: u64) -> Option<&ContainerInfo> {
		match self.cache.entry(mntns_id) {
			Entry::Occupied(entry) => Some(entry.into_mut()),
			Entry::Vacant(entry) => {
				let info = Self::resolve_mntns(&self.proc_root, mntns_id)?;
				Some(entry.insert(info))
			}
		}
	}

	pub fn cache_size(&self) -> usize {
		self.cache.len()
	}

	pub fn clear(&mut self) {
		self.cache.clear();
	}
}

// private fns
impl ContainerManager {
	fn resolve_mntns(proc_root: &Path, mntns_id: u64) -> Option<ContainerInfo> {
		let task_dir = Self::find_task_dir(proc_root, mntns_id)?;
		let cgroup = std::fs::read_to_string(task_dir.join("cgroup")).ok()?;
		let container_id = Self::extract_container_id(&cgroup)?;
		let runtime = Self::detect_runtime(&cgroup);

		Some(ContainerInfo {
			mntns_id,
			container_id: Arc::from(container_id),
			runtime,
		})
	}

	fn find_task_dir(proc_root: &Path, mntns_id: u64) -> Option<PathBuf> {
		for entry in std::fs::read_dir(proc_root).ok()?.flatten() {
			if !entry.file_name().to_string_lossy().chars().all(|c| c.is_ascii_digit()) {
				continue;
			}

			let ns_path = entry.path().join("ns/mnt");
			let Ok(meta) = std::fs::metadata(&ns_path) else {
				continue;
			};

			if meta.ino() == mntns_id {
				return Some(entry.path());
			}
		}

		None
	}

	fn extract_container_id(cgroup: &str) -> Option<String> {
		for part in cgroup.split(['/', '\n']) {
			if let Some(id) = part.strip_prefix("docker-") {
				return Some(id.trim_end_matches(".scope").to_string());
			}

			if let Some(id) = part.strip_prefix("crio-") {
				return Some(id.trim_end_matches(".scope").to_string());
			}

			if part.len() >= 32 && part.chars().all(|c| c.is_ascii_hexdigit()) {
				return Some(part.to_string());
			}
		}

		None
	}

	fn detect_runtime(cgroup: &str) -> ContainerRuntime {
		if cgroup.contains("/docker/") || cgroup.contains("docker-") {
			ContainerRuntime::Docker
		} else if cgroup.contains("/kubepods/") || cgroup.contains("k8s") {
			ContainerRuntime::Kubernetes
		} else if cgroup.contains("/containerd/") || cgroup.contains("containerd-") {
			ContainerRuntime::Containerd
		} else if cgroup.contains("/crio/") || cgroup.contains("crio-") {
			ContainerRuntime::Crio
		} else {
			ContainerRuntime::Unknown
		}
	}
}

// region:    --- Tests


// endregion: --- Tests
