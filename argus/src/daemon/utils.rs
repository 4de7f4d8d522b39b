use std::{fs::File, path::Path};

use crate::{error::Result, Error};
use daemonize::Daemonize;
use tokio_util::sync::CancellationToken;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::EnvFilter;

pub async fn install_signal_handlers(token: CancellationToken) -> Result<()> {
	let t = token.clone();
	tokio::spawn(async move {
		let _ = tokio::signal::ctrl_c().await;
		t.cancel();
	});

	#[cfg(unix)]
	{
		use tokio::signal::unix::{signal, SignalKind};

		let t = token.clone();
		tokio::spawn(async move {
			let mut sigterm = signal(SignalKind::terminate()).unwrap();
			sigterm.recv().await;
			t.cancel();
		});
	}
	Ok(())
}

pub fn daemonize_process(log_path: &str) -> Result<()> {
	let log_file = File::create(Path::new(log_path))?;

	let daemonize = Daemonize::new()
		.working_directory("/")
		.umask(0o027)
		.stdout(log_file.try_clone()?)
		.stderr(log_file);

	daemonize
		.start()
		.map_err(|err| Error::DaemonStartFail { cause: err.to_string() })?;

	Ok(())
}

pub fn init_file_tracing(log_path: &str) -> WorkerGuard {
	let path = Path::new(log_path);

	let dir = path.parent().unwrap_or(Path::new("/var/log"));
	let file = path.file_name().unwrap_or_default();

	let file_appender = rolling::daily(dir, file);
	let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

	tracing_subscriber::fmt()
		.with_writer(non_blocking_writer)
		.with_target(false)
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	guard
}

pub fn init_console_tracing() {
	tracing_subscriber::fmt()
		.with_target(false)
		.with_env_filter(EnvFilter::from_default_env())
		.init();
}
