use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "argus")]
pub struct Cli {
	#[arg(long, value_enum, default_value = "monitor")]
	pub mode: RunMode,

	#[arg(long, default_value = "/var/log/argus.log")]
	pub log_file: String,

	/// Stop after this many seconds (daemon mode only).
	#[arg(long)]
	pub time: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
pub enum RunMode {
	Monitor,
	Daemon,
}
