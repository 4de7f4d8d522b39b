use crate::error::{Error, Result};
use flume::{Receiver, Sender};

pub struct Tx<T> {
	label: &'static str,
	tx: Sender<T>,
}

impl<T> Clone for Tx<T> {
	fn clone(&self) -> Self {
		Self {
			label: self.label,
			tx: self.tx.clone(),
		}
	}
}

impl<T> Tx<T> {
	pub async fn send(&self, item: T) -> Result<()> {
		match self.tx.send_async(item).await {
			Ok(_) => Ok(()),
			Err(_) => Err(Error::EventSend(format!("channel '{}' closed", self.label))),
		}
	}
}

pub struct Rx<T> {
	label: &'static str,
	rx: Receiver<T>,
}

impl<T> Rx<T> {
	pub async fn recv(&self) -> Result<T> {
		let res = self.rx.recv_async().await?;
		Ok(res)
	}

	pub fn label(&self) -> &'static str {
		self.label
	}
}

pub fn new_channel<T>(label: &'static str) -> (Tx<T>, Rx<T>) {
	let (tx, rx) = flume::unbounded::<T>();

	(Tx { label, tx }, Rx { label, rx })
}
