mod container_resolver;
mod ringbuf;
mod sink;

pub use container_resolver::*;
pub use ringbuf::*;
pub use sink::*;
