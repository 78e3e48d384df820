mod process;
mod reader;

#[cfg(test)]
pub mod mock;

pub use process::ProcessHandle;
pub use reader::{MemoryReader, ReadMemory};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
