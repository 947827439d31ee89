// ── Footprint history stores ──

mod file;
mod memory;

pub use file::FileHistory;
pub use memory::MemoryHistory;
