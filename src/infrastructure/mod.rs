//! 基础设施层
//!
//! 持有稀缺资源（存储、计时器），只暴露能力，不认识会话流程。

pub mod file_store;
pub mod interval_timer;
pub mod kv_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use interval_timer::{IntervalTimer, ManualTimer, SessionTimer, TimerTick};
pub use kv_store::KvStore;
pub use memory_store::MemoryStore;
