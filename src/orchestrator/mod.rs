//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `session_actor` - 会话任务
//! - 唯一持有 `QuizSession` 和计时器
//! - 用户命令与计时器节拍在同一队列中串行处理
//! - 通过 `SessionHandle` 对外提供异步接口
//!
//! ### `console_app` - 终端应用
//! - 加载配置和题库
//! - 读取输入、展示事件
//!
//! ## 层次关系
//!
//! ```text
//! console_app (读取输入 / 展示事件)
//!     ↓
//! session_actor (串行化所有修改)
//!     ↓
//! workflow::QuizSession (状态机)
//!     ↓
//! models (题目 / 题库 / 作答记录)
//!     ↓
//! infrastructure (存储 / 计时器)
//! ```

pub mod console_app;
pub mod session_actor;

pub use console_app::App;
pub use session_actor::{spawn_session, SessionHandle};
