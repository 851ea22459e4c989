//! # Quiz Session
//!
//! 限时单人测验引擎：逐题展示单选题，记录作答，超时自动提交，计算得分，支持重新开始。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `KvStore` - 题库存储（`FileStore` / `MemoryStore`）
//! - `IntervalTimer` - 会话独占的计时器
//!
//! ### ② 数据层（Models）
//! - `models/` - `Question`、`QuizCatalog`、`AnswerRecord`
//! - `load_catalog` - 从存储加载题库，失败时使用内置题库
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - `QuizSession` 状态机与 `SessionEvent`
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session_actor` - 串行化会话的所有修改
//! - `orchestrator/console_app` - 终端应用

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, TimerScope};
pub use error::{AppError, AppResult};
pub use infrastructure::{FileStore, KvStore, MemoryStore};
pub use models::{load_catalog, Question, QuizCatalog, Selection};
pub use orchestrator::{spawn_session, App, SessionHandle};
pub use workflow::{Phase, QuizSession, SessionEvent};
