//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责把各层串起来，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `quiz_runner` - 答题编排器
//! - 管理应用生命周期（初始化、运行、输出）
//! - 读取题目文件并解析（`QuizData`）
//! - 驱动 `QuizSession`，持有并适时停止 `Countdown`
//! - 输出成绩和日志
//!
//! ### `command` - 用户指令
//! - 把一行终端输入解析成 `SessionCommand`
//! - 把指令作用到会话上
//!
//! ## 层次关系
//!
//! ```text
//! quiz_runner (终端 IO + 计时)
//!     ↓
//! workflow::QuizSession (一次答题的状态机)
//!     ↓
//! services (能力层：extract / scoring)
//!     ↓
//! infrastructure (基础设施：Countdown)
//! ```

pub mod command;
pub mod quiz_runner;

// 重新导出主要类型
pub use command::{CommandEffect, SessionCommand};
pub use quiz_runner::{run_session, App};
