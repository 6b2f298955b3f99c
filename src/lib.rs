//! # MCQ Quiz
//!
//! 从松散排版的文本中提取选择题，并运行限时答题会话的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构，数据单向流动：文本 → 解析 → 题目数据 → 答题会话 → 成绩单
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（计时任务），只暴露能力
//! - `Countdown` - 唯一的计时任务 owner，每秒发出一次信号
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，都是纯函数
//! - `McqExtractor` - 文本 → `QuizData`
//! - `scoring` - 判分、百分比、成绩档位
//! - `text_cleaner` - 控制字符清洗
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次答题"的完整状态机
//! - `QuizSession` - 作答、跳转、复查、计时、交卷
//! - `session_view` - 题号面板、计数等展示数据
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_runner` - 读取文件、驱动会话、输出成绩
//! - `orchestrator/command` - 终端指令解析
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::Countdown;
pub use models::{OptionLetter, Question, QuizData, QuizReport};
pub use orchestrator::App;
pub use services::{extract_quiz, McqExtractor};
pub use workflow::{QuizSession, SessionPhase};
