//! 点格棋 AI 引擎
//!
//! 包含:
//! - 局面评估函数
//! - Minimax + Alpha-Beta 搜索
//! - 限时迭代加深
//! - 引擎配置与难度预设

mod config;
mod deadline;
mod error;
mod evaluate;
mod search;

pub use config::{AiConfig, Difficulty, MajorityRule};
pub use deadline::Deadline;
pub use error::{ConfigError, SearchError};
pub use evaluate::Evaluator;
pub use search::{AiEngine, SearchReport};
