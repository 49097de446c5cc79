//! 错误类型定义

use thiserror::Error;

/// 点格棋规则错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// 棋盘尺寸无效
    #[error("Invalid board dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// 边的坐标越界
    #[error("Edge out of bounds: {action}")]
    OutOfBounds { action: String },

    /// 边已被占据
    #[error("Edge already claimed: {action}")]
    EdgeAlreadyClaimed { action: String },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 无效的局面字符串
    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },

    /// 无效的走法字符串
    #[error("Invalid action: {input}")]
    InvalidAction { input: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RuleError>;
