//! 错误类型定义

use thiserror::Error;

/// 搜索中断
///
/// 唯一的异常出口：在任意节点发现预算耗尽时返回，
/// 逐层向上传播直到迭代加深驱动器，该层结果整体作废。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// 超出时间（或节点）预算
    #[error("Search deadline exceeded")]
    DeadlineExceeded,
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON 解析错误
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// 过半数阈值无效
    #[error("Invalid majority threshold: {0}")]
    InvalidMajority(u32),

    /// 深度上限无效
    #[error("Invalid max depth: {0}")]
    InvalidMaxDepth(u32),
}
