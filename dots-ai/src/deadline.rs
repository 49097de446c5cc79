//! 搜索预算（协作式取消）

use std::time::{Duration, Instant};

use crate::error::SearchError;

/// 单次搜索的截止条件：墙钟时间，以及可选的节点上限
///
/// 每个递归节点入口调用 [`Deadline::check`]，
/// 超出时返回 [`SearchError::DeadlineExceeded`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
    max_nodes: Option<u64>,
}

impl Deadline {
    /// 从现在起经过 `budget` 后截止
    pub fn after(budget: Duration) -> Self {
        Self::at(Instant::now() + budget)
    }

    /// 在指定时刻截止
    pub fn at(at: Instant) -> Self {
        Self {
            at,
            max_nodes: None,
        }
    }

    /// 附加节点上限
    pub fn with_max_nodes(mut self, max_nodes: Option<u64>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// 剩余时间（已过期时为零）
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// 时间是否已到
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// 检查预算，`nodes` 为本次搜索已访问的节点数
    pub fn check(&self, nodes: u64) -> Result<(), SearchError> {
        let over_nodes = self.max_nodes.is_some_and(|max| nodes > max);
        if over_nodes || self.expired() {
            Err(SearchError::DeadlineExceeded)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_past_deadline() {
        let deadline = Deadline::at(Instant::now());
        assert!(deadline.expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
        assert_eq!(deadline.check(0), Err(SearchError::DeadlineExceeded));
    }

    #[test]
    fn test_future_deadline() {
        let deadline = Deadline::after(Duration::from_secs(60));
        assert!(!deadline.expired());
        assert!(deadline.remaining() > Duration::from_secs(30));
        assert_eq!(deadline.check(1_000_000), Ok(()));
    }

    #[test]
    fn test_node_limit() {
        let deadline = Deadline::after(Duration::from_secs(60)).with_max_nodes(Some(10));
        assert_eq!(deadline.check(10), Ok(()));
        assert_eq!(deadline.check(11), Err(SearchError::DeadlineExceeded));
    }
}
