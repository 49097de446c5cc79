//! 引擎配置

use std::time::Duration;

use dots_rules::{DEFAULT_MAJORITY, DEFAULT_TIME_LIMIT_MS};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单：100ms，最多 2 层
    Easy,
    /// 中等：500ms，不限深度
    Medium,
    /// 困难：2000ms，不限深度
    Hard,
}

/// 评估函数的过半数规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MajorityRule {
    /// 固定阈值（默认 5，即 3x3 棋盘的 9 格过半）
    Fixed(u32),
    /// 由实际格子数推导：floor(总格数 / 2) + 1
    Derived,
}

impl MajorityRule {
    /// 给定棋盘格子数下的阈值
    pub fn threshold(&self, total_cells: usize) -> u32 {
        match self {
            MajorityRule::Fixed(n) => *n,
            MajorityRule::Derived => (total_cells / 2) as u32 + 1,
        }
    }
}

impl Default for MajorityRule {
    fn default() -> Self {
        MajorityRule::Fixed(DEFAULT_MAJORITY)
    }
}

/// AI 配置
///
/// JSON 中缺省的字段取 `Default`（中等难度）的值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// 每次走子的思考时间
    pub time_limit_ms: u64,
    /// 迭代加深的深度上限（None 表示直到剩余边数）
    pub max_depth: Option<u32>,
    /// 单次搜索的节点上限，超出与超时同样处理
    pub max_nodes: Option<u64>,
    pub majority: MajorityRule,
    /// 在没有任何完整层时，采用被中断那一层中已评估的最佳走法
    pub keep_partial_depth: bool,
    /// 平局随机选择的种子（None 表示取系统熵）
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let (time_limit_ms, max_depth) = match difficulty {
            Difficulty::Easy => (100, Some(2)),
            Difficulty::Medium => (DEFAULT_TIME_LIMIT_MS, None),
            Difficulty::Hard => (2000, None),
        };
        Self {
            difficulty,
            time_limit_ms,
            max_depth,
            max_nodes: None,
            majority: MajorityRule::default(),
            keep_partial_depth: false,
            seed: None,
        }
    }

    /// 从 JSON 加载并校验
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let MajorityRule::Fixed(0) = self.majority {
            return Err(ConfigError::InvalidMajority(0));
        }
        if let Some(0) = self.max_depth {
            return Err(ConfigError::InvalidMaxDepth(0));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}
