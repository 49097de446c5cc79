//! 玩家定义

use serde::{Deserialize, Serialize};

/// 玩家
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// 先手（格子值记为负数）
    First,
    /// 后手（格子值记为正数）
    Second,
}

impl Player {
    /// 获取对手
    pub fn opponent(&self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// 该玩家在格子值中的符号
    pub fn sign(&self) -> i8 {
        match self {
            Player::First => -1,
            Player::Second => 1,
        }
    }

    /// 从格子值的符号解析（0 表示无人）
    pub fn from_sign(value: i8) -> Option<Player> {
        match value.signum() {
            -1 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// 获取局面字符串中的字符
    pub fn to_layout_char(&self) -> char {
        match self {
            Player::First => 'f',
            Player::Second => 's',
        }
    }

    /// 从局面字符串字符解析
    pub fn from_layout_char(c: char) -> Option<Player> {
        match c {
            'f' | 'F' => Some(Player::First),
            's' | 'S' => Some(Player::Second),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::First => write!(f, "first"),
            Player::Second => write!(f, "second"),
        }
    }
}
