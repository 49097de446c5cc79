//! 点格棋（Dots and Boxes）共享规则库
//!
//! 包含:
//! - 棋盘状态、玩家、边等核心数据结构
//! - 走法生成和状态转移（占格与连走规则）
//! - 局面字符串格式 (Layout)
//! - serde 线格式

mod board;
mod constants;
mod error;
mod layout;
mod moves;
mod player;

pub use board::BoardState;
pub use constants::*;
pub use error::{Result, RuleError};
pub use layout::{Layout, EMPTY_3X3};
pub use moves::{Action, ActionGenerator, EdgeKind, Transition};
pub use player::Player;
