//! 走法生成和状态转移

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::constants::EDGES_PER_CELL;
use crate::error::RuleError;

/// 边的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// 横边
    Row,
    /// 竖边
    Col,
}

/// 走法：占据一条边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub kind: EdgeKind,
    /// 边网格中的列
    pub x: usize,
    /// 边网格中的行
    pub y: usize,
}

impl Action {
    /// 创建横边走法
    pub fn row(x: usize, y: usize) -> Self {
        Self {
            kind: EdgeKind::Row,
            x,
            y,
        }
    }

    /// 创建竖边走法
    pub fn col(x: usize, y: usize) -> Self {
        Self {
            kind: EdgeKind::Col,
            x,
            y,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.kind {
            EdgeKind::Row => 'r',
            EdgeKind::Col => 'c',
        };
        write!(f, "{}({},{})", prefix, self.x, self.y)
    }
}

impl FromStr for Action {
    type Err = RuleError;

    /// 解析 `r(x,y)` / `c(x,y)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RuleError::InvalidAction {
            input: s.to_string(),
        };
        let trimmed = s.trim();

        let kind = match trimmed.chars().next() {
            Some('r') | Some('R') => EdgeKind::Row,
            Some('c') | Some('C') => EdgeKind::Col,
            _ => return Err(invalid()),
        };
        let inner = trimmed[1..]
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (x, y) = inner.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;

        Ok(Self { kind, x, y })
    }
}

/// 走法生成器
pub struct ActionGenerator;

impl ActionGenerator {
    /// 生成所有未占据的边：先横边后竖边，各自按行优先顺序
    pub fn generate(state: &BoardState) -> Vec<Action> {
        let mut actions = Vec::with_capacity(Self::count(state));
        let cols = state.cols();

        let mut free = !state.row_edges & state.row_mask();
        while free != 0 {
            let index = free.trailing_zeros() as usize;
            free &= free - 1;
            actions.push(Action::row(index % cols, index / cols));
        }

        let mut free = !state.col_edges & state.col_mask();
        while free != 0 {
            let index = free.trailing_zeros() as usize;
            free &= free - 1;
            actions.push(Action::col(index % (cols + 1), index / (cols + 1)));
        }

        actions
    }

    /// 未占据的边数
    pub fn count(state: &BoardState) -> usize {
        let rows = (!state.row_edges & state.row_mask()).count_ones();
        let cols = (!state.col_edges & state.col_mask()).count_ones();
        (rows + cols) as usize
    }

    /// 坐标是否落在对应的边网格内
    pub fn in_bounds(state: &BoardState, action: Action) -> bool {
        match action.kind {
            EdgeKind::Row => action.y <= state.rows() && action.x < state.cols(),
            EdgeKind::Col => action.y < state.rows() && action.x <= state.cols(),
        }
    }

    /// 走法是否合法（在界内且未被占据）
    pub fn is_legal(state: &BoardState, action: Action) -> bool {
        Self::in_bounds(state, action) && !state.is_claimed(action)
    }
}

/// 状态转移：占边、更新相邻格子、处理连走
pub struct Transition;

impl Transition {
    /// 执行走法（不检查合法性），返回新状态
    pub fn apply(state: &BoardState, action: Action) -> BoardState {
        Self::apply_with_captures(state, action).0
    }

    /// 执行走法，同时返回本步占领的格子数（0-2）
    pub fn apply_with_captures(state: &BoardState, action: Action) -> (BoardState, u8) {
        let mut next = *state;
        let sign = state.turn.sign();
        let (x, y) = (action.x, action.y);
        let mut captured = 0;

        match action.kind {
            EdgeKind::Row => {
                next.row_edges |= 1u64 << state.row_index(x, y);
                // 下方格子
                if y < state.rows() {
                    captured += Self::mark_cell(&mut next, y, x, sign);
                }
                // 上方格子
                if y > 0 {
                    captured += Self::mark_cell(&mut next, y - 1, x, sign);
                }
            }
            EdgeKind::Col => {
                next.col_edges |= 1u64 << state.col_index(x, y);
                // 右侧格子
                if x < state.cols() {
                    captured += Self::mark_cell(&mut next, y, x, sign);
                }
                // 左侧格子
                if x > 0 {
                    captured += Self::mark_cell(&mut next, y, x - 1, sign);
                }
            }
        }

        // 占格则继续走子，否则交换
        if captured == 0 {
            next.turn = state.turn.opponent();
        }

        (next, captured)
    }

    fn mark_cell(state: &mut BoardState, y: usize, x: usize, sign: i8) -> u8 {
        let cell = state.cell_mut(y, x);
        let magnitude = cell.unsigned_abs() + 1;
        *cell = magnitude as i8 * sign;
        u8::from(magnitude == EDGES_PER_CELL)
    }
}
