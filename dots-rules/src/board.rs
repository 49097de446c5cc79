//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COLS, DEFAULT_ROWS, EDGES_PER_CELL, MAX_CELLS, MAX_EDGES};
use crate::error::{Result, RuleError};
use crate::moves::{Action, ActionGenerator, EdgeKind, Transition};
use crate::player::Player;

/// 完整的棋盘状态（格子、横边、竖边、走子方）
///
/// 横边网格为 (rows+1) x cols，竖边网格为 rows x (cols+1)，
/// 均以位掩码存储，索引为 y * 宽度 + x。整个状态是 `Copy` 的，
/// 搜索时每个节点复制一份而不需要堆分配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BoardRecord", try_from = "BoardRecord")]
pub struct BoardState {
    pub(crate) rows: u8,
    pub(crate) cols: u8,
    /// 格子值：绝对值为已占边数，符号为最近一次占边的玩家
    pub(crate) boxes: [i8; MAX_CELLS],
    pub(crate) row_edges: u64,
    pub(crate) col_edges: u64,
    pub(crate) turn: Player,
}

impl BoardState {
    /// 创建空棋盘，先手走子
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self::empty_unchecked(rows as u8, cols as u8))
    }

    /// 创建标准 3x3 空棋盘
    pub fn standard() -> Self {
        Self::empty_unchecked(DEFAULT_ROWS as u8, DEFAULT_COLS as u8)
    }

    fn empty_unchecked(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            boxes: [0; MAX_CELLS],
            row_edges: 0,
            col_edges: 0,
            turn: Player::First,
        }
    }

    /// 从各部分构造并校验状态
    ///
    /// `boxes` 按行优先排列，长度必须为 rows * cols；
    /// 每个格子的绝对值必须等于其四周已占边数。
    pub fn from_parts(
        rows: usize,
        cols: usize,
        boxes: &[i8],
        row_edges: u64,
        col_edges: u64,
        turn: Player,
    ) -> Result<Self> {
        Self::check_dimensions(rows, cols)?;
        let mut state = Self::empty_unchecked(rows as u8, cols as u8);

        if boxes.len() != rows * cols {
            return Err(RuleError::InvalidLayout {
                reason: format!("Expected {} cells, got {}", rows * cols, boxes.len()),
            });
        }
        if row_edges & !state.row_mask() != 0 || col_edges & !state.col_mask() != 0 {
            return Err(RuleError::InvalidLayout {
                reason: "Edge bits outside the grid".to_string(),
            });
        }

        state.boxes[..boxes.len()].copy_from_slice(boxes);
        state.row_edges = row_edges;
        state.col_edges = col_edges;
        state.turn = turn;

        for y in 0..rows {
            for x in 0..cols {
                let value = state.cell(y, x);
                let claimed = state.bounding_claimed(y, x);
                if value.unsigned_abs() != claimed {
                    return Err(RuleError::InvalidLayout {
                        reason: format!(
                            "Cell ({}, {}) holds {} but has {} claimed edges",
                            y, x, value, claimed
                        ),
                    });
                }
            }
        }

        Ok(state)
    }

    pub(crate) fn check_dimensions(rows: usize, cols: usize) -> Result<()> {
        let fits = rows >= 1
            && cols >= 1
            && (rows + 1) * cols <= MAX_EDGES
            && rows * (cols + 1) <= MAX_EDGES;
        if fits {
            Ok(())
        } else {
            Err(RuleError::InvalidDimensions { rows, cols })
        }
    }

    /// 格子行数
    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    /// 格子列数
    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// 格子总数
    pub fn total_cells(&self) -> usize {
        self.rows() * self.cols()
    }

    /// 横边总数
    pub fn row_edge_count(&self) -> usize {
        (self.rows() + 1) * self.cols()
    }

    /// 竖边总数
    pub fn col_edge_count(&self) -> usize {
        self.rows() * (self.cols() + 1)
    }

    /// 当前走子方
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// 获取格子值（第 y 行第 x 列）
    ///
    /// 要求 `y < rows` 且 `x < cols`，越界的 `x` 会读到下一行的格子。
    pub fn cell(&self, y: usize, x: usize) -> i8 {
        debug_assert!(y < self.rows() && x < self.cols(), "cell ({}, {}) out of bounds", y, x);
        self.boxes[y * self.cols() + x]
    }

    pub(crate) fn cell_mut(&mut self, y: usize, x: usize) -> &mut i8 {
        let cols = self.cols();
        &mut self.boxes[y * cols + x]
    }

    /// 格子的归属（仅在被占领时）
    pub fn owner(&self, y: usize, x: usize) -> Option<Player> {
        let value = self.cell(y, x);
        if value.unsigned_abs() == EDGES_PER_CELL {
            Player::from_sign(value)
        } else {
            None
        }
    }

    /// 指定玩家已占领的格子数
    pub fn score(&self, player: Player) -> usize {
        let captured = player.sign() * EDGES_PER_CELL as i8;
        self.boxes[..self.total_cells()]
            .iter()
            .filter(|&&v| v == captured)
            .count()
    }

    /// 横边 (x, y) 是否已被占据，要求 `x < cols` 且 `y <= rows`
    pub fn is_row_claimed(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.cols() && y <= self.rows(), "row edge ({}, {}) out of bounds", x, y);
        self.row_edges & (1u64 << self.row_index(x, y)) != 0
    }

    /// 竖边 (x, y) 是否已被占据，要求 `x <= cols` 且 `y < rows`
    pub fn is_col_claimed(&self, x: usize, y: usize) -> bool {
        debug_assert!(x <= self.cols() && y < self.rows(), "col edge ({}, {}) out of bounds", x, y);
        self.col_edges & (1u64 << self.col_index(x, y)) != 0
    }

    /// 走法对应的边是否已被占据
    pub fn is_claimed(&self, action: Action) -> bool {
        match action.kind {
            EdgeKind::Row => self.is_row_claimed(action.x, action.y),
            EdgeKind::Col => self.is_col_claimed(action.x, action.y),
        }
    }

    /// 已占据的边数
    pub fn claimed_edges(&self) -> usize {
        (self.row_edges.count_ones() + self.col_edges.count_ones()) as usize
    }

    /// 剩余未占据的边数
    pub fn remaining_edges(&self) -> usize {
        ActionGenerator::count(self)
    }

    /// 是否所有边都已被占据
    pub fn is_terminal(&self) -> bool {
        self.row_edges == self.row_mask() && self.col_edges == self.col_mask()
    }

    /// 胜者（未结束或平局时为 None）
    pub fn winner(&self) -> Option<Player> {
        if !self.is_terminal() {
            return None;
        }
        let first = self.score(Player::First);
        let second = self.score(Player::Second);
        match first.cmp(&second) {
            std::cmp::Ordering::Greater => Some(Player::First),
            std::cmp::Ordering::Less => Some(Player::Second),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// 校验并执行走法，返回新状态
    pub fn play(&self, action: Action) -> Result<BoardState> {
        if self.is_terminal() {
            return Err(RuleError::GameOver);
        }
        if !ActionGenerator::in_bounds(self, action) {
            return Err(RuleError::OutOfBounds {
                action: action.to_string(),
            });
        }
        if self.is_claimed(action) {
            return Err(RuleError::EdgeAlreadyClaimed {
                action: action.to_string(),
            });
        }
        Ok(Transition::apply(self, action))
    }

    pub(crate) fn row_index(&self, x: usize, y: usize) -> usize {
        y * self.cols() + x
    }

    pub(crate) fn col_index(&self, x: usize, y: usize) -> usize {
        y * (self.cols() + 1) + x
    }

    pub(crate) fn row_mask(&self) -> u64 {
        full_mask(self.row_edge_count())
    }

    pub(crate) fn col_mask(&self) -> u64 {
        full_mask(self.col_edge_count())
    }

    /// 格子 (y, x) 四周已占边数
    fn bounding_claimed(&self, y: usize, x: usize) -> u8 {
        [
            self.is_row_claimed(x, y),
            self.is_row_claimed(x, y + 1),
            self.is_col_claimed(x, y),
            self.is_col_claimed(x + 1, y),
        ]
        .into_iter()
        .filter(|&claimed| claimed)
        .count() as u8
    }
}

fn full_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for BoardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..=self.rows() {
            for x in 0..self.cols() {
                let edge = if self.is_row_claimed(x, y) { "--" } else { "  " };
                write!(f, "+{}", edge)?;
            }
            writeln!(f, "+")?;

            if y == self.rows() {
                break;
            }
            for x in 0..=self.cols() {
                let edge = if self.is_col_claimed(x, y) { '|' } else { ' ' };
                write!(f, "{}", edge)?;
                if x < self.cols() {
                    let mark = match self.owner(y, x) {
                        Some(Player::First) => "F ",
                        Some(Player::Second) => "S ",
                        None => "  ",
                    };
                    write!(f, "{}", mark)?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "turn: {}", self.turn)
    }
}

/// 线格式：按行嵌套的格子与边网格
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardRecord {
    board_status: Vec<Vec<i8>>,
    row_status: Vec<Vec<u8>>,
    col_status: Vec<Vec<u8>>,
    player1_turn: bool,
}

impl From<BoardState> for BoardRecord {
    fn from(state: BoardState) -> Self {
        let board_status = (0..state.rows())
            .map(|y| (0..state.cols()).map(|x| state.cell(y, x)).collect())
            .collect();
        let row_status = (0..=state.rows())
            .map(|y| {
                (0..state.cols())
                    .map(|x| state.is_row_claimed(x, y) as u8)
                    .collect()
            })
            .collect();
        let col_status = (0..state.rows())
            .map(|y| {
                (0..=state.cols())
                    .map(|x| state.is_col_claimed(x, y) as u8)
                    .collect()
            })
            .collect();

        Self {
            board_status,
            row_status,
            col_status,
            player1_turn: state.turn == Player::First,
        }
    }
}

impl TryFrom<BoardRecord> for BoardState {
    type Error = RuleError;

    fn try_from(record: BoardRecord) -> Result<Self> {
        let rows = record.board_status.len();
        let cols = record.board_status.first().map_or(0, Vec::len);
        Self::check_dimensions(rows, cols)?;

        let shape_ok = record.board_status.iter().all(|r| r.len() == cols)
            && record.row_status.len() == rows + 1
            && record.row_status.iter().all(|r| r.len() == cols)
            && record.col_status.len() == rows
            && record.col_status.iter().all(|r| r.len() == cols + 1);
        if !shape_ok {
            return Err(RuleError::InvalidLayout {
                reason: "Edge grids do not match the box grid".to_string(),
            });
        }

        let boxes: Vec<i8> = record.board_status.concat();
        let row_edges = pack_bits(&record.row_status)?;
        let col_edges = pack_bits(&record.col_status)?;
        let turn = if record.player1_turn {
            Player::First
        } else {
            Player::Second
        };

        Self::from_parts(rows, cols, &boxes, row_edges, col_edges, turn)
    }
}

fn pack_bits(grid: &[Vec<u8>]) -> Result<u64> {
    let mut mask = 0u64;
    for (i, &flag) in grid.iter().flatten().enumerate() {
        match flag {
            0 => {}
            1 => mask |= 1u64 << i,
            other => {
                return Err(RuleError::InvalidLayout {
                    reason: format!("Edge flag must be 0 or 1, got {}", other),
                })
            }
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_board() {
        let state = BoardState::standard();
        assert_eq!(state.rows(), 3);
        assert_eq!(state.cols(), 3);
        assert_eq!(state.row_edge_count(), 12);
        assert_eq!(state.col_edge_count(), 12);
        assert_eq!(state.remaining_edges(), 24);
        assert_eq!(state.turn(), Player::First);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            BoardState::new(0, 3),
            Err(RuleError::InvalidDimensions { rows: 0, cols: 3 })
        );
        // 8x8 需要 72 条横边，超出位掩码
        assert!(BoardState::new(8, 8).is_err());
        assert!(BoardState::new(7, 7).is_ok());
    }

    #[test]
    fn test_terminal_iff_all_claimed() {
        let mut state = BoardState::new(1, 2).unwrap();
        while let Some(&action) = ActionGenerator::generate(&state).first() {
            assert!(!state.is_terminal());
            state = state.play(action).unwrap();
        }
        assert!(state.is_terminal());
        assert_eq!(state.remaining_edges(), 0);
        assert_eq!(state.score(Player::First) + state.score(Player::Second), 2);
    }

    #[test]
    fn test_play_rejects_illegal() {
        let state = BoardState::new(2, 2).unwrap();
        let action = Action::row(0, 0);
        let next = state.play(action).unwrap();

        assert!(matches!(
            next.play(action),
            Err(RuleError::EdgeAlreadyClaimed { .. })
        ));
        assert!(matches!(
            state.play(Action::row(2, 0)),
            Err(RuleError::OutOfBounds { .. })
        ));
        assert!(matches!(
            state.play(Action::col(0, 2)),
            Err(RuleError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_play_on_finished_board() {
        let mut state = BoardState::new(1, 1).unwrap();
        for action in ActionGenerator::generate(&state) {
            state = state.play(action).unwrap();
        }
        assert_eq!(state.play(Action::row(0, 0)), Err(RuleError::GameOver));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of bounds")]
    fn test_cell_rejects_column_past_grid() {
        BoardState::standard().cell(0, 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of bounds")]
    fn test_row_edge_rejects_column_past_grid() {
        BoardState::standard().is_row_claimed(3, 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of bounds")]
    fn test_col_edge_rejects_row_past_grid() {
        BoardState::standard().is_col_claimed(0, 3);
    }

    #[test]
    fn test_from_parts_rejects_inconsistent_cell() {
        // 格子声称 1 条边，但没有任何边被占据
        let result = BoardState::from_parts(1, 1, &[-1], 0, 0, Player::First);
        assert!(matches!(result, Err(RuleError::InvalidLayout { .. })));
    }

    #[test]
    fn test_winner() {
        let mut state = BoardState::new(1, 1).unwrap();
        for action in ActionGenerator::generate(&state) {
            assert_eq!(state.winner(), None);
            state = state.play(action).unwrap();
        }
        // 四条边交替占据，第四条由后手完成
        assert_eq!(state.owner(0, 0), Some(Player::Second));
        assert_eq!(state.winner(), Some(Player::Second));
    }

    #[test]
    fn test_serde_wire_form() {
        let state = BoardState::standard()
            .play(Action::row(1, 0))
            .unwrap()
            .play(Action::col(3, 2))
            .unwrap();

        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["player1_turn"], serde_json::json!(true));
        assert_eq!(json["row_status"][0], serde_json::json!([0, 1, 0]));
        assert_eq!(json["col_status"][2], serde_json::json!([0, 0, 0, 1]));
        assert_eq!(json["board_status"][0], serde_json::json!([0, -1, 0]));
        assert_eq!(json["board_status"][2], serde_json::json!([0, 0, 1]));

        let decoded: BoardState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_serde_rejects_bad_shape() {
        let json = r#"{
            "board_status": [[0, 0]],
            "row_status": [[0, 0]],
            "col_status": [[0, 0, 0]],
            "player1_turn": true
        }"#;
        assert!(serde_json::from_str::<BoardState>(json).is_err());
    }

    #[test]
    fn test_display() {
        let state = BoardState::new(1, 1)
            .unwrap()
            .play(Action::row(0, 0))
            .unwrap()
            .play(Action::col(0, 0))
            .unwrap();
        let text = state.to_string();
        assert!(text.starts_with("+--+\n|   \n+  +\n"));
        assert!(text.ends_with("turn: first"));
    }
}
