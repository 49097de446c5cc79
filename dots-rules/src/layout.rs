//! 局面字符串解析和生成
//!
//! 格式：`<格子> <横边> <竖边> <走子方>`
//!
//! 每个网格从上到下按行列出，行之间用 `/` 分隔。
//! 格子字符：`0` 未触碰；`A`-`D` 先手最近占边、已占 1-4 条；`a`-`d` 后手同理。
//! 边字符：`0` 未占据，`1` 已占据。走子方：`f` 先手，`s` 后手。
//!
//! 示例（标准空棋盘）：
//! `000/000/000 000/000/000/000 0000/0000/0000 f`

use crate::board::BoardState;
use crate::error::RuleError;
use crate::player::Player;

/// 标准 3x3 空棋盘
pub const EMPTY_3X3: &str = "000/000/000 000/000/000/000 0000/0000/0000 f";

/// 局面字符串处理
pub struct Layout;

impl Layout {
    /// 解析局面字符串为棋盘状态
    pub fn parse(layout: &str) -> Result<BoardState, RuleError> {
        let parts: Vec<&str> = layout.split_whitespace().collect();
        if parts.len() != 4 {
            return Err(invalid(format!("Expected 4 fields, got {}", parts.len())));
        }

        let box_rows: Vec<&str> = parts[0].split('/').collect();
        let rows = box_rows.len();
        let cols = box_rows[0].chars().count();
        BoardState::check_dimensions(rows, cols)?;

        let mut boxes = Vec::with_capacity(rows * cols);
        for (y, row) in box_rows.iter().enumerate() {
            if row.chars().count() != cols {
                return Err(invalid(format!(
                    "Box row {} has {} columns, expected {}",
                    y,
                    row.chars().count(),
                    cols
                )));
            }
            for c in row.chars() {
                boxes.push(Self::parse_cell(c)?);
            }
        }

        let row_edges = Self::parse_edges(parts[1], rows + 1, cols)?;
        let col_edges = Self::parse_edges(parts[2], rows, cols + 1)?;

        let mut turn_chars = parts[3].chars();
        let turn = match (turn_chars.next(), turn_chars.next()) {
            (Some(c), None) => Player::from_layout_char(c),
            _ => None,
        }
        .ok_or_else(|| invalid(format!("Invalid turn: {}", parts[3])))?;

        BoardState::from_parts(rows, cols, &boxes, row_edges, col_edges, turn)
    }

    fn parse_cell(c: char) -> Result<i8, RuleError> {
        match c {
            '0' => Ok(0),
            'A'..='D' => Ok(-((c as u8 - b'A' + 1) as i8)),
            'a'..='d' => Ok((c as u8 - b'a' + 1) as i8),
            _ => Err(invalid(format!("Invalid cell character: {}", c))),
        }
    }

    /// 解析边网格为位掩码（行优先）
    fn parse_edges(field: &str, height: usize, width: usize) -> Result<u64, RuleError> {
        let lines: Vec<&str> = field.split('/').collect();
        if lines.len() != height {
            return Err(invalid(format!(
                "Expected {} edge rows, got {}",
                height,
                lines.len()
            )));
        }

        let mut mask = 0u64;
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() != width {
                return Err(invalid(format!(
                    "Edge row {} has {} entries, expected {}",
                    y,
                    line.chars().count(),
                    width
                )));
            }
            for (x, c) in line.chars().enumerate() {
                match c {
                    '0' => {}
                    '1' => mask |= 1u64 << (y * width + x),
                    _ => return Err(invalid(format!("Invalid edge character: {}", c))),
                }
            }
        }
        Ok(mask)
    }

    /// 将棋盘状态转换为局面字符串
    pub fn to_string(state: &BoardState) -> String {
        let boxes = (0..state.rows())
            .map(|y| {
                (0..state.cols())
                    .map(|x| Self::cell_char(state.cell(y, x)))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/");
        let row_edges = (0..=state.rows())
            .map(|y| {
                (0..state.cols())
                    .map(|x| edge_char(state.is_row_claimed(x, y)))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/");
        let col_edges = (0..state.rows())
            .map(|y| {
                (0..=state.cols())
                    .map(|x| edge_char(state.is_col_claimed(x, y)))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{} {} {} {}",
            boxes,
            row_edges,
            col_edges,
            state.turn().to_layout_char()
        )
    }

    fn cell_char(value: i8) -> char {
        let magnitude = value.unsigned_abs();
        match value.signum() {
            -1 => (b'A' + magnitude - 1) as char,
            1 => (b'a' + magnitude - 1) as char,
            _ => '0',
        }
    }
}

fn edge_char(claimed: bool) -> char {
    if claimed {
        '1'
    } else {
        '0'
    }
}

fn invalid(reason: String) -> RuleError {
    RuleError::InvalidLayout { reason }
}
