//! 规则常量定义

/// 标准棋盘行数（格子）
pub const DEFAULT_ROWS: usize = 3;

/// 标准棋盘列数（格子）
pub const DEFAULT_COLS: usize = 3;

/// 单个方向边的最大数量（受 u64 位掩码限制）
pub const MAX_EDGES: usize = 64;

/// 格子的最大数量
pub const MAX_CELLS: usize = 64;

/// 格子被占领时的已占边数
pub const EDGES_PER_CELL: u8 = 4;

/// AI 默认思考时间（毫秒）
pub const DEFAULT_TIME_LIMIT_MS: u64 = 500;

/// 标准 3x3 棋盘的过半数（9 格中的 5 格）
pub const DEFAULT_MAJORITY: u32 = 5;
