//! 局面评估函数

use dots_rules::{BoardState, Player, EDGES_PER_CELL};

use crate::config::MajorityRule;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 从 `player` 视角评估局面
    ///
    /// 分值为双方已占格数之差；任一方达到过半数阈值时
    /// 饱和为正/负无穷。
    pub fn evaluate(state: &BoardState, player: Player, majority: MajorityRule) -> f64 {
        let (won, lost) = Self::captured(state, player);
        let threshold = majority.threshold(state.total_cells());

        if won >= threshold {
            f64::INFINITY
        } else if lost >= threshold {
            f64::NEG_INFINITY
        } else {
            won as f64 - lost as f64
        }
    }

    /// 统计 (己方占格数, 对方占格数)
    pub fn captured(state: &BoardState, player: Player) -> (u32, u32) {
        let mut won = 0;
        let mut lost = 0;
        for y in 0..state.rows() {
            for x in 0..state.cols() {
                let value = state.cell(y, x);
                if value.unsigned_abs() != EDGES_PER_CELL {
                    continue;
                }
                if Player::from_sign(value) == Some(player) {
                    won += 1;
                } else {
                    lost += 1;
                }
            }
        }
        (won, lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dots_rules::{ActionGenerator, Layout, Transition};

    /// 按生成顺序下完整局
    fn play_out(mut state: BoardState) -> BoardState {
        while let Some(&action) = ActionGenerator::generate(&state).first() {
            state = Transition::apply(&state, action);
        }
        state
    }

    #[test]
    fn test_empty_board() {
        let state = BoardState::standard();
        let score = Evaluator::evaluate(&state, Player::First, MajorityRule::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_single_capture() -> anyhow::Result<()> {
        // 左上角格子被先手占领
        let state = Layout::parse("DA0/A00/000 100/100/000/000 1100/0000/0000 f")?;
        let rule = MajorityRule::default();
        assert_eq!(Evaluator::captured(&state, Player::First), (1, 0));
        assert_eq!(Evaluator::evaluate(&state, Player::First, rule), 1.0);
        assert_eq!(Evaluator::evaluate(&state, Player::Second, rule), -1.0);
        Ok(())
    }

    #[test]
    fn test_fixed_majority_saturates() {
        let state = play_out(BoardState::standard());
        let winner = state.winner().expect("9 cells cannot tie");
        let rule = MajorityRule::default();
        assert_eq!(Evaluator::evaluate(&state, winner, rule), f64::INFINITY);
        assert_eq!(
            Evaluator::evaluate(&state, winner.opponent(), rule),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_fixed_majority_on_small_board() {
        // 1x2 棋盘按生成顺序下完，后手占两格
        let state = play_out(BoardState::new(1, 2).unwrap());
        assert_eq!(state.score(Player::Second), 2);

        let fixed = MajorityRule::default();
        assert_eq!(Evaluator::evaluate(&state, Player::Second, fixed), 2.0);
        assert_eq!(Evaluator::evaluate(&state, Player::First, fixed), -2.0);

        let derived = MajorityRule::Derived;
        assert_eq!(Evaluator::evaluate(&state, Player::Second, derived), f64::INFINITY);
        assert_eq!(
            Evaluator::evaluate(&state, Player::First, derived),
            f64::NEG_INFINITY
        );
    }
}
