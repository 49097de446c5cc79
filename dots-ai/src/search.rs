//! 搜索引擎
//!
//! 实现 Minimax + Alpha-Beta 剪枝 + 限时迭代加深

use std::time::{Duration, Instant};

use dots_rules::{Action, ActionGenerator, BoardState, Player, Transition};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::config::{AiConfig, Difficulty, MajorityRule};
use crate::deadline::Deadline;
use crate::error::SearchError;
use crate::evaluate::Evaluator;

/// 单次搜索的结果与统计
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    /// 选中的走法（无合法走法或第一层未完成时为 None）
    pub best_action: Option<Action>,
    /// 选中走法在该层的评估值
    pub score: Option<f64>,
    /// 最后一个完整完成的深度（0 表示没有）
    pub completed_depth: u32,
    pub nodes: u64,
    pub elapsed: Duration,
    /// 是否因预算耗尽而停止加深
    pub timed_out: bool,
}

/// 单次请求的搜索上下文，不在引擎实例上共享
struct SearchContext {
    /// 发起请求的玩家，整个搜索过程中固定
    player: Player,
    deadline: Deadline,
    majority: MajorityRule,
    nodes: u64,
}

/// AI 引擎
///
/// 只持有配置，可在多个线程间共享并同时调用。
#[derive(Debug, Clone, Default)]
pub struct AiEngine {
    config: AiConfig,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 搜索最佳走法
    pub fn search(&self, state: &BoardState) -> Option<Action> {
        self.search_with_report(state).best_action
    }

    /// 搜索最佳走法，并返回统计信息
    pub fn search_with_report(&self, state: &BoardState) -> SearchReport {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        self.search_with_rng(state, &mut rng)
    }

    /// 使用调用方提供的随机源打破平局
    pub fn search_with_rng<R: Rng + ?Sized>(&self, state: &BoardState, rng: &mut R) -> SearchReport {
        let deadline = Deadline::after(self.config.time_limit());
        self.search_until(state, deadline, rng)
    }

    /// 迭代加深：逐层评估所有根走法，只采用完整完成的层
    pub fn search_until<R: Rng + ?Sized>(
        &self,
        state: &BoardState,
        deadline: Deadline,
        rng: &mut R,
    ) -> SearchReport {
        let started = Instant::now();
        let mut ctx = SearchContext {
            player: state.turn(),
            deadline: deadline.with_max_nodes(self.config.max_nodes),
            majority: self.config.majority,
            nodes: 0,
        };
        let mut report = SearchReport {
            best_action: None,
            score: None,
            completed_depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            timed_out: false,
        };

        let remaining = ActionGenerator::count(state) as u32;
        let depth_limit = self
            .config
            .max_depth
            .map_or(remaining, |cap| cap.min(remaining));

        for depth in 1..=depth_limit {
            let actions = ActionGenerator::generate(state);
            let mut partial = None;

            match Self::evaluate_root(state, &actions, depth, &mut ctx, &mut partial) {
                Ok(values) => {
                    let best = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                    let ties: Vec<usize> = (0..values.len()).filter(|&i| values[i] == best).collect();
                    if let Some(&index) = ties.choose(&mut *rng) {
                        report.best_action = Some(actions[index]);
                        report.score = Some(best);
                        report.completed_depth = depth;
                    }
                    debug!(
                        "depth {} done: best {:?} = {} ({} tied, {} nodes)",
                        depth,
                        report.best_action,
                        best,
                        ties.len(),
                        ctx.nodes
                    );
                }
                Err(SearchError::DeadlineExceeded) => {
                    report.timed_out = true;
                    if self.config.keep_partial_depth && report.best_action.is_none() {
                        if let Some((index, value)) = partial {
                            report.best_action = Some(actions[index]);
                            report.score = Some(value);
                        }
                    }
                    debug!("depth {} abandoned after {} nodes", depth, ctx.nodes);
                    break;
                }
            }
        }

        report.nodes = ctx.nodes;
        report.elapsed = started.elapsed();
        info!(
            "selected {:?} at depth {} ({} nodes, {:?})",
            report.best_action, report.completed_depth, report.nodes, report.elapsed
        );
        report
    }

    /// 评估一层的所有根走法，`partial` 记录该层目前为止的最佳 (索引, 值)
    fn evaluate_root(
        state: &BoardState,
        actions: &[Action],
        depth: u32,
        ctx: &mut SearchContext,
        partial: &mut Option<(usize, f64)>,
    ) -> Result<Vec<f64>, SearchError> {
        let mut values = Vec::with_capacity(actions.len());
        for (index, &action) in actions.iter().enumerate() {
            let child = Transition::apply(state, action);
            let value = Self::alpha_beta(
                &child,
                0,
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
                ctx,
            )?;
            trace!("depth {} {} = {}", depth, action, value);

            if partial.is_none_or(|(_, best)| value > best) {
                *partial = Some((index, value));
            }
            values.push(value);
        }
        Ok(values)
    }

    /// Alpha-Beta 搜索（请求方为极大层，对手为极小层）
    fn alpha_beta(
        state: &BoardState,
        depth: u32,
        max_depth: u32,
        mut alpha: f64,
        mut beta: f64,
        ctx: &mut SearchContext,
    ) -> Result<f64, SearchError> {
        ctx.nodes += 1;
        ctx.deadline.check(ctx.nodes)?;

        if state.is_terminal() || depth == max_depth {
            return Ok(Evaluator::evaluate(state, ctx.player, ctx.majority));
        }

        let actions = ActionGenerator::generate(state);

        if state.turn() == ctx.player {
            let mut value = f64::NEG_INFINITY;
            for action in actions {
                let child = Transition::apply(state, action);
                let score = Self::alpha_beta(&child, depth + 1, max_depth, alpha, beta, ctx)?;
                value = value.max(score);
                alpha = alpha.max(value);
                if beta <= alpha {
                    break;
                }
            }
            Ok(value)
        } else {
            let mut value = f64::INFINITY;
            for action in actions {
                let child = Transition::apply(state, action);
                let score = Self::alpha_beta(&child, depth + 1, max_depth, alpha, beta, ctx)?;
                value = value.min(score);
                beta = beta.min(value);
                if beta <= alpha {
                    break;
                }
            }
            Ok(value)
        }
    }
}
