//! Iterative-deepening negamax with alpha-beta, quiescence, late move
//! reduction, and transposition/history-backed move ordering.
//!
//! A [`Search`] owns the transposition table and history table for one
//! search session; a [`Position`] is mutated in place via repeated
//! `make`/`undo` rather than cloned per node.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::eval::{evaluate, LOWER_BOUND, UPPER_BOUND};
use crate::history::History;
use crate::movepick::{see, MovePicker};
use crate::moves::Move;
use crate::position::Position;
use crate::tt::{NodeKind, TableEntry, Transpositions};

/// Search is stopped past this depth regardless of time/node limits.
pub const MAX_DEPTH: i32 = 64;

/// Caps soft `UPPER_BOUND - ply` mate scores from drifting into the
/// material range; any score this close to the bound is a forced mate.
const MATE_THRESHOLD: i32 = UPPER_BOUND - MAX_DEPTH * 2;

/// Search limits a driver passes per call; all fields optional so a driver
/// with no time control at all can request "run until stopped or
/// `MAX_DEPTH`".
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchLimits {
    pub soft_deadline: Option<Duration>,
    pub max_nodes: Option<u64>,
    pub max_depth: Option<u8>,
}

/// Tunables that don't belong baked into constants: transposition table
/// size and the quiescence depth cap, supplied once at `Search::new` so a
/// driver can tune memory/time tradeoffs without recompiling.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub tt_capacity_power_of_two: u32,
    pub max_quiescence_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            tt_capacity_power_of_two: 20,
            max_quiescence_depth: 8,
        }
    }
}

/// Reported once per completed iterative-deepening depth.
#[derive(Clone, Debug)]
pub struct IterationInfo {
    pub depth: i32,
    pub value: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

/// The outcome of a `Search::search` call.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub value: i32,
    pub pv: Vec<Move>,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Owns the transposition table and history heuristic for one search
/// session; neither is meaningful across unrelated positions, so `reset`
/// clears both.
pub struct Search {
    tt: Transpositions,
    history: History,
    stop_flag: Arc<AtomicBool>,
    config: EngineConfig,
}

struct NodeContext<'a> {
    limits: &'a SearchLimits,
    deadline: Option<Instant>,
    nodes: u64,
    stop_flag: &'a AtomicBool,
    stopped: bool,
}

impl NodeContext<'_> {
    /// Checked at a coarse interior granularity so the stop check doesn't
    /// dominate the hot loop, and always at iteration boundaries.
    #[inline]
    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if self.nodes & 0x7FF == 0 {
            if self.stop_flag.load(Ordering::Relaxed) {
                self.stopped = true;
                return true;
            }
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stopped = true;
                    return true;
                }
            }
            if let Some(cap) = self.limits.max_nodes {
                if self.nodes >= cap {
                    self.stopped = true;
                    return true;
                }
            }
        }
        false
    }
}

impl Search {
    pub fn new(config: EngineConfig) -> Search {
        Search {
            tt: Transpositions::new(config.tt_capacity_power_of_two),
            history: History::new(),
            stop_flag: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Signals an in-progress `search` to return the best move of the last
    /// completed depth. Safe to call from another thread since the flag is
    /// the only thing shared across the boundary.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Clears the transposition table and history heuristic; leaves search
    /// limits and configuration untouched.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.history.clear();
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    pub fn tt_len(&self) -> usize {
        self.tt.len()
    }

    /// Runs iterative deepening from the root, calling `on_iteration` after
    /// each completed depth and `on_pv` whenever the principal variation at
    /// the root changes. Returns the best move of the deepest completed
    /// iteration; an in-progress iteration's partial results are discarded.
    pub fn search(
        &mut self,
        position: &mut Position,
        limits: SearchLimits,
        mut on_iteration: Option<&mut dyn FnMut(IterationInfo)>,
        mut on_pv: Option<&mut dyn FnMut(&[Move])>,
    ) -> SearchResult {
        self.stop_flag.store(false, Ordering::Relaxed);
        let start = Instant::now();
        let deadline = limits.soft_deadline.map(|d| start + d);
        let max_depth = limits
            .max_depth
            .map(|d| d as i32)
            .unwrap_or(MAX_DEPTH)
            .min(MAX_DEPTH);

        let mut ctx = NodeContext {
            limits: &limits,
            deadline,
            nodes: 0,
            stop_flag: &self.stop_flag,
            stopped: false,
        };

        let mut best = SearchResult {
            best_move: None,
            value: 0,
            pv: Vec::new(),
            nodes: 0,
            elapsed: Duration::ZERO,
        };

        for depth in 1..=max_depth {
            let mut pv = Vec::new();
            let value = self.negamax(position, depth, 0, LOWER_BOUND, UPPER_BOUND, &mut ctx, &mut pv);

            if ctx.stopped && depth > 1 {
                break;
            }

            best.value = value;
            best.pv = pv.clone();
            best.best_move = pv.first().copied().or(best.best_move);
            best.nodes = ctx.nodes;
            best.elapsed = start.elapsed();

            if let Some(cb) = on_iteration.as_deref_mut() {
                cb(IterationInfo {
                    depth,
                    value,
                    nodes: ctx.nodes,
                    elapsed: best.elapsed,
                    pv: pv.clone(),
                });
            }
            if let Some(cb) = on_pv.as_deref_mut() {
                cb(&pv);
            }

            if ctx.stopped || value.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        best
    }

    /// Negamax over the subtree rooted at `position`'s current state.
    /// `ply` is distance from the search root, used to prefer shallower
    /// mates over deeper ones in the returned score.
    fn negamax(
        &mut self,
        position: &mut Position,
        depth: i32,
        ply: i32,
        mut alpha: i32,
        beta: i32,
        ctx: &mut NodeContext,
        pv: &mut Vec<Move>,
    ) -> i32 {
        ctx.nodes += 1;
        if ctx.should_stop() {
            return evaluate(position);
        }

        if position.is_checkmate() {
            return -UPPER_BOUND + ply;
        }
        if position.is_draw() {
            return 0;
        }
        if depth <= 0 {
            return self.quiescence(position, 0, alpha, beta, ctx);
        }

        let original_alpha = alpha;
        let hash = position.hash();
        let tt_entry = self.tt.get(hash);
        let tt_hit = tt_entry.hash == hash && tt_entry.kind != NodeKind::Invalid;
        let hash_move = if tt_hit { Some(tt_entry.best_move) } else { None };

        if tt_hit && tt_entry.depth >= depth {
            match tt_entry.kind {
                NodeKind::Exact => {
                    pv.clear();
                    pv.push(tt_entry.best_move);
                    return tt_entry.value;
                }
                NodeKind::Lower if tt_entry.value >= beta => return tt_entry.value,
                NodeKind::Upper if tt_entry.value <= alpha => return tt_entry.value,
                _ => {}
            }
        }

        let board = position.board().clone();
        let moves: Vec<Move> = position.moves().to_vec();
        let picker = MovePicker::new(&board, &moves, hash_move, &self.history);

        let mut best_value = LOWER_BOUND;
        let mut best_move = Move::NULL;
        let mut child_pv = Vec::new();

        for (index, mv) in picker.enumerate() {
            let is_tactical = mv.is_tactical() || mv.kind().is_castle();

            if depth >= 3 && index >= 2 && !is_tactical && !position.is_check() {
                position.make(mv);
                let probe = -self.negamax(position, depth - 2, ply + 1, -alpha - 1, -alpha, ctx, &mut child_pv);
                position.undo();
                if probe <= alpha {
                    continue;
                }
            }

            position.make(mv);
            child_pv.clear();
            let value = -self.negamax(position, depth - 1, ply + 1, -beta, -alpha, ctx, &mut child_pv);
            position.undo();

            if ctx.stopped {
                return best_value.max(value);
            }

            if value > best_value {
                best_value = value;
                best_move = mv;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                self.history.on_beta_cutoff(&board, mv, depth);
                break;
            }
        }

        let kind = if best_value <= original_alpha {
            NodeKind::Upper
        } else if best_value >= beta {
            NodeKind::Lower
        } else {
            NodeKind::Exact
        };
        self.tt.store(TableEntry {
            hash,
            depth,
            value: best_value,
            kind,
            best_move,
        });

        best_value
    }

    /// Tail search over captures and promotions only, damping the horizon
    /// effect at the leaves of the main search. Bad captures (negative
    /// static-exchange value) are pruned rather than explored.
    fn quiescence(
        &mut self,
        position: &mut Position,
        qdepth: u8,
        mut alpha: i32,
        beta: i32,
        ctx: &mut NodeContext,
    ) -> i32 {
        ctx.nodes += 1;
        if ctx.should_stop() {
            return evaluate(position);
        }
        if position.is_checkmate() {
            return -UPPER_BOUND;
        }
        if position.is_draw() {
            return 0;
        }

        let stand_pat = evaluate(position);
        if stand_pat >= beta {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if qdepth >= self.config.max_quiescence_depth {
            return stand_pat;
        }

        let board = position.board().clone();
        let tactical: Vec<Move> = position
            .moves()
            .iter()
            .copied()
            .filter(|m| m.is_tactical())
            .filter(|m| !m.is_capture() || see(&board, *m) > 0)
            .collect();

        let mut best_value = stand_pat;
        for mv in tactical {
            position.make(mv);
            let value = -self.quiescence(position, qdepth + 1, -beta, -alpha, ctx);
            position.undo();

            if ctx.stopped {
                return best_value.max(value);
            }
            if value > best_value {
                best_value = value;
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                break;
            }
        }
        best_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_mate_in_one() {
        // White rook slides to the back rank; the pawns on f7/g7/h7 seal
        // every escape square for the black king.
        let mut pos = Position::new("6k1/5ppp/8/8/8/8/8/4R1K1 w - - 0 1").unwrap();
        let mut search = Search::new(EngineConfig::default());
        let limits = SearchLimits {
            max_depth: Some(3),
            ..Default::default()
        };
        let result = search.search(&mut pos, limits, None, None);
        let best = result.best_move.expect("search should find a move");
        assert_eq!(best.to_notation(), "e1e8");
        assert!(result.value.abs() > 100_000);
    }

    #[test]
    fn prefers_material_gain_over_quiet_move() {
        let mut pos = Position::new("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mut search = Search::new(EngineConfig::default());
        let limits = SearchLimits {
            max_depth: Some(4),
            ..Default::default()
        };
        let result = search.search(&mut pos, limits, None, None);
        let best = result.best_move.expect("search should find a move");
        assert_eq!(best.to_notation(), "e4d5");
    }

    #[test]
    fn reset_clears_transposition_table_and_history() {
        let mut pos = Position::startpos();
        let mut search = Search::new(EngineConfig::default());
        let limits = SearchLimits {
            max_depth: Some(3),
            ..Default::default()
        };
        search.search(&mut pos, limits, None, None);
        assert!(search.tt_len() > 0);
        search.reset();
        assert_eq!(search.tt.get(pos.hash()).kind, NodeKind::Invalid);
    }

    #[test]
    fn node_cap_halts_search_before_max_depth() {
        let mut pos = Position::startpos();
        let mut search = Search::new(EngineConfig::default());
        let limits = SearchLimits {
            max_depth: Some(10),
            max_nodes: Some(50),
            ..Default::default()
        };
        let result = search.search(&mut pos, limits, None, None);
        // Depth-1 always completes even under an immediate node cap, so
        // callers always get a legal move back rather than `None`.
        assert!(result.best_move.is_some());
        assert!(result.nodes < 50_000, "expected an early stop, searched {} nodes", result.nodes);
    }

    #[test]
    fn stop_called_between_searches_does_not_linger() {
        let mut pos = Position::startpos();
        let mut search = Search::new(EngineConfig::default());
        search.stop();
        let limits = SearchLimits {
            max_depth: Some(3),
            ..Default::default()
        };
        // `search` clears the stop flag at its own start, so a stop()
        // requested before this call must not block it.
        let result = search.search(&mut pos, limits, None, None);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn forced_mate_sequence_begins_with_expected_move() {
        let mut pos = Position::new("r5rk/5p1p/5R2/4B3/8/8/7P/7K w - - 0 0").unwrap();
        let mut search = Search::new(EngineConfig::default());
        let limits = SearchLimits {
            max_depth: Some(6),
            ..Default::default()
        };
        let result = search.search(&mut pos, limits, None, None);
        let best = result.best_move.expect("search should find a move");
        assert_eq!(best.to_notation(), "f6a6");
    }
}
