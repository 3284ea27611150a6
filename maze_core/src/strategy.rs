//! Exploration strategies plugged into `MazeSolver`.
//!
//! The solver owns the fixed call order (finish, walls, turn, forward); a
//! strategy only picks the turn and observes the motions that follow.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::seq::SliceRandom;

use crate::config::ExplorationCfg;
use crate::direction::{Direction, Openings, Side, Turn};
use crate::grid::{GridCoordinate, VisitedSquare, WalkedPath};

/// Scores closer than this are treated as a tie.
const SCORE_EPSILON: f64 = 1e-9;
/// Chebyshev distance at which the center-proximity term reaches zero.
const CENTER_PROXIMITY_SPAN: f64 = 8.0;

pub trait ExplorationStrategy {
    /// Pick the turn to execute before the next forward move.
    /// Called exactly once per move, after all three walls were queried.
    fn decide(&mut self, openings: Openings, rng: &mut dyn RngCore) -> Turn;

    /// The decided turn was executed by the motors.
    fn on_turn(&mut self, _turn: Turn) {}

    /// One forward move completed.
    fn on_move_forward(&mut self) {}

    /// Return to the start cell and drop all memory.
    fn reset(&mut self) {}

    /// Exploration memory, for strategies that keep one.
    fn exploration(&self) -> Option<&ExplorationState> {
        None
    }
}

/// Uniform choice among `candidates`; `Front` if empty.
fn pick_uniform(candidates: &[Side], rng: &mut dyn RngCore) -> Side {
    candidates.choose(rng).copied().unwrap_or(Side::Front)
}

/// Random walker: forced moves are taken, every branch is a fair coin.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl ExplorationStrategy for RandomStrategy {
    fn decide(&mut self, openings: Openings, rng: &mut dyn RngCore) -> Turn {
        match openings.open_sides().as_slice() {
            [] => Turn::Back,
            [only] => only.turn(),
            many => pick_uniform(many, rng).turn(),
        }
    }
}

/// Where the robot is and what it remembers about cells it has left.
#[derive(Debug, Clone)]
pub struct ExplorationState {
    current: GridCoordinate,
    facing: Direction,
    visited: HashMap<GridCoordinate, VisitedSquare>,
    /// Set when the current cell was found to be a dead end.
    current_is_dead_end: bool,
    last_square_was_dead_end: bool,
    path: WalkedPath,
}

impl ExplorationState {
    pub fn new(start: GridCoordinate, facing: Direction) -> Self {
        Self {
            current: start,
            facing,
            visited: HashMap::new(),
            current_is_dead_end: false,
            last_square_was_dead_end: false,
            path: WalkedPath::new(),
        }
    }

    pub fn current(&self) -> GridCoordinate {
        self.current
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn last_square_was_dead_end(&self) -> bool {
        self.last_square_was_dead_end
    }

    pub fn is_visited(&self, cell: GridCoordinate) -> bool {
        self.visited.contains_key(&cell)
    }

    pub fn is_dead_end(&self, cell: GridCoordinate) -> bool {
        self.visited.get(&cell).is_some_and(|sq| sq.is_dead_end)
    }

    /// Whether the robot has flagged the cell it is standing in.
    pub fn current_is_dead_end(&self) -> bool {
        self.current_is_dead_end
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn dead_end_count(&self) -> usize {
        self.visited.values().filter(|sq| sq.is_dead_end).count()
    }

    pub fn visited(&self) -> impl Iterator<Item = &VisitedSquare> {
        self.visited.values()
    }

    pub fn path(&self) -> &WalkedPath {
        &self.path
    }

    /// Cell one step toward `side` from the current cell.
    pub fn neighbour(&self, side: Side) -> GridCoordinate {
        self.current.step(side.toward(self.facing))
    }

    /// Seed memory directly, e.g. to resume from a known layout.
    pub fn remember(&mut self, square: VisitedSquare) {
        let entry = self
            .visited
            .entry(square.coordinate)
            .or_insert(VisitedSquare::new(square.coordinate));
        entry.is_dead_end |= square.is_dead_end;
    }

    fn mark_current_dead_end(&mut self) {
        self.current_is_dead_end = true;
        self.last_square_was_dead_end = true;
        tracing::debug!(cell = %self.current, "dead end");
    }

    fn turn(&mut self, turn: Turn) {
        self.facing = self.facing.after(turn);
    }

    /// Record the vacated cell and step into the next one. An existing
    /// dead-end flag on the vacated cell is never cleared.
    fn advance(&mut self) {
        let left = self.current;
        self.remember(VisitedSquare {
            coordinate: left,
            is_dead_end: self.current_is_dead_end,
        });
        self.path.push(left);
        self.current = left.step(self.facing);
        self.current_is_dead_end = false;
        tracing::debug!(cell = %self.current, facing = %self.facing, "entered cell");
    }
}

/// Prefers live, unexplored cells near the goal region; remembers and
/// avoids dead ends, propagating them backward along forced corridors.
#[derive(Debug, Clone)]
pub struct CuriousStrategy {
    cfg: ExplorationCfg,
    state: ExplorationState,
}

impl CuriousStrategy {
    pub fn new(cfg: ExplorationCfg) -> Self {
        let state = ExplorationState::new(cfg.start, cfg.start_direction);
        Self { cfg, state }
    }

    pub fn state(&self) -> &ExplorationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ExplorationState {
        &mut self.state
    }

    pub fn config(&self) -> &ExplorationCfg {
        &self.cfg
    }

    fn is_dead_toward(&self, side: Side) -> bool {
        self.state.is_dead_end(self.state.neighbour(side))
    }

    /// Heuristic score of the neighbour toward `side`. Pure over the
    /// current memory.
    pub fn score(&self, side: Side) -> f64 {
        let cell = self.state.neighbour(side);
        let cfg = &self.cfg;
        let mut score = 0.0;
        if !self.state.is_dead_end(cell) {
            score += cfg.prefer_non_dead_end_weight;
        }
        if !self.state.is_visited(cell) {
            score += cfg.prefer_unvisited_weight;
        }
        let distance = cell.chebyshev_to_nearest(&cfg.center_cells).unwrap_or(0);
        score += cfg.prefer_closer_to_center_weight * (CENTER_PROXIMITY_SPAN - f64::from(distance))
            / CENTER_PROXIMITY_SPAN;
        if side == Side::Front {
            score += cfg.prefer_no_turns_weight;
        }
        score
    }

    /// Single viable exit. Leaving a dead end through a forced exit makes
    /// this cell a dead end as well.
    fn forced(&mut self, side: Side) -> Turn {
        if self.state.last_square_was_dead_end {
            self.state.mark_current_dead_end();
        }
        side.turn()
    }

    /// Highest score wins; exact ties are broken uniformly.
    fn best_of(&mut self, candidates: &[Side], rng: &mut dyn RngCore) -> Turn {
        self.state.last_square_was_dead_end = false;
        let scored: Vec<(Side, f64)> = candidates.iter().map(|s| (*s, self.score(*s))).collect();
        let best = scored
            .iter()
            .map(|(_, score)| *score)
            .fold(f64::NEG_INFINITY, f64::max);
        let tied: Vec<Side> = scored
            .iter()
            .filter(|(_, score)| (best - score).abs() <= SCORE_EPSILON)
            .map(|(side, _)| *side)
            .collect();
        tracing::trace!(?scored, ?tied, "scored candidates");
        pick_uniform(&tied, rng).turn()
    }

    fn decide_pair(&mut self, a: Side, b: Side, rng: &mut dyn RngCore) -> Turn {
        match (self.is_dead_toward(a), self.is_dead_toward(b)) {
            (true, false) => self.forced(b),
            (false, true) => self.forced(a),
            _ => self.best_of(&[a, b], rng),
        }
    }

    fn decide_all(&mut self, rng: &mut dyn RngCore) -> Turn {
        let all = [Side::Left, Side::Front, Side::Right];
        let live: Vec<Side> = all
            .into_iter()
            .filter(|s| !self.is_dead_toward(*s))
            .collect();
        match live.as_slice() {
            [only] => self.forced(*only),
            [_, _] => self.best_of(&live, rng),
            _ => self.best_of(&all, rng),
        }
    }

    /// Back to the configured start with empty memory.
    pub fn reset_to_start_and_forget_everything(&mut self) {
        self.state = ExplorationState::new(self.cfg.start, self.cfg.start_direction);
    }
}

impl ExplorationStrategy for CuriousStrategy {
    fn decide(&mut self, openings: Openings, rng: &mut dyn RngCore) -> Turn {
        match openings.open_sides().as_slice() {
            [] => {
                self.state.mark_current_dead_end();
                Turn::Back
            }
            [only] => self.forced(*only),
            [a, b] => self.decide_pair(*a, *b, rng),
            _ => self.decide_all(rng),
        }
    }

    fn on_turn(&mut self, turn: Turn) {
        self.state.turn(turn);
    }

    fn on_move_forward(&mut self) {
        self.state.advance();
    }

    fn reset(&mut self) {
        self.reset_to_start_and_forget_everything();
    }

    fn exploration(&self) -> Option<&ExplorationState> {
        Some(&self.state)
    }
}

/// Strategy selector used by configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    Random,
    #[default]
    Curious,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "curious" => Ok(StrategyKind::Curious),
            other => Err(format!("unknown strategy '{other}' (expected random|curious)")),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::Random => "random",
            StrategyKind::Curious => "curious",
        })
    }
}

/// Runtime-selected strategy.
#[derive(Debug, Clone)]
pub enum AnyStrategy {
    Random(RandomStrategy),
    Curious(CuriousStrategy),
}

impl AnyStrategy {
    pub fn new(kind: StrategyKind, cfg: ExplorationCfg) -> Self {
        match kind {
            StrategyKind::Random => AnyStrategy::Random(RandomStrategy),
            StrategyKind::Curious => AnyStrategy::Curious(CuriousStrategy::new(cfg)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            AnyStrategy::Random(_) => StrategyKind::Random,
            AnyStrategy::Curious(_) => StrategyKind::Curious,
        }
    }
}

impl ExplorationStrategy for AnyStrategy {
    fn decide(&mut self, openings: Openings, rng: &mut dyn RngCore) -> Turn {
        match self {
            AnyStrategy::Random(s) => s.decide(openings, rng),
            AnyStrategy::Curious(s) => s.decide(openings, rng),
        }
    }

    fn on_turn(&mut self, turn: Turn) {
        match self {
            AnyStrategy::Random(s) => s.on_turn(turn),
            AnyStrategy::Curious(s) => s.on_turn(turn),
        }
    }

    fn on_move_forward(&mut self) {
        match self {
            AnyStrategy::Random(s) => s.on_move_forward(),
            AnyStrategy::Curious(s) => s.on_move_forward(),
        }
    }

    fn reset(&mut self) {
        match self {
            AnyStrategy::Random(s) => s.reset(),
            AnyStrategy::Curious(s) => s.reset(),
        }
    }

    fn exploration(&self) -> Option<&ExplorationState> {
        match self {
            AnyStrategy::Random(s) => s.exploration(),
            AnyStrategy::Curious(s) => s.exploration(),
        }
    }
}
