//! Game state module - manages the complete round state
//!
//! This module ties together all core components: grid, resolver, RNG,
//! scoring and observers. It handles the selection protocol, swap
//! validation, the cascade lifecycle, the round timer and goal progression.
//!
//! # Lifecycle
//!
//! ```text
//! new ──start_round──▶ running, Idle ──swap──▶ Resolving(pass) ──stable──▶ Idle
//!                          │                        │
//!                          └──timer expires, goal missed──▶ over (GameOver once)
//! ```
//!
//! With `cascade_pass_ms == 0` a swap settles its whole cascade before
//! returning. Otherwise the first pass runs inside the swap and each later
//! pass runs from [`GameState::on_tick`]; the round ending halts the cascade
//! between passes.

use tracing::{debug, error, info};

use crate::config::GameConfig;
use crate::effects::{EffectSink, NullSink};
use crate::error::{ConfigError, GridError, SwapError};
use crate::events::{GameEvent, Observer, Observers, SubscriptionId};
use crate::grid::Grid;
use crate::resolver::{Cascade, CascadeReport, Resolver};
use crate::rng::{SimpleRng, TokenSource};
use crate::scoring::{goal_met, next_goal};
use crate::snapshot::GameSnapshot;
use crate::types::Coord;

/// Resolution state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// `pass` is the next pass to run.
    Resolving { pass: u32 },
}

/// Result of a click under the selection protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Coord),
    Deselected(Coord),
    /// A non-adjacent click moved the selection.
    Reselected { from: Coord, to: Coord },
    Swapped(SwapOutcome),
}

/// An accepted swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub from: Coord,
    pub to: Coord,
    /// Everything resolved so far. Complete when `settled` is true.
    pub cascade: CascadeReport,
    pub settled: bool,
}

/// Result of advancing the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No round running.
    Idle,
    Running,
    /// Timer expired with the goal met; timer restarted.
    GoalBeaten { new_goal: u64 },
    /// Timer expired with the goal missed; round over.
    GameOver { points: u64, goal: u64 },
}

/// Complete round state
pub struct GameState<S: EffectSink = NullSink, R: TokenSource = SimpleRng> {
    config: GameConfig,
    grid: Grid,
    source: R,
    resolver: Resolver,
    sink: S,
    observers: Observers,
    selected: Option<Coord>,
    cascade: Option<Cascade>,
    pass_wait_ms: u32,
    points: u64,
    round_goal: u64,
    timer_ms: u32,
    running: bool,
    rush: bool,
    /// Monotonic round id (increments on every start).
    round_id: u32,
}

impl GameState {
    /// Create a game with the default sink and a seeded RNG.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let seed = config.seed;
        Self::with_parts(config, NullSink, SimpleRng::new(seed))
    }
}

impl<S: EffectSink> GameState<S> {
    pub fn with_sink(config: GameConfig, sink: S) -> Result<Self, ConfigError> {
        let seed = config.seed;
        Self::with_parts(config, sink, SimpleRng::new(seed))
    }

    /// Restart the RNG sequence.
    pub fn reseed(&mut self, seed: u32) {
        self.source.reseed(seed);
    }
}

impl<S: EffectSink, R: TokenSource> GameState<S, R> {
    pub fn with_parts(config: GameConfig, sink: S, mut source: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::generate(config.width, config.height, config.piece_count, &mut source);
        let resolver = Resolver::new(config.piece_count, config.points_per_piece)
            .with_max_passes(config.max_cascade_passes);

        Ok(Self {
            round_goal: config.initial_goal,
            timer_ms: config.round_ms,
            config,
            grid,
            source,
            resolver,
            sink,
            observers: Observers::new(),
            selected: None,
            cascade: None,
            pass_wait_ms: 0,
            points: 0,
            running: false,
            rush: false,
            round_id: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn round_goal(&self) -> u64 {
        self.round_goal
    }

    pub fn timer_ms(&self) -> u32 {
        self.timer_ms
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn rush(&self) -> bool {
        self.rush
    }

    pub fn round_id(&self) -> u32 {
        self.round_id
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        match &self.cascade {
            Some(c) => Phase::Resolving {
                pass: c.next_pass(),
            },
            None => Phase::Idle,
        }
    }

    pub fn is_resolving(&self) -> bool {
        self.cascade.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.write_grid(&self.grid);
        out.points = self.points;
        out.round_goal = self.round_goal;
        out.timer_ms = self.timer_ms;
        out.running = self.running;
        out.rush = self.rush;
        out.resolving = self.is_resolving();
        out.selected = self.selected.map(|c| [c.x, c.y]);
        out.round_id = self.round_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Start a round on a freshly generated board.
    pub fn start_round(&mut self, rush: bool) {
        let grid = Grid::generate(
            self.config.width,
            self.config.height,
            self.config.piece_count,
            &mut self.source,
        );
        self.start_round_with(rush, grid);
    }

    /// Start a round on a prepared board (fixtures, replays).
    ///
    /// The board is used as-is; any runs already on it resolve after the
    /// first swap.
    pub fn start_round_with(&mut self, rush: bool, grid: Grid) {
        self.grid = grid;
        self.selected = None;
        self.cascade = None;
        self.pass_wait_ms = 0;
        self.points = 0;
        self.round_goal = self.config.initial_goal;
        self.timer_ms = self.config.round_duration_ms(rush);
        self.rush = rush;
        self.running = true;
        self.round_id = self.round_id.wrapping_add(1);

        info!(
            round = self.round_id,
            rush,
            width = self.grid.width(),
            height = self.grid.height(),
            goal = self.round_goal,
            timer_ms = self.timer_ms,
            "round started"
        );

        self.observers.emit(GameEvent::RoundStarted { rush });
        self.observers.emit(GameEvent::PointsChanged(self.points));
        self.observers.emit(GameEvent::GoalChanged(self.round_goal));
        self.observers.emit(GameEvent::TimerReset(self.timer_ms));
    }

    /// Stop the round now. Returns false if no round was running.
    pub fn end_round(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.finish_round();
        true
    }

    fn finish_round(&mut self) {
        self.running = false;
        if let Some(cascade) = self.cascade.take() {
            debug!(next_pass = cascade.next_pass(), "cascade halted by round end");
        }
        self.pass_wait_ms = 0;
        if let Some(c) = self.selected.take() {
            self.sink.on_deselect(c);
        }

        info!(
            round = self.round_id,
            points = self.points,
            goal = self.round_goal,
            "game over"
        );
        self.observers.emit(GameEvent::GameOver {
            points: self.points,
            goal: self.round_goal,
        });
    }

    /// Handle a click on `coord` following the selection protocol.
    ///
    /// - no selection: select `coord`
    /// - same cell: clear the selection
    /// - non-adjacent cell: move the selection there
    /// - adjacent cell: swap
    pub fn click(&mut self, coord: Coord) -> Result<ClickOutcome, SwapError> {
        self.check_accepting()?;
        self.grid.at(coord)?;

        match self.selected {
            None => {
                self.selected = Some(coord);
                self.sink.on_select(coord);
                debug!(?coord, "selected");
                Ok(ClickOutcome::Selected(coord))
            }
            Some(current) if current == coord => {
                self.selected = None;
                self.sink.on_deselect(coord);
                debug!(?coord, "deselected");
                Ok(ClickOutcome::Deselected(coord))
            }
            Some(current) if !current.is_adjacent(coord) => {
                self.sink.on_deselect(current);
                self.selected = Some(coord);
                self.sink.on_select(coord);
                debug!(from = ?current, to = ?coord, "selection moved");
                Ok(ClickOutcome::Reselected {
                    from: current,
                    to: coord,
                })
            }
            Some(current) => self.request_swap(current, coord).map(ClickOutcome::Swapped),
        }
    }

    /// Drop the current selection, if any.
    pub fn cancel_selection(&mut self) -> Option<Coord> {
        let c = self.selected.take()?;
        self.sink.on_deselect(c);
        Some(c)
    }

    /// Swap the selected cell with `target`.
    pub fn swap_selected(&mut self, target: Coord) -> Result<SwapOutcome, SwapError> {
        self.check_accepting()?;
        let from = self.selected.ok_or(SwapError::NoSelection)?;
        self.request_swap(from, target)
    }

    /// Validate and apply a swap, then resolve.
    ///
    /// A rejected request leaves grid and selection untouched.
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, SwapError> {
        if let Err(err) = self.validate_swap(a, b) {
            debug!(from = ?a, to = ?b, reason = err.as_str(), "swap rejected");
            return Err(err);
        }

        self.grid.swap(a, b)?;
        if let Some(c) = self.selected.take() {
            self.sink.on_deselect(c);
        }
        self.sink.on_swap(a, b);
        debug!(from = ?a, to = ?b, "swap accepted");

        self.cascade = Some(Cascade::new());
        self.pass_wait_ms = 0;
        let mut report = self.advance_cascade()?;
        if self.config.cascade_pass_ms == 0 {
            while self.cascade.is_some() {
                report = self.advance_cascade()?;
            }
        }

        Ok(SwapOutcome {
            from: a,
            to: b,
            cascade: report,
            settled: self.cascade.is_none(),
        })
    }

    fn check_accepting(&self) -> Result<(), SwapError> {
        if !self.running {
            return Err(SwapError::RoundNotRunning);
        }
        if self.cascade.is_some() {
            return Err(SwapError::CascadeInProgress);
        }
        Ok(())
    }

    fn validate_swap(&self, a: Coord, b: Coord) -> Result<(), SwapError> {
        self.check_accepting()?;
        self.grid.at(a)?;
        self.grid.at(b)?;
        if !a.is_adjacent(b) {
            return Err(SwapError::NotAdjacent { from: a, to: b });
        }
        Ok(())
    }

    /// Run the next cascade pass and return the cascade totals so far.
    fn advance_cascade(&mut self) -> Result<CascadeReport, GridError> {
        let Some(cascade) = self.cascade.as_mut() else {
            return Ok(CascadeReport::default());
        };

        let pass = cascade.step(&self.resolver, &mut self.grid, &mut self.source, &mut self.sink);
        let pass = match pass {
            Ok(pass) => pass,
            Err(err) => {
                self.cascade = None;
                return Err(err);
            }
        };

        if pass.points > 0 {
            self.points = self.points.saturating_add(pass.points);
            self.observers.emit(GameEvent::PointsChanged(self.points));
        }

        let done = cascade.is_done();
        let report = cascade.report().clone();
        if done {
            self.cascade = None;
            debug!(
                passes = report.passes,
                points = report.points,
                capped = report.capped,
                "cascade settled"
            );
            self.observers.emit(GameEvent::CascadeSettled {
                passes: report.passes,
                points: report.points,
                capped: report.capped,
            });
        }
        Ok(report)
    }

    /// Advance the round clock by `elapsed_ms`.
    ///
    /// The timer is handled first, so a round that ends on this tick stops
    /// any pending cascade before its next pass.
    pub fn on_tick(&mut self, elapsed_ms: u32) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let mut outcome = TickOutcome::Running;
        self.timer_ms = self.timer_ms.saturating_sub(elapsed_ms);
        if self.timer_ms == 0 {
            if !goal_met(self.points, self.round_goal) {
                let (points, goal) = (self.points, self.round_goal);
                self.finish_round();
                return TickOutcome::GameOver { points, goal };
            }

            self.round_goal = next_goal(self.round_goal, self.points, self.config.goal_percentage);
            self.timer_ms = self.config.round_duration_ms(self.rush);
            info!(
                points = self.points,
                new_goal = self.round_goal,
                "goal beaten"
            );
            self.observers.emit(GameEvent::GoalChanged(self.round_goal));
            self.observers.emit(GameEvent::TimerReset(self.timer_ms));
            outcome = TickOutcome::GoalBeaten {
                new_goal: self.round_goal,
            };
        }

        if self.cascade.is_some() {
            self.pass_wait_ms = self.pass_wait_ms.saturating_add(elapsed_ms);
            if self.pass_wait_ms >= self.config.cascade_pass_ms {
                self.pass_wait_ms = 0;
                if let Err(err) = self.advance_cascade() {
                    error!(%err, "cascade aborted");
                }
            }
        }

        outcome
    }
}

impl<S: EffectSink, R: TokenSource> std::fmt::Debug for GameState<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("grid", &self.grid.to_rows())
            .field("points", &self.points)
            .field("round_goal", &self.round_goal)
            .field("timer_ms", &self.timer_ms)
            .field("running", &self.running)
            .field("rush", &self.rush)
            .field("phase", &self.phase())
            .field("selected", &self.selected)
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Effect, EffectLog};
    use crate::matcher::find_matches;
    use crate::rng::ScriptedTokens;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn config() -> GameConfig {
        GameConfig {
            round_ms: 1_000,
            rush_round_ms: 500,
            ..GameConfig::default()
        }
    }

    /// 4x4 board without matches; swapping (1,3) <-> (2,3) lines up three
    /// 2s in column 1.
    fn fixture() -> Grid {
        Grid::from_rows(&[
            "0321", //
            "1230", //
            "3201", //
            "0123", //
        ])
    }

    fn game() -> GameState<EffectLog, ScriptedTokens> {
        let mut g =
            GameState::with_parts(config(), EffectLog::new(), ScriptedTokens::new([4, 5, 6]))
                .unwrap();
        g.start_round_with(false, fixture());
        g.sink_mut().clear();
        g
    }

    #[test]
    fn test_new_game_is_not_running() {
        let state = GameState::new(GameConfig::default()).unwrap();
        assert!(!state.running());
        assert_eq!(state.points(), 0);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.grid().is_full());
        assert!(find_matches(state.grid()).is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = GameConfig {
            piece_count: 1,
            ..GameConfig::default()
        };
        assert!(GameState::new(bad).is_err());
    }

    #[test]
    fn test_start_round_resets_state() {
        let mut state = GameState::new(config()).unwrap();
        state.start_round(true);
        assert!(state.running());
        assert!(state.rush());
        assert_eq!(state.timer_ms(), 500);
        assert_eq!(state.round_goal(), config().initial_goal);
        assert_eq!(state.round_id(), 1);
        assert!(find_matches(state.grid()).is_empty());

        state.start_round(false);
        assert_eq!(state.timer_ms(), 1_000);
        assert_eq!(state.round_id(), 2);
    }

    #[test]
    fn test_click_protocol() {
        let mut g = game();
        let a = Coord::new(0, 0);

        assert_eq!(g.click(a), Ok(ClickOutcome::Selected(a)));
        assert_eq!(g.selected(), Some(a));
        assert_eq!(g.click(a), Ok(ClickOutcome::Deselected(a)));
        assert_eq!(g.selected(), None);

        g.click(a).unwrap();
        let far = Coord::new(3, 3);
        assert_eq!(g.click(far), Ok(ClickOutcome::Reselected { from: a, to: far }));
        assert_eq!(g.selected(), Some(far));

        assert_eq!(
            g.sink().effects(),
            &[
                Effect::Select(a),
                Effect::Deselect(a),
                Effect::Select(a),
                Effect::Deselect(a),
                Effect::Select(far),
            ]
        );
    }

    #[test]
    fn test_adjacent_click_swaps_and_resolves() {
        let mut g = game();
        g.click(Coord::new(1, 3)).unwrap();
        let outcome = g.click(Coord::new(2, 3)).unwrap();

        let ClickOutcome::Swapped(swap) = outcome else {
            panic!("expected swap, got {outcome:?}");
        };
        assert!(swap.settled);
        assert_eq!(swap.cascade.matches.len(), 1);
        assert_eq!(swap.cascade.points, 30);
        assert_eq!(g.points(), 30);
        assert_eq!(g.selected(), None);
        assert_eq!(g.phase(), Phase::Idle);
        assert!(g.grid().is_full());

        let (a, b) = (Coord::new(1, 3), Coord::new(2, 3));
        assert_eq!(
            &g.sink().effects()[..3],
            &[Effect::Select(a), Effect::Deselect(a), Effect::Swap(a, b)]
        );
    }

    #[test]
    fn test_non_adjacent_swap_never_mutates() {
        let mut g = game();
        let before = g.grid().clone();
        let err = g.request_swap(Coord::new(0, 0), Coord::new(2, 0)).unwrap_err();
        assert_eq!(
            err,
            SwapError::NotAdjacent {
                from: Coord::new(0, 0),
                to: Coord::new(2, 0)
            }
        );
        assert_eq!(g.grid(), &before);
        assert_eq!(g.points(), 0);
        assert!(g.sink().is_empty());
    }

    #[test]
    fn test_swap_rejected_when_not_running() {
        let mut state = GameState::new(config()).unwrap();
        let before = state.grid().clone();
        assert_eq!(
            state.request_swap(Coord::new(0, 0), Coord::new(1, 0)),
            Err(SwapError::RoundNotRunning)
        );
        assert_eq!(state.click(Coord::new(0, 0)), Err(SwapError::RoundNotRunning));
        assert_eq!(state.grid(), &before);
    }

    #[test]
    fn test_swap_out_of_bounds() {
        let mut g = game();
        let err = g.request_swap(Coord::new(3, 0), Coord::new(4, 0)).unwrap_err();
        assert!(matches!(err, SwapError::OutOfBounds(_)));
        assert!(matches!(g.click(Coord::new(-1, 0)), Err(SwapError::OutOfBounds(_))));
    }

    #[test]
    fn test_swap_selected_requires_selection() {
        let mut g = game();
        assert_eq!(g.swap_selected(Coord::new(1, 0)), Err(SwapError::NoSelection));
    }

    #[test]
    fn test_paced_cascade_blocks_swaps_until_settled() {
        let cfg = GameConfig {
            cascade_pass_ms: 100,
            ..config()
        };
        let mut g = GameState::with_parts(cfg, NullSink, ScriptedTokens::new([4, 5, 6])).unwrap();
        g.start_round_with(false, fixture());

        let swap = g.request_swap(Coord::new(1, 3), Coord::new(2, 3)).unwrap();
        assert!(!swap.settled);
        assert_eq!(g.points(), 30);
        assert_eq!(g.phase(), Phase::Resolving { pass: 2 });
        assert_eq!(
            g.request_swap(Coord::new(0, 0), Coord::new(1, 0)),
            Err(SwapError::CascadeInProgress)
        );
        assert_eq!(g.click(Coord::new(0, 0)), Err(SwapError::CascadeInProgress));

        assert_eq!(g.on_tick(50), TickOutcome::Running);
        assert!(g.is_resolving());
        assert_eq!(g.on_tick(50), TickOutcome::Running);
        assert_eq!(g.phase(), Phase::Idle);
        assert_eq!(g.points(), 30);
    }

    #[test]
    fn test_timer_expiry_below_goal_ends_round_once() {
        let mut g = game();
        let overs = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&overs);
        g.subscribe(Box::new(move |e| {
            if matches!(e, GameEvent::GameOver { .. }) {
                *counter.borrow_mut() += 1;
            }
        }));

        assert_eq!(g.on_tick(999), TickOutcome::Running);
        assert_eq!(
            g.on_tick(1),
            TickOutcome::GameOver {
                points: 0,
                goal: 100
            }
        );
        assert!(!g.running());
        assert_eq!(g.on_tick(16), TickOutcome::Idle);
        assert!(!g.end_round());
        assert_eq!(*overs.borrow(), 1);
    }

    #[test]
    fn test_timer_expiry_with_goal_met_raises_goal() {
        let cfg = GameConfig {
            initial_goal: 30,
            ..config()
        };
        let mut g = GameState::with_parts(cfg, NullSink, ScriptedTokens::new([4, 5, 6])).unwrap();
        g.start_round_with(false, fixture());
        g.request_swap(Coord::new(1, 3), Coord::new(2, 3)).unwrap();
        assert_eq!(g.points(), 30);

        // 30 + ceil(30 * 0.5)
        assert_eq!(g.on_tick(1_000), TickOutcome::GoalBeaten { new_goal: 45 });
        assert_eq!(g.round_goal(), 45);
        assert_eq!(g.timer_ms(), 1_000);
        assert!(g.running());
    }

    #[test]
    fn test_round_end_halts_paced_cascade() {
        let cfg = GameConfig {
            cascade_pass_ms: 10_000,
            ..config()
        };
        let mut g = GameState::with_parts(cfg, NullSink, ScriptedTokens::new([4, 5, 6])).unwrap();
        g.start_round_with(false, fixture());
        g.request_swap(Coord::new(1, 3), Coord::new(2, 3)).unwrap();
        assert!(g.is_resolving());

        // Points 30 < goal 100.
        assert!(matches!(g.on_tick(1_000), TickOutcome::GameOver { .. }));
        assert!(!g.is_resolving());
        assert!(g.grid().is_full());
    }

    #[test]
    fn test_observer_sees_points_and_settle() {
        let mut g = game();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = g.subscribe(Box::new(move |e| sink.borrow_mut().push(*e)));

        g.request_swap(Coord::new(1, 3), Coord::new(2, 3)).unwrap();
        assert_eq!(
            *events.borrow(),
            vec![
                GameEvent::PointsChanged(30),
                GameEvent::CascadeSettled {
                    passes: 2,
                    points: 30,
                    capped: false
                },
            ]
        );
        assert!(g.unsubscribe(id));
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut g = game();
        g.click(Coord::new(2, 1)).unwrap();
        let snap = g.snapshot();
        assert_eq!(snap.width, 4);
        assert_eq!(snap.points, 0);
        assert!(snap.running);
        assert!(!snap.resolving);
        assert_eq!(snap.selected, Some([2, 1]));
        assert_eq!(snap.cell(0, 0), Some(0));
    }
}
