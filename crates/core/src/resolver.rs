//! Resolution loop - repeated match / gravity / refill until the board is stable
//!
//! One *pass* sweeps every scan origin once. Both runs through an origin are
//! read from the grid as earlier origins left it, so a sweep can pick up
//! tokens that fell or were generated earlier in the same sweep. The
//! vertical run is resolved first (scored, cleared, compacted, refilled),
//! then the horizontal one. When the two cross at the origin, the horizontal
//! run still scores its full length but only its cells outside the vertical
//! column are cleared; the shared cell already went with the vertical run.
//!
//! A cascade repeats passes until one resolves nothing. Uniform refills give
//! no hard bound on the number of passes, so an optional safety cap stops
//! the cascade early; the grid is full either way, it may just still hold
//! matches.

use tracing::{debug, trace, warn};

use crate::effects::EffectSink;
use crate::error::GridError;
use crate::gravity::{collapse, refill};
use crate::grid::Grid;
use crate::matcher::{run_at, scan_origins, AXIS_PRIORITY};
use crate::rng::TokenSource;
use crate::scoring::score_for;
use crate::types::{Axis, Coord, Token};

/// A match that was scored and cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMatch {
    pub pass: u32,
    pub axis: Axis,
    pub token: Token,
    pub cells: Vec<Coord>,
    pub points: u64,
}

impl ResolvedMatch {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Outcome of a single sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub pass: u32,
    pub matches: Vec<ResolvedMatch>,
    pub points: u64,
}

impl PassReport {
    /// True when the sweep found nothing to resolve.
    pub fn is_stable(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Totals for a whole cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Passes run, including the final empty one.
    pub passes: u32,
    pub matches: Vec<ResolvedMatch>,
    pub points: u64,
    /// Stopped by the safety cap rather than by a stable board.
    pub capped: bool,
}

impl CascadeReport {
    /// Cells over all scored runs. A cell where two runs cross counts for both.
    pub fn matched_cells(&self) -> usize {
        self.matches.iter().map(|m| m.len()).sum()
    }
}

/// Match / gravity / refill rules for one board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolver {
    piece_count: u8,
    points_per_piece: u64,
    max_passes: Option<u32>,
}

impl Resolver {
    pub fn new(piece_count: u8, points_per_piece: u64) -> Self {
        Self {
            piece_count,
            points_per_piece,
            max_passes: None,
        }
    }

    pub fn with_max_passes(mut self, max_passes: Option<u32>) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn piece_count(&self) -> u8 {
        self.piece_count
    }

    pub fn points_per_piece(&self) -> u64 {
        self.points_per_piece
    }

    pub fn max_passes(&self) -> Option<u32> {
        self.max_passes
    }

    /// Run one sweep over the grid.
    pub fn run_pass(
        &self,
        pass: u32,
        grid: &mut Grid,
        source: &mut impl TokenSource,
        sink: &mut impl EffectSink,
    ) -> Result<PassReport, GridError> {
        let mut report = PassReport {
            pass,
            ..PassReport::default()
        };

        for origin in scan_origins(grid.width(), grid.height()) {
            // Both runs are read before anything at this origin is cleared.
            let vertical = run_at(grid, origin, Axis::Vertical);
            let horizontal = run_at(grid, origin, Axis::Horizontal);
            let runs = AXIS_PRIORITY.map(|axis| match axis {
                Axis::Vertical => vertical.as_ref(),
                Axis::Horizontal => horizontal.as_ref(),
            });

            for m in runs.into_iter().flatten() {
                // The cell shared with an already resolved vertical run was
                // cleared and refilled with it.
                let cleared: Vec<Coord> = match (m.axis, vertical.as_ref()) {
                    (Axis::Horizontal, Some(v)) => {
                        m.cells.iter().copied().filter(|&c| !v.contains(c)).collect()
                    }
                    _ => m.cells.to_vec(),
                };

                let points = score_for(m.len(), self.points_per_piece);
                trace!(
                    pass,
                    ?origin,
                    axis = m.axis.as_str(),
                    len = m.len(),
                    cleared = cleared.len(),
                    points,
                    "resolving match"
                );

                sink.on_match(&cleared);
                let settle = collapse(grid, &cleared)?;
                sink.on_fall(&settle.falls);
                refill(grid, &settle.vacated, self.piece_count, source)?;
                sink.on_refill(&settle.vacated);

                report.points = report.points.saturating_add(points);
                report.matches.push(ResolvedMatch {
                    pass,
                    axis: m.axis,
                    token: m.token,
                    cells: m.cells.to_vec(),
                    points,
                });
            }
        }

        debug!(pass, matches = report.matches.len(), points = report.points, "pass complete");
        Ok(report)
    }

    /// Run passes until the board is stable or the safety cap is reached.
    pub fn settle(
        &self,
        grid: &mut Grid,
        source: &mut impl TokenSource,
        sink: &mut impl EffectSink,
    ) -> Result<CascadeReport, GridError> {
        let mut cascade = Cascade::new();
        while !cascade.is_done() {
            cascade.step(self, grid, source, sink)?;
        }
        Ok(cascade.into_report())
    }
}

/// A cascade that can be advanced one pass at a time.
///
/// Lets the caller interleave passes with other work (timer checks,
/// animation pacing) and stop cleanly between passes.
#[derive(Debug, Clone)]
pub struct Cascade {
    next_pass: u32,
    report: CascadeReport,
    done: bool,
}

impl Default for Cascade {
    fn default() -> Self {
        Self::new()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self {
            next_pass: 1,
            report: CascadeReport::default(),
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of the pass the next [`Cascade::step`] will run.
    pub fn next_pass(&self) -> u32 {
        self.next_pass
    }

    pub fn report(&self) -> &CascadeReport {
        &self.report
    }

    pub fn into_report(self) -> CascadeReport {
        self.report
    }

    /// Run the next pass. A finished cascade returns an empty report
    /// without touching the grid.
    pub fn step(
        &mut self,
        resolver: &Resolver,
        grid: &mut Grid,
        source: &mut impl TokenSource,
        sink: &mut impl EffectSink,
    ) -> Result<PassReport, GridError> {
        if self.done {
            return Ok(PassReport {
                pass: self.report.passes,
                ..PassReport::default()
            });
        }

        let pass = self.next_pass;
        self.next_pass += 1;

        let report = resolver.run_pass(pass, grid, source, sink)?;
        self.report.passes = pass;
        self.report.points = self.report.points.saturating_add(report.points);
        self.report.matches.extend(report.matches.iter().cloned());

        if report.is_stable() {
            self.done = true;
        } else if resolver.max_passes.is_some_and(|cap| pass >= cap) {
            warn!(pass, "cascade safety cap reached with matches still resolving");
            self.done = true;
            self.report.capped = true;
        }

        Ok(report)
    }
}
