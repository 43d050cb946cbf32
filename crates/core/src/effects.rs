//! Visual-effect sink.
//!
//! The engine reports what happened to the board through [`EffectSink`].
//! Sinks only observe: nothing they do can reach back into engine state, and
//! the grid is already updated by the time a callback runs. A renderer is
//! free to animate these at its own pace.

use crate::gravity::Fall;
use crate::types::Coord;

/// Receiver of board-level visual events. Every method defaults to a no-op.
pub trait EffectSink {
    /// Cells of a run about to be cleared.
    fn on_match(&mut self, _cells: &[Coord]) {}

    /// Tokens shifted down after a clear.
    fn on_fall(&mut self, _falls: &[Fall]) {}

    /// Cells that just received a freshly generated token.
    fn on_refill(&mut self, _cells: &[Coord]) {}

    fn on_swap(&mut self, _a: Coord, _b: Coord) {}

    fn on_select(&mut self, _cell: Coord) {}

    fn on_deselect(&mut self, _cell: Coord) {}
}

/// Sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EffectSink for NullSink {}

/// One recorded effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Match(Vec<Coord>),
    Fall(Vec<Fall>),
    Refill(Vec<Coord>),
    Swap(Coord, Coord),
    Select(Coord),
    Deselect(Coord),
}

/// Sink that records effects in order.
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    effects: Vec<Effect>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl EffectSink for EffectLog {
    fn on_match(&mut self, cells: &[Coord]) {
        self.effects.push(Effect::Match(cells.to_vec()));
    }

    fn on_fall(&mut self, falls: &[Fall]) {
        self.effects.push(Effect::Fall(falls.to_vec()));
    }

    fn on_refill(&mut self, cells: &[Coord]) {
        self.effects.push(Effect::Refill(cells.to_vec()));
    }

    fn on_swap(&mut self, a: Coord, b: Coord) {
        self.effects.push(Effect::Swap(a, b));
    }

    fn on_select(&mut self, cell: Coord) {
        self.effects.push(Effect::Select(cell));
    }

    fn on_deselect(&mut self, cell: Coord) {
        self.effects.push(Effect::Deselect(cell));
    }
}

impl<S: EffectSink + ?Sized> EffectSink for &mut S {
    fn on_match(&mut self, cells: &[Coord]) {
        (**self).on_match(cells)
    }

    fn on_fall(&mut self, falls: &[Fall]) {
        (**self).on_fall(falls)
    }

    fn on_refill(&mut self, cells: &[Coord]) {
        (**self).on_refill(cells)
    }

    fn on_swap(&mut self, a: Coord, b: Coord) {
        (**self).on_swap(a, b)
    }

    fn on_select(&mut self, cell: Coord) {
        (**self).on_select(cell)
    }

    fn on_deselect(&mut self, cell: Coord) {
        (**self).on_deselect(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_log_records_in_order() {
        let mut log = EffectLog::new();
        log.on_select(Coord::new(0, 0));
        log.on_swap(Coord::new(0, 0), Coord::new(1, 0));
        log.on_match(&[Coord::new(1, 0)]);

        assert_eq!(
            log.effects(),
            &[
                Effect::Select(Coord::new(0, 0)),
                Effect::Swap(Coord::new(0, 0), Coord::new(1, 0)),
                Effect::Match(vec![Coord::new(1, 0)]),
            ]
        );
        assert_eq!(log.take().len(), 3);
        assert!(log.is_empty());
    }

    #[test]
    fn test_borrowed_sink_forwards() {
        fn poke(mut sink: impl EffectSink) {
            sink.on_deselect(Coord::new(2, 2));
        }

        let mut log = EffectLog::new();
        poke(&mut log);
        assert_eq!(log.effects(), &[Effect::Deselect(Coord::new(2, 2))]);
    }
}
