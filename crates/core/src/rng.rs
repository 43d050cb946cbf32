//! RNG module - token generation for board fills and refills
//!
//! Refills are drawn uniformly from `[0, piece_count)` with no anti-repeat
//! bias, so freshly generated tokens may chain into new matches.
//!
//! Also provides a scripted source for deterministic testing.

use crate::types::Token;

/// Anything that can hand out tokens for the board.
pub trait TokenSource {
    /// Uniform random token in `[0, piece_count)`.
    fn next_token(&mut self, piece_count: u8) -> Token;

    /// Uniform random index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;
}

impl<T: TokenSource + ?Sized> TokenSource for Box<T> {
    fn next_token(&mut self, piece_count: u8) -> Token {
        (**self).next_token(piece_count)
    }

    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Restart the sequence from `seed`.
    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low LCG bits have short periods; use the high half.
        (self.next_u32() >> 16) % max.max(1)
    }

    /// Current internal state (restarting from it replays the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TokenSource for SimpleRng {
    fn next_token(&mut self, piece_count: u8) -> Token {
        Token::new(self.next_range(piece_count as u32) as u8)
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.next_range(len as u32) as usize
    }
}

/// Replays a fixed list of tokens, cycling when exhausted.
///
/// Tokens are reduced modulo `piece_count` so a script never produces an
/// out-of-range value. `next_index` always picks the first candidate.
#[derive(Debug, Clone)]
pub struct ScriptedTokens {
    script: Vec<Token>,
    cursor: usize,
}

impl ScriptedTokens {
    pub fn new(script: impl IntoIterator<Item = u8>) -> Self {
        let script: Vec<Token> = script.into_iter().map(Token::new).collect();
        Self { script, cursor: 0 }
    }

    /// Number of tokens handed out so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl TokenSource for ScriptedTokens {
    fn next_token(&mut self, piece_count: u8) -> Token {
        if self.script.is_empty() {
            self.cursor += 1;
            return Token::new(0);
        }
        let t = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        Token::new(t.index() % piece_count.max(1))
    }

    fn next_index(&mut self, _len: usize) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_reseed_replays_sequence() {
        let mut rng = SimpleRng::new(7);
        let first: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();
        rng.reseed(7);
        let again: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_tokens_in_range_and_all_reachable() {
        let mut rng = SimpleRng::new(99);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            let t = rng.next_token(7);
            assert!(t.index() < 7);
            seen[t.index() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every token should appear: {seen:?}");
    }

    #[test]
    fn test_scripted_tokens_cycle() {
        let mut src = ScriptedTokens::new([1, 2, 9]);
        assert_eq!(src.next_token(7), Token::new(1));
        assert_eq!(src.next_token(7), Token::new(2));
        // 9 % 7
        assert_eq!(src.next_token(7), Token::new(2));
        assert_eq!(src.next_token(7), Token::new(1));
        assert_eq!(src.drawn(), 4);
    }
}
