//! Unbiased sampling of small indices from a cryptographically secure source.

use rand::{CryptoRng, RngCore};

/// A source of uniformly distributed integers in `[0, n)`, free of modulo
/// bias.
///
/// Naively reducing a random byte with `% n` favours the low values whenever
/// `n` doesn't divide the byte's range evenly. `next` instead draws the
/// smallest number of bytes that can represent `n`, keeps only draws from the
/// largest prefix holding a whole number of `[0, n)` sets, and redraws
/// anything past it.
pub struct UnbiasedRandom<R> {
    rng: R,
}

impl<R> UnbiasedRandom<R>
where
    R: RngCore + CryptoRng,
{
    pub fn new(rng: R) -> UnbiasedRandom<R> {
        UnbiasedRandom { rng }
    }

    /// Return a uniformly distributed value in `[0, n)`.
    ///
    /// `n == 1` short-circuits to `0` without consuming entropy. `n == 0` is
    /// a contract violation and fails with [`RandomError::EmptyRange`].
    pub fn next(&mut self, n: usize) -> Result<usize, RandomError> {
        if n == 0 {
            return Err(RandomError::EmptyRange);
        }
        if n == 1 {
            return Ok(0);
        }

        let n = n as u64;
        let max = draw_max(n);
        // There are max / n complete sets of [0, n) values below max; a draw
        // landing in the incomplete final set would over-represent its low
        // values, so it is thrown away. With n = 6 on one byte that accepts
        // exactly v < 252.
        let full_sets = max / n;
        let bound = n * full_sets;
        let width = (64 - max.leading_zeros() as usize) / 8;

        loop {
            let v = self.draw(width)?;
            if v < bound {
                return Ok((v % n) as usize);
            }
        }
    }

    fn draw(&mut self, width: usize) -> Result<u64, RandomError> {
        let mut bytes = [0u8; 8];
        self.rng
            .try_fill_bytes(&mut bytes[..width])
            .map_err(RandomError::Entropy)?;
        Ok(u64::from_le_bytes(bytes))
    }
}

/// The largest value a draw for range `n` may take: all-ones over the fewest
/// whole bytes with `max >= n`, so at least one complete set of `[0, n)`
/// values fits below it.
fn draw_max(n: u64) -> u64 {
    let mut max = u8::MAX as u64;
    while max < n {
        max = (max << 8) | 0xff;
    }
    max
}

#[derive(Debug, thiserror::Error)]
pub enum RandomError {
    #[error("cannot sample from an empty range")]
    EmptyRange,
    #[error("the entropy source failed to produce random bytes: {0}")]
    Entropy(#[source] rand::Error),
}
