//! Object identifier generation.
//!
//! Tokens are 24 upper-case hex characters (96 random bits), the width Xcode
//! itself uses for object ids. No collision check is performed; uniqueness
//! within a run rests on the randomness of the source.

use crate::types::ObjectId;
use rand::rngs::OsRng;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64;

/// Number of hex characters in a generated token.
pub const TOKEN_LEN: usize = 24;

const TOKEN_BYTES: usize = TOKEN_LEN / 2;

/// Anything that can hand out fresh object identifiers.
pub trait TokenSource {
    fn next_token(&mut self) -> ObjectId;
}

/// Token source backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngTokenSource<R> {
    rng: R,
}

impl<R: RngCore> RngTokenSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> TokenSource for RngTokenSource<R> {
    fn next_token(&mut self) -> ObjectId {
        let mut bytes = [0u8; TOKEN_BYTES];
        self.rng.fill_bytes(&mut bytes);
        ObjectId::new(hex::encode_upper(bytes))
    }
}

/// Token source drawing from the operating system CSPRNG.
pub fn os_token_source() -> RngTokenSource<OsRng> {
    RngTokenSource::new(OsRng)
}

/// Reproducible token source. Same seed, same sequence.
pub fn seeded_token_source(seed: u64) -> RngTokenSource<Pcg64> {
    RngTokenSource::new(Pcg64::seed_from_u64(seed))
}

/// Generate a single token from the OS CSPRNG.
pub fn generate_unique_token() -> ObjectId {
    os_token_source().next_token()
}

/// True if `s` has the shape of a generated token.
pub fn is_token(s: &str) -> bool {
    s.len() == TOKEN_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}
