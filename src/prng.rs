//! Session randomness.
//!
//! [`SessionRng`] is a BLAKE2b-256 stream in counter mode: every 32-byte
//! output block is the keyed hash of the session seed and a block counter.
//! A session is seeded exactly once, either from the operating system or from
//! an explicit seed, and is never reseeded.  Protocol entry points take it (or
//! any other cryptographic RNG) as an injected `&mut R`.

use blake2::digest::{consts::U32, Digest};
use rand::{rngs::OsRng, CryptoRng, RngCore, SeedableRng};
use std::fmt;

type Blake2b256 = blake2::Blake2b<U32>;

const SESSION_DOMAIN: &[u8] = b"SEALBID_SESSION";
const STREAM_DOMAIN: &[u8] = b"SEALBID_STREAM";

/// Cryptographic stream generator derived from BLAKE2b-256.
#[derive(Clone)]
pub struct SessionRng {
    key: [u8; 32],
    counter: u64,
    buffer: [u8; 32],
    offset: usize,
}

impl fmt::Debug for SessionRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRng")
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

impl SessionRng {
    /// Seeds a new session from the operating system.
    pub fn from_entropy() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    fn refill(&mut self) {
        let mut hasher = Blake2b256::new();
        hasher.update(STREAM_DOMAIN);
        hasher.update(self.key);
        hasher.update(self.counter.to_be_bytes());
        self.buffer.copy_from_slice(&hasher.finalize());
        self.counter = self.counter.wrapping_add(1);
        self.offset = 0;
    }
}

impl SeedableRng for SessionRng {
    type Seed = [u8; 32];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut hasher = Blake2b256::new();
        hasher.update(SESSION_DOMAIN);
        hasher.update(seed);
        let mut key = [0u8; 32];
        key.copy_from_slice(&hasher.finalize());
        Self {
            key,
            counter: 0,
            buffer: [0u8; 32],
            offset: 32,
        }
    }
}

impl RngCore for SessionRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let mut chunk = [0u8; 8];
        self.fill_bytes(&mut chunk);
        u64::from_be_bytes(chunk)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut written = 0;
        while written < dest.len() {
            if self.offset >= self.buffer.len() {
                self.refill();
            }
            let take = (self.buffer.len() - self.offset).min(dest.len() - written);
            dest[written..written + take]
                .copy_from_slice(&self.buffer[self.offset..self.offset + take]);
            self.offset += take;
            written += take;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for SessionRng {}
