//! Short identifier generation.
//!
//! Identifiers are drawn character-by-character from a fixed alphabet using
//! OS entropy. Draws use rejection sampling so every character is selected
//! uniformly even when the alphabet length does not divide 256.

use std::future::Future;

use crate::error::AppError;

/// The 62 alphanumeric characters.
pub const DEFAULT_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default identifier length.
pub const DEFAULT_LENGTH: usize = 8;

/// Collision retry budget for [`IdGenerator::generate_unique`].
const MAX_ATTEMPTS: usize = 10;

/// Generates fixed-length random identifiers from a configurable alphabet.
///
/// Alphabet and length are fixed at construction, so a generator can be
/// shared freely between tasks. Callers needing a different alphabet build a
/// separate instance.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl IdGenerator {
    /// Creates a generator with the default 62-character alphabet and length 8.
    pub fn new() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_LENGTH,
        }
    }

    /// Replaces the alphabet, for callers needing a different
    /// entropy/readability trade-off.
    ///
    /// # Panics
    ///
    /// Panics if the alphabet is empty or longer than 256 characters, as a
    /// single rejection-sampled byte could no longer index it uniformly.
    pub fn with_alphabet(mut self, alphabet: &str) -> Self {
        let alphabet: Vec<char> = alphabet.chars().collect();
        assert!(
            !alphabet.is_empty() && alphabet.len() <= 256,
            "alphabet must contain between 1 and 256 characters"
        );
        self.alphabet = alphabet;
        self
    }

    /// Replaces the identifier length.
    ///
    /// # Panics
    ///
    /// Panics if `length` is zero.
    pub fn with_length(mut self, length: usize) -> Self {
        assert!(length > 0, "identifier length must be positive");
        self.length = length;
        self
    }

    /// Generates one random identifier.
    ///
    /// Bytes at or above the largest multiple of the alphabet length below
    /// 256 are rejected and redrawn, so the remaining range maps onto the
    /// alphabet without modulo bias.
    ///
    /// # Panics
    ///
    /// Panics if the system random number generator fails (extremely rare).
    pub fn generate(&self) -> String {
        let n = self.alphabet.len();
        let zone = 256 - (256 % n);

        let mut out = String::with_capacity(self.length);
        let mut produced = 0;
        let mut buffer = [0u8; 64];

        while produced < self.length {
            getrandom::fill(&mut buffer).expect("system random number generator failed");

            for &byte in &buffer {
                if (byte as usize) < zone {
                    out.push(self.alphabet[byte as usize % n]);
                    produced += 1;
                    if produced == self.length {
                        break;
                    }
                }
            }
        }

        out
    }

    /// Generates an identifier that the `exists` predicate reports as free.
    ///
    /// Tries up to 10 times. The predicate is supplied by the caller; the
    /// generator knows nothing about storage. A predicate error is a
    /// transport failure and aborts generation immediately rather than being
    /// mistaken for an available identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::GenerationExhausted`] when every attempt collides,
    /// or the predicate's error unchanged.
    pub async fn generate_unique<F, Fut>(&self, exists: F) -> Result<String, AppError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        for _ in 0..MAX_ATTEMPTS {
            let identifier = self.generate();
            if !exists(identifier.clone()).await? {
                return Ok(identifier);
            }
        }

        Err(AppError::GenerationExhausted)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
