//! Code value generators.

use std::collections::VecDeque;

use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;
use shared_types::{CodeFormatError, CodeValue};

use crate::ports::CodeGenerator;

/// Crockford base-32: no `I`, `L`, `O`, `U`, so codes survive being read aloud.
pub const CODE_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// 12 symbols of 5 bits each.
pub const DEFAULT_CODE_LEN: usize = 12;

/// Draws codes from the operating system CSPRNG.
#[derive(Debug, Clone, Copy)]
pub struct CsprngCodeGenerator {
    len: usize,
}

impl CsprngCodeGenerator {
    /// Length is clamped to the range accepted by [`CodeValue`].
    pub fn new(len: usize) -> Self {
        Self {
            len: len.clamp(CodeValue::MIN_LEN, CodeValue::MAX_LEN),
        }
    }
}

impl Default for CsprngCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LEN)
    }
}

impl CodeGenerator for CsprngCodeGenerator {
    fn generate(&self) -> Result<CodeValue, CodeFormatError> {
        let mut rng = OsRng;
        let raw: String = (0..self.len)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        CodeValue::parse(&raw)
    }
}

/// Yields scripted values, then `SEQ0000001`, `SEQ0000002`, ...
///
/// Deterministic stand-in for tests that need known code values.
#[derive(Debug, Default)]
pub struct SequenceCodeGenerator {
    scripted: Mutex<VecDeque<String>>,
    counter: Mutex<u64>,
}

impl SequenceCodeGenerator {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scripted: Mutex::new(values.into_iter().map(Into::into).collect()),
            counter: Mutex::new(0),
        }
    }

    /// Queues another scripted value.
    pub fn push(&self, value: impl Into<String>) {
        self.scripted.lock().push_back(value.into());
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> Result<CodeValue, CodeFormatError> {
        if let Some(next) = self.scripted.lock().pop_front() {
            return CodeValue::parse(&next);
        }
        let mut counter = self.counter.lock();
        *counter += 1;
        CodeValue::parse(&format!("SEQ{:07}", *counter))
    }
}
