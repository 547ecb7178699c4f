//! Tool id generation
//!
//! An id is a base36 millisecond timestamp followed by base36 random bits.
//! The timestamp part is strictly increasing per generator, so two ids from
//! the same generator never share it, and the random part keeps ids
//! from being guessable by walking a sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produces unique, non-sequential tool ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_millis: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next id.
    pub fn next_id(&self) -> String {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let millis = self.next_millis(now);
        let random = Uuid::new_v4().as_u128() as u64;
        format!("{}{}", to_base36(millis), to_base36(random))
    }

    fn next_millis(&self, now: u64) -> u64 {
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
