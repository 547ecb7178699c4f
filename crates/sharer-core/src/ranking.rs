//! Gallery ranking
//!
//! Pure functions that turn a snapshot of records into the ordered,
//! filtered view the gallery shows. Output depends only on the inputs,
//! including the `now` used for ages.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::ToolRecord;
use crate::{Error, Result};

/// Hours added to a record's age before decay, so fresh records get a
/// finite score.
pub const GRAVITY_OFFSET_HOURS: f64 = 2.0;

/// Exponent applied to the offset age.
pub const DECAY_EXPONENT: f64 = 1.5;

/// Gallery ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Most recently created first
    #[default]
    Newest,
    /// Highest like count first
    MostLiked,
    /// Highest trending score first
    Trending,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [Self::Newest, Self::MostLiked, Self::Trending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::MostLiked => "most-liked",
            Self::Trending => "trending",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnknownSortMode(s.to_string()))
    }
}

/// Case-insensitive substring match of `term` against the prompt.
///
/// An empty term matches every record. Records without a prompt match
/// only the empty term.
pub fn matches_search(record: &ToolRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    record
        .prompt()
        .is_some_and(|prompt| prompt.to_lowercase().contains(&term.to_lowercase()))
}

/// Age in fractional hours. Negative for timestamps after `now`.
pub fn age_hours(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_milliseconds() as f64 / 3_600_000.0
}

/// Trending score: `likes / (age_hours + 2) ^ 1.5`.
///
/// A record with no likes scores exactly zero.
///
/// # Errors
///
/// [`Error::InvalidRecord`] if the record has no creation time, or if the
/// score is not a finite number (creation time two or more hours after `now`).
pub fn trending_score(record: &ToolRecord, now: DateTime<Utc>) -> Result<f64> {
    let created_at = record.created_at().ok_or_else(|| Error::InvalidRecord {
        id: record.id().to_string(),
        reason: "missing createdAt".to_string(),
    })?;

    let likes = record.likes();
    if likes == 0 {
        return Ok(0.0);
    }

    let age = age_hours(created_at, now);
    let score = likes as f64 / (age + GRAVITY_OFFSET_HOURS).powf(DECAY_EXPONENT);
    if !score.is_finite() {
        return Err(Error::InvalidRecord {
            id: record.id().to_string(),
            reason: format!("createdAt is {:.2}h in the future", -age),
        });
    }
    Ok(score)
}

/// Filter by `search` and order by `mode`.
///
/// Sorting is stable, so records that compare equal keep their input order.
/// In `Trending` mode, records that cannot be scored are left out.
pub fn rank(
    records: &[ToolRecord],
    search: &str,
    mode: SortMode,
    now: DateTime<Utc>,
) -> Vec<ToolRecord> {
    let matching = records.iter().filter(|r| matches_search(r, search));

    match mode {
        SortMode::Newest => {
            let mut ranked: Vec<ToolRecord> = matching.cloned().collect();
            // `None` orders below every timestamp, so undated records go last.
            ranked.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            ranked
        }
        SortMode::MostLiked => {
            let mut ranked: Vec<ToolRecord> = matching.cloned().collect();
            ranked.sort_by(|a, b| b.likes().cmp(&a.likes()));
            ranked
        }
        SortMode::Trending => {
            let mut scored: Vec<(f64, &ToolRecord)> = matching
                .filter_map(|record| match trending_score(record, now) {
                    Ok(score) => Some((score, record)),
                    Err(e) => {
                        tracing::debug!(error = %e, "excluding record from trending");
                        None
                    }
                })
                .collect();
            scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
            scored.into_iter().map(|(_, record)| record.clone()).collect()
        }
    }
}

/// Shorten a prompt for display, appending `...` when cut.
pub fn summary(prompt: &str, max_chars: usize) -> String {
    match prompt.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &prompt[..cut]),
        None => prompt.to_string(),
    }
}
