//! Standardization of raw scores onto grade levels 4–16.
//!
//! Each metric has a breakpoint table of `(lower bound, grade)` rows checked
//! highest bound first; the first row whose bound the score reaches wins and
//! anything below the last row gets the fallback grade. NaN never reaches a
//! bound, so it always gets the fallback.
//!
//! The lexical table is keyed on a 0–1 scale. Raw Dale–Chall scores (about
//! 4.9 to 10) are mapped onto it by [`dale_chall_unit_scale`] first; see
//! [`standardize_dale_chall`].

use serde::{Deserialize, Serialize};

/// Lowest grade any scale can return.
pub const MIN_GRADE: u8 = 4;

/// Highest grade any scale can return.
pub const MAX_GRADE: u8 = 16;

const LEXICAL_TABLE: &[(f64, u8)] = &[
    (1.0, 16),
    (0.97, 15),
    (0.93, 14),
    (0.90, 13),
    (0.85, 12),
    (0.80, 11),
    (0.75, 10),
    (0.65, 9),
    (0.55, 8),
    (0.45, 7),
    (0.30, 6),
    (0.20, 5),
];
const LEXICAL_FALLBACK: u8 = 4;

// Raw Dale–Chall score to the lexical table's 0–1 scale, one anchor per
// grade band; interpolated linearly in between.
const DALE_CHALL_ANCHORS: &[(f64, f64)] = &[
    (0.0, 0.0),
    (5.0, 0.20),
    (6.0, 0.45),
    (7.0, 0.65),
    (8.0, 0.80),
    (9.0, 0.90),
    (10.0, 1.0),
];

// Easier text has a higher Flesch score, so the grades run the other way.
const FLESCH_TABLE: &[(f64, u8)] = &[
    (90.0, 5),
    (80.0, 6),
    (70.0, 7),
    (65.0, 8),
    (60.0, 9),
    (57.0, 10),
    (54.0, 11),
    (50.0, 12),
    (45.0, 13),
    (35.0, 14),
    (30.0, 15),
];
const FLESCH_FALLBACK: u8 = 16;

// [3.4, 3.5) and [3.5, 3.7) both map to 12.
const SYNTAX_TABLE: &[(f64, u8)] = &[
    (4.0, 16),
    (3.9, 15),
    (3.8, 14),
    (3.7, 13),
    (3.5, 12),
    (3.4, 12),
    (3.2, 11),
    (3.0, 10),
    (2.7, 9),
    (2.5, 8),
    (2.0, 7),
    (1.5, 6),
    (1.0, 5),
];
const SYNTAX_FALLBACK: u8 = 4;

fn lookup(table: &[(f64, u8)], fallback: u8, score: f64) -> u8 {
    table
        .iter()
        .find(|&&(bound, _)| score >= bound)
        .map_or(fallback, |&(_, grade)| grade)
}

/// Map a raw Dale–Chall score onto the 0–1 lexical scale.
///
/// 4.9 and below land under 0.2 (grade 4), 5.0–5.9 on 0.2–0.45 (grades 5–6),
/// and so on up to 10.0, which maps to 1.0 (grade 16). Scores above 10 keep
/// the last slope. Negative scores clamp to 0; NaN stays NaN.
pub fn dale_chall_unit_scale(score: f64) -> f64 {
    if score.is_nan() {
        return score;
    }
    if score <= 0.0 {
        return 0.0;
    }
    for window in DALE_CHALL_ANCHORS.windows(2) {
        let ((x0, y0), (x1, y1)) = (window[0], window[1]);
        if score < x1 {
            return ((score - x0) / (x1 - x0)).mul_add(y1 - y0, y0);
        }
    }
    (score - 10.0).mul_add(0.1, 1.0)
}

/// Grade for a Dale–Chall score already on the 0–1 lexical scale.
pub fn standardize_lexical(score: f64) -> u8 {
    lookup(LEXICAL_TABLE, LEXICAL_FALLBACK, score)
}

/// Grade for a raw Dale–Chall score.
pub fn standardize_dale_chall(score: f64) -> u8 {
    standardize_lexical(dale_chall_unit_scale(score))
}

/// Grade for a Flesch Reading Ease score.
pub fn standardize_flesch(score: f64) -> u8 {
    lookup(FLESCH_TABLE, FLESCH_FALLBACK, score)
}

/// Grade for a mean dependency distance.
pub fn standardize_syntax(score: f64) -> u8 {
    lookup(SYNTAX_TABLE, SYNTAX_FALLBACK, score)
}

/// The three scored dimensions of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Metric {
    /// Dale–Chall lexical familiarity, scored on the raw Dale–Chall scale.
    #[cfg_attr(feature = "clap", value(alias = "dale-chall"))]
    Lexical,
    /// Flesch Reading Ease.
    Flesch,
    /// Mean dependency distance.
    #[cfg_attr(feature = "clap", value(alias = "mdd"))]
    Syntax,
}

impl Metric {
    /// All metrics in report order.
    pub const ALL: [Self; 3] = [Self::Lexical, Self::Flesch, Self::Syntax];

    /// Map a raw score for this metric to a grade.
    pub fn standardize(self, score: f64) -> u8 {
        match self {
            Self::Lexical => standardize_dale_chall(score),
            Self::Flesch => standardize_flesch(score),
            Self::Syntax => standardize_syntax(score),
        }
    }

    /// Returns the metric name as a string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Flesch => "flesch",
            Self::Syntax => "syntax",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
