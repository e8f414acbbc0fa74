//! The morphology-service contract and the tense values stored in marker
//! leaves.
//!
//! Tense accumulates during transduction as two ignored marker leaves per
//! verb phrase — a [`TenseTime`] and a [`TenseFrame`] — whose leaf text is
//! the UPPER_SNAKE spelling of the variant. The renderer parses them back
//! (unparseable or missing markers fall back to [`TenseTime::Generic`] /
//! [`TenseFrame::Simple`]) and hands the pair to the morphology service for
//! conjugation.

use std::fmt;
use std::str::FromStr;

/// When the verb happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenseTime {
    Past,
    Present,
    Future,
    /// No time marker accumulated; conjugate without inflecting for time.
    #[default]
    Generic,
}

impl fmt::Display for TenseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TenseTime::Past => "PAST",
            TenseTime::Present => "PRESENT",
            TenseTime::Future => "FUTURE",
            TenseTime::Generic => "GENERIC",
        };
        write!(f, "{text}")
    }
}

impl FromStr for TenseTime {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAST" => Ok(TenseTime::Past),
            "PRESENT" => Ok(TenseTime::Present),
            "FUTURE" => Ok(TenseTime::Future),
            "GENERIC" => Ok(TenseTime::Generic),
            _ => Err(()),
        }
    }
}

/// How the verb's action is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TenseFrame {
    #[default]
    Simple,
    Perfect,
    Continuous,
    PerfectContinuous,
}

impl fmt::Display for TenseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TenseFrame::Simple => "SIMPLE",
            TenseFrame::Perfect => "PERFECT",
            TenseFrame::Continuous => "CONTINUOUS",
            TenseFrame::PerfectContinuous => "PERFECT_CONTINUOUS",
        };
        write!(f, "{text}")
    }
}

impl FromStr for TenseFrame {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIMPLE" => Ok(TenseFrame::Simple),
            "PERFECT" => Ok(TenseFrame::Perfect),
            "CONTINUOUS" => Ok(TenseFrame::Continuous),
            "PERFECT_CONTINUOUS" => Ok(TenseFrame::PerfectContinuous),
            _ => Err(()),
        }
    }
}

/// The external morphology service: pure string inflection, no failure
/// modes.
pub trait Morphology {
    /// Put a base-form verb into the given tense.
    fn conjugate(&self, base: &str, time: TenseTime, frame: TenseFrame) -> String;

    /// Plural form of a singular noun.
    fn pluralize(&self, noun: &str) -> String;

    /// Comparative form of an adjective or adverb.
    fn comparative(&self, word: &str) -> String;

    /// Superlative form of an adjective or adverb.
    fn superlative(&self, word: &str) -> String;

    /// Possessive form: "joe" → "joe's", "me" → "my".
    fn possessive(&self, word: &str) -> String;

    /// Subject-position case of a pronoun: "me" → "I", "him" → "he".
    /// Non-pronouns pass through unchanged.
    fn subject_form(&self, word: &str) -> String;
}
