//! A rule-based English morphology.
//!
//! Covers regular inflection plus the irregular forms common enough to show
//! up constantly in conversation. Comparatives and superlatives take the
//! periphrastic route ("more fast", "most fast") rather than guessing at
//! suffix rules.

use crate::morph::{Morphology, TenseFrame, TenseTime};

/// Irregular simple-past forms for common verbs; everything else gets the
/// regular -ed treatment.
const IRREGULAR_PAST: &[(&str, &str)] = &[
    ("begin", "began"),
    ("bring", "brought"),
    ("buy", "bought"),
    ("come", "came"),
    ("do", "did"),
    ("drink", "drank"),
    ("drive", "drove"),
    ("eat", "ate"),
    ("feel", "felt"),
    ("find", "found"),
    ("fly", "flew"),
    ("get", "got"),
    ("give", "gave"),
    ("go", "went"),
    ("have", "had"),
    ("hear", "heard"),
    ("keep", "kept"),
    ("know", "knew"),
    ("leave", "left"),
    ("let", "let"),
    ("lose", "lost"),
    ("make", "made"),
    ("mean", "meant"),
    ("meet", "met"),
    ("pay", "paid"),
    ("put", "put"),
    ("read", "read"),
    ("run", "ran"),
    ("say", "said"),
    ("see", "saw"),
    ("sing", "sang"),
    ("sit", "sat"),
    ("sleep", "slept"),
    ("speak", "spoke"),
    ("stand", "stood"),
    ("take", "took"),
    ("tell", "told"),
    ("think", "thought"),
    ("win", "won"),
    ("write", "wrote"),
];

/// The built-in English inflection rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishMorphology;

impl EnglishMorphology {
    pub fn new() -> Self {
        EnglishMorphology
    }

    fn past(verb: &str) -> String {
        if let Some((_, past)) = IRREGULAR_PAST.iter().find(|(base, _)| *base == verb) {
            return (*past).to_string();
        }
        if let Some(stem) = verb.strip_suffix('e') {
            format!("{stem}d")
        } else if let Some(stem) = verb.strip_suffix('y') {
            format!("{stem}ied")
        } else {
            format!("{verb}ed")
        }
    }

    fn gerund(verb: &str) -> String {
        format!("{verb}ing")
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

impl Morphology for EnglishMorphology {
    fn conjugate(&self, base: &str, time: TenseTime, frame: TenseFrame) -> String {
        let is_be = base == "be";
        match frame {
            TenseFrame::Simple => match time {
                TenseTime::Past if is_be => "was".into(),
                TenseTime::Present if is_be => "is".into(),
                TenseTime::Future if is_be => "will be".into(),
                TenseTime::Past => Self::past(base),
                TenseTime::Present => format!("{base}s"),
                TenseTime::Future => format!("will {base}"),
                TenseTime::Generic => base.into(),
            },
            TenseFrame::Continuous => {
                let gerund = Self::gerund(base);
                match time {
                    TenseTime::Past => format!("was {gerund}"),
                    TenseTime::Present => format!("is {gerund}"),
                    TenseTime::Future => format!("will be {gerund}"),
                    TenseTime::Generic => gerund,
                }
            }
            TenseFrame::Perfect => {
                let participle = if is_be { "been".into() } else { Self::past(base) };
                match time {
                    TenseTime::Past => format!("had {participle}"),
                    TenseTime::Present => format!("has {participle}"),
                    TenseTime::Future => format!("will have {participle}"),
                    TenseTime::Generic => participle,
                }
            }
            TenseFrame::PerfectContinuous => {
                let gerund = Self::gerund(base);
                match time {
                    TenseTime::Past => format!("had been {gerund}"),
                    TenseTime::Present => format!("has been {gerund}"),
                    TenseTime::Future => format!("will have been {gerund}"),
                    TenseTime::Generic => gerund,
                }
            }
        }
    }

    fn pluralize(&self, noun: &str) -> String {
        if noun.ends_with('s')
            || noun.ends_with('x')
            || noun.ends_with('z')
            || noun.ends_with("ch")
            || noun.ends_with("sh")
        {
            return format!("{noun}es");
        }
        let mut chars = noun.chars().rev();
        if let (Some('y'), Some(prev)) = (chars.next(), chars.next()) {
            if !is_vowel(prev) {
                let stem = &noun[..noun.len() - 1];
                return format!("{stem}ies");
            }
        }
        format!("{noun}s")
    }

    fn comparative(&self, word: &str) -> String {
        format!("more {word}")
    }

    fn superlative(&self, word: &str) -> String {
        format!("most {word}")
    }

    fn possessive(&self, word: &str) -> String {
        match word.to_lowercase().as_str() {
            "me" | "i" => "my".into(),
            "you" => "your".into(),
            "him" | "he" => "his".into(),
            "her" | "she" => "her".into(),
            "it" => "its".into(),
            "us" => "our".into(),
            "they" | "them" => "their".into(),
            "who" => "whose".into(),
            _ => format!("{word}'s"),
        }
    }

    fn subject_form(&self, word: &str) -> String {
        match word.to_lowercase().as_str() {
            "me" => "I".into(),
            "him" => "he".into(),
            "her" => "she".into(),
            "them" => "they".into(),
            _ => word.to_lowercase(),
        }
    }
}
