//! Closed pronoun tables used during transduction.
//!
//! The semantic tree is stored from the listener's perspective, so
//! first-person and second-person pronouns trade places on the way in
//! ("I like you" is remembered as "you like me"). These are small closed
//! word classes; the tables live here rather than in the external lexicon.

/// Swap the conversational perspective of a pronoun and canonicalize it.
///
/// Non-pronouns pass through unchanged apart from lowercasing, so this is
/// safe to apply to every noun-like token.
pub fn swap_person(word: &str) -> String {
    let word = word.to_lowercase();
    match word.as_str() {
        // Canonical object forms.
        "she" => "her".into(),
        "he" => "him".into(),
        // Perspective swaps.
        "i" | "me" => "you".into(),
        "you" => "me".into(),
        "myself" => "yourself".into(),
        "yourself" => "myself".into(),
        "yourselves" => "ourselves".into(),
        "mine" => "yours".into(),
        "yours" => "mine".into(),
        _ => word,
    }
}

/// The noun a possessive pronoun refers back to, perspective-swapped:
/// "my dog" → the dog of "you". Non-possessives pass through lowercased.
pub fn possessor_noun(word: &str) -> String {
    let word = word.to_lowercase();
    match word.as_str() {
        "my" => "you".into(),
        "your" => "me".into(),
        "his" => "him".into(),
        "her" => "her".into(),
        "its" => "it".into(),
        "our" => "us".into(),
        "their" => "them".into(),
        "whose" => "who".into(),
        _ => word,
    }
}

/// Is the word a wh-question word?
pub fn is_wh_word(word: &str) -> bool {
    matches!(
        word.to_lowercase().as_str(),
        "who" | "what" | "when" | "where" | "why" | "how" | "which" | "whom" | "whose"
    )
}
