//! Ingredient tokenizer — isolates recognizable ingredients in free text
//!
//! The lookup endpoint returns the user's own entry concatenated with other
//! ingredient names in the first `ingredients` field. Only the words the
//! reference dictionary recognizes survive; hyphenated compounds such as
//! `whole-milk` stay one token.
//!
//! Guarantees:
//! - Order of surviving tokens follows the source text
//! - No token is empty after trimming
//! - Hyphenated compounds are never split

use crate::dictionary::Normalizer;

/// Stands in for `-` while splitting. U+E000 is a private-use code point.
const HYPHEN_PLACEHOLDER: &str = "\u{E000}";

/// Split free text into dictionary-recognized tokens
pub fn extract_tokens(text: &str, normalizer: &Normalizer) -> Vec<String> {
    split_protected(text)
        .into_iter()
        .filter(|part| normalizer.is_valid(part))
        .collect()
}

/// Split on single spaces without breaking hyphenated compounds
///
/// Parts that are empty after trimming are discarded; the rest keep their
/// original spelling.
pub fn split_protected(text: &str) -> Vec<String> {
    let protected = text.replace('-', HYPHEN_PLACEHOLDER);

    protected
        .split(' ')
        .map(|part| part.replace(HYPHEN_PLACEHOLDER, "-"))
        .filter(|part| !part.trim().is_empty())
        .collect()
}

/// Turn a response's raw ingredient fields into the list to render
///
/// The first field is tokenized and filtered, the remaining fields are
/// appended verbatim, blank entries are dropped, and the merged list is
/// canonicalized.
pub fn prepare_ingredients<S: AsRef<str>>(ingredients: &[S], normalizer: &Normalizer) -> Vec<String> {
    let mut merged: Vec<String> = match ingredients.first() {
        Some(first) => extract_tokens(first.as_ref(), normalizer),
        None => Vec::new(),
    };

    merged.extend(
        ingredients
            .iter()
            .skip(1)
            .map(|ingredient| ingredient.as_ref().to_string()),
    );
    merged.retain(|ingredient| !ingredient.trim().is_empty());

    normalizer.canonicalize(&merged)
}
