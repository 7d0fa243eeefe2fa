//! Display label formatting

/// Uppercase the first character of each space-separated word, join with `-`
///
/// The rest of each word is left as is, and consecutive spaces produce empty
/// words: `"a  b"` becomes `"A--B"`.
pub fn title_case_hyphen_join(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_words() {
        assert_eq!(title_case_hyphen_join("green smoothie"), "Green-Smoothie");
    }

    #[test]
    fn test_rest_of_word_unchanged() {
        assert_eq!(title_case_hyphen_join("mANGO lassi"), "MANGO-Lassi");
    }

    #[test]
    fn test_empty_words() {
        assert_eq!(title_case_hyphen_join(""), "");
        assert_eq!(title_case_hyphen_join("a  b"), "A--B");
        assert_eq!(title_case_hyphen_join(" kiwi"), "-Kiwi");
    }

    #[test]
    fn test_non_ascii_first_letter() {
        assert_eq!(title_case_hyphen_join("äpfel shake"), "Äpfel-Shake");
    }

    #[test]
    fn test_existing_hyphens_kept() {
        assert_eq!(title_case_hyphen_join("berry-blast deluxe"), "Berry-blast-Deluxe");
    }
}
