/// Words kept lowercase when they appear inside a title
const MINOR_WORDS: &[&str] = &[
    // articles
    "a", "an", "the",
    // coordinating conjunctions
    "for", "and", "but", "yet", "or", "nor", "if", "vs",
    // prepositions
    "as", "at", "by", "of", "to", "on", "off", "with", "without", "in", "per", "via",
];

/// Apply English title capitalization to a phrase.
///
/// The first and last words are always capitalized. Interior words are
/// lowercased when they are articles, short conjunctions or prepositions,
/// and capitalized otherwise. Capitalizing only touches the first
/// character, so "McDonald" and "WALL-E" keep their inner casing.
/// Whitespace runs collapse to single spaces.
pub fn title_case(phrase: &str) -> String {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let last = words.len().saturating_sub(1);

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 || i == last || !is_minor_word(word) {
                capitalize(word)
            } else {
                word.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_minor_word(word: &str) -> bool {
    MINOR_WORDS.iter().any(|minor| minor.eq_ignore_ascii_case(word))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
