use once_cell::sync::Lazy;
use regex::Regex;

static DOUBLE_SPACES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

// "Movie(2012)" -> "Movie (2012)"
static SPACE_BEFORE_BRACKET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w)([(\[])").unwrap());

// "(2012)Movie" -> "(2012) Movie"
static SPACE_AFTER_BRACKET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([)\]])(\w)").unwrap());

// Release group prefix: "[Group] Title ..."
static LEADING_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[.+?\] ?").unwrap());

/// Normalize a raw file stem into a space-delimited token string.
///
/// The steps run in a fixed order: separators, double spaces, bracket
/// spacing, then the leading release tag.
pub fn clean_name(stem: &str) -> String {
    let spaced = replace_separators(stem);
    let collapsed = DOUBLE_SPACES_REGEX.replace_all(&spaced, " ");
    let bracketed = SPACE_BEFORE_BRACKET_REGEX.replace_all(&collapsed, "$1 $2");
    let bracketed = SPACE_AFTER_BRACKET_REGEX.replace_all(&bracketed, "$1 $2");
    LEADING_TAG_REGEX.replace(&bracketed, "").into_owned()
}

/// Turn `_` and most `.` into spaces.
///
/// A period directly after an uppercase letter is kept ("F.B.I."), unless it
/// is followed by a capitalized word ("I.Files") or a digit ("T.2017").
fn replace_separators(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| match c {
            '_' => ' ',
            '.' if is_separator_period(&chars, i) => ' ',
            other => other,
        })
        .collect()
}

fn is_separator_period(chars: &[char], i: usize) -> bool {
    let after_capital = i > 0 && chars[i - 1].is_ascii_uppercase();
    if !after_capital {
        return true;
    }

    let next = chars.get(i + 1);
    let starts_word = matches!(
        (next, chars.get(i + 2)),
        (Some(a), Some(b)) if a.is_ascii_uppercase() && b.is_ascii_lowercase()
    );
    let starts_number = next.is_some_and(|c| c.is_ascii_digit());

    starts_word || starts_number
}
