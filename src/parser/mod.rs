mod cleaner;
mod title_case;
mod types;

pub use cleaner::clean_name;
pub use title_case::title_case;
pub use types::*;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, trace};

pub const UNRECOGNIZED_FILE: &str = "Not a recognized media file";
pub const NO_VALID_FILES: &str = "No valid files in directory";

// Show: <title> [- <tags> -] [S|Season]<season>(x|E|Episode)<episode> [<episode title>] [<resolution>...]
// Examples: "Rick and Morty S05E05 720p", "The Office 05x03 Baby Shower",
//           "Shingeki no Kyojin - The Final Season - S04E10 - A Sound Argument"
const SHOW_PATTERN: &str = concat!(
    r"^(?P<title>([!0-9a-zA-Z.',_\-]+ )+?)(- (\w+ )+- |- (\w+ )+|- )?([sS]eason|[sS])? ?",
    r"(?P<season>\d{1,2})(x|[eE]pisode|[eE]) ?(?P<episode>\d{1,2})( \[?\d{3,4}p.*| - | |$)",
    r"(?P<episode_title>([!0-9a-zA-Z.',_\-]+( |$))+?||$)(\[?\d{3,4}p|\[|$)",
);

// Movie: <title> [- <tags> -] [(|[]<year>[)|]| |end]
// Examples: "Amateur Night (2016) 720p", "American History X 1998 1080p"
const MOVIE_PATTERN: &str = concat!(
    r"^(?P<title>([!0-9a-zA-Z.',_\-]+ (- )?)+?)(- (\w+ )+- |(- (\w+ )+)|- )?[(\[]?",
    r"(?P<year>\d{4})([\]) ]|$)",
);

static RESOLUTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<resolution>480p|720p|1080p)").unwrap());

static ENCODING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([xhH][ .]?)?(?P<encoding>26[45])").unwrap());

/// A single entry of the ordered classification table
#[derive(Debug)]
pub struct ClassificationRule {
    kind: MediaKind,
    pattern: Regex,
}

impl ClassificationRule {
    fn new(kind: MediaKind, pattern: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn extract(&self, captures: &Captures<'_>) -> DraftKind {
        match self.kind {
            MediaKind::Movie => DraftKind::Movie {
                title: group(captures, "title"),
                year: group(captures, "year"),
            },
            MediaKind::Show => DraftKind::Show {
                title: group(captures, "title"),
                season: group(captures, "season"),
                episode: group(captures, "episode"),
                episode_title: group(captures, "episode_title"),
            },
            MediaKind::Unknown => DraftKind::Unknown {
                reason: UNRECOGNIZED_FILE.to_string(),
            },
        }
    }
}

// Shows are tried before movies: "Doctor Who 2005 S01E01" carries both a
// year and an episode marker and must classify as a show.
static RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    vec![
        ClassificationRule::new(MediaKind::Show, SHOW_PATTERN),
        ClassificationRule::new(MediaKind::Movie, MOVIE_PATTERN),
    ]
});

/// The classification rules in the order they are tried
pub fn rules() -> &'static [ClassificationRule] {
    &RULES
}

/// Classify a cleaned file name.
///
/// The first rule whose pattern matches wins. Resolution and encoding are
/// searched independently of which rule matched. Never fails: names that
/// match no rule produce an unknown draft.
pub fn classify(cleaned: &str) -> MediaDraft {
    for rule in rules() {
        if let Some(captures) = rule.pattern.captures(cleaned) {
            debug!(name = %cleaned, kind = ?rule.kind, "Classified");
            return MediaDraft {
                kind: rule.extract(&captures),
                resolution: detect_resolution(cleaned),
                encoding: detect_encoding(cleaned),
            };
        }
        trace!(name = %cleaned, kind = ?rule.kind, "Rule did not match");
    }

    debug!(name = %cleaned, "No rule matched");
    MediaDraft::unknown(UNRECOGNIZED_FILE)
}

/// Clean a raw file stem, then classify it
pub fn classify_stem(stem: &str) -> MediaDraft {
    classify(&clean_name(stem))
}

pub fn detect_resolution(cleaned: &str) -> Option<Resolution> {
    RESOLUTION_REGEX
        .captures(cleaned)
        .and_then(|c| c.name("resolution"))
        .and_then(|m| Resolution::parse(m.as_str()))
}

pub fn detect_encoding(cleaned: &str) -> Option<Encoding> {
    ENCODING_REGEX
        .captures(cleaned)
        .and_then(|c| c.name("encoding"))
        .and_then(|m| Encoding::parse(m.as_str()))
}

fn group(captures: &Captures<'_>, name: &str) -> String {
    captures
        .name(name)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
