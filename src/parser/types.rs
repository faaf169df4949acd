use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of media a file was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Show,
    Unknown,
}

impl MediaKind {
    pub fn description(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
            MediaKind::Unknown => "unknown",
        }
    }
}

/// Video resolution tag found in a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "480p" => Some(Resolution::P480),
            "720p" => Some(Resolution::P720),
            "1080p" => Some(Resolution::P1080),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::P480 => "480p",
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video encoding tag found in a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "264")]
    H264,
    #[serde(rename = "265")]
    H265,
}

impl Encoding {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "264" => Some(Encoding::H264),
            "265" => Some(Encoding::H265),
            _ => None,
        }
    }

    /// Bare codec number, e.g. "264"
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::H264 => "264",
            Encoding::H265 => "265",
        }
    }

    /// Form used in derived file names, e.g. "x264"
    pub fn tag(&self) -> String {
        format!("x{}", self.as_str())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw capture groups produced by the first matching classification rule.
///
/// Titles are kept exactly as captured; title-casing happens when the
/// entity is built. Empty captures are legal and stay empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftKind {
    Movie {
        title: String,
        year: String,
    },
    Show {
        title: String,
        season: String,
        episode: String,
        episode_title: String,
    },
    Unknown {
        reason: String,
    },
}

/// Result of classifying a cleaned file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDraft {
    pub kind: DraftKind,
    pub resolution: Option<Resolution>,
    pub encoding: Option<Encoding>,
}

impl MediaDraft {
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            kind: DraftKind::Unknown {
                reason: reason.into(),
            },
            resolution: None,
            encoding: None,
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        match self.kind {
            DraftKind::Movie { .. } => MediaKind::Movie,
            DraftKind::Show { .. } => MediaKind::Show,
            DraftKind::Unknown { .. } => MediaKind::Unknown,
        }
    }
}
