mod types;

pub use types::*;

use crate::parser::{title_case, DraftKind, Encoding, MediaDraft, MediaKind, Resolution};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const UNKNOWN_FILE_DIRECTORY: &str = "Unknown File";
const UNKNOWN_EMPTY_DIRECTORY: &str = "Unknown Empty Directory";

/// A classified media file and the names it should carry.
///
/// The `old_*` fields are captured from the source path at construction and
/// never change. The `new_*` names and the backup identity are derived from
/// the title, the kind-specific details and the tags; they are recomputed
/// together whenever one of their inputs changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntity {
    old_directory_path: PathBuf,
    old_directory: String,
    old_file_name: String,
    file_extension: String,
    old_absolute_path: PathBuf,

    title: String,
    resolution: Option<Resolution>,
    encoding: Option<Encoding>,
    details: MediaDetails,

    new_file_name: String,
    new_directory_name: String,
    backup_identity: String,

    /// Where the file was placed by a completed rename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_location: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transfer: Option<Transfer>,
}

/// Path components every entity captures from its source path
struct SourcePath {
    directory_path: PathBuf,
    directory: String,
    file_name: String,
    extension: String,
    absolute: PathBuf,
}

impl SourcePath {
    fn split(path: &Path) -> Self {
        let directory_path = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let directory = directory_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            directory_path,
            directory,
            file_name,
            extension,
            absolute: path.to_path_buf(),
        }
    }

    /// Directories have no extension: the whole name is the "file name"
    fn split_directory(path: &Path) -> Self {
        let mut source = Self::split(path);
        source.file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        source.extension = String::new();
        source
    }
}

impl MediaEntity {
    /// Build a fully derived entity from a source path and its classification
    pub fn from_draft(path: &Path, draft: MediaDraft) -> Self {
        let (title, details) = match draft.kind {
            DraftKind::Movie { title, year } => (
                title_case(&title),
                MediaDetails::Movie { release_year: year },
            ),
            DraftKind::Show {
                title,
                season,
                episode,
                episode_title,
            } => {
                let episode_title = title_case(&episode_title);
                (
                    title_case(&title),
                    MediaDetails::Show {
                        season,
                        episode,
                        episode_title: (!episode_title.is_empty()).then_some(episode_title),
                    },
                )
            }
            DraftKind::Unknown { reason } => return Self::unknown(path, reason, true),
        };

        Self::build(
            SourcePath::split(path),
            title,
            draft.resolution,
            draft.encoding,
            details,
        )
    }

    /// Build an unrecognized entity for a file or a directory.
    ///
    /// Unknown entities never carry tags and always derive the sentinel file name.
    pub fn unknown(path: &Path, reason: impl Into<String>, is_file: bool) -> Self {
        let source = if is_file {
            SourcePath::split(path)
        } else {
            SourcePath::split_directory(path)
        };

        Self::build(
            source,
            String::new(),
            None,
            None,
            MediaDetails::Unknown {
                is_file,
                reason: reason.into(),
            },
        )
    }

    fn build(
        source: SourcePath,
        title: String,
        resolution: Option<Resolution>,
        encoding: Option<Encoding>,
        details: MediaDetails,
    ) -> Self {
        let mut entity = Self {
            old_directory_path: source.directory_path,
            old_directory: source.directory,
            old_file_name: source.file_name,
            file_extension: source.extension,
            old_absolute_path: source.absolute,
            title,
            resolution,
            encoding,
            details,
            new_file_name: String::new(),
            new_directory_name: String::new(),
            backup_identity: String::new(),
            current_location: None,
            transfer: None,
        };
        entity.derive_names();
        entity
    }

    fn derive_names(&mut self) {
        let (file_name, directory_name) = match &self.details {
            MediaDetails::Movie { release_year } => {
                let base = format!("{} ({})", self.title, release_year);
                (format!("{}{}", base, self.tags()), base)
            }
            MediaDetails::Show {
                season,
                episode,
                episode_title,
            } => {
                let mut name = format!("{} {}x{}", self.title, season, episode);
                if let Some(episode_title) = episode_title {
                    name.push(' ');
                    name.push_str(episode_title);
                }
                name.push_str(&self.tags());
                (name, self.title.clone())
            }
            MediaDetails::Unknown { is_file, .. } => {
                let directory = if *is_file {
                    UNKNOWN_FILE_DIRECTORY
                } else {
                    UNKNOWN_EMPTY_DIRECTORY
                };
                (UNKNOWN_FILE_NAME.to_string(), directory.to_string())
            }
        };

        self.backup_identity = format!("{}.{}{}", directory_name, file_name, self.file_extension);
        self.new_file_name = file_name;
        self.new_directory_name = directory_name;
    }

    fn tags(&self) -> String {
        let mut tags = String::new();
        if let Some(resolution) = self.resolution {
            tags.push_str(&format!(" [{}]", resolution));
        }
        if let Some(encoding) = self.encoding {
            tags.push_str(&format!(" [{}]", encoding.tag()));
        }
        tags
    }

    /// Return a copy of this entity carrying a corrected title.
    ///
    /// All derived names, including the backup identity, are regenerated on
    /// the copy. The original entity is left untouched whether or not the
    /// correction is accepted.
    pub fn with_title(&self, title: &str) -> Result<MediaEntity, CorrectionError> {
        if self.is_unknown() {
            return Err(CorrectionError::Unrecognized);
        }

        let title = title.trim();
        if title.is_empty() {
            return Err(CorrectionError::Empty);
        }
        if let Some(c) = title.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
            return Err(CorrectionError::ReservedCharacter(c));
        }

        let mut corrected = self.clone();
        corrected.title = title.to_string();
        corrected.derive_names();

        if corrected.new_file_name == self.new_file_name {
            return Err(CorrectionError::Unchanged);
        }

        debug!(
            from = %self.new_file_name,
            to = %corrected.new_file_name,
            "Title corrected"
        );
        Ok(corrected)
    }

    pub fn kind(&self) -> MediaKind {
        match self.details {
            MediaDetails::Movie { .. } => MediaKind::Movie,
            MediaDetails::Show { .. } => MediaKind::Show,
            MediaDetails::Unknown { .. } => MediaKind::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.details, MediaDetails::Unknown { .. })
    }

    /// Reason an unknown entity was not recognized
    pub fn unknown_reason(&self) -> Option<&str> {
        match &self.details {
            MediaDetails::Unknown { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn has_correct_file_name(&self) -> bool {
        self.old_file_name == self.new_file_name
    }

    pub fn has_correct_directory_name(&self) -> bool {
        self.old_directory == self.new_directory_name
    }

    pub fn needs_renaming(&self) -> bool {
        !self.is_unknown() && !self.has_correct_file_name()
    }

    pub fn old_directory_path(&self) -> &Path {
        &self.old_directory_path
    }

    pub fn old_directory(&self) -> &str {
        &self.old_directory
    }

    pub fn old_file_name(&self) -> &str {
        &self.old_file_name
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn old_absolute_path(&self) -> &Path {
        &self.old_absolute_path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    pub fn details(&self) -> &MediaDetails {
        &self.details
    }

    pub fn new_file_name(&self) -> &str {
        &self.new_file_name
    }

    pub fn new_directory_name(&self) -> &str {
        &self.new_directory_name
    }

    /// New file name including the extension
    pub fn new_file_name_with_extension(&self) -> String {
        format!("{}{}", self.new_file_name, self.file_extension)
    }

    pub fn backup_identity(&self) -> &str {
        &self.backup_identity
    }

    pub(crate) fn set_backup_identity(&mut self, identity: String) {
        self.backup_identity = identity;
    }

    /// Backup identity with a "(n)" disambiguator before the extension
    pub(crate) fn numbered_identity(&self, n: usize) -> String {
        format!(
            "{}.{}({}){}",
            self.new_directory_name, self.new_file_name, n, self.file_extension
        )
    }

    /// Path of the file after an in-place rename
    pub fn new_absolute_path(&self) -> PathBuf {
        self.old_directory_path
            .join(self.new_file_name_with_extension())
    }

    /// Where the file lives after a completed rename.
    ///
    /// Falls back to the in-place derived path when no placement was recorded.
    pub fn current_path(&self) -> PathBuf {
        self.current_location
            .clone()
            .unwrap_or_else(|| self.new_absolute_path())
    }

    pub fn transfer(&self) -> Option<Transfer> {
        self.transfer
    }

    pub(crate) fn record_placement(&mut self, location: PathBuf, transfer: Transfer) {
        self.current_location = Some(location);
        self.transfer = Some(transfer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::classify_stem;

    fn entity(path: &str) -> MediaEntity {
        let path = Path::new(path);
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        MediaEntity::from_draft(path, classify_stem(&stem))
    }

    #[test]
    fn test_show_derived_names() {
        let e = entity("/downloads/rick/Rick.and.Morty.S05E05.720p.WEBRip.x264-BAE.mkv");

        assert_eq!(e.kind(), MediaKind::Show);
        assert_eq!(e.title(), "Rick and Morty");
        assert_eq!(e.new_file_name(), "Rick and Morty 05x05 [720p] [x264]");
        assert_eq!(e.new_directory_name(), "Rick and Morty");
        assert_eq!(
            e.backup_identity(),
            "Rick and Morty.Rick and Morty 05x05 [720p] [x264].mkv"
        );
        assert_eq!(e.old_directory(), "rick");
        assert_eq!(e.file_extension(), ".mkv");
    }

    #[test]
    fn test_show_with_episode_title() {
        let e = entity("/tv/Konosuba 01x02 An Explosion For This Chuunibyou!.mp4");

        assert_eq!(
            e.new_file_name(),
            "Konosuba 01x02 An Explosion for This Chuunibyou!"
        );
        match e.details() {
            MediaDetails::Show { episode_title, .. } => {
                assert_eq!(
                    episode_title.as_deref(),
                    Some("An Explosion for This Chuunibyou!")
                )
            }
            other => panic!("Expected show, got {:?}", other),
        }
    }

    #[test]
    fn test_movie_derived_names() {
        let e = entity("/movies/Amateur Night (2016) 720p.mkv");

        assert_eq!(e.kind(), MediaKind::Movie);
        assert_eq!(e.new_file_name(), "Amateur Night (2016) [720p]");
        assert_eq!(e.new_directory_name(), "Amateur Night (2016)");
        assert_eq!(
            e.new_absolute_path(),
            PathBuf::from("/movies/Amateur Night (2016) [720p].mkv")
        );
    }

    #[test]
    fn test_unknown_file_has_sentinel_name() {
        let e = entity("/downloads/holiday photos.jpg");

        assert!(e.is_unknown());
        assert_eq!(e.new_file_name(), UNKNOWN_FILE_NAME);
        assert_eq!(e.new_directory_name(), "Unknown File");
        assert!(e.resolution().is_none());
        assert!(e.encoding().is_none());
        assert!(!e.needs_renaming());
    }

    #[test]
    fn test_unknown_directory() {
        let e = MediaEntity::unknown(Path::new("/downloads/empty"), "No valid files", false);

        assert_eq!(e.old_file_name(), "empty");
        assert_eq!(e.file_extension(), "");
        assert_eq!(e.new_directory_name(), "Unknown Empty Directory");
        assert_eq!(e.unknown_reason(), Some("No valid files"));
    }

    #[test]
    fn test_already_correct_name() {
        let e = entity("/movies/Heat (1995)/Heat (1995).mkv");

        assert!(e.has_correct_file_name());
        assert!(e.has_correct_directory_name());
        assert!(!e.needs_renaming());
    }

    #[test]
    fn test_with_title_regenerates_derived_fields() {
        let e = entity("/movies/Anchorman.2004.1080p.mkv");
        let corrected = e
            .with_title("Anchorman: The Legend")
            .unwrap_err();
        assert_eq!(corrected, CorrectionError::ReservedCharacter(':'));

        let corrected = e.with_title("Anchorman The Legend of Ron Burgundy").unwrap();
        assert_eq!(
            corrected.new_file_name(),
            "Anchorman The Legend of Ron Burgundy (2004) [1080p]"
        );
        assert_eq!(
            corrected.new_directory_name(),
            "Anchorman The Legend of Ron Burgundy (2004)"
        );
        assert_eq!(
            corrected.backup_identity(),
            "Anchorman The Legend of Ron Burgundy (2004).Anchorman The Legend of Ron Burgundy (2004) [1080p].mkv"
        );

        // Source fields are untouched
        assert_eq!(corrected.old_absolute_path(), e.old_absolute_path());
    }

    #[test]
    fn test_rejected_correction_leaves_entity_unchanged() {
        let e = entity("/movies/Anchorman.2004.mkv");
        let before = e.clone();

        assert!(e.with_title("Bad: Name").is_err());
        assert_eq!(e, before);
    }

    #[test]
    fn test_correction_must_change_name() {
        let e = entity("/movies/Anchorman.2004.mkv");

        assert_eq!(e.with_title("Anchorman"), Err(CorrectionError::Unchanged));
        assert_eq!(e.with_title("   "), Err(CorrectionError::Empty));
    }

    #[test]
    fn test_unknown_cannot_be_corrected() {
        let e = entity("/downloads/notes.txt");
        assert_eq!(e.with_title("Notes"), Err(CorrectionError::Unrecognized));
    }

    #[test]
    fn test_current_path_defaults_to_in_place_name() {
        let mut e = entity("/movies/Heat.1995.mkv");
        assert_eq!(e.current_path(), PathBuf::from("/movies/Heat (1995).mkv"));

        e.record_placement(PathBuf::from("/library/Heat (1995)/Heat (1995).mkv"), Transfer::Moved);
        assert_eq!(
            e.current_path(),
            PathBuf::from("/library/Heat (1995)/Heat (1995).mkv")
        );
        assert_eq!(e.transfer(), Some(Transfer::Moved));
    }

    #[test]
    fn test_serde_round_trip_preserves_entity() {
        let e = entity("/tv/Legion 01x06 720p.mkv");
        let json = serde_json::to_string(&e).unwrap();
        let restored: MediaEntity = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, e);
        assert!(json.contains("\"kind\":\"show\""));
    }

    #[test]
    fn test_reclassifying_derived_name_keeps_kind() {
        for path in [
            "/tv/Rick.and.Morty.S05E05.720p.WEBRip.x264-BAE.mkv",
            "/movies/As.Above,.So.Below.2014.1080p.BluRay.x264.YIFY.mp4",
            "/tv/Shingeki no Kyojin - The Final Season - S04E10 - A Sound Argument.mkv",
        ] {
            let e = entity(path);
            let again = classify_stem(e.new_file_name());
            assert_eq!(again.media_kind(), e.kind(), "{}", path);
        }
    }
}
