// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Field registry: the set of tag fields the media-file layer can write

use once_cell::sync::Lazy;

/// Fields that identify an item rather than describe it. Never zeroed.
pub const PROTECTED_FIELDS: [&str; 3] = ["id", "path", "album_id"];

/// Check whether zeroing `field` would break the item's identity
pub fn is_protected(field: &str) -> bool {
    PROTECTED_FIELDS.contains(&field)
}

// Standard media-file tag fields, in the order the media layer reports them
static MEDIA_FILE_FIELDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "title",
        "artist",
        "album",
        "albumartist",
        "genre",
        "lyricist",
        "composer",
        "composer_sort",
        "arranger",
        "grouping",
        "year",
        "month",
        "day",
        "date",
        "track",
        "tracktotal",
        "disc",
        "disctotal",
        "lyrics",
        "comments",
        "bpm",
        "comp",
        "albumartist_sort",
        "artist_sort",
        "albumtype",
        "label",
        "asin",
        "catalognum",
        "disctitle",
        "encoder",
        "script",
        "language",
        "country",
        "albumstatus",
        "media",
        "albumdisambig",
        "original_year",
        "original_month",
        "original_day",
        "original_date",
        "artist_credit",
        "albumartist_credit",
        "mb_trackid",
        "mb_albumid",
        "mb_artistid",
        "mb_albumartistid",
        "mb_releasegroupid",
        "acoustid_fingerprint",
        "acoustid_id",
        "rg_track_gain",
        "rg_track_peak",
        "rg_album_gain",
        "rg_album_peak",
        "r128_track_gain",
        "r128_album_gain",
        "initial_key",
        "images",
        "art",
    ]
});

/// Ordered set of valid field names, queried once when the pattern table
/// is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: Vec<String>,
}

impl FieldRegistry {
    /// Build a registry from the host's field list. Duplicates are dropped,
    /// first occurrence wins.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for field in fields {
            let field = field.into();
            if !registry.contains(&field) {
                registry.fields.push(field);
            }
        }
        registry
    }

    /// Registry of the standard media-file tag fields
    pub fn media_file() -> Self {
        Self::new(MEDIA_FILE_FIELDS.iter().copied())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
