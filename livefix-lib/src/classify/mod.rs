//! Decides whether a video is, or likely was, the motion half of a Live Photo.
//!
//! The pairing rule matches the naming an iPhone export produces: `IMG_0253.HEIC` next to
//! `IMG_0253.mov`. Both extensions are matched case-sensitively and in opposite cases, so an
//! uppercase `.MOV` or a lowercase `.heic` never pairs.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use derive_more::Display;
use exiftool::Metadata;
use walkdir::WalkDir;

use crate::Error;


pub const VIDEO_EXTENSION: &str = ".mov";
pub const PHOTO_EXTENSION: &str = "HEIC";
/// Live Photo clips are about three seconds long
pub const MAX_LIVE_DURATION: f64 = 5.0;
/// Used when a video has no duration, chosen so it never passes the length check
pub const DEFAULT_DURATION: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePair {
    pub photo: PathBuf,
    pub video: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Classification {
    #[display("not a video")]
    NotVideo,
    #[display("already linked")]
    Linked,
    #[display("no live photo pair")]
    Unpaired,
    #[display("pairs with {}", _0.photo.display())]
    Candidate(LivePair),
}

pub fn is_video(metadata: &Metadata) -> bool {
    metadata
        .mime_type()
        .is_some_and(|mime_type| mime_type.starts_with("video/"))
}

/// Only presence matters, the identifier value is never inspected
pub fn is_linked(metadata: &Metadata) -> bool {
    metadata.content_identifier().is_some()
}

pub fn classify(metadata: &Metadata) -> Result<Classification, Error> {
    if !is_video(metadata) {
        return Ok(Classification::NotVideo);
    }
    if is_linked(metadata) {
        return Ok(Classification::Linked);
    }
    Ok(match find_live_pair(metadata)? {
        Some(pair) => Classification::Candidate(pair),
        None => Classification::Unpaired,
    })
}

/// Looks for the `.HEIC` photo that a short, unlinked `.mov` video was exported alongside
pub fn find_live_pair(video: &Metadata) -> Result<Option<LivePair>, Error> {
    let file_name = video.file_name().unwrap_or_default();
    if !file_name.ends_with(VIDEO_EXTENSION) {
        return Ok(None);
    }
    // NaN counts as absent so it can never pass as short
    let duration = video
        .duration()
        .filter(|d| !d.is_nan())
        .unwrap_or(DEFAULT_DURATION);
    if duration >= MAX_LIVE_DURATION {
        return Ok(None);
    }
    let (Some(directory), Some(source_file)) = (video.directory(), video.source_file()) else {
        return Ok(None);
    };

    let base_name = Path::new(file_name)
        .file_stem()
        .unwrap_or_else(|| OsStr::new(file_name));
    let mut photo_name = base_name.to_os_string();
    photo_name.push(".");
    photo_name.push(PHOTO_EXTENSION);

    let directory = Path::new(directory);
    if !contains_entry(directory, &photo_name)? {
        return Ok(None);
    }

    Ok(Some(LivePair {
        photo: directory.join(photo_name),
        video: PathBuf::from(source_file),
    }))
}

/// Compares against the names the directory actually lists rather than calling `exists`, which
/// would ignore case on case-insensitive filesystems.
fn contains_entry(directory: &Path, name: &OsStr) -> Result<bool, Error> {
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        if entry?.file_name() == name {
            return Ok(true);
        }
    }
    Ok(false)
}
