//! The external metadata tool, abstracted so the repair logic can run without exiftool installed

use std::path::Path;

use exiftool::{Exiftool, Metadata};

/// Copies the photo's Apple maker-note identifier into the video's QuickTime keys
pub const CONTENT_IDENTIFIER_ASSIGNMENT: &str = "-Keys:ContentIdentifier<Apple:ContentIdentifier";

pub trait MetadataTool {
    /// Reads one record per file found at `path`, a directory or a single file
    fn read_metadata(&self, path: &Path) -> Result<Vec<Metadata>, exiftool::Error>;

    /// Reads the record of exactly one file
    fn read_file_metadata(&self, path: &Path) -> Result<Metadata, exiftool::Error>;

    /// Writes the photo's linking identifier onto the video, overwriting the video in place
    fn copy_content_identifier(&self, photo: &Path, video: &Path) -> Result<(), exiftool::Error>;
}

impl MetadataTool for Exiftool {
    fn read_metadata(&self, path: &Path) -> Result<Vec<Metadata>, exiftool::Error> {
        self.read(path)
    }

    fn read_file_metadata(&self, path: &Path) -> Result<Metadata, exiftool::Error> {
        self.read_one(path)
    }

    fn copy_content_identifier(&self, photo: &Path, video: &Path) -> Result<(), exiftool::Error> {
        self.copy_tags_from(photo, video, CONTENT_IDENTIFIER_ASSIGNMENT)
    }
}

impl<T: MetadataTool + ?Sized> MetadataTool for &T {
    fn read_metadata(&self, path: &Path) -> Result<Vec<Metadata>, exiftool::Error> {
        (**self).read_metadata(path)
    }

    fn read_file_metadata(&self, path: &Path) -> Result<Metadata, exiftool::Error> {
        (**self).read_file_metadata(path)
    }

    fn copy_content_identifier(&self, photo: &Path, video: &Path) -> Result<(), exiftool::Error> {
        (**self).copy_content_identifier(photo, video)
    }
}
