use derive_more::{From, Into};
use displaydoc::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slog::{debug, o, warn, Discard, Logger};
use std::{
    collections::VecDeque,
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output},
};
use thiserror::Error;


#[derive(Error, Debug, Display)]
pub enum Error {
    /// exiftool returned failed status code {status}: {stderr}
    ExiftoolCommandFailed { status: ExitStatus, stderr: String },
    /// io: {0}
    Io(#[from] std::io::Error),
    /// no exif data found
    MissingExifData,
    /// serde_json: {0}
    JsonParseError(#[from] serde_json::Error),
}

/// All fields exiftool reported for a single file, keyed by tag name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Returns the field, treating an explicit `null` the same as a missing field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn source_file(&self) -> Option<&str> {
        self.get_str("SourceFile")
    }

    pub fn directory(&self) -> Option<&str> {
        self.get_str("Directory")
    }

    pub fn file_name(&self) -> Option<&str> {
        self.get_str("FileName")
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.get_str("MIMEType")
    }

    /// Duration in seconds. With `-n` exiftool emits a number, without it a string.
    pub fn duration(&self) -> Option<f64> {
        match self.get("Duration")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn content_identifier(&self) -> Option<&Value> {
        self.get("ContentIdentifier")
    }
}

pub struct Exiftool {
    program: PathBuf,
    recursive: bool,
    logger: Logger,
}

impl Exiftool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            recursive: false,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// Descend into subdirectories when reading a directory
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Reads every field of every file exiftool finds at `path`, which may be a directory or a
    /// single file.
    pub fn read(&self, path: &Path) -> Result<Vec<Metadata>, Error> {
        self.read_with(path, self.recursive)
    }

    /// Reads a single file, never recursing
    pub fn read_one(&self, path: &Path) -> Result<Metadata, Error> {
        let mut metadata_list = VecDeque::from(self.read_with(path, false)?);
        let first = metadata_list.pop_front();
        if !metadata_list.is_empty() {
            warn!(self.logger, "multiple exif data returned, ignoring all but first"; "path" => %path.display());
        }
        first.ok_or(Error::MissingExifData)
    }

    fn read_with(&self, path: &Path, recursive: bool) -> Result<Vec<Metadata>, Error> {
        let output = self.run(read_args(path, recursive))?;
        let metadata_list = serde_json::from_slice::<Vec<Metadata>>(&output.stdout)?;
        debug!(self.logger, "read metadata"; "path" => %path.display(), "records" => metadata_list.len());
        Ok(metadata_list)
    }

    /// Copies tags from `src` onto `dst` according to `assignment` (for example
    /// `-Keys:Title<XMP:Title`). `dst` is overwritten without keeping a backup.
    pub fn copy_tags_from(&self, src: &Path, dst: &Path, assignment: &str) -> Result<(), Error> {
        self.run(copy_args(src, dst, assignment))?;
        debug!(self.logger, "copied tags"; "src" => %src.display(), "dst" => %dst.display(), "assignment" => assignment);
        Ok(())
    }

    fn run(&self, args: Vec<OsString>) -> Result<Output, Error> {
        debug!(self.logger, "running exiftool"; "program" => %self.program.display(), "args" => ?args);
        let output = Command::new(&self.program).args(args).output()?;
        if !output.status.success() {
            return Err(Error::ExiftoolCommandFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// JSON output, numeric values, file size in bytes, every available tag
fn read_args(path: &Path, recursive: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-json", "-n", "-FileSize#", "-All"]
        .into_iter()
        .map(OsString::from)
        .collect();
    if recursive {
        args.push("-r".into());
    }
    args.push(path.into());
    args
}

fn copy_args(src: &Path, dst: &Path, assignment: &str) -> Vec<OsString> {
    vec![
        "-overwrite_original".into(),
        "-TagsFromFile".into(),
        src.into(),
        assignment.into(),
        dst.into(),
    ]
}
