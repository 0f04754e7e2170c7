use std::{
    fmt,
    io::Write,
    path::{Path, PathBuf},
};

use slog::{debug, error, info, o, warn, Discard, Logger};

use crate::{
    classify::{classify, is_linked, Classification, LivePair},
    tool::MetadataTool,
    Error, Metadata,
};


#[derive(Debug, Clone, Default)]
pub struct RepairConfig {
    /// Record per-file failures and continue instead of stopping at the first one
    pub keep_going: bool,
}

#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}

/// Totals for one run over a directory
#[derive(Debug, Default)]
pub struct Summary {
    /// Videos that already carried a linking identifier
    pub linked: u64,
    /// Videos matching the pairing rule, whether or not they were repaired
    pub candidates: u64,
    /// Videos that had the identifier copied onto them
    pub repaired: u64,
    pub failures: Vec<Failure>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Proper live photos:   {}", self.linked)?;
        writeln!(f, "Likely live photos:   {}", self.candidates)?;
        write!(f, "Restored live photos: {}", self.repaired)?;
        for failure in &self.failures {
            write!(f, "\nFailed: {}: {}", failure.path.display(), failure.error)?;
        }
        Ok(())
    }
}

pub struct Repairer<T> {
    tool: T,
    config: RepairConfig,
    logger: Logger,
}

impl<T: MetadataTool> Repairer<T> {
    pub fn new(tool: T) -> Self {
        Self {
            tool,
            config: RepairConfig::default(),
            logger: Logger::root(Discard, o!()),
        }
    }

    pub fn with_config(mut self, config: RepairConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Repairs every unlinked Live Photo video under `dir`, overwriting the videos in place.
    ///
    /// Progress lines are written to `out` as each video is found and repaired. Without
    /// `keep_going` the first error aborts the run and no summary is returned. Failing to write
    /// to `out` always aborts.
    pub fn run(&self, dir: &Path, out: &mut impl Write) -> Result<Summary, Error> {
        let mut summary = Summary::default();
        for metadata in self.read_directory(dir)? {
            if let Err(e) = self.process(&metadata, &mut summary, out) {
                if !self.config.keep_going || matches!(e, Error::Output(_)) {
                    return Err(e);
                }
                let path = PathBuf::from(metadata.source_file().unwrap_or_default());
                error!(self.logger, "failed to repair file"; "path" => %path.display(), "error" => %e);
                summary.failures.push(Failure { path, error: e });
            }
        }
        info!(self.logger, "finished repair";
            "linked" => summary.linked,
            "candidates" => summary.candidates,
            "repaired" => summary.repaired,
            "failures" => summary.failures.len());
        Ok(summary)
    }

    /// Unparsable tool output is treated as an empty directory, which is indistinguishable from
    /// one in the totals, so it is at least logged.
    fn read_directory(&self, dir: &Path) -> Result<Vec<Metadata>, Error> {
        match self.tool.read_metadata(dir) {
            Ok(metadata_list) => Ok(metadata_list),
            Err(exiftool::Error::JsonParseError(e)) => {
                warn!(self.logger, "unparsable exiftool output, treating directory as empty";
                    "path" => %dir.display(), "error" => %e);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn process(
        &self,
        metadata: &Metadata,
        summary: &mut Summary,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        let classification = classify(metadata)?;
        debug!(self.logger, "classified file";
            "path" => metadata.source_file().unwrap_or_default(),
            "outcome" => %classification);
        match classification {
            Classification::NotVideo | Classification::Unpaired => {}
            Classification::Linked => summary.linked += 1,
            Classification::Candidate(pair) => {
                summary.candidates += 1;
                writeln!(out, "Found: {}", pair.video.display())?;
                if self.copy_content_identifier(&pair)? {
                    summary.repaired += 1;
                    writeln!(out, "Done: {}", pair.video.display())?;
                }
            }
        }
        Ok(())
    }

    /// Copies the linking identifier from the pair's photo onto its video. Returns `false`
    /// without writing anything when the photo has no identifier of its own.
    pub fn copy_content_identifier(&self, pair: &LivePair) -> Result<bool, Error> {
        let photo = self.tool.read_file_metadata(&pair.photo)?;
        if !is_linked(&photo) {
            info!(self.logger, "photo has no content identifier, skipping"; "photo" => %pair.photo.display());
            return Ok(false);
        }
        self.tool
            .copy_content_identifier(&pair.photo, &pair.video)?;
        info!(self.logger, "copied content identifier";
            "photo" => %pair.photo.display(), "video" => %pair.video.display());
        Ok(true)
    }
}
