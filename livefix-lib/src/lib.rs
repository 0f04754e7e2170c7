use displaydoc::Display;
use thiserror::Error;

pub mod classify;
pub mod repair;
pub mod tool;

pub use exiftool::Metadata;

#[derive(Debug, Error, Display)]
pub enum Error {
    /// exiftool: {0}
    Exiftool(#[from] exiftool::Error),
    /// walkdir: {0}
    Walkdir(#[from] walkdir::Error),
    /// writing progress: {0}
    Output(#[from] std::io::Error),
}
