use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use derive_more::Into;

/// An absolute path to an existing directory, for use as a command line argument
#[derive(Clone, Debug, Into)]
pub struct CanonicalizedDirBuf(PathBuf);

impl FromStr for CanonicalizedDirBuf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = PathBuf::from(s).canonicalize()?;
        if !path.is_dir() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", path.display()),
            ));
        }
        Ok(Self(path))
    }
}

impl AsRef<Path> for CanonicalizedDirBuf {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn directory_test() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("photos");
        fs::create_dir(&nested).unwrap();

        let parsed = format!("{}/../photos", nested.display())
            .parse::<CanonicalizedDirBuf>()
            .unwrap();
        assert!(parsed.as_ref().is_absolute());
        assert_eq!(parsed.as_ref(), nested.canonicalize().unwrap());
    }

    #[test]
    fn missing_path_test() {
        let dir = tempfile::tempdir().unwrap();
        let err = dir
            .path()
            .join("missing")
            .to_str()
            .unwrap()
            .parse::<CanonicalizedDirBuf>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn file_rejected_test() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("IMG_01.HEIC");
        fs::write(&file, b"").unwrap();
        let err = file
            .to_str()
            .unwrap()
            .parse::<CanonicalizedDirBuf>()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
