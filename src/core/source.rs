use std::fmt;
use std::path::PathBuf;
use crate::core::SourceError;

/// A playable media reference, resolved from what the user typed or picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    File(PathBuf),
    Url(String),
}

impl MediaSource {
    /// Accepts an http(s) URL or a path to an existing file.
    pub fn resolve(input: &str) -> Result<Self, SourceError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SourceError::Empty);
        }

        let lowercase = input.to_ascii_lowercase();
        if lowercase.starts_with("http://") || lowercase.starts_with("https://") {
            return Ok(MediaSource::Url(input.to_string()));
        }

        let path = PathBuf::from(input);
        if !path.exists() {
            return Err(SourceError::NotFound(path));
        }
        if !path.is_file() {
            return Err(SourceError::Unsupported(path));
        }
        Ok(MediaSource::File(path))
    }

    /// The argument handed to ffprobe.
    pub fn as_probe_input(&self) -> String {
        match self {
            MediaSource::File(path) => path.to_string_lossy().into_owned(),
            MediaSource::Url(url) => url.clone(),
        }
    }

    /// Short name for window titles and status text.
    pub fn display_name(&self) -> String {
        match self {
            MediaSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            MediaSource::Url(url) => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|segment| !segment.is_empty())
                .unwrap_or(url)
                .to_string(),
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::File(path) => write!(f, "{}", path.display()),
            MediaSource::Url(url) => write!(f, "{}", url),
        }
    }
}
