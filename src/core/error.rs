use std::path::PathBuf;
use thiserror::Error;

/// Rejections from resolving a user-typed media reference.
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("Enter a file path or an http(s) URL")]
    Empty,
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Not a playable file: {}", .0.display())]
    Unsupported(PathBuf),
}

/// Rejections from the saved-loop manager.
#[derive(Debug, Error, PartialEq)]
pub enum LoopError {
    #[error("Loop title cannot be empty")]
    EmptyTitle,
    #[error("No saved loop with id {0}")]
    NotFound(String),
}
