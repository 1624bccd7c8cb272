use std::path::PathBuf;

/// Failures surfaced by an editing session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read commit file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("commit file {path} is not valid UTF-8")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("failed to write commit file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("incomplete-session store {path} is unavailable")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SessionError::Read { path, .. }
            | SessionError::Decode { path, .. }
            | SessionError::Write { path, .. }
            | SessionError::Store { path, .. } => path,
        }
    }
}
