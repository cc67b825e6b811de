use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("no file name")]
    NoFileName,

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("terminal: {0}")]
    Terminal(String),
}

/// コマンドモードの入力エラー
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: '{0}'")]
    UnknownCommand(char),
}

pub type Result<T> = std::result::Result<T, EditorError>;
