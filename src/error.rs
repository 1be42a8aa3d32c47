use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("Unknown question: {0}")]
    NotFound(String),

    #[error("Duplicate question in catalog: {0}")]
    DuplicateQuestion(String),

    #[error("Question has an empty answer: {0}")]
    EmptyAnswer(String),

    #[error("Duplicate keyword in catalog: {0}")]
    DuplicateKeyword(String),

    #[error("Keyword '{keyword}' points at unknown question '{question}'")]
    DanglingKeyword { keyword: String, question: String },

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("Fallback responder failed: {0}")]
    Fallback(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FaqError>;
