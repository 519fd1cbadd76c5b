use std::path::PathBuf;
use thiserror::Error;

/// Result alias for class-file decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Malformed class-file input. Any of these aborts the whole decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid magic number {found:#010x}, expected 0xcafebabe")]
    BadMagic { found: u32 },

    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("unexpected end of class data at byte {offset}: need {needed}, have {available}")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unknown constant pool tag {tag} at byte {offset}")]
    BadConstantTag { tag: u8, offset: usize },

    #[error("constant pool index {index} is not a valid {expected} entry")]
    BadConstantIndex { index: u16, expected: &'static str },

    #[error("wide constant at index {index} runs past constant pool count {count}")]
    WideConstantOverflow { index: u16, count: u16 },

    #[error("malformed modified UTF-8 in constant pool entry {index}")]
    BadUtf8 { index: u16 },

    #[error("attribute {name} has {remaining} unread bytes")]
    TrailingAttributeBytes { name: String, remaining: usize },
}

/// Failures of the classpath layer.
#[derive(Debug, Error)]
pub enum ClasspathError {
    /// Recoverable: no root contains the class.
    #[error("class not found: {name}")]
    ClassNotFound { name: String },

    /// Fatal: without a bootstrap root no lookup is meaningful.
    #[error("can not find jre folder (tried {tried:?})")]
    RuntimeNotFound { tried: Vec<PathBuf> },
}
