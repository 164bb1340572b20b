//! 设置树访问与修改错误

use super::value::SettingType;
use thiserror::Error;

/// 设置树错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    #[error("Setting not found: '{path}'")]
    NotFound { path: String },

    #[error("Setting '{path}' has type {found}, expected {expected}")]
    WrongType {
        path: String,
        expected: SettingType,
        found: SettingType,
    },

    #[error("Index {index} out of range for '{path}' (length {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid setting name '{name}'")]
    InvalidName { name: String },

    #[error("Duplicate setting name '{name}'")]
    DuplicateName { name: String },

    #[error("Setting '{path}' is not a group, list, or array")]
    NotAggregate { path: String },

    #[error("The root setting cannot be removed")]
    RootImmutable,

    #[error("Setting handle refers to a removed setting")]
    StaleHandle,

    #[error("Non-finite float cannot be stored at '{path}'")]
    NonFiniteFloat { path: String },
}
