//! Errors raised while interpreting keypoint input.
//!
//! Classification itself never fails; these only surface at the edges where
//! joint names or gesture labels are parsed from text.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoseError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoseError {
    #[error("unknown joint name: {0:?}")]
    UnknownJoint(String),

    #[error("unknown gesture label: {0:?}")]
    UnknownGesture(String),
}
