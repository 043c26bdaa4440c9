//! Error handling for studio model parsing and pose queries

use std::io;
use thiserror::Error;

/// Errors that can occur when loading a studio model or querying a pose
#[derive(Debug, Error)]
pub enum StudioError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic value in the file header
    #[error("Invalid magic value: expected '{expected}', found '{found}'")]
    InvalidMagic {
        /// The expected magic value
        expected: String,
        /// The actual magic value found
        found: String,
    },

    /// Unsupported studio format version
    #[error("Unsupported studio version: {0}")]
    UnsupportedVersion(i32),

    /// Error when parsing model data
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A table offset or count points outside the containing buffer
    #[error("Unexpected end of file")]
    UnexpectedEof,

    /// The bone hierarchy violates the parent-before-child invariant
    #[error("Malformed bone hierarchy: bone {bone} has parent {parent}")]
    MalformedHierarchy {
        /// Index of the offending bone
        bone: usize,
        /// Parent index it declares
        parent: i32,
    },

    /// Two bone controllers claim the same (bone, DOF) channel
    #[error("Duplicate controller on bone {bone} channel {channel}")]
    DuplicateController {
        /// Index of the bone
        bone: usize,
        /// DOF channel index (0-5)
        channel: usize,
    },

    /// Pose query named a sequence index the model does not have
    #[error("Sequence index {index} out of range (model has {count})")]
    SequenceOutOfRange {
        /// The requested index
        index: usize,
        /// Number of sequences in the model
        count: usize,
    },

    /// Pose query named a controller slot outside 0-3
    #[error("Controller slot {0} out of range")]
    ControllerOutOfRange(usize),

    /// Query named an attachment index the model does not have
    #[error("Attachment index {index} out of range (model has {count})")]
    AttachmentOutOfRange {
        /// The requested index
        index: usize,
        /// Number of attachments in the model
        count: usize,
    },

    /// Query named a hitbox index the model does not have
    #[error("Hitbox index {index} out of range (model has {count})")]
    HitboxOutOfRange {
        /// The requested index
        index: usize,
        /// Number of hitboxes in the model
        count: usize,
    },

    /// A sequence references an external sequence group that was not loaded
    #[error("Sequence group {0} is not loaded")]
    MissingSequenceGroup(usize),
}

/// Type alias for Results from studio model operations
pub type Result<T> = std::result::Result<T, StudioError>;
