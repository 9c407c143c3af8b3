use std::io;

#[cfg(doc)]
use crate::DocumentWriter;

/// The errors that can be encountered by the [`DocumentWriter`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write to sink: {0}")]
    IoError(#[from] io::Error),

    #[error("'{value}' is not a valid identifier for attribute '{attribute}'")]
    InvalidIdentifier { attribute: String, value: String },
}
