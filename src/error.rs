use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("-group-id is required")]
    MissingGroupId,

    #[error("failed to run `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to parse output of `{command}`")]
    Parse {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write report")]
    Report(#[from] io::Error),
}
