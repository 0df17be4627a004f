use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] fxvault_core::ValidationError),

    #[error(transparent)]
    Ingest(#[from] fxvault_core::IngestError),

    #[error(transparent)]
    Store(#[from] fxvault_core::StoreError),

    #[error("command error: {0}")]
    Command(String),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Ingest(_) => 4,
            Self::Store(_) | Self::Command(_) => 10,
        }
    }
}
