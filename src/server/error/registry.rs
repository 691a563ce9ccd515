use thiserror::Error;

/// Transport failures talking to the remote command registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Discord HTTP API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),

    /// A stored registry identifier could not be parsed as a Discord snowflake.
    #[error("Invalid registry identifier '{0}'")]
    InvalidId(String),

    /// The registry rejected the call without a transport-level error.
    #[error("{0}")]
    Rejected(String),
}

impl From<serenity::Error> for RegistryError {
    fn from(err: serenity::Error) -> Self {
        RegistryError::Discord(Box::new(err))
    }
}
