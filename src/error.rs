use thiserror::Error;

#[derive(Error, Debug)]
pub enum IcondError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Response serialization failed: {0}")]
    ResponseEncode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("TLS setup failed: {reason}")]
    TlsSetup { reason: String },

    #[error("Server startup failed: {reason}")]
    Startup { reason: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store lock poisoned during {operation}")]
    Poisoned { operation: &'static str },
}

/// A query document that could not be parsed. Request-shape error: it is
/// reported back to the client in the response envelope, never as a fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error: {message} ({line}:{column})")]
pub struct DocumentError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

/// A parsed document that does not satisfy the schema contract. Like
/// [`DocumentError`], this surfaces in the response envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Cannot query field \"{field}\" on type \"{parent}\"")]
    UnknownField { field: String, parent: &'static str },

    #[error("Field \"{field}\" argument \"{argument}\" of type \"{ty}\" is required but not provided")]
    MissingArgument {
        field: &'static str,
        argument: &'static str,
        ty: &'static str,
    },

    #[error("Unknown argument \"{argument}\" on field \"{field}\"")]
    UnknownArgument { argument: String, field: &'static str },

    #[error("Variable \"${name}\" is not defined")]
    UndefinedVariable { name: String },

    #[error("Variable \"${name}\" of type \"{ty}\" was provided no value")]
    MissingVariable { name: String, ty: String },

    #[error("Invalid value for argument \"{argument}\": {reason}")]
    InvalidValue {
        argument: &'static str,
        reason: String,
    },

    #[error("Unknown operation named \"{name}\"")]
    UnknownOperation { name: String },
}

pub type Result<T> = std::result::Result<T, IcondError>;

/// Extension trait for adding context to IO errors
pub trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| IcondError::Io {
            context: context.into(),
            source: e,
        })
    }
}
