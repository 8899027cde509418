use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to decode CodeGeneratorRequest: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Failed to encode CodeGeneratorResponse: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    #[error("Unknown parameter '{key}'")]
    UnknownParameter { key: String },

    #[error("Unresolved type '{type_name}' referenced by field '{field}'")]
    UnresolvedType { field: String, type_name: String },

    #[error("Schema cycle: field '{path}' re-enters message '{message}'")]
    SchemaCycle { path: String, message: String },
}

impl Error {
    /// Errors that belong in `CodeGeneratorResponse.error` rather than
    /// aborting the plugin process.
    pub fn is_generation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter { .. }
                | Error::UnknownParameter { .. }
                | Error::UnresolvedType { .. }
                | Error::SchemaCycle { .. }
        )
    }
}
