use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArtError>;

#[derive(Error, Debug)]
pub enum ArtError {
    #[error("Invalid definition file '{file}': missing line {row}")]
    MissingLine { file: String, row: usize },
    #[error("Invalid definition file '{file}': line {row} has {length} characters, expected at least {}", crate::matrix::COLUMNS)]
    ShortLine { file: String, row: usize, length: usize },
    #[error("Invalid character encountered at line {row}, column {column} of '{file}': '{character}'")]
    InvalidCharacter {
        file: String,
        row: usize,
        column: usize,
        character: char,
    },
    #[error("Git error: {0}")]
    Git(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl ArtError {
    /// Wrap any backend failure into the single `Git` kind, keeping the source.
    pub fn git<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ArtError::Git(Box::new(err))
    }

    pub fn is_format(&self) -> bool {
        matches!(
            self,
            ArtError::MissingLine { .. } | ArtError::ShortLine { .. } | ArtError::InvalidCharacter { .. }
        )
    }
}
