use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordflashError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("please select a file")]
    MissingFile,

    #[error("no file selected")]
    EmptyFilename,

    #[error("an error occurred while processing the file: {0}")]
    Parse(String),

    #[error("please upload a file first")]
    EmptyDeck,

    #[error("WordflashError: {0}")]
    Custom(String),
}

impl WordflashError {
    /// Wraps any failure raised while reading a table into the user-facing
    /// parse message. Already wrapped errors pass through untouched.
    pub fn into_parse(self) -> Self {
        match self {
            WordflashError::Parse(_) => self,
            other => WordflashError::Parse(other.to_string()),
        }
    }
}

impl From<std::io::Error> for WordflashError {
    fn from(error: std::io::Error) -> Self {
        WordflashError::Io(Box::new(error))
    }
}

impl From<calamine::Error> for WordflashError {
    fn from(error: calamine::Error) -> Self {
        WordflashError::Spreadsheet(error.to_string())
    }
}

impl From<calamine::XlsxError> for WordflashError {
    fn from(error: calamine::XlsxError) -> Self {
        WordflashError::Spreadsheet(error.to_string())
    }
}
