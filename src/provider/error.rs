use std::convert::From;
use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    MonthKeyParse,
    DateParse,
    DateOutsideMonth,
    DocumentParse,
    Fetch,
    ConfigParse,
    ParseError,
    MonthNotFound,
    DayOutOfRange,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::DateParse,
            format!("Could not parse date: {}", parse_error).as_str(),
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Error {
        Error::new(
            ErrorKind::DocumentParse,
            format!("Could not parse calendar document: {}", json_error).as_str(),
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(http_error: reqwest::Error) -> Error {
        Error::new(ErrorKind::Fetch, &http_error.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ConfigParse, &toml_error.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::MonthKeyParse => "invalid month key".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::DateOutsideMonth => "date outside of its month".to_owned(),
            ErrorKind::DocumentParse => "invalid calendar document".to_owned(),
            ErrorKind::Fetch => "could not fetch calendar document".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::ParseError => "invalid format".to_owned(),
            ErrorKind::MonthNotFound => "month not in calendar".to_owned(),
            ErrorKind::DayOutOfRange => "day not in month".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::new(ErrorKind::DateParse, "'2025-13-40'");
        assert_eq!(err.to_string(), "invalid date format: '2025-13-40'");

        let err = Error::from(ErrorKind::Fetch);
        assert_eq!(err.to_string(), "could not fetch calendar document");
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let err = Error::from(io::Error::from(io::ErrorKind::NotFound));
        match err.kind {
            ErrorKind::IOError(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::NotFound),
            kind => panic!("unexpected kind {:?}", kind),
        }
    }
}
