/// Result alias that carries the custom [`WayfinderError`] type.
pub type Result<T> = std::result::Result<T, WayfinderError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum WayfinderError {
    /// An identifier was empty or a reference did not resolve to a live
    /// object.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A waypoint or marker index fell outside `[0, len)`.
    #[error("index {index} is out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// An operation was invoked from a state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Free-form failure surfaced by the application layer.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a configuration file or map store.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl WayfinderError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_state<T: Into<String>>(msg: T) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Checks `index` against `len`, producing [`WayfinderError::IndexOutOfRange`]
    /// when it does not address an element.
    pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfRange { index, len })
        }
    }
}

impl From<&str> for WayfinderError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for WayfinderError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_messages_convert_into_message_errors() {
        let from_str: WayfinderError = "no maps".into();
        let from_string: WayfinderError = String::from("no paths").into();
        assert!(matches!(from_str, WayfinderError::Message(ref m) if m == "no maps"));
        assert_eq!(from_string.to_string(), "no paths");
    }

    #[test]
    fn index_check_reports_the_length() {
        assert!(WayfinderError::check_index(2, 3).is_ok());
        let err = WayfinderError::check_index(3, 3).unwrap_err();
        assert_eq!(err.to_string(), "index 3 is out of range for length 3");
    }
}
