/// Why a generation run did not produce app code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("No active page to capture")]
    MissingPage,

    #[error("Relay returned HTTP {status}: {message}")]
    Relay { status: u16, message: String },

    #[error("No HTML code block found in the model response")]
    NoCodeGenerated,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl GenerateError {
    /// Text shown to the user in the error notification.
    ///
    /// Relay failures carry the best message the failing hop gave us;
    /// unexpected failures collapse to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey => "Please set your API key first".to_string(),
            Self::MissingPage => "There is no page to capture".to_string(),
            Self::Relay { message, .. } => message.clone(),
            Self::NoCodeGenerated => "Failed to generate app".to_string(),
            Self::Unexpected(_) => "An error occurred while generating the app".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_message_is_surfaced() {
        let err = GenerateError::Relay {
            status: 429,
            message: "rate limited".to_string(),
        };
        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn test_unexpected_is_generic() {
        let err = GenerateError::Unexpected("connection refused (os error 111)".to_string());
        assert_eq!(
            err.user_message(),
            "An error occurred while generating the app"
        );
    }

    #[test]
    fn test_extraction_failure_is_distinct() {
        assert_ne!(
            GenerateError::NoCodeGenerated.user_message(),
            GenerateError::Unexpected(String::new()).user_message()
        );
    }
}
