use serde::Deserialize;

use super::{max_chars, required};
use crate::domain::FIELD_MAX_LENGTH;
use crate::error::FieldErrors;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentInput {
    pub text: String,
}

impl CommentForm {
    pub fn validate(self) -> Result<CommentInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let text = required(&mut errors, "text", &self.text);
        max_chars(&mut errors, "text", &text, FIELD_MAX_LENGTH);
        errors.into_result(CommentInput { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_limits() {
        let ok = CommentForm {
            text: "x".repeat(256),
        };
        assert!(ok.validate().is_ok());

        let too_long = CommentForm {
            text: "x".repeat(257),
        };
        assert!(too_long.validate().unwrap_err().get("text").is_some());

        assert!(CommentForm::default().validate().is_err());
    }
}
