pub type SoftblitResult<T> = Result<T, SoftblitError>;

#[derive(thiserror::Error, Debug)]
pub enum SoftblitError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SoftblitError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            SoftblitError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            SoftblitError::decode("x")
                .to_string()
                .contains("decode error:")
        );
        assert!(
            SoftblitError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = SoftblitError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
