//! Credential bootstrap error types.

use thiserror::Error;

/// Errors from resolving the service-account secret and building the client.
///
/// Every variant describes a misconfiguration that retrying cannot fix. Callers
/// are expected to stop and report the message to an operator.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// The secret environment variable is unset or blank.
    #[error("{name} not found. Set it to the service account JSON before running")]
    MissingSecret { name: String },

    /// The secret text is not a JSON object. Carries the parser message verbatim.
    #[error("Failed to parse service account JSON: {0}")]
    InvalidSecret(String),

    /// Neither the credential nor the environment names a project.
    #[error(
        "Project ID not found in service account JSON and no project env var set (service account keys: {})",
        available_keys.join(", ")
    )]
    MissingProjectId { available_keys: Vec<String> },

    /// Building the authenticated client failed (bad key, refused token, ...).
    #[error("Failed to initialize Firestore client: {0}")]
    ClientInit(String),
}

impl CredentialError {
    /// Create a missing secret error for the given variable name.
    pub fn missing_secret(name: impl Into<String>) -> Self {
        Self::MissingSecret { name: name.into() }
    }

    /// Create an invalid secret error.
    pub fn invalid_secret(msg: impl Into<String>) -> Self {
        Self::InvalidSecret(msg.into())
    }

    /// Create a missing project id error listing the credential's keys.
    pub fn missing_project_id(available_keys: Vec<String>) -> Self {
        Self::MissingProjectId { available_keys }
    }

    /// Create a client initialization error.
    pub fn client_init(msg: impl Into<String>) -> Self {
        Self::ClientInit(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_project_id_lists_keys() {
        let err = CredentialError::missing_project_id(vec![
            "client_email".to_string(),
            "private_key".to_string(),
        ]);
        let message = err.to_string();
        assert!(message.contains("client_email, private_key"));
    }

    #[test]
    fn test_missing_secret_names_variable() {
        let err = CredentialError::missing_secret("FIREBASE_SERVICE_ACCOUNT");
        assert!(err.to_string().starts_with("FIREBASE_SERVICE_ACCOUNT not found"));
    }
}
