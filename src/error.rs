use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Invalid {field}: {details}")]
    Validation { field: &'static str, details: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Client {client_id} is referenced by {project_count} project(s) and cannot be deleted")]
    ClientInUse {
        client_id: String,
        project_count: usize,
    },

    #[error("Proposal #{index} is invalid: {details}")]
    InvalidProposal { index: usize, details: String },

    #[error("AI credential is not configured")]
    MissingCredential,

    #[error("AI request failed: {0}")]
    AiRequestFailed(String),

    #[error("AI response was empty")]
    EmptyAiResponse,

    #[error("Consultancy report failed: {0}")]
    ConsultancyFailed(#[source] Box<BudgetError>),

    #[error("Document export failed: {0}")]
    ExportFailed(String),

    #[error("Operation already in flight: {0}")]
    OperationInFlight(&'static str),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[source] reqwest::Error),
}

/// Request URLs carry nothing the user needs and are dropped before the error travels on.
#[cfg(feature = "gemini")]
impl From<reqwest::Error> for BudgetError {
    fn from(e: reqwest::Error) -> Self {
        BudgetError::HttpError(e.without_url())
    }
}

impl BudgetError {
    /// The single sentence shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            BudgetError::Validation { field, .. } => {
                format!("Please fill in a valid value for '{}'.", field)
            }
            BudgetError::NotFound { kind, .. } => {
                format!("The selected {} no longer exists.", kind)
            }
            BudgetError::ClientInUse { .. } => {
                "This client cannot be deleted because it is linked to one or more existing \
                 projects."
                    .to_string()
            }
            BudgetError::InvalidProposal { .. } => {
                "The suggested items contain a blank category or item name and were not applied."
                    .to_string()
            }
            BudgetError::MissingCredential => {
                "AI features are unavailable: no API key has been configured.".to_string()
            }
            BudgetError::AiRequestFailed(_) | BudgetError::EmptyAiResponse => {
                "The AI request could not be completed. Check your description and try again."
                    .to_string()
            }
            BudgetError::ConsultancyFailed(_) => {
                "The consultancy report could not be generated. Please try again.".to_string()
            }
            #[cfg(feature = "gemini")]
            BudgetError::HttpError(_) => {
                "The AI request could not be completed. Check your description and try again."
                    .to_string()
            }
            BudgetError::ExportFailed(_) => {
                "An error occurred while generating the PDF.".to_string()
            }
            BudgetError::OperationInFlight(_) => {
                "Please wait for the current request to finish.".to_string()
            }
            BudgetError::Store(_)
            | BudgetError::SerializationError(_)
            | BudgetError::IoError(_) => "Your data could not be read or saved.".to_string(),
        }
    }

    pub(crate) fn validation(field: &'static str, details: impl Into<String>) -> Self {
        BudgetError::Validation {
            field,
            details: details.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        BudgetError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_failures_share_one_user_message() {
        let a = BudgetError::AiRequestFailed("status 500".into()).user_message();
        let b = BudgetError::EmptyAiResponse.user_message();
        assert_eq!(a, b);
        assert_ne!(a, BudgetError::MissingCredential.user_message());
    }

    #[test]
    fn test_consultancy_failure_has_its_own_message() {
        let err = BudgetError::ConsultancyFailed(Box::new(BudgetError::EmptyAiResponse));
        assert_eq!(
            err.user_message(),
            "The consultancy report could not be generated. Please try again."
        );
        assert!(!err.user_message().contains("description"));
        assert!(err.to_string().contains("AI response was empty"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_client_in_use_display() {
        let err = BudgetError::ClientInUse {
            client_id: "client-1".into(),
            project_count: 2,
        };
        assert!(err.to_string().contains("client-1"));
        assert!(err.user_message().contains("cannot be deleted"));
    }
}
