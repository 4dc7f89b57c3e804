use crate::busy::BusyFlag;
use crate::config::AiConfig;
use crate::error::{BudgetError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::prompts::suggestion_prompt;
use crate::llm::utils::{gemini_schema, parse_answer};
use crate::reconcile::ProposedItem;
use log::{error, info};

/// Turns a free-text project description into proposed budget lines.
///
/// The answer is returned whole or not at all; applying it is left to
/// [`AppState::apply_suggestions`](crate::state::AppState::apply_suggestions).
pub struct BudgetAssistant {
    client: Option<GeminiClient>,
    busy: BusyFlag,
}

impl BudgetAssistant {
    pub fn new(config: &AiConfig) -> Self {
        Self::with_client(GeminiClient::from_config(config))
    }

    pub fn with_client(client: Option<GeminiClient>) -> Self {
        Self {
            client,
            busy: BusyFlag::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub async fn suggest(&self, description: &str) -> Result<Vec<ProposedItem>> {
        if description.trim().is_empty() {
            return Err(BudgetError::validation("description", "must not be empty"));
        }
        let client = self.client.as_ref().ok_or(BudgetError::MissingCredential)?;
        let _guard = self.busy.try_acquire("budget suggestion")?;

        let schema = gemini_schema::<Vec<ProposedItem>>()?;
        let answer = client
            .generate_content(None, &suggestion_prompt(description), schema)
            .await
            .map_err(|e| {
                error!("Budget suggestion request failed: {}", e);
                e
            })?;

        let answer = match answer {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                info!("Budget assistant returned no lines");
                return Ok(Vec::new());
            }
        };

        let items: Vec<ProposedItem> = parse_answer(&answer).map_err(|e| {
            error!("Budget suggestion answer rejected: {}", e);
            e
        })?;
        info!("Budget assistant proposed {} lines", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock;

    #[tokio::test]
    async fn test_missing_credential_fails_immediately() {
        let assistant = BudgetAssistant::new(&AiConfig::default());
        assert!(!assistant.is_available());

        let err = assistant.suggest("Paint two bedrooms").await.unwrap_err();
        assert!(matches!(err, BudgetError::MissingCredential));
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_blank_description_rejected_before_any_call() {
        let assistant = BudgetAssistant::new(&AiConfig::default().with_api_key("test-key"));
        assert!(assistant.is_available());

        let err = assistant.suggest("   ").await.unwrap_err();
        assert!(matches!(err, BudgetError::Validation { field: "description", .. }));
    }

    #[tokio::test]
    async fn test_in_flight_request_blocks_second_call() {
        let assistant = BudgetAssistant::new(&AiConfig::default().with_api_key("test-key"));
        let _held = assistant.busy.try_acquire("budget suggestion").unwrap();

        let err = assistant.suggest("Build a deck").await.unwrap_err();
        assert!(matches!(err, BudgetError::OperationInFlight(_)));
    }

    async fn assistant_answering(body: &'static str) -> BudgetAssistant {
        let (base_url, _request) = mock::serve_once("200 OK", body).await;
        BudgetAssistant::with_client(Some(GeminiClient::new("test-key").with_base_url(base_url)))
    }

    #[tokio::test]
    async fn test_answer_without_candidates_is_empty_list() {
        let assistant = assistant_answering("{}").await;
        let items = assistant.suggest("Tile the bathroom").await.unwrap();
        assert!(items.is_empty());
        assert!(!assistant.is_busy());
    }

    #[tokio::test]
    async fn test_blocked_candidate_is_empty_list() {
        let assistant =
            assistant_answering(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).await;
        let items = assistant.suggest("Tile the bathroom").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_answer_parsed_into_proposals() {
        let assistant = assistant_answering(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"```json\n[{\"category\":\"Materials\",\"itemName\":\"Tiles\",\"quantity\":12,\"unitCost\":35.5}]\n```"}]}}]}"#,
        )
        .await;

        let items = assistant.suggest("Tile the bathroom").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, "Materials");
        assert_eq!(items[0].item_name, "Tiles");
    }

    #[tokio::test]
    async fn test_unreachable_service_error_hides_key() {
        let client = GeminiClient::new("SUPERSECRETKEY").with_base_url("http://127.0.0.1:1");
        let assistant = BudgetAssistant::with_client(Some(client));

        let err = assistant.suggest("Tile the bathroom").await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETKEY"));
        assert!(!err.user_message().contains("SUPERSECRETKEY"));
        assert!(!assistant.is_busy());
    }
}
