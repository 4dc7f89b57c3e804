use crate::advisory::{project_brief, AgentType, ConsultancyReport};
use crate::busy::BusyFlag;
use crate::config::AiConfig;
use crate::error::{BudgetError, Result};
use crate::llm::client::GeminiClient;
use crate::llm::utils::{gemini_schema, parse_answer};
use crate::schema::{Client, Project};
use log::{error, info};

/// Asks one of the fixed agent personas for a report on a project.
pub struct ConsultancyAgent {
    client: Option<GeminiClient>,
    busy: BusyFlag,
}

impl ConsultancyAgent {
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

    pub async fn report(
        &self,
        project: &Project,
        clients: &[Client],
        agent: AgentType,
    ) -> Result<ConsultancyReport> {
        let client = self.client.as_ref().ok_or(BudgetError::MissingCredential)?;
        let _guard = self.busy.try_acquire("consultancy report")?;

        let schema = gemini_schema::<ConsultancyReport>()?;
        let brief = project_brief(project, clients, agent);
        let result = match client
            .generate_content(Some(agent.persona()), &brief, schema)
            .await
        {
            Ok(Some(answer)) if !answer.trim().is_empty() => {
                parse_answer::<ConsultancyReport>(&answer)
            }
            Ok(_) => Err(BudgetError::EmptyAiResponse),
            Err(e) => Err(e),
        }
        .map_err(|e| BudgetError::ConsultancyFailed(Box::new(e)));

        match &result {
            Ok(report) => info!(
                "{} report for {} with {} recommendations",
                agent.profile().name,
                project.id,
                report.recommendations.len()
            ),
            Err(e) => error!("{} report for {} failed: {}", agent.profile().name, project.id, e),
        }
        result
    }
}
