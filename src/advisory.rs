//! Consultancy agents and the structured reports they produce.

use crate::schema::{Client, Project};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_CLIENT_NAME: &str = "Client not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentType {
    Budget,
    Sustainability,
    Timeline,
    Risk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentProfile {
    pub agent: AgentType,
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

impl AgentType {
    pub const ALL: [AgentType; 4] = [
        AgentType::Budget,
        AgentType::Sustainability,
        AgentType::Timeline,
        AgentType::Risk,
    ];

    pub fn profile(self) -> AgentProfile {
        match self {
            AgentType::Budget => AgentProfile {
                agent: self,
                name: "Cost Estimator",
                title: "Cost Analysis",
                description: "Optimise the budget, find savings and anticipate hidden costs.",
            },
            AgentType::Sustainability => AgentProfile {
                agent: self,
                name: "Sustainable Architect",
                title: "Green Practices",
                description: "Material and practice suggestions for a greener, more valuable build.",
            },
            AgentType::Timeline => AgentProfile {
                agent: self,
                name: "Site Foreman",
                title: "Planning and Execution",
                description: "A schedule with the critical stages so the work does not stall.",
            },
            AgentType::Risk => AgentProfile {
                agent: self,
                name: "Risk Manager",
                title: "Risk Analysis",
                description: "Anticipate market, regulatory and safety problems before they happen.",
            },
        }
    }

    /// System instruction that sets the agent's role.
    pub fn persona(self) -> &'static str {
        match self {
            AgentType::Budget => {
                "You are a senior construction cost estimator who specialises in cost optimisation. \
                 Be critical: look for savings, check quantities and anticipate hidden costs. \
                 Give practical, actionable insights."
            }
            AgentType::Sustainability => {
                "You are an architect specialised in sustainable construction and ESG practices. \
                 Find opportunities to make the project greener, more efficient and more socially \
                 responsible while adding value to the property."
            }
            AgentType::Timeline => {
                "You are an experienced site foreman who plans and runs construction schedules. \
                 Your view is practical and centred on job-site logistics so the project flows \
                 without delays."
            }
            AgentType::Risk => {
                "You are a risk manager for the construction sector. Your job is to anticipate \
                 problems before they happen and protect the project's budget and schedule."
            }
        }
    }

    /// Task appended to the project brief.
    pub fn task(self) -> &'static str {
        match self {
            AgentType::Budget => {
                "Analyse this project and write a cost optimisation report. Point out oversized \
                 items, suggest cheaper alternative materials with a better cost-benefit ratio and \
                 warn about costs that have not been budgeted."
            }
            AgentType::Sustainability => {
                "Analyse this project and write a sustainability report. Suggest ecological \
                 materials, energy and water saving systems (such as rainwater harvesting and solar \
                 panels) and other green building practices."
            }
            AgentType::Timeline => {
                "Analyse this project and write a planning report. Outline a high-level schedule \
                 with the main stages, identify the critical path and point out task dependencies \
                 that could become bottlenecks."
            }
            AgentType::Risk => {
                "Analyse this project and write a risk management report. Identify the main market, \
                 technical, regulatory, weather and safety risks and propose a clear mitigation \
                 strategy for each one."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    #[schemars(description = "Title of the recommendation or finding.")]
    pub title: String,

    #[schemars(
        description = "Detailed description of the recommendation, explaining why it matters and how to apply it."
    )]
    pub description: String,

    #[schemars(
        description = "Potential impact of the recommendation (e.g. High savings, Schedule improvement, High risk)."
    )]
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConsultancyReport {
    #[schemars(description = "Main title of the consultancy report.")]
    pub title: String,

    #[schemars(description = "Concise summary of the main findings and the overall analysis.")]
    pub summary: String,

    #[schemars(description = "Specific recommendations, findings or points of attention.")]
    pub recommendations: Vec<Recommendation>,
}

/// Severity bucket used to badge a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
    Unrated,
}

impl ImpactLevel {
    /// Classifies a free-text impact label by its first word. Unknown labels are `Unrated`.
    pub fn classify(impact: &str) -> Self {
        let first = impact
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match first.as_str() {
            "high" | "alta" | "alto" => ImpactLevel::High,
            "medium" | "média" | "media" | "médio" | "medio" => ImpactLevel::Medium,
            "low" | "baixa" | "baixo" => ImpactLevel::Low,
            _ => ImpactLevel::Unrated,
        }
    }
}

impl Recommendation {
    pub fn impact_level(&self) -> ImpactLevel {
        ImpactLevel::classify(&self.impact)
    }
}

pub fn client_name<'a>(project: &Project, clients: &'a [Client]) -> Option<&'a str> {
    clients
        .iter()
        .find(|c| c.id == project.client_id)
        .map(|c| c.name.as_str())
}

/// Project summary handed to a consultancy agent, ending with the agent's task.
pub fn project_brief(project: &Project, clients: &[Client], agent: AgentType) -> String {
    let categories = project
        .budget
        .iter()
        .map(|c| format!("{} ({} items)", c.name, c.items.len()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Project name: {}\n\
         Client: {}\n\
         Location: {}\n\
         Current budget: {}.\n\
         ---\n\
         {}",
        project.name,
        client_name(project, clients).unwrap_or(UNKNOWN_CLIENT_NAME),
        project.location,
        categories,
        agent.task()
    )
}
