use anyhow::Result;
use dotenv::dotenv;
use renovation_budget::llm::{BudgetAssistant, ConsultancyAgent};
use renovation_budget::*;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = AiConfig::from_env();
    let assistant = BudgetAssistant::new(&config);
    let consultancy = ConsultancyAgent::new(&config);
    if !assistant.is_available() {
        println!("⚠️  Set GEMINI_API_KEY to enable the AI features.");
        return Ok(());
    }

    let mut state = AppState::load(MemoryStore::new());
    let project_id = state.add_project(NewProject {
        name: "Bathroom Remodel".to_string(),
        client_id: "client-1".to_string(),
        location: "Downtown".to_string(),
    })?;

    let description = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Full remodel of a 6m2 bathroom with new tiles and fixtures".to_string());
    println!("🤖 Asking for budget lines: {}\n", description);

    let suggestions = match assistant.suggest(&description).await {
        Ok(items) => items,
        Err(e) => {
            println!("❌ {}", e.user_message());
            return Ok(());
        }
    };
    for item in &suggestions {
        println!(
            "   [{}] {} x{} @ {:.2}",
            item.category, item.item_name, item.quantity, item.unit_cost
        );
    }

    state.apply_suggestions(&project_id, &suggestions)?;
    let project = state
        .project(&project_id)
        .ok_or_else(|| anyhow::anyhow!("project vanished"))?;
    println!(
        "\n✅ Budget now totals {:.2} across {} categories\n",
        total_budgeted(project),
        project.budget.len()
    );

    let report = consultancy
        .report(project, state.clients(), AgentType::Risk)
        .await?;
    println!("🧭 {}\n{}\n", report.title, report.summary);
    for recommendation in &report.recommendations {
        println!(
            "   [{:?}] {}: {}",
            recommendation.impact_level(),
            recommendation.title,
            recommendation.description
        );
    }

    Ok(())
}
