use anyhow::Result;
use chrono::NaiveDate;
use renovation_budget::*;

fn main() -> Result<()> {
    let config = StoreConfig::from_env();
    let store = FileStore::open(&config.data_dir)?;
    let mut state = AppState::load(store);

    println!("📂 Data directory: {}\n", config.data_dir.display());

    if state.templates().is_empty() {
        let kit = state.add_template("Bathroom basics")?;
        state.add_catalog_entry_to_template(&kit, "prod-1")?;
        state.add_catalog_entry_to_template(&kit, "serv-1")?;
        state.set_template_item_quantity(&kit, 0, "12")?;
        println!("🧰 Created kit 'Bathroom basics'");
    }

    let summary = state.portfolio_summary();
    println!("📊 Portfolio");
    println!("   Budgeted:          {:>12.2}", summary.totals.budgeted);
    println!("   Spent:             {:>12.2}", summary.totals.actual);
    println!("   Financial health:  {:>11.1}%", summary.financial_health);
    println!("   Over budget:       {:>12}", summary.over_budget_count);
    println!("   Completed value:   {:>12.2}", summary.total_value_completed);
    println!("   Active projects:   {:>12}\n", summary.active_count);

    for point in &summary.chart {
        println!("   {:<18} {:>12.2} {:>12.2}", point.name, point.budgeted, point.actual);
    }
    println!();

    for project in state.filtered_projects("", StatusFilter::InProgress) {
        let totals = ProjectTotals::for_project(project);
        println!(
            "🏗️  {} ({}) - {:.1}% of budget spent",
            project.name,
            project.status.label(),
            totals.progress_percent()
        );
        for row in category_breakdown(project) {
            println!(
                "   {:<12} {:>3} items  budget {:>10.2}  spent {:>10.2}  left {:>10.2}",
                row.name, row.item_count, row.budgeted, row.actual, row.remaining
            );
        }
    }

    let project = state
        .project("proj-1")
        .ok_or_else(|| anyhow::anyhow!("demo project proj-1 is missing"))?;
    let client = state.client_for(project);
    let issued_on = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap_or_default();

    let exporter = Exporter::new(MarkdownRenderer::new(config.data_dir.join("exports")));
    let proposal = ExportDocument::Proposal(BudgetProposal::from_project(
        project,
        client,
        state.logo(),
        issued_on,
    ));
    let order = ExportDocument::WorkOrder(WorkOrder::from_project(
        project,
        client,
        state.logo(),
        issued_on,
    ));

    for document in [proposal, order] {
        match exporter.export(&document) {
            Ok(path) => println!("\n📄 Wrote {}", path.display()),
            Err(e) => println!("\n❌ {}", e.user_message()),
        }
    }

    Ok(())
}
