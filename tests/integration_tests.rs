use chrono::NaiveDate;
use renovation_budget::*;

fn fresh_state() -> AppState<MemoryStore> {
    AppState::load(MemoryStore::new())
}

fn empty_project(state: &mut AppState<MemoryStore>) -> String {
    let id = state
        .add_project(NewProject {
            name: "Kitchen Refit".to_string(),
            client_id: "client-2".to_string(),
            location: "Pinheiros".to_string(),
        })
        .unwrap();
    state
        .update_project(&id, |p| {
            Ok(Project {
                budget: Vec::new(),
                ..p.clone()
            })
        })
        .unwrap();
    id
}

fn project_with(id: &str, status: ProjectStatus, budgeted: f64, actual: f64) -> Project {
    Project {
        id: id.to_string(),
        name: format!("Project {}", id),
        client_id: "client-1".to_string(),
        location: "Somewhere".to_string(),
        status,
        budget: vec![BudgetCategory {
            id: format!("{}-cat", id),
            name: MATERIALS_CATEGORY.to_string(),
            items: vec![BudgetItem {
                id: format!("{}-item", id),
                name: "Lot".to_string(),
                quantity: 1,
                budgeted_cost: budgeted,
            }],
        }],
        expenses: vec![Expense {
            id: format!("{}-exp", id),
            description: "Spend".to_string(),
            amount: actual,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            category_id: format!("{}-cat", id),
        }],
    }
}

fn recomputed_total(project: &Project) -> f64 {
    project
        .budget
        .iter()
        .flat_map(|c| c.items.iter())
        .map(|i| f64::from(i.quantity) * i.budgeted_cost)
        .sum()
}

#[test]
fn test_total_invariant_after_item_edits() {
    let mut state = fresh_state();
    let project_id = empty_project(&mut state);
    let materials = state.add_category(&project_id, "Materials").unwrap();
    let labor = state.add_category(&project_id, "Labor").unwrap();

    let cabinets = state
        .add_budget_item(&project_id, &materials, BudgetItemDraft::new("Cabinets", 6, 420.0))
        .unwrap();
    let worktop = state
        .add_budget_item(&project_id, &materials, BudgetItemDraft::new("Worktop", 1, 1800.0))
        .unwrap();
    state
        .add_item_from_catalog(&project_id, &labor, "serv-1", 4)
        .unwrap();
    state
        .edit_budget_item(
            &project_id,
            &materials,
            &cabinets,
            BudgetItemDraft::parse("Cabinets", "8", "-5"),
        )
        .unwrap();
    state
        .delete_budget_item(&project_id, &materials, &worktop)
        .unwrap();

    let project = state.project(&project_id).unwrap();
    assert_eq!(total_budgeted(project), recomputed_total(project));
    assert_eq!(total_budgeted(project), 800.0);
}

#[test]
fn test_reapplying_suggestions_adds_quantity_once_per_name() {
    let mut state = fresh_state();
    let project_id = empty_project(&mut state);
    let proposals = vec![ProposedItem::new("Materials", "Cement", 2.0, 10.0)];

    state.apply_suggestions(&project_id, &proposals).unwrap();
    state.apply_suggestions(&project_id, &proposals).unwrap();

    let project = state.project(&project_id).unwrap();
    assert_eq!(project.budget.len(), 1);
    assert_eq!(project.budget[0].name, "Materials");
    assert_eq!(project.budget[0].items.len(), 1);
    assert_eq!(project.budget[0].items[0].name, "Cement");
    assert_eq!(project.budget[0].items[0].quantity, 4);
    assert_eq!(project.budget[0].items[0].budgeted_cost, 10.0);
}

#[test]
fn test_category_matching_ignores_case() {
    let mut state = fresh_state();
    let project_id = state
        .add_project(NewProject {
            name: "Garden Wall".to_string(),
            client_id: "client-1".to_string(),
            location: "Morumbi".to_string(),
        })
        .unwrap();

    state
        .apply_suggestions(
            &project_id,
            &[
                ProposedItem::new("materials", "Blocks", 200.0, 4.5),
                ProposedItem::new("  LABOR ", "Bricklayer", 3.0, 220.0),
            ],
        )
        .unwrap();

    let project = state.project(&project_id).unwrap();
    let names: Vec<_> = project.budget.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec![MATERIALS_CATEGORY, LABOR_CATEGORY]);
}

#[test]
fn test_financial_health_with_nothing_budgeted() {
    let projects = vec![project_with("a", ProjectStatus::Planning, 0.0, 0.0)];
    let summary = PortfolioSummary::from_projects(&projects);
    assert_eq!(summary.financial_health, 0.0);
    assert_eq!(financial_health(0.0, 500.0), 0.0);

    let empty = PortfolioSummary::from_projects(&[]);
    assert_eq!(empty.financial_health, 0.0);
    assert!(empty.chart.is_empty());
}

#[test]
fn test_in_progress_bucket() {
    let projects: Vec<Project> = ProjectStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| project_with(&i.to_string(), *status, 100.0, 10.0))
        .collect();
    let clients = seed::default_clients();

    let statuses: Vec<ProjectStatus> =
        filter_projects(&projects, &clients, "", StatusFilter::InProgress)
            .into_iter()
            .map(|p| p.status)
            .collect();
    assert_eq!(
        statuses,
        vec![
            ProjectStatus::Planning,
            ProjectStatus::InProgress,
            ProjectStatus::Paused
        ]
    );

    let completed = filter_projects(&projects, &clients, "", StatusFilter::Completed);
    assert_eq!(completed.len(), 1);
    assert_eq!(filter_projects(&projects, &clients, "", StatusFilter::All).len(), 5);
}

#[test]
fn test_over_budget_is_strict() {
    let on_budget = project_with("eq", ProjectStatus::InProgress, 1000.0, 1000.0);
    let over = project_with("over", ProjectStatus::InProgress, 1000.0, 1000.01);

    assert_eq!(over_budget_count(&[on_budget.clone()]), 0);
    assert_eq!(over_budget_count(&[on_budget, over]), 1);
}

#[test]
fn test_client_deletion_guard() {
    let mut state = fresh_state();
    let before = state.clients().to_vec();

    let err = state.delete_client("client-2").unwrap_err();
    assert!(matches!(err, BudgetError::ClientInUse { .. }));
    assert_eq!(state.clients(), before.as_slice());

    let spare = state
        .add_client(NewClient {
            name: "Spare Client".to_string(),
            ..NewClient::default()
        })
        .unwrap();
    state.delete_client(&spare).unwrap();
    assert_eq!(state.clients(), before.as_slice());
}

#[test]
fn test_template_application_is_additive() {
    let mut state = fresh_state();
    let project_id = empty_project(&mut state);
    let kit = state.add_template("Paint kit").unwrap();
    state
        .update_template(BudgetTemplate {
            id: kit.clone(),
            name: "Paint kit".to_string(),
            items: vec![TemplateItem {
                category: "Materials".to_string(),
                name: "Paint".to_string(),
                quantity: 1,
                budgeted_cost: 50.0,
            }],
        })
        .unwrap();

    state.apply_template(&project_id, &kit).unwrap();
    state.apply_template(&project_id, &kit).unwrap();

    let project = state.project(&project_id).unwrap();
    assert_eq!(project.budget.len(), 1);
    let items = &project.budget[0].items;
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.name == "Paint" && i.quantity == 1 && i.budgeted_cost == 50.0));
    assert_ne!(items[0].id, items[1].id);
    assert_eq!(total_budgeted(project), 100.0);
}

#[test]
fn test_state_survives_reload_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let project_id = {
        let mut state = AppState::load(FileStore::open(dir.path()).unwrap());
        let id = state
            .add_project(NewProject {
                name: "Roof Repair".to_string(),
                client_id: "client-1".to_string(),
                location: "Vila Madalena".to_string(),
            })
            .unwrap();
        let labor = state.project(&id).unwrap().budget[1].id.clone();
        state
            .add_expense(
                &id,
                NewExpense {
                    description: "Roofer deposit".to_string(),
                    amount: 900.0,
                    date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
                    category_id: labor,
                },
            )
            .unwrap();
        state
            .add_catalog_entry(
                "Roof tiles (m2)",
                CatalogKind::Product {
                    cost_price: 30.0,
                    sale_price: 42.0,
                },
            )
            .unwrap();
        id
    };

    let reloaded = AppState::load(FileStore::open(dir.path()).unwrap());
    let project = reloaded.project(&project_id).unwrap();
    assert_eq!(total_actual(project), 900.0);
    assert_eq!(reloaded.projects().len(), 3);
    assert_eq!(reloaded.products().len(), 5);
    assert_eq!(reloaded.search_catalog("ROOF").len(), 1);
}

#[test]
fn test_corrupt_collection_falls_back_to_seed() {
    let mut store = MemoryStore::new();
    store.set("projects", "[{\"id\": 1}").unwrap();
    store.set("templates", "[]").unwrap();

    let state = AppState::load(store);
    assert_eq!(state.projects(), seed::default_projects().as_slice());
    assert!(state.templates().is_empty());
}

#[test]
fn test_dashboard_from_seed_data() {
    let state = fresh_state();
    let summary = state.portfolio_summary();

    assert_eq!(summary.totals.budgeted, 42500.0 + 51200.0);
    assert_eq!(summary.totals.actual, 15700.0 + 52000.0);
    assert_eq!(summary.over_budget_count, 1);
    assert_eq!(summary.total_value_completed, 51200.0);
    assert_eq!(summary.active_count, 1);
    assert_eq!(summary.chart[1].name, "Itaim Commercia...");

    let by_client = state.filtered_projects("silva", StatusFilter::All);
    assert_eq!(by_client.len(), 1);
    assert_eq!(by_client[0].id, "proj-1");
}

#[test]
fn test_export_documents_from_state() {
    let dir = tempfile::tempdir().unwrap();
    let state = fresh_state();
    let project = state.project("proj-2").unwrap();
    let issued_on = NaiveDate::from_ymd_opt(2024, 8, 10).unwrap();

    let exporter = Exporter::new(MarkdownRenderer::new(dir.path()));
    let proposal =
        BudgetProposal::from_project(project, state.client_for(project), None, issued_on);
    let path = exporter.export(&ExportDocument::Proposal(proposal)).unwrap();

    assert!(path.ends_with("Budget-Itaim_Commercial_Building.md"));
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("**Client:** InvestCo"));
    assert!(contents.contains("**Grand total:** 51200.00"));
}
