//! Collections used when the store has nothing saved yet.

use crate::schema::{
    BudgetCategory, BudgetItem, CatalogEntry, CatalogKind, Client, Expense, Project,
    ProjectStatus, LABOR_CATEGORY, MATERIALS_CATEGORY,
};
use chrono::NaiveDate;

pub fn default_clients() -> Vec<Client> {
    vec![
        Client {
            id: "client-1".to_string(),
            name: "Silva Family".to_string(),
            document_id: Some("123.456.789-00".to_string()),
            contact_phone: Some("11999998888".to_string()),
            address: Some("12 Flower Street, Sao Paulo".to_string()),
        },
        Client {
            id: "client-2".to_string(),
            name: "InvestCo".to_string(),
            document_id: Some("12.345.678/0001-99".to_string()),
            contact_phone: Some("11999997777".to_string()),
            address: Some("4500 Faria Lima Avenue, Sao Paulo".to_string()),
        },
    ]
}

pub fn default_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            id: "prod-1".to_string(),
            name: "Cement (50kg bag)".to_string(),
            kind: CatalogKind::Product {
                cost_price: 28.0,
                sale_price: 35.0,
            },
        },
        CatalogEntry {
            id: "prod-2".to_string(),
            name: "Bricks (thousand)".to_string(),
            kind: CatalogKind::Product {
                cost_price: 750.0,
                sale_price: 950.0,
            },
        },
        CatalogEntry {
            id: "serv-1".to_string(),
            name: "Mason day rate".to_string(),
            kind: CatalogKind::Service {
                service_cost: 200.0,
            },
        },
        CatalogEntry {
            id: "serv-2".to_string(),
            name: "Electrical point installation".to_string(),
            kind: CatalogKind::Service { service_cost: 80.0 },
        },
    ]
}

fn item(id: &str, name: &str, quantity: u32, budgeted_cost: f64) -> BudgetItem {
    BudgetItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        budgeted_cost,
    }
}

fn expense(
    id: &str,
    description: &str,
    amount: f64,
    day: (i32, u32, u32),
    category_id: &str,
) -> Expense {
    Expense {
        id: id.to_string(),
        description: description.to_string(),
        amount,
        date: NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap_or_default(),
        category_id: category_id.to_string(),
    }
}

pub fn default_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj-1".to_string(),
            name: "Alphaville Residence".to_string(),
            client_id: "client-1".to_string(),
            location: "Alphaville, SP".to_string(),
            status: ProjectStatus::InProgress,
            budget: vec![
                BudgetCategory {
                    id: "cat-1".to_string(),
                    name: MATERIALS_CATEGORY.to_string(),
                    items: vec![
                        item("item-1", "Cement (50kg bag)", 100, 35.0),
                        item("item-2", "Bricks (thousand)", 10, 800.0),
                        item("item-3", "CA-50 rebar", 500, 24.0),
                    ],
                },
                BudgetCategory {
                    id: "cat-2".to_string(),
                    name: LABOR_CATEGORY.to_string(),
                    items: vec![
                        item("item-4", "Masons (day rate)", 75, 200.0),
                        item("item-5", "Electrician (per point)", 50, 80.0),
                    ],
                },
            ],
            expenses: vec![
                expense("exp-5", "Electrician - 2nd instalment", 2250.0, (2024, 7, 28), "cat-2"),
                expense("exp-3", "Electrician - 1st instalment", 2000.0, (2024, 7, 20), "cat-2"),
                expense("exp-2", "Bricks - Central Pottery", 7800.0, (2024, 7, 16), "cat-1"),
                expense("exp-1", "Cement - Joe's Store", 3650.0, (2024, 7, 15), "cat-1"),
            ],
        },
        Project {
            id: "proj-2".to_string(),
            name: "Itaim Commercial Building".to_string(),
            client_id: "client-2".to_string(),
            location: "Itaim Bibi, SP".to_string(),
            status: ProjectStatus::Completed,
            budget: vec![
                BudgetCategory {
                    id: "cat-3".to_string(),
                    name: "Foundations".to_string(),
                    items: vec![item("item-6", "Ready-mix concrete", 20, 2500.0)],
                },
                BudgetCategory {
                    id: "cat-4".to_string(),
                    name: "Equipment".to_string(),
                    items: vec![item("item-7", "Concrete mixer rental (month)", 1, 1200.0)],
                },
            ],
            expenses: vec![expense(
                "exp-4",
                "Concrete - ConcreMAX",
                52000.0,
                (2024, 7, 18),
                "cat-3",
            )],
        },
    ]
}

/// Budget every new project starts with: empty Materials and Labor categories.
pub fn initial_budget(mut new_id: impl FnMut() -> String) -> Vec<BudgetCategory> {
    [MATERIALS_CATEGORY, LABOR_CATEGORY]
        .into_iter()
        .map(|name| BudgetCategory {
            id: new_id(),
            name: name.to_string(),
            items: Vec::new(),
        })
        .collect()
}
