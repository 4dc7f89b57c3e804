//! Derived figures for project and portfolio views.
//!
//! Everything here is a pure function of its inputs and is meant to be recomputed
//! on every request; nothing is cached or stored back on the entities.

use crate::schema::{BudgetCategory, Project, ProjectStatus};
use crate::utils::{truncate_label, CHART_LABEL_MAX_CHARS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectTotals {
    pub budgeted: f64,
    pub actual: f64,
}

impl ProjectTotals {
    pub fn for_project(project: &Project) -> Self {
        Self {
            budgeted: total_budgeted(project),
            actual: total_actual(project),
        }
    }

    /// Budget still available; negative when spending has overrun the budget.
    pub fn difference(&self) -> f64 {
        self.budgeted - self.actual
    }

    /// Share of the budget already spent, 0 when nothing is budgeted.
    pub fn progress_percent(&self) -> f64 {
        if self.budgeted > 0.0 {
            self.actual / self.budgeted * 100.0
        } else {
            0.0
        }
    }

    /// Strictly more spent than budgeted; equal is still on budget.
    pub fn is_over_budget(&self) -> bool {
        self.actual > self.budgeted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub budgeted: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category_id: String,
    pub name: String,
    pub item_count: usize,
    pub budgeted: f64,
    pub actual: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub totals: ProjectTotals,
    pub financial_health: f64,
    pub over_budget_count: usize,
    pub total_value_completed: f64,
    pub active_count: usize,
    pub chart: Vec<ChartPoint>,
}

impl PortfolioSummary {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut totals = ProjectTotals::default();
        let mut over_budget_count = 0;
        let mut total_value_completed = 0.0;
        let mut active_count = 0;

        for project in projects {
            let project_totals = ProjectTotals::for_project(project);
            totals.budgeted += project_totals.budgeted;
            totals.actual += project_totals.actual;

            if project_totals.is_over_budget() {
                over_budget_count += 1;
            }
            if project.status == ProjectStatus::Completed {
                total_value_completed += project_totals.budgeted;
            }
            if project.status.is_active() {
                active_count += 1;
            }
        }

        Self {
            financial_health: financial_health(totals.budgeted, totals.actual),
            totals,
            over_budget_count,
            total_value_completed,
            active_count,
            chart: project_chart(projects),
        }
    }
}

pub fn category_budgeted(category: &BudgetCategory) -> f64 {
    category.items.iter().map(|item| item.line_total()).sum()
}

pub fn total_budgeted(project: &Project) -> f64 {
    project.budget.iter().map(category_budgeted).sum()
}

pub fn total_actual(project: &Project) -> f64 {
    project.expenses.iter().map(|e| e.amount).sum()
}

/// Percentage of the global budget not yet spent.
///
/// Policy: a portfolio with nothing budgeted reports 0 rather than an undefined ratio.
pub fn financial_health(budgeted: f64, actual: f64) -> f64 {
    if budgeted > 0.0 {
        (budgeted - actual) / budgeted * 100.0
    } else {
        0.0
    }
}

pub fn over_budget_count(projects: &[Project]) -> usize {
    projects
        .iter()
        .filter(|p| ProjectTotals::for_project(p).is_over_budget())
        .count()
}

/// Budgeted (not spent) value of every completed project.
pub fn total_value_completed(projects: &[Project]) -> f64 {
    projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Completed)
        .map(total_budgeted)
        .sum()
}

/// Spent amount per category id. Every category is present (0 when nothing was spent);
/// expenses whose category no longer exists are left out.
pub fn expenses_by_category(project: &Project) -> BTreeMap<String, f64> {
    let mut spent: BTreeMap<String, f64> = project
        .budget
        .iter()
        .map(|c| (c.id.clone(), 0.0))
        .collect();

    for expense in &project.expenses {
        if let Some(total) = spent.get_mut(&expense.category_id) {
            *total += expense.amount;
        }
    }

    spent
}

pub fn category_breakdown(project: &Project) -> Vec<CategoryBreakdown> {
    let spent = expenses_by_category(project);

    project
        .budget
        .iter()
        .map(|category| {
            let budgeted = category_budgeted(category);
            let actual = spent.get(&category.id).copied().unwrap_or(0.0);
            CategoryBreakdown {
                category_id: category.id.clone(),
                name: category.name.clone(),
                item_count: category.items.len(),
                budgeted,
                actual,
                remaining: budgeted - actual,
            }
        })
        .collect()
}

/// Budgeted vs. spent per category, full category names.
pub fn category_chart(project: &Project) -> Vec<ChartPoint> {
    category_breakdown(project)
        .into_iter()
        .map(|row| ChartPoint {
            name: row.name,
            budgeted: row.budgeted,
            actual: row.actual,
        })
        .collect()
}

/// Budgeted vs. spent per project, with long project names shortened for the axis.
pub fn project_chart(projects: &[Project]) -> Vec<ChartPoint> {
    projects
        .iter()
        .map(|p| {
            let totals = ProjectTotals::for_project(p);
            ChartPoint {
                name: truncate_label(&p.name, CHART_LABEL_MAX_CHARS),
                budgeted: totals.budgeted,
                actual: totals.actual,
            }
        })
        .collect()
}
