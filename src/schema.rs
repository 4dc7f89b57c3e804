use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MATERIALS_CATEGORY: &str = "Materials";
pub const LABOR_CATEGORY: &str = "Labor";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Paused,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::Paused,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Paused => "Paused",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }

    /// Counted by the dashboard's "active projects" figure.
    pub fn is_active(self) -> bool {
        self == ProjectStatus::InProgress
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Planning
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    /// Individual or company tax document (CPF/CNPJ style identifiers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Cost shape of a catalog entry. A product is bought and resold, a service is only charged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogKind {
    Product {
        #[serde(rename = "costPrice", default)]
        cost_price: f64,
        #[serde(rename = "salePrice", default)]
        sale_price: f64,
    },
    Service {
        #[serde(rename = "serviceCost", default)]
        service_cost: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: CatalogKind,
}

impl CatalogEntry {
    pub fn is_product(&self) -> bool {
        matches!(self.kind, CatalogKind::Product { .. })
    }

    /// Unit cost used when the entry is placed on a budget.
    pub fn default_unit_cost(&self) -> f64 {
        match self.kind {
            CatalogKind::Product { sale_price, .. } => sale_price,
            CatalogKind::Service { service_cost } => service_cost,
        }
    }

    pub fn margin(&self) -> Option<f64> {
        match self.kind {
            CatalogKind::Product {
                cost_price,
                sale_price,
            } => Some(sale_price - cost_price),
            CatalogKind::Service { .. } => None,
        }
    }

    /// Category a kit line built from this entry lands in.
    pub fn default_category(&self) -> &'static str {
        if self.is_product() {
            MATERIALS_CATEGORY
        } else {
            LABOR_CATEGORY
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit cost.
    pub budgeted_cost: f64,
}

impl BudgetItem {
    pub fn line_total(&self) -> f64 {
        self.budgeted_cost * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub location: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub budget: Vec<BudgetCategory>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Project {
    pub fn category(&self, category_id: &str) -> Option<&BudgetCategory> {
        self.budget.iter().find(|c| c.id == category_id)
    }

    pub(crate) fn category_mut(&mut self, category_id: &str) -> Option<&mut BudgetCategory> {
        self.budget.iter_mut().find(|c| c.id == category_id)
    }

    pub fn item_count(&self) -> usize {
        self.budget.iter().map(|c| c.items.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    /// Category name, matched or created when the kit is applied.
    pub category: String,
    pub name: String,
    pub quantity: u32,
    pub budgeted_cost: f64,
}

impl TemplateItem {
    pub fn from_catalog(entry: &CatalogEntry) -> Self {
        Self {
            category: entry.default_category().to_string(),
            name: entry.name.clone(),
            quantity: 1,
            budgeted_cost: entry.default_unit_cost(),
        }
    }
}

/// A reusable kit of budget lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
}
