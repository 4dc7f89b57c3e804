//! Client-facing documents: the budget proposal and the work order.
//!
//! Documents are plain data built from a project snapshot. Turning them into a downloadable file
//! is the job of a [`DocumentRenderer`]; [`Exporter`] runs one export at a time and reports every
//! renderer failure as [`BudgetError::ExportFailed`].

use crate::aggregation::{category_budgeted, total_budgeted};
use crate::busy::BusyFlag;
use crate::error::{BudgetError, Result};
use crate::schema::{Client, Project};
use crate::utils::underscore_whitespace;
use chrono::NaiveDate;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const UNKNOWN_CLIENT: &str = "Not provided";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalLine {
    pub name: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSection {
    pub category: String,
    pub lines: Vec<ProposalLine>,
    pub subtotal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProposal {
    pub project_name: String,
    pub location: String,
    pub client_name: String,
    pub issued_on: NaiveDate,
    pub logo: Option<String>,
    pub sections: Vec<ProposalSection>,
    pub grand_total: f64,
}

impl BudgetProposal {
    pub fn from_project(
        project: &Project,
        client: Option<&Client>,
        logo: Option<&str>,
        issued_on: NaiveDate,
    ) -> Self {
        let sections = project
            .budget
            .iter()
            .map(|category| ProposalSection {
                category: category.name.clone(),
                lines: category
                    .items
                    .iter()
                    .map(|item| ProposalLine {
                        name: item.name.clone(),
                        quantity: item.quantity,
                        unit_cost: item.budgeted_cost,
                        line_total: item.line_total(),
                    })
                    .collect(),
                subtotal: category_budgeted(category),
            })
            .collect();

        Self {
            project_name: project.name.clone(),
            location: project.location.clone(),
            client_name: client
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            issued_on,
            logo: logo.map(str::to_string),
            sections,
            grand_total: total_budgeted(project),
        }
    }

    pub fn file_name(&self) -> String {
        format!("Budget-{}.pdf", underscore_whitespace(&self.project_name))
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Budget Proposal\n\n");
        if self.logo.is_some() {
            output.push_str("![Company logo](logo)\n\n");
        }
        output.push_str(&format!("**Project:** {}\n\n", self.project_name));
        output.push_str(&format!("**Location:** {}\n\n", self.location));
        output.push_str(&format!("**Client:** {}\n\n", self.client_name));
        output.push_str(&format!(
            "**Issued on:** {}\n\n",
            self.issued_on.format("%Y-%m-%d")
        ));

        for section in &self.sections {
            output.push_str(&format!("## {}\n\n", section.category));
            output.push_str("| Item | Qty | Unit cost | Total |\n");
            output.push_str("|---|---:|---:|---:|\n");
            for line in &section.lines {
                output.push_str(&format!(
                    "| {} | {} | {:.2} | {:.2} |\n",
                    line.name, line.quantity, line.unit_cost, line.line_total
                ));
            }
            output.push_str(&format!(
                "| **Subtotal** | | | **{:.2}** |\n\n",
                section.subtotal
            ));
        }

        output.push_str(&format!("**Grand total:** {:.2}\n", self.grand_total));
        output
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Category,Item,Quantity,Unit Cost,Line Total\n");

        for section in &self.sections {
            for line in &section.lines {
                output.push_str(&format!(
                    "{},{},{},{:.2},{:.2}\n",
                    csv_field(&section.category),
                    csv_field(&line.name),
                    line.quantity,
                    line.unit_cost,
                    line.line_total
                ));
            }
        }

        output.push_str(&format!(",Grand Total,,,{:.2}\n", self.grand_total));
        output
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScopeLine {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScopeSection {
    pub category: String,
    pub lines: Vec<ScopeLine>,
}

/// Scope of work for the client to sign. Carries quantities only, never prices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub project_name: String,
    pub location: String,
    pub client_name: String,
    pub document_id: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub issued_on: NaiveDate,
    pub logo: Option<String>,
    pub scope: Vec<ScopeSection>,
}

impl WorkOrder {
    pub fn from_project(
        project: &Project,
        client: Option<&Client>,
        logo: Option<&str>,
        issued_on: NaiveDate,
    ) -> Self {
        Self {
            project_name: project.name.clone(),
            location: project.location.clone(),
            client_name: client
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CLIENT.to_string()),
            document_id: client.and_then(|c| c.document_id.clone()),
            contact_phone: client.and_then(|c| c.contact_phone.clone()),
            address: client.and_then(|c| c.address.clone()),
            issued_on,
            logo: logo.map(str::to_string),
            scope: project
                .budget
                .iter()
                .map(|category| ScopeSection {
                    category: category.name.clone(),
                    lines: category
                        .items
                        .iter()
                        .map(|item| ScopeLine {
                            name: item.name.clone(),
                            quantity: item.quantity,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("WorkOrder-{}.pdf", underscore_whitespace(&self.project_name))
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Work Order\n\n");
        output.push_str("Agreement of services and materials\n\n");
        if self.logo.is_some() {
            output.push_str("![Company logo](logo)\n\n");
        }
        output.push_str(&format!("**Project:** {}\n\n", self.project_name));
        output.push_str(&format!("**Location:** {}\n\n", self.location));
        output.push_str(&format!("**Client:** {}\n\n", self.client_name));
        output.push_str(&format!(
            "**Issued on:** {}\n\n",
            self.issued_on.format("%Y-%m-%d")
        ));
        if let Some(document_id) = &self.document_id {
            output.push_str(&format!("**Tax ID:** {}\n\n", document_id));
        }
        if let Some(phone) = &self.contact_phone {
            output.push_str(&format!("**Phone:** {}\n\n", phone));
        }
        if let Some(address) = &self.address {
            output.push_str(&format!("**Site address:** {}\n\n", address));
        }

        output.push_str("## Scope of services and materials\n\n");
        for section in &self.scope {
            output.push_str(&format!("### {}\n\n", section.category));
            if section.lines.is_empty() {
                output.push_str("No items in this category.\n\n");
                continue;
            }
            output.push_str("| Item / Service | Qty |\n");
            output.push_str("|---|---:|\n");
            for line in &section.lines {
                output.push_str(&format!("| {} | {} |\n", line.name, line.quantity));
            }
            output.push('\n');
        }

        output.push_str("---\n\n");
        output.push_str(&format!("Client signature ({})\n\n", self.client_name));
        output.push_str(
            "I acknowledge and agree to the scope of services and materials described in this work order.\n",
        );
        output
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportDocument {
    Proposal(BudgetProposal),
    WorkOrder(WorkOrder),
}

impl ExportDocument {
    pub fn file_name(&self) -> String {
        match self {
            ExportDocument::Proposal(p) => p.file_name(),
            ExportDocument::WorkOrder(w) => w.file_name(),
        }
    }

    pub fn to_markdown(&self) -> String {
        match self {
            ExportDocument::Proposal(p) => p.to_markdown(),
            ExportDocument::WorkOrder(w) => w.to_markdown(),
        }
    }
}

/// Turns a document into a file under the given name and returns where it landed.
pub trait DocumentRenderer {
    fn render(&self, document: &ExportDocument, file_name: &str) -> Result<PathBuf>;
}

/// Writes the Markdown rendition next to where the PDF would go.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    out_dir: PathBuf,
}

impl MarkdownRenderer {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn render(&self, document: &ExportDocument, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(Path::new(file_name).with_extension("md"));
        fs::write(&path, document.to_markdown())?;
        Ok(path)
    }
}

pub struct Exporter<R: DocumentRenderer> {
    renderer: R,
    busy: BusyFlag,
}

impl<R: DocumentRenderer> Exporter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            busy: BusyFlag::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn export(&self, document: &ExportDocument) -> Result<PathBuf> {
        let _guard = self.busy.try_acquire("export")?;
        let file_name = document.file_name();

        match self.renderer.render(document, &file_name) {
            Ok(path) => {
                info!("Exported {} to {}", file_name, path.display());
                Ok(path)
            }
            Err(e) => {
                error!("Exporting {} failed: {}", file_name, e);
                Err(match e {
                    BudgetError::ExportFailed(details) => BudgetError::ExportFailed(details),
                    other => BudgetError::ExportFailed(other.to_string()),
                })
            }
        }
    }
}
