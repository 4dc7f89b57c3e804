//! The application-state handle.
//!
//! `AppState` owns every persisted collection plus the active-project pointer and is passed
//! explicitly to whatever needs it. Mutators validate their input, build a replacement record
//! (never editing a record in place through a shared reference), write the touched collection
//! back to the store, and hand back any id they created.

use crate::aggregation::PortfolioSummary;
use crate::error::{BudgetError, Result};
use crate::filter::{filter_projects, search_catalog, StatusFilter};
use crate::reconcile::{apply_proposed_items, apply_template, validate_names, ProposedItem};
use crate::schema::{
    BudgetCategory, BudgetItem, BudgetTemplate, CatalogEntry, CatalogKind, Client, Expense, Project,
    ProjectStatus, TemplateItem,
};
use crate::seed;
use crate::store::{self, Collection, KeyValueStore};
use crate::utils::{generate_id, names_match, normalize_unit_cost, parse_quantity, parse_unit_cost};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use log::{error, info};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub client_id: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewClient {
    pub name: String,
    pub document_id: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

/// Values typed into the budget item form.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetItemDraft {
    pub name: String,
    pub quantity: u32,
    pub budgeted_cost: f64,
}

impl BudgetItemDraft {
    pub fn new(name: impl Into<String>, quantity: u32, budgeted_cost: f64) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.max(1),
            budgeted_cost: normalize_unit_cost(budgeted_cost),
        }
    }

    /// Raw form text: an unparsable quantity becomes 1, an unparsable cost becomes 0.
    pub fn parse(name: &str, quantity: &str, budgeted_cost: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: parse_quantity(quantity),
            budgeted_cost: parse_unit_cost(budgeted_cost),
        }
    }
}

/// How a custom budget line is also saved to the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaveToCatalog {
    /// The line's unit cost becomes the sale price.
    Product { cost_price: f64 },
    /// The line's unit cost becomes the service cost.
    Service,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: String,
}

pub struct AppState<S: KeyValueStore> {
    store: S,
    projects: Vec<Project>,
    clients: Vec<Client>,
    products: Vec<CatalogEntry>,
    templates: Vec<BudgetTemplate>,
    logo: Option<String>,
    active_project_id: Option<String>,
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BudgetError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<S: KeyValueStore> AppState<S> {
    /// Loads every collection once; missing or unreadable keys fall back to their defaults.
    pub fn load(store: S) -> Self {
        let projects = store::load_or_default(&store, Collection::Projects, seed::default_projects);
        let clients = store::load_or_default(&store, Collection::Clients, seed::default_clients);
        let products = store::load_or_default(&store, Collection::Products, seed::default_catalog);
        let templates = store::load_or_default(&store, Collection::Templates, Vec::new);
        let logo = store::load_or_default(&store, Collection::Logo, || None);

        info!(
            "Loaded {} projects, {} clients, {} catalog entries and {} kits",
            projects.len(),
            clients.len(),
            products.len(),
            templates.len()
        );

        Self {
            store,
            projects,
            clients,
            products,
            templates,
            logo,
            active_project_id: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write-through after a mutation. Failures are logged, never surfaced.
    fn persist(&mut self, collection: Collection) {
        let result = match collection {
            Collection::Projects => store::save(&mut self.store, collection, &self.projects),
            Collection::Clients => store::save(&mut self.store, collection, &self.clients),
            Collection::Products => store::save(&mut self.store, collection, &self.products),
            Collection::Templates => store::save(&mut self.store, collection, &self.templates),
            Collection::Logo => store::save(&mut self.store, collection, &self.logo),
        };
        if let Err(e) = result {
            error!("Saving '{}' failed: {}", collection.key(), e);
        }
    }

    // ---- read access -------------------------------------------------------------------

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn products(&self) -> &[CatalogEntry] {
        &self.products
    }

    pub fn templates(&self) -> &[BudgetTemplate] {
        &self.templates
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    pub fn client(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == client_id)
    }

    pub fn client_for(&self, project: &Project) -> Option<&Client> {
        self.client(&project.client_id)
    }

    pub fn template(&self, template_id: &str) -> Option<&BudgetTemplate> {
        self.templates.iter().find(|t| t.id == template_id)
    }

    pub fn catalog_entry(&self, entry_id: &str) -> Option<&CatalogEntry> {
        self.products.iter().find(|p| p.id == entry_id)
    }

    /// Always read from the project collection, so it can never go stale.
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id
            .as_deref()
            .and_then(|id| self.project(id))
    }

    pub fn set_active_project(&mut self, project_id: Option<&str>) -> Result<()> {
        match project_id {
            Some(id) if self.project(id).is_none() => Err(BudgetError::not_found("project", id)),
            Some(id) => {
                self.active_project_id = Some(id.to_string());
                Ok(())
            }
            None => {
                self.active_project_id = None;
                Ok(())
            }
        }
    }

    pub fn portfolio_summary(&self) -> PortfolioSummary {
        PortfolioSummary::from_projects(&self.projects)
    }

    pub fn filtered_projects(&self, search_term: &str, status: StatusFilter) -> Vec<&Project> {
        filter_projects(&self.projects, &self.clients, search_term, status)
    }

    pub fn search_catalog(&self, search_term: &str) -> Vec<&CatalogEntry> {
        search_catalog(&self.products, search_term)
    }

    // ---- projects ----------------------------------------------------------------------

    pub fn add_project(&mut self, new: NewProject) -> Result<String> {
        let name = required("project name", &new.name)?;
        let client_id = required("client", &new.client_id)?;
        let location = required("location", &new.location)?;
        if self.client(&client_id).is_none() {
            return Err(BudgetError::not_found("client", client_id));
        }

        let project = Project {
            id: generate_id("proj"),
            name,
            client_id,
            location,
            status: ProjectStatus::Planning,
            budget: seed::initial_budget(|| generate_id("cat")),
            expenses: Vec::new(),
        };
        let id = project.id.clone();

        info!("Created project {} ('{}')", id, project.name);
        self.projects.push(project);
        self.persist(Collection::Projects);
        Ok(id)
    }

    /// Replaces a project with the updater's result. The updater sees the current record and
    /// builds the new one; an error leaves the collection untouched. The id is not the updater's
    /// to change.
    pub fn update_project<F>(&mut self, project_id: &str, updater: F) -> Result<()>
    where
        F: FnOnce(&Project) -> Result<Project>,
    {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| BudgetError::not_found("project", project_id))?;

        let mut updated = updater(&self.projects[index])?;
        updated.id = self.projects[index].id.clone();
        self.projects[index] = updated;
        self.persist(Collection::Projects);
        Ok(())
    }

    pub fn set_project_status(&mut self, project_id: &str, status: ProjectStatus) -> Result<()> {
        self.update_project(project_id, |p| {
            Ok(Project {
                status,
                ..p.clone()
            })
        })
    }

    pub fn delete_project(&mut self, project_id: &str) -> Result<()> {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != project_id);
        if self.projects.len() == before {
            return Err(BudgetError::not_found("project", project_id));
        }
        if self.active_project_id.as_deref() == Some(project_id) {
            self.active_project_id = None;
        }
        self.persist(Collection::Projects);
        Ok(())
    }

    // ---- budget ------------------------------------------------------------------------

    /// Returns the id of the category with that name, creating it when it does not exist yet.
    pub fn add_category(&mut self, project_id: &str, name: &str) -> Result<String> {
        let name = required("category name", name)?;
        let project = self
            .project(project_id)
            .ok_or_else(|| BudgetError::not_found("project", project_id))?;
        if let Some(existing) = project.budget.iter().find(|c| names_match(&c.name, &name)) {
            return Ok(existing.id.clone());
        }

        let id = generate_id("cat");
        let category_id = id.clone();
        self.update_project(project_id, |p| {
            let mut updated = p.clone();
            updated.budget.push(BudgetCategory {
                id: category_id,
                name,
                items: Vec::new(),
            });
            Ok(updated)
        })?;
        Ok(id)
    }

    /// Removes a category and its items. Expenses booked against it are kept.
    pub fn delete_category(&mut self, project_id: &str, category_id: &str) -> Result<()> {
        self.update_project(project_id, |p| {
            if p.category(category_id).is_none() {
                return Err(BudgetError::not_found("category", category_id));
            }
            let mut updated = p.clone();
            updated.budget.retain(|c| c.id != category_id);
            Ok(updated)
        })
    }

    pub fn add_budget_item(
        &mut self,
        project_id: &str,
        category_id: &str,
        draft: BudgetItemDraft,
    ) -> Result<String> {
        let item = BudgetItem {
            id: generate_id("item"),
            name: required("item name", &draft.name)?,
            quantity: draft.quantity.max(1),
            budgeted_cost: normalize_unit_cost(draft.budgeted_cost),
        };
        let id = item.id.clone();

        self.update_project(project_id, |p| {
            let mut updated = p.clone();
            updated
                .category_mut(category_id)
                .ok_or_else(|| BudgetError::not_found("category", category_id))?
                .items
                .push(item);
            Ok(updated)
        })?;
        Ok(id)
    }

    /// Adds the line to the budget and records it in the catalog as well.
    pub fn add_budget_item_to_catalog(
        &mut self,
        project_id: &str,
        category_id: &str,
        draft: BudgetItemDraft,
        save_as: SaveToCatalog,
    ) -> Result<(String, String)> {
        let name = draft.name.trim().to_string();
        let unit_cost = normalize_unit_cost(draft.budgeted_cost);
        let item_id = self.add_budget_item(project_id, category_id, draft)?;

        let kind = match save_as {
            SaveToCatalog::Product { cost_price } => CatalogKind::Product {
                cost_price: normalize_unit_cost(cost_price),
                sale_price: unit_cost,
            },
            SaveToCatalog::Service => CatalogKind::Service {
                service_cost: unit_cost,
            },
        };
        let entry_id = self.add_catalog_entry(&name, kind)?;
        Ok((item_id, entry_id))
    }

    /// Places a catalog entry on the budget at its default unit cost.
    pub fn add_item_from_catalog(
        &mut self,
        project_id: &str,
        category_id: &str,
        entry_id: &str,
        quantity: u32,
    ) -> Result<String> {
        let entry = self
            .catalog_entry(entry_id)
            .ok_or_else(|| BudgetError::not_found("catalog entry", entry_id))?;
        let draft = BudgetItemDraft::new(entry.name.clone(), quantity, entry.default_unit_cost());
        self.add_budget_item(project_id, category_id, draft)
    }

    pub fn edit_budget_item(
        &mut self,
        project_id: &str,
        category_id: &str,
        item_id: &str,
        draft: BudgetItemDraft,
    ) -> Result<()> {
        let name = required("item name", &draft.name)?;
        self.update_project(project_id, |p| {
            let mut updated = p.clone();
            let item = updated
                .category_mut(category_id)
                .ok_or_else(|| BudgetError::not_found("category", category_id))?
                .items
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or_else(|| BudgetError::not_found("budget item", item_id))?;

            item.name = name;
            item.quantity = draft.quantity.max(1);
            item.budgeted_cost = normalize_unit_cost(draft.budgeted_cost);
            Ok(updated)
        })
    }

    pub fn delete_budget_item(
        &mut self,
        project_id: &str,
        category_id: &str,
        item_id: &str,
    ) -> Result<()> {
        self.update_project(project_id, |p| {
            let mut updated = p.clone();
            let category = updated
                .category_mut(category_id)
                .ok_or_else(|| BudgetError::not_found("category", category_id))?;
            let before = category.items.len();
            category.items.retain(|i| i.id != item_id);
            if category.items.len() == before {
                return Err(BudgetError::not_found("budget item", item_id));
            }
            Ok(updated)
        })
    }

    /// Folds AI suggestions into the project's budget; nothing changes if any is invalid.
    pub fn apply_suggestions(
        &mut self,
        project_id: &str,
        suggestions: &[ProposedItem],
    ) -> Result<()> {
        self.update_project(project_id, |p| apply_proposed_items(p, suggestions))?;
        info!(
            "Applied {} suggested lines to project {}",
            suggestions.len(),
            project_id
        );
        Ok(())
    }

    pub fn apply_template(&mut self, project_id: &str, template_id: &str) -> Result<()> {
        let template = self
            .template(template_id)
            .cloned()
            .ok_or_else(|| BudgetError::not_found("kit", template_id))?;
        self.update_project(project_id, |p| apply_template(p, &template))
    }

    // ---- expenses ----------------------------------------------------------------------

    pub fn add_expense(&mut self, project_id: &str, new: NewExpense) -> Result<String> {
        let description = required("description", &new.description)?;
        if !new.amount.is_finite() || new.amount <= 0.0 {
            return Err(BudgetError::validation(
                "amount",
                format!("{} is not a positive amount", new.amount),
            ));
        }
        let category_id = required("category", &new.category_id)?;

        let expense = Expense {
            id: generate_id("exp"),
            description,
            amount: new.amount,
            date: new.date,
            category_id,
        };
        let id = expense.id.clone();

        self.update_project(project_id, |p| {
            if p.category(&expense.category_id).is_none() {
                return Err(BudgetError::not_found("category", expense.category_id.clone()));
            }
            let mut updated = p.clone();
            updated.expenses.push(expense);
            // newest first; same-day entries keep insertion order
            updated.expenses.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(updated)
        })?;
        Ok(id)
    }

    pub fn delete_expense(&mut self, project_id: &str, expense_id: &str) -> Result<()> {
        self.update_project(project_id, |p| {
            if !p.expenses.iter().any(|e| e.id == expense_id) {
                return Err(BudgetError::not_found("expense", expense_id));
            }
            let mut updated = p.clone();
            updated.expenses.retain(|e| e.id != expense_id);
            Ok(updated)
        })
    }

    // ---- clients -----------------------------------------------------------------------

    pub fn add_client(&mut self, new: NewClient) -> Result<String> {
        let client = Client {
            id: generate_id("client"),
            name: required("client name", &new.name)?,
            document_id: optional(new.document_id),
            contact_phone: optional(new.contact_phone),
            address: optional(new.address),
        };
        let id = client.id.clone();
        self.clients.push(client);
        self.persist(Collection::Clients);
        Ok(id)
    }

    pub fn update_client(&mut self, client: Client) -> Result<()> {
        let name = required("client name", &client.name)?;
        let slot = self
            .clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or_else(|| BudgetError::not_found("client", client.id.clone()))?;
        *slot = Client {
            name,
            document_id: optional(client.document_id),
            contact_phone: optional(client.contact_phone),
            address: optional(client.address),
            id: client.id,
        };
        self.persist(Collection::Clients);
        Ok(())
    }

    /// Refused while any project still points at the client.
    pub fn delete_client(&mut self, client_id: &str) -> Result<()> {
        let project_count = self
            .projects
            .iter()
            .filter(|p| p.client_id == client_id)
            .count();
        if project_count > 0 {
            return Err(BudgetError::ClientInUse {
                client_id: client_id.to_string(),
                project_count,
            });
        }

        let before = self.clients.len();
        self.clients.retain(|c| c.id != client_id);
        if self.clients.len() == before {
            return Err(BudgetError::not_found("client", client_id));
        }
        self.persist(Collection::Clients);
        Ok(())
    }

    // ---- catalog -----------------------------------------------------------------------

    pub fn add_catalog_entry(&mut self, name: &str, kind: CatalogKind) -> Result<String> {
        let name = required("catalog name", name)?;
        let prefix = match kind {
            CatalogKind::Product { .. } => "prod",
            CatalogKind::Service { .. } => "serv",
        };
        let entry = CatalogEntry {
            id: generate_id(prefix),
            name,
            kind: normalize_kind(kind),
        };
        let id = entry.id.clone();
        self.products.push(entry);
        self.persist(Collection::Products);
        Ok(id)
    }

    pub fn update_catalog_entry(&mut self, entry: CatalogEntry) -> Result<()> {
        let name = required("catalog name", &entry.name)?;
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == entry.id)
            .ok_or_else(|| BudgetError::not_found("catalog entry", entry.id.clone()))?;
        *slot = CatalogEntry {
            name,
            kind: normalize_kind(entry.kind),
            id: entry.id,
        };
        self.persist(Collection::Products);
        Ok(())
    }

    pub fn delete_catalog_entry(&mut self, entry_id: &str) -> Result<()> {
        let before = self.products.len();
        self.products.retain(|p| p.id != entry_id);
        if self.products.len() == before {
            return Err(BudgetError::not_found("catalog entry", entry_id));
        }
        self.persist(Collection::Products);
        Ok(())
    }

    // ---- kits --------------------------------------------------------------------------

    pub fn add_template(&mut self, name: &str) -> Result<String> {
        let template = BudgetTemplate {
            id: generate_id("template"),
            name: required("kit name", name)?,
            items: Vec::new(),
        };
        let id = template.id.clone();
        self.templates.push(template);
        self.persist(Collection::Templates);
        Ok(id)
    }

    pub fn update_template(&mut self, template: BudgetTemplate) -> Result<()> {
        let name = required("kit name", &template.name)?;
        for (index, item) in template.items.iter().enumerate() {
            validate_names(index, &item.category, &item.name)?;
        }
        let slot = self
            .templates
            .iter_mut()
            .find(|t| t.id == template.id)
            .ok_or_else(|| BudgetError::not_found("kit", template.id.clone()))?;
        *slot = BudgetTemplate { name, ..template };
        self.persist(Collection::Templates);
        Ok(())
    }

    pub fn delete_template(&mut self, template_id: &str) -> Result<()> {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != template_id);
        if self.templates.len() == before {
            return Err(BudgetError::not_found("kit", template_id));
        }
        self.persist(Collection::Templates);
        Ok(())
    }

    fn edit_template<F>(&mut self, template_id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<TemplateItem>) -> Result<()>,
    {
        let mut template = self
            .template(template_id)
            .cloned()
            .ok_or_else(|| BudgetError::not_found("kit", template_id))?;
        edit(&mut template.items)?;
        self.update_template(template)
    }

    pub fn add_catalog_entry_to_template(
        &mut self,
        template_id: &str,
        entry_id: &str,
    ) -> Result<()> {
        let line = self
            .catalog_entry(entry_id)
            .map(TemplateItem::from_catalog)
            .ok_or_else(|| BudgetError::not_found("catalog entry", entry_id))?;
        self.edit_template(template_id, |items| {
            items.push(line);
            Ok(())
        })
    }

    pub fn remove_template_item(&mut self, template_id: &str, index: usize) -> Result<()> {
        self.edit_template(template_id, |items| {
            if index >= items.len() {
                return Err(BudgetError::not_found("kit line", index.to_string()));
            }
            items.remove(index);
            Ok(())
        })
    }

    /// Raw quantity text from the kit editor; anything unparsable becomes 1.
    pub fn set_template_item_quantity(
        &mut self,
        template_id: &str,
        index: usize,
        raw: &str,
    ) -> Result<()> {
        let quantity = parse_quantity(raw);
        self.edit_template(template_id, |items| {
            let line = items
                .get_mut(index)
                .ok_or_else(|| BudgetError::not_found("kit line", index.to_string()))?;
            line.quantity = quantity;
            Ok(())
        })
    }

    // ---- company logo ------------------------------------------------------------------

    pub fn set_logo(&mut self, logo: Option<String>) {
        self.logo = logo;
        self.persist(Collection::Logo);
    }

    /// Reads an image file and stores it as a `data:` URL.
    pub fn import_logo(&mut self, path: &Path) -> Result<()> {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(BudgetError::validation(
                "logo",
                format!("{} is not an image ({})", path.display(), mime),
            ));
        }

        let bytes = fs::read(path)?;
        let data_url = format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes));
        self.set_logo(Some(data_url));
        Ok(())
    }
}

fn normalize_kind(kind: CatalogKind) -> CatalogKind {
    match kind {
        CatalogKind::Product {
            cost_price,
            sale_price,
        } => CatalogKind::Product {
            cost_price: normalize_unit_cost(cost_price),
            sale_price: normalize_unit_cost(sale_price),
        },
        CatalogKind::Service { service_cost } => CatalogKind::Service {
            service_cost: normalize_unit_cost(service_cost),
        },
    }
}
