//! # Renovation Budget
//!
//! Budget and expense tracking for construction and renovation work: clients, a catalog of
//! products and services, reusable budget kits, and per-project budgets and expenses.
//!
//! ## Core Concepts
//!
//! - **Budget tree**: a project owns categories, each holding line items (`quantity × unit cost`)
//! - **Expenses**: actual spend, each booked against one category of the same project
//! - **Aggregation**: totals, financial health and chart series are always derived, never stored
//! - **Reconciliation**: AI suggestions and kits are folded into the tree by case-insensitive
//!   category name; suggestions add to matching items, kits always append fresh lines
//! - **Application state**: [`AppState`] owns every collection and writes each change through a
//!   [`KeyValueStore`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use renovation_budget::*;
//!
//! let mut state = AppState::load(MemoryStore::new());
//! let project_id = state.add_project(NewProject {
//!     name: "Bathroom Remodel".to_string(),
//!     client_id: "client-1".to_string(),
//!     location: "Downtown".to_string(),
//! })?;
//!
//! state.apply_suggestions(&project_id, &[
//!     ProposedItem::new("Materials", "Tiles", 20.0, 15.0),
//!     ProposedItem::new("Labor", "Tiler", 3.0, 250.0),
//! ])?;
//!
//! let totals = ProjectTotals::for_project(state.project(&project_id).unwrap());
//! assert_eq!(totals.budgeted, 1050.0);
//! ```
//!
//! The Gemini-backed budget assistant and consultancy agents live in [`llm`] behind the
//! `gemini` feature.

pub mod advisory;
pub mod aggregation;
pub mod busy;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod reconcile;
pub mod schema;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;

#[cfg(feature = "gemini")]
pub mod llm;

pub use advisory::{
    client_name, project_brief, AgentProfile, AgentType, ConsultancyReport, ImpactLevel,
    Recommendation,
};
pub use aggregation::*;
pub use busy::{BusyFlag, BusyGuard};
pub use config::{AiConfig, StoreConfig};
pub use error::{BudgetError, Result};
pub use export::*;
pub use filter::{filter_projects, search_catalog, StatusFilter};
pub use reconcile::{apply_proposed_items, apply_template, ProposedItem};
pub use schema::*;
pub use state::*;
pub use store::{Collection, FileStore, KeyValueStore, MemoryStore};
pub use utils::*;
