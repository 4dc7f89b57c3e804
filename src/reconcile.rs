//! Folding proposed budget lines (AI suggestions or kit items) into a project's budget tree.
//!
//! Categories are matched by trimmed, case-insensitive name and created on demand with the
//! proposal's own casing. Both entry points return a new `Project`; the input is never touched.

use crate::error::{BudgetError, Result};
use crate::schema::{BudgetCategory, BudgetItem, BudgetTemplate, Project};
use crate::utils::{generate_id, names_match, normalize_quantity, normalize_unit_cost};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single proposed budget line, in the shape the budget assistant answers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposedItem {
    #[schemars(description = "Budget category of the line (e.g. Materials, Labor, Equipment).")]
    pub category: String,

    #[schemars(
        description = "Specific name of the budget line (e.g. Cement, Mason, Concrete mixer)."
    )]
    pub item_name: String,

    #[schemars(description = "Estimated quantity for this line (e.g. 10, 5, 1).")]
    pub quantity: f64,

    #[schemars(description = "Estimated unit cost for this line, in the local currency.")]
    pub unit_cost: f64,
}

impl ProposedItem {
    pub fn new(
        category: impl Into<String>,
        item_name: impl Into<String>,
        quantity: f64,
        unit_cost: f64,
    ) -> Self {
        Self {
            category: category.into(),
            item_name: item_name.into(),
            quantity,
            unit_cost,
        }
    }
}

/// Merges proposals into the budget, in input order.
///
/// An existing item with the same name (case-insensitive) in the matched category gets the
/// proposal's quantity added to it and keeps its own unit cost; otherwise a new item is
/// appended. Re-applying the same list therefore keeps one category and one item per name but
/// doubles the quantities.
///
/// Proposals with a blank category or item name are rejected as a whole batch before anything
/// is applied.
pub fn apply_proposed_items(project: &Project, proposals: &[ProposedItem]) -> Result<Project> {
    for (index, proposal) in proposals.iter().enumerate() {
        validate_names(index, &proposal.category, &proposal.item_name)?;
    }

    let mut updated = project.clone();
    for proposal in proposals {
        let category = find_or_create_category(&mut updated.budget, &proposal.category);
        let quantity = normalize_quantity(proposal.quantity);

        match category
            .items
            .iter_mut()
            .find(|item| names_match(&item.name, &proposal.item_name))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(quantity);
                debug!(
                    "Merged '{}' into existing item {} (quantity now {})",
                    proposal.item_name, existing.id, existing.quantity
                );
            }
            None => category.items.push(BudgetItem {
                id: generate_id("item"),
                name: proposal.item_name.trim().to_string(),
                quantity,
                budgeted_cost: normalize_unit_cost(proposal.unit_cost),
            }),
        }
    }

    Ok(updated)
}

/// Stamps every kit line into the budget as a brand-new item.
///
/// Categories are matched exactly as in [`apply_proposed_items`], but items are never merged:
/// applying the same kit twice leaves two separate lines per kit item.
pub fn apply_template(project: &Project, template: &BudgetTemplate) -> Result<Project> {
    for (index, line) in template.items.iter().enumerate() {
        validate_names(index, &line.category, &line.name)?;
    }

    let mut updated = project.clone();
    for line in &template.items {
        let category = find_or_create_category(&mut updated.budget, &line.category);
        category.items.push(BudgetItem {
            id: generate_id("item"),
            name: line.name.trim().to_string(),
            quantity: line.quantity.max(1),
            budgeted_cost: normalize_unit_cost(line.budgeted_cost),
        });
    }

    debug!(
        "Applied kit '{}' ({} lines) to project {}",
        template.name,
        template.items.len(),
        project.id
    );
    Ok(updated)
}

/// Kit lines and proposals share one rule: both names must be non-blank.
pub(crate) fn validate_names(index: usize, category: &str, item_name: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(BudgetError::InvalidProposal {
            index,
            details: "category name is blank".to_string(),
        });
    }
    if item_name.trim().is_empty() {
        return Err(BudgetError::InvalidProposal {
            index,
            details: "item name is blank".to_string(),
        });
    }
    Ok(())
}

fn find_or_create_category<'a>(
    budget: &'a mut Vec<BudgetCategory>,
    name: &str,
) -> &'a mut BudgetCategory {
    let position = match budget.iter().position(|c| names_match(&c.name, name)) {
        Some(position) => position,
        None => {
            budget.push(BudgetCategory {
                id: generate_id("cat"),
                name: name.trim().to_string(),
                items: Vec::new(),
            });
            budget.len() - 1
        }
    };
    &mut budget[position]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::total_budgeted;
    use crate::schema::{ProjectStatus, TemplateItem};

    fn empty_project() -> Project {
        Project {
            id: "proj-1".to_string(),
            name: "Bathroom".to_string(),
            client_id: "client-1".to_string(),
            location: "Downtown".to_string(),
            status: ProjectStatus::Planning,
            budget: vec![],
            expenses: vec![],
        }
    }

    fn seeded_project() -> Project {
        let mut project = empty_project();
        project.budget.push(BudgetCategory {
            id: "cat-mat".to_string(),
            name: "Materials".to_string(),
            items: vec![BudgetItem {
                id: "item-1".to_string(),
                name: "Cement".to_string(),
                quantity: 5,
                budgeted_cost: 30.0,
            }],
        });
        project
    }

    #[test]
    fn test_same_proposals_twice_sum_quantities() {
        let proposals = vec![ProposedItem::new("Materials", "Cement", 2.0, 10.0)];

        let once = apply_proposed_items(&empty_project(), &proposals).unwrap();
        let twice = apply_proposed_items(&once, &proposals).unwrap();

        assert_eq!(twice.budget.len(), 1);
        assert_eq!(twice.budget[0].name, "Materials");
        assert_eq!(twice.budget[0].items.len(), 1);
        assert_eq!(twice.budget[0].items[0].name, "Cement");
        assert_eq!(twice.budget[0].items[0].quantity, 4);
        assert_eq!(twice.budget[0].id, once.budget[0].id);
    }

    #[test]
    fn test_category_match_is_case_insensitive() {
        let proposals = vec![ProposedItem::new("  materials ", "Sand", 3.0, 4.0)];
        let updated = apply_proposed_items(&seeded_project(), &proposals).unwrap();

        assert_eq!(updated.budget.len(), 1);
        assert_eq!(updated.budget[0].id, "cat-mat");
        assert_eq!(updated.budget[0].name, "Materials");
        assert_eq!(updated.budget[0].items.len(), 2);
    }

    #[test]
    fn test_existing_item_keeps_its_unit_cost() {
        let proposals = vec![ProposedItem::new("MATERIALS", "cement", 3.0, 99.0)];
        let updated = apply_proposed_items(&seeded_project(), &proposals).unwrap();

        let cement = &updated.budget[0].items[0];
        assert_eq!(cement.id, "item-1");
        assert_eq!(cement.quantity, 8);
        assert_eq!(cement.budgeted_cost, 30.0);
    }

    #[test]
    fn test_new_category_keeps_proposal_casing() {
        let proposals = vec![ProposedItem::new(" Equipment Rental ", " Mixer ", 1.0, 1200.0)];
        let updated = apply_proposed_items(&seeded_project(), &proposals).unwrap();

        assert_eq!(updated.budget.len(), 2);
        let category = &updated.budget[1];
        assert_eq!(category.name, "Equipment Rental");
        assert!(category.id.starts_with("cat-"));
        assert_eq!(category.items[0].name, "Mixer");
        assert_eq!(total_budgeted(&updated), 150.0 + 1200.0);
    }

    #[test]
    fn test_invalid_quantity_and_cost_are_normalized() {
        let proposals = vec![ProposedItem::new("Labor", "Painter", -2.0, -50.0)];
        let updated = apply_proposed_items(&empty_project(), &proposals).unwrap();

        let item = &updated.budget[0].items[0];
        assert_eq!(item.quantity, 1);
        assert_eq!(item.budgeted_cost, 0.0);
    }

    #[test]
    fn test_blank_names_reject_whole_batch() {
        let original = seeded_project();
        let proposals = vec![
            ProposedItem::new("Materials", "Sand", 1.0, 5.0),
            ProposedItem::new("   ", "Gravel", 1.0, 5.0),
        ];

        let err = apply_proposed_items(&original, &proposals).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidProposal { index: 1, .. }));
        assert_eq!(original.budget[0].items.len(), 1);

        let blank_item = vec![ProposedItem::new("Materials", "", 1.0, 5.0)];
        assert!(apply_proposed_items(&original, &blank_item).is_err());
    }

    #[test]
    fn test_template_applied_twice_adds_separate_lines() {
        let template = BudgetTemplate {
            id: "template-1".to_string(),
            name: "Paint kit".to_string(),
            items: vec![TemplateItem {
                category: "Materials".to_string(),
                name: "Paint".to_string(),
                quantity: 1,
                budgeted_cost: 50.0,
            }],
        };

        let once = apply_template(&empty_project(), &template).unwrap();
        let twice = apply_template(&once, &template).unwrap();

        assert_eq!(twice.budget.len(), 1);
        let items = &twice.budget[0].items;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.name == "Paint" && i.quantity == 1));
        assert_ne!(items[0].id, items[1].id);
        assert_eq!(total_budgeted(&twice), 100.0);
    }

    #[test]
    fn test_two_item_template_twice_gives_four_entries() {
        let template = BudgetTemplate {
            id: "template-2".to_string(),
            name: "Bathroom kit".to_string(),
            items: vec![
                TemplateItem {
                    category: "materials".to_string(),
                    name: "Tiles".to_string(),
                    quantity: 20,
                    budgeted_cost: 15.0,
                },
                TemplateItem {
                    category: "Labor".to_string(),
                    name: "Tiler".to_string(),
                    quantity: 3,
                    budgeted_cost: 250.0,
                },
            ],
        };

        let project = apply_template(&seeded_project(), &template).unwrap();
        let project = apply_template(&project, &template).unwrap();

        assert_eq!(project.budget.len(), 2);
        assert_eq!(project.budget[0].id, "cat-mat");
        assert_eq!(project.item_count(), 1 + 4);
        let tiles: Vec<_> = project.budget[0]
            .items
            .iter()
            .filter(|i| i.name == "Tiles")
            .collect();
        assert_eq!(tiles.len(), 2);
        assert!(tiles.iter().all(|i| i.quantity == 20));
    }

    #[test]
    fn test_ai_suggestion_json_shape() {
        let json = r#"[{"category":"Materials","itemName":"Cement","quantity":10,"unitCost":35.5}]"#;
        let parsed: Vec<ProposedItem> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].item_name, "Cement");
        assert_eq!(parsed[0].unit_cost, 35.5);

        let missing_cost = r#"[{"category":"Materials","itemName":"Cement","quantity":10}]"#;
        assert!(serde_json::from_str::<Vec<ProposedItem>>(missing_cost).is_err());
    }
}
