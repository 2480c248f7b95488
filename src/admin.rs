//! Admin layout registry.
//!
//! The admin UI is a generic frontend that renders whatever this registry
//! describes: list columns, grouped edit fields and inline child tables per
//! entity. Layouts are plain configuration structs, serialized as JSON by
//! the `/admin/layout` endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// A group of edit fields rendered as one section
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Fieldset {
    /// Section heading; None for the default unlabeled section
    pub legend: Option<&'static str>,
    pub fields: Vec<&'static str>,
}

/// An inline child table edited from within the parent entity page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Inline {
    pub entity: &'static str,
    pub fields: Vec<&'static str>,
}

/// Layout description for one entity in the admin UI
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminEntity {
    pub entity: &'static str,
    /// Columns shown on the list page
    pub list_display: Vec<&'static str>,
    /// Sidebar filters on the list page
    pub list_filter: Vec<&'static str>,
    /// Edit page sections, in render order
    pub fieldsets: Vec<Fieldset>,
    /// Child tables edited inline
    pub inlines: Vec<Inline>,
}

/// The full admin registry, one entry per managed entity.
pub fn layout() -> Vec<AdminEntity> {
    vec![
        AdminEntity {
            entity: "genre",
            list_display: vec!["name"],
            list_filter: vec![],
            fieldsets: vec![Fieldset { legend: None, fields: vec!["name"] }],
            inlines: vec![],
        },
        AdminEntity {
            entity: "language",
            list_display: vec!["name"],
            list_filter: vec![],
            fieldsets: vec![Fieldset { legend: None, fields: vec!["name"] }],
            inlines: vec![],
        },
        AdminEntity {
            entity: "author",
            list_display: vec!["last_name", "first_name", "date_of_birth", "date_of_death"],
            list_filter: vec![],
            fieldsets: vec![Fieldset {
                legend: None,
                fields: vec!["first_name", "last_name", "date_of_birth", "date_of_death"],
            }],
            inlines: vec![Inline {
                entity: "book",
                fields: vec!["title", "isbn", "language_id"],
            }],
        },
        AdminEntity {
            entity: "book",
            list_display: vec!["title", "author", "genres"],
            list_filter: vec![],
            fieldsets: vec![Fieldset {
                legend: None,
                fields: vec!["title", "author_id", "summary", "isbn", "genre_ids", "language_id"],
            }],
            inlines: vec![Inline {
                entity: "book_instance",
                fields: vec!["imprint", "status", "due_back", "borrower_id"],
            }],
        },
        AdminEntity {
            entity: "book_instance",
            list_display: vec!["book", "status", "borrower", "due_back", "id"],
            list_filter: vec!["status", "due_back"],
            fieldsets: vec![
                Fieldset {
                    legend: None,
                    fields: vec!["book_id", "imprint", "id"],
                },
                Fieldset {
                    legend: Some("Availability"),
                    fields: vec!["status", "due_back", "borrower_id"],
                },
            ],
            inlines: vec![],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_all_catalog_entities() {
        let entities: Vec<&str> = layout().iter().map(|e| e.entity).collect();
        for expected in ["genre", "language", "author", "book", "book_instance"] {
            assert!(entities.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn instance_layout_separates_availability_fields() {
        let registry = layout();
        let instance = registry
            .iter()
            .find(|e| e.entity == "book_instance")
            .unwrap();

        assert_eq!(instance.fieldsets.len(), 2);
        let availability = &instance.fieldsets[1];
        assert_eq!(availability.legend, Some("Availability"));
        assert!(availability.fields.contains(&"status"));
        assert!(availability.fields.contains(&"due_back"));
        assert!(availability.fields.contains(&"borrower_id"));
        assert_eq!(instance.list_filter, vec!["status", "due_back"]);
    }

    #[test]
    fn book_page_edits_instances_inline() {
        let registry = layout();
        let book = registry.iter().find(|e| e.entity == "book").unwrap();
        assert!(book.inlines.iter().any(|i| i.entity == "book_instance"));
    }
}
