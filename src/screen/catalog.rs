use crate::screen::{ScreenDef, ScreenRegistry};
use crate::source::SourceMode;
use crate::table::{CellValue, ColumnDescriptor, RowActionKind};

const EDIT_AND_VIEW: &[RowActionKind] = &[RowActionKind::Update, RowActionKind::Details];

/// Register the bundled master-data screens.
pub fn register_all(registry: &mut ScreenRegistry) {
    registry.register(ScreenDef {
        key: "departments",
        title: "Departments",
        description: "Laboratory sections and their codes",
        collection: "departments",
        mode: SourceMode::Local,
        columns: || {
            vec![
                ColumnDescriptor::new("code", "Code").with_width(8),
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("description", "Description"),
                ColumnDescriptor::status("isactive", "Status").with_width(12),
            ]
        },
        search_fields: &["code", "name", "description"],
        actions: EDIT_AND_VIEW,
    });

    registry.register(ScreenDef {
        key: "specimen_types",
        title: "Specimen Types",
        description: "Sample kinds and the container they are drawn into",
        collection: "specimen_types",
        mode: SourceMode::Server,
        columns: || {
            vec![
                ColumnDescriptor::new("code", "Code").with_width(8),
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("container_color.name", "Container"),
                ColumnDescriptor::status("isactive", "Status").with_width(12),
            ]
        },
        search_fields: &["code", "name", "container_color.name"],
        actions: EDIT_AND_VIEW,
    });

    registry.register(ScreenDef {
        key: "colors",
        title: "Colors",
        description: "Tube cap and label colors",
        collection: "colors",
        mode: SourceMode::Local,
        columns: || {
            vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("hex", "Hex")
                    .with_renderer(|row| {
                        row.text("hex").map_or(CellValue::Empty, |hex| {
                            CellValue::text(hex.to_uppercase())
                        })
                    })
                    .with_width(10),
                ColumnDescriptor::status("isactive", "Status").with_width(12),
            ]
        },
        search_fields: &[],
        actions: &[RowActionKind::Update],
    });

    registry.register(ScreenDef {
        key: "instruments",
        title: "Instruments",
        description: "Analyzers and where they are installed",
        collection: "instruments",
        mode: SourceMode::Server,
        columns: || {
            vec![
                ColumnDescriptor::new("name", "Name"),
                ColumnDescriptor::new("model", "Model"),
                ColumnDescriptor::new("serial", "Serial").with_width(14),
                ColumnDescriptor::new("department.name", "Department"),
                ColumnDescriptor::status("isactive", "Status").with_width(12),
            ]
        },
        search_fields: &["name", "model", "serial", "department.name"],
        actions: EDIT_AND_VIEW,
    });

    registry.register(ScreenDef {
        key: "users",
        title: "Users",
        description: "Console accounts, roles and departments",
        collection: "users",
        mode: SourceMode::Server,
        columns: || {
            vec![
                ColumnDescriptor::new("username", "Username").with_width(16),
                ColumnDescriptor::new("fullname", "Full name"),
                ColumnDescriptor::new("role", "Role").with_width(14),
                ColumnDescriptor::new("department.name", "Department"),
                ColumnDescriptor::status("isactive", "Status").with_width(12),
            ]
        },
        search_fields: &["username", "fullname", "email", "department.name"],
        actions: &[RowActionKind::Details],
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::table::ColumnRegistry;

    #[test]
    fn test_catalog_matches_sample_data() {
        let mut registry = ScreenRegistry::new();
        register_all(&mut registry);
        let dataset = Dataset::sample().unwrap();

        assert_eq!(registry.len(), 5);
        for def in registry.all() {
            assert!(dataset.contains(def.collection), "no data for {}", def.key);
            assert!(ColumnRegistry::new((def.columns)()).is_ok(), "bad columns in {}", def.key);
        }
    }

    #[test]
    fn test_small_sets_page_locally() {
        let mut registry = ScreenRegistry::new();
        register_all(&mut registry);
        assert_eq!(registry.get("colors").unwrap().mode, SourceMode::Local);
        assert_eq!(registry.get("users").unwrap().mode, SourceMode::Server);
    }
}
