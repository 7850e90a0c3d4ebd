//! redb table definitions for the appscale state store.

use redb::TableDefinition;

/// Container apps keyed by `{resource_group}/{name}`.
pub const CONTAINER_APPS: TableDefinition<&str, &[u8]> = TableDefinition::new("container_apps");
