use anyhow::Result;

use appscale_core::{ResourceRef, Secret};
use appscale_state::StateStore;
use appscale_wizard::validate::{validate_secret_name, validate_secret_value};

use super::load_app;

pub fn add(store: &StateStore, resource: &ResourceRef, name: &str, value: &str) -> Result<()> {
    let app = load_app(store, resource)?;
    validate_secret_name(name, &app.secrets)?;
    validate_secret_value(value)?;

    let name = name.trim();
    store.add_secret(
        &resource.key(),
        &Secret {
            name: name.to_string(),
            value: Some(value.to_string()),
        },
    )?;
    println!("✓ Added secret \"{name}\" to container app \"{resource}\"");
    Ok(())
}
