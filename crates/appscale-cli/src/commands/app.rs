use std::fmt::Write as _;

use anyhow::{Result, bail};

use appscale_core::{ContainerApp, ResourceRef};
use appscale_state::StateStore;

use super::load_app;
use super::rule::format_rule;

pub fn create(store: &StateStore, resource: &ResourceRef) -> Result<()> {
    if store.get_container_app(&resource.key())?.is_some() {
        bail!("container app {resource} already exists");
    }
    store.put_container_app(&ContainerApp::new(&resource.resource_group, &resource.name))?;
    println!("✓ Created container app {resource}");
    Ok(())
}

pub fn show(store: &StateStore, resource: &ResourceRef, format: &str) -> Result<()> {
    let app = load_app(store, resource)?.redacted();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&app)?),
        _ => print!("{}", format_app(&app)),
    }
    Ok(())
}

pub fn list(store: &StateStore) -> Result<()> {
    let apps = store.list_container_apps()?;
    if apps.is_empty() {
        println!("No container apps.");
    }
    for app in &apps {
        println!(
            "{:<40} rules={} secrets={}",
            app.table_key(),
            app.rules().len(),
            app.secrets.len()
        );
    }
    Ok(())
}

pub fn delete(store: &StateStore, resource: &ResourceRef) -> Result<()> {
    if !store.delete_container_app(&resource.key())? {
        bail!("container app {resource} not found");
    }
    println!("✓ Deleted container app {resource}");
    Ok(())
}

/// Multi-line summary: replica range, secret names, then one line per rule.
pub fn format_app(app: &ContainerApp) -> String {
    let scale = &app.template.scale;
    let mut out = String::new();
    let _ = writeln!(out, "{}", app.table_key());

    match (scale.min_replicas, scale.max_replicas) {
        (None, None) => {
            let _ = writeln!(out, "  replicas: default");
        }
        (min, max) => {
            let bound = |b: Option<u32>| b.map_or_else(|| "-".to_string(), |b| b.to_string());
            let _ = writeln!(out, "  replicas: {}-{}", bound(min), bound(max));
        }
    }

    let secrets: Vec<&str> = app.secret_names().collect();
    if secrets.is_empty() {
        let _ = writeln!(out, "  secrets:  (none)");
    } else {
        let _ = writeln!(out, "  secrets:  {}", secrets.join(", "));
    }

    if app.rules().is_empty() {
        let _ = writeln!(out, "  rules:    (none)");
    } else {
        let _ = writeln!(out, "  rules:");
        for rule in app.rules() {
            let _ = writeln!(out, "    {}", format_rule(rule));
        }
    }
    out
}
