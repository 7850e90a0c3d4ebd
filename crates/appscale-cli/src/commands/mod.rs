pub mod app;
pub mod range;
pub mod rule;
pub mod secret;

use anyhow::Context;

use appscale_core::{ContainerApp, ResourceRef};
use appscale_state::StateStore;
use appscale_wizard::WizardResult;

fn load_app(store: &StateStore, resource: &ResourceRef) -> anyhow::Result<ContainerApp> {
    store
        .get_container_app(&resource.key())?
        .with_context(|| format!("container app {resource} not found"))
}

/// A cancelled wizard is not a failure.
fn finish(result: WizardResult<()>) -> anyhow::Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_cancelled() => {
            println!("Cancelled.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
