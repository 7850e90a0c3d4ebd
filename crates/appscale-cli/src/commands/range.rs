use anyhow::Result;

use appscale_core::ResourceRef;
use appscale_state::StateStore;
use appscale_wizard::prompt::keys;
use appscale_wizard::{ScaleRangeContext, WizardEnv, edit_scale_range};

use super::finish;
use crate::progress::ConsoleProgress;
use crate::prompter::{DialoguerPrompter, PresetPrompter};

pub async fn edit(
    store: &StateStore,
    resource: ResourceRef,
    range: Option<String>,
    replica_ceiling: u32,
) -> Result<()> {
    let mut prompter =
        PresetPrompter::new(DialoguerPrompter::for_terminal()).preset(keys::SCALE_RANGE, range);

    let mut ctx = ScaleRangeContext::new(resource, replica_ceiling);
    let result = {
        let mut env = WizardEnv::new(store, &mut prompter, &ConsoleProgress);
        edit_scale_range(&mut ctx, &mut env).await
    };
    finish(result)
}
