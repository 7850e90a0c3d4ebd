//! Remote resource client used by the wizards.
//!
//! The wizards never hold on to remote state: they read what they need
//! through this trait right before using it. [`StateStore`] implements it
//! against the embedded redb store.

use async_trait::async_trait;
use tracing::debug;

use appscale_core::{ContainerApp, ResourceRef, ScaleRule, Secret};
use appscale_state::StateStore;

use crate::error::{ClientError, ClientResult};

#[async_trait]
pub trait ContainerAppClient: Send + Sync {
    async fn get_container_app(&self, resource: &ResourceRef) -> ClientResult<ContainerApp>;

    /// Current rule collection of the app's scale template.
    async fn get_scale_rules(&self, resource: &ResourceRef) -> ClientResult<Vec<ScaleRule>> {
        Ok(self.get_container_app(resource).await?.template.scale.rules)
    }

    /// Replace the whole rule collection in one update. Returns the
    /// refreshed container app.
    async fn update_scale_rules(
        &self,
        resource: &ResourceRef,
        rules: &[ScaleRule],
    ) -> ClientResult<ContainerApp>;

    async fn update_scale_range(
        &self,
        resource: &ResourceRef,
        min_replicas: u32,
        max_replicas: u32,
    ) -> ClientResult<ContainerApp>;

    async fn add_secret(&self, resource: &ResourceRef, secret: Secret) -> ClientResult<ContainerApp>;
}

#[async_trait]
impl ContainerAppClient for StateStore {
    async fn get_container_app(&self, resource: &ResourceRef) -> ClientResult<ContainerApp> {
        debug!(%resource, "fetching container app");
        StateStore::get_container_app(self, &resource.key())?
            .ok_or_else(|| ClientError::NotFound(resource.to_string()))
    }

    async fn update_scale_rules(
        &self,
        resource: &ResourceRef,
        rules: &[ScaleRule],
    ) -> ClientResult<ContainerApp> {
        Ok(StateStore::update_scale_rules(self, &resource.key(), rules)?)
    }

    async fn update_scale_range(
        &self,
        resource: &ResourceRef,
        min_replicas: u32,
        max_replicas: u32,
    ) -> ClientResult<ContainerApp> {
        Ok(StateStore::update_scale_range(
            self,
            &resource.key(),
            min_replicas,
            max_replicas,
        )?)
    }

    async fn add_secret(&self, resource: &ResourceRef, secret: Secret) -> ClientResult<ContainerApp> {
        Ok(StateStore::add_secret(self, &resource.key(), &secret)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appscale_core::{HttpScaleRule, ScaleTrigger};

    fn store_with_app() -> StateStore {
        let store = StateStore::open_in_memory().unwrap();
        store.put_container_app(&ContainerApp::new("rg", "api")).unwrap();
        store
    }

    #[tokio::test]
    async fn get_missing_app_is_not_found() {
        let store = StateStore::open_in_memory().unwrap();
        let client: &dyn ContainerAppClient = &store;
        let err = client
            .get_container_app(&ResourceRef::new("rg", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound(r) if r == "rg/nope"));
    }

    #[tokio::test]
    async fn update_then_get_scale_rules() {
        let store = store_with_app();
        let client: &dyn ContainerAppClient = &store;
        let resource = ResourceRef::new("rg", "api");
        let rule = ScaleRule {
            name: "http-scale".to_string(),
            trigger: ScaleTrigger::Http(HttpScaleRule {
                concurrent_requests: 50,
            }),
        };

        let refreshed = client
            .update_scale_rules(&resource, std::slice::from_ref(&rule))
            .await
            .unwrap();
        assert_eq!(refreshed.rules(), std::slice::from_ref(&rule));
        assert_eq!(client.get_scale_rules(&resource).await.unwrap(), vec![rule]);
    }

    #[tokio::test]
    async fn add_secret_on_missing_app_surfaces_state_error() {
        let store = StateStore::open_in_memory().unwrap();
        let client: &dyn ContainerAppClient = &store;
        let err = client
            .add_secret(
                &ResourceRef::new("rg", "nope"),
                Secret {
                    name: "s".to_string(),
                    value: Some("v".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::State(_)));
    }
}
