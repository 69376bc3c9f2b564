//! Per-kind lifecycle handlers
//!
//! Deployment, StatefulSet and Pod share the generic operation bodies
//! in [`ops`]; the StatefulSet handler layers its stuck-pod sweep on
//! top, and the ReplicaSet handler rejects every write outright.

mod deployment;
mod pod;
mod replica_set;
mod stateful_set;

pub use deployment::DeploymentHandler;
pub use pod::PodHandler;
pub use replica_set::ReplicaSetHandler;
pub use stateful_set::StatefulSetHandler;

pub(crate) mod ops {
    //! Generic operation bodies shared by the concrete handlers.
    //!
    //! Every function takes the `Api` handle the handler built for the
    //! target namespace. Not-found recovery is uniform: `update` and
    //! `patch` fall back to `create`, `delete` maps 404 to a verdict.

    use std::fmt::Debug;

    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use kube::Api;
    use kube::api::{DeleteParams, PostParams, PropagationPolicy};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use tracing::{debug, error};

    use davit_core::ResourceKind;

    use crate::error::{DeployError, Result, is_api_not_found};
    use crate::handler::Selector;
    use crate::status::ResourceStatus;
    use crate::waiter::{WaitConfig, wait_for_deletion};
    use crate::{patch, snapshot};

    pub(crate) trait ApiResource:
        Clone
        + Debug
        + Serialize
        + DeserializeOwned
        + k8s_openapi::Metadata<Ty = ObjectMeta>
        + Send
        + Sync
        + 'static
    {
    }

    impl<T> ApiResource for T where
        T: Clone
            + Debug
            + Serialize
            + DeserializeOwned
            + k8s_openapi::Metadata<Ty = ObjectMeta>
            + Send
            + Sync
            + 'static
    {
    }

    fn name_of<T: ApiResource>(kind: ResourceKind, resource: &T) -> Result<String> {
        resource
            .metadata()
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DeployError::Validation(format!("{kind} manifest has no name")))
    }

    pub(crate) async fn create<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        mut resource: T,
    ) -> Result<T> {
        let name = name_of(kind, &resource)?;
        snapshot::record(&mut resource)?;
        let created = api
            .create(&PostParams::default(), &resource)
            .await
            .map_err(|source| DeployError::CreateFailed { kind, source })?;
        debug!(kind = %kind, name = %name, "created resource");
        Ok(created)
    }

    pub(crate) async fn get<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        name: &str,
    ) -> Result<T> {
        match api.get(name).await {
            Ok(resource) => Ok(resource),
            Err(e) if is_api_not_found(&e) => Err(DeployError::NotFound {
                kind,
                name: name.to_string(),
            }),
            Err(source) => Err(DeployError::GetFailed { kind, source }),
        }
    }

    pub(crate) async fn get_by_selector<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        selector: &Selector,
    ) -> Result<Vec<T>> {
        let list = api
            .list(&selector.to_list_params())
            .await
            .map_err(|source| DeployError::GetFailed { kind, source })?;
        Ok(list.items)
    }

    pub(crate) async fn update<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        mut resource: T,
    ) -> Result<T> {
        let name = name_of(kind, &resource)?;
        let existing = match api.get(&name).await {
            Ok(existing) => existing,
            Err(e) if is_api_not_found(&e) => {
                debug!(kind = %kind, name = %name, "absent on update, creating instead");
                return create(kind, api, resource).await;
            }
            Err(source) => return Err(DeployError::GetFailed { kind, source }),
        };
        // Carry the concurrency token forward so the replace races
        // honestly against concurrent writers.
        resource.metadata_mut().resource_version = existing.metadata().resource_version.clone();
        snapshot::record(&mut resource)?;
        api.replace(&name, &PostParams::default(), &resource)
            .await
            .map_err(|source| DeployError::UpdateFailed { kind, source })
    }

    pub(crate) async fn patch<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        name: &str,
        mut target: T,
    ) -> Result<bool> {
        let existing = match api.get(name).await {
            Ok(existing) => existing,
            Err(e) if is_api_not_found(&e) => {
                debug!(kind = %kind, name = %name, "absent on patch, creating instead");
                create(kind, api, target).await?;
                return Ok(true);
            }
            Err(source) => return Err(DeployError::GetFailed { kind, source }),
        };
        let Some(baseline) = snapshot::last_applied(&existing)? else {
            // Never applied through this system: diffing against an
            // unknown baseline could clobber fields we do not own.
            debug!(kind = %kind, name = %name, "no applied snapshot, replacing wholesale");
            update(kind, api, target).await?;
            return Ok(true);
        };
        let changes = patch::merge_patch(kind, &baseline, &target)?;
        if patch::is_empty(&changes) {
            debug!(kind = %kind, name = %name, "target matches applied snapshot, nothing to patch");
            return Ok(false);
        }
        // The submitted patch also refreshes the snapshot annotation.
        snapshot::record(&mut target)?;
        let delta = patch::merge_patch(kind, &baseline, &target)?;
        api.patch(
            name,
            &kube::api::PatchParams::default(),
            &kube::api::Patch::Merge(&delta),
        )
        .await
        .map_err(|source| DeployError::PatchFailed { kind, source })?;
        Ok(true)
    }

    pub(crate) async fn delete<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        name: &str,
        wait: bool,
        wait_config: &WaitConfig,
    ) -> Result<ResourceStatus> {
        let params = DeleteParams {
            propagation_policy: Some(PropagationPolicy::Background),
            ..Default::default()
        };
        match api.delete(name, &params).await {
            Ok(_) => {}
            Err(e) if is_api_not_found(&e) => {
                debug!(kind = %kind, name = %name, "already absent on delete");
                return Ok(ResourceStatus::NotFound);
            }
            Err(source) => return Err(DeployError::DeleteFailed { kind, source }),
        }
        if wait {
            let probe_api = api.clone();
            wait_for_deletion(kind, vec![name.to_string()], wait_config, move |name| {
                let api = probe_api.clone();
                async move {
                    api.get_opt(&name)
                        .await
                        .map(|found| found.is_some())
                        .map_err(|source| DeployError::GetFailed { kind, source })
                }
            })
            .await?;
        }
        Ok(ResourceStatus::Done)
    }

    pub(crate) async fn delete_by_selector<T: ApiResource>(
        kind: ResourceKind,
        api: &Api<T>,
        selector: &Selector,
        wait: bool,
        wait_config: &WaitConfig,
    ) -> Result<bool> {
        let matched = match get_by_selector(kind, api, selector).await {
            Ok(matched) => matched,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(DeployError::GetFailed { source, .. }) if is_api_not_found(&source) => {
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if matched.is_empty() {
            return Ok(false);
        }

        // Delete sequentially; remember the first failure but keep
        // sweeping so one stuck resource does not strand the rest.
        let mut first_failure = None;
        for resource in &matched {
            let Some(name) = resource.metadata().name.as_deref() else {
                continue;
            };
            if let Err(e) = delete(kind, api, name, wait, wait_config).await {
                error!(kind = %kind, name = %name, error = %e, "delete failed during selector sweep");
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }
}
