//! Last-applied configuration snapshots
//!
//! Before any create, update, or patch submission the declared manifest
//! is serialized and stashed in an annotation on the object itself. A
//! later patch diffs its target against this snapshot instead of the
//! live object, so cluster-written fields (status, managed fields,
//! defaulted values) never leak into the computed patch.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DeployError, Result};

/// Annotation key holding the serialized last-applied manifest.
pub const LAST_APPLIED_ANNOTATION: &str = "davit.io/last-applied-configuration";

/// Record the resource's current manifest as its last-applied snapshot.
///
/// The manifest is serialized before the annotation is inserted, so a
/// snapshot never contains itself and diffing two snapshots stays
/// stable across repeated applies.
pub fn record<T>(resource: &mut T) -> Result<()>
where
    T: k8s_openapi::Metadata<Ty = ObjectMeta> + Serialize,
{
    // A previously recorded snapshot must not leak into the new one,
    // e.g. on a manifest round-tripped through get.
    clear(resource);
    let serialized = serde_json::to_string(resource)?;
    resource
        .metadata_mut()
        .annotations
        .get_or_insert_with(Default::default)
        .insert(LAST_APPLIED_ANNOTATION.to_string(), serialized);
    Ok(())
}

/// Read back the last-applied snapshot, if one was recorded.
///
/// A present but unparseable snapshot is an error: silently diffing
/// against garbage would produce a garbage patch.
pub fn last_applied<T>(resource: &T) -> Result<Option<T>>
where
    T: k8s_openapi::Metadata<Ty = ObjectMeta> + DeserializeOwned,
{
    let Some(raw) = resource
        .metadata()
        .annotations
        .as_ref()
        .and_then(|a| a.get(LAST_APPLIED_ANNOTATION))
    else {
        return Ok(None);
    };
    let parsed = serde_json::from_str(raw)
        .map_err(|e| DeployError::Serialization(format!("invalid last-applied snapshot: {e}")))?;
    Ok(Some(parsed))
}

/// Remove the snapshot annotation. Returns whether one was present.
///
/// An annotation map left empty by the removal is dropped entirely, so
/// a cleared resource serializes identically to one never annotated.
pub fn clear<T>(resource: &mut T) -> bool
where
    T: k8s_openapi::Metadata<Ty = ObjectMeta>,
{
    let annotations = &mut resource.metadata_mut().annotations;
    let removed = annotations
        .as_mut()
        .and_then(|a| a.remove(LAST_APPLIED_ANNOTATION))
        .is_some();
    if annotations.as_ref().is_some_and(|a| a.is_empty()) {
        *annotations = None;
    }
    removed
}
