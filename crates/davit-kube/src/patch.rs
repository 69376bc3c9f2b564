//! Merge-patch computation
//!
//! Produces an RFC 7386 merge patch from a baseline manifest to a
//! target manifest. Objects are compared key by key; arrays and scalars
//! are replaced wholesale, and keys removed from the target map to
//! explicit nulls so the cluster drops them.

use serde::Serialize;
use serde_json::{Map, Value};

use davit_core::ResourceKind;

use crate::error::{DeployError, Result};

/// Compute the merge patch that transforms `baseline` into `target`.
///
/// Returns an empty object when the two manifests are identical, which
/// the cluster treats as a no-op.
pub fn merge_patch<T: Serialize>(kind: ResourceKind, baseline: &T, target: &T) -> Result<Value> {
    let baseline = serde_json::to_value(baseline).map_err(|e| DeployError::PatchCompute {
        kind,
        reason: format!("baseline not serializable: {e}"),
    })?;
    let target = serde_json::to_value(target).map_err(|e| DeployError::PatchCompute {
        kind,
        reason: format!("target not serializable: {e}"),
    })?;
    Ok(diff(&baseline, &target))
}

/// Whether a computed patch carries no changes.
pub fn is_empty(patch: &Value) -> bool {
    matches!(patch, Value::Object(m) if m.is_empty())
}

fn diff(base: &Value, target: &Value) -> Value {
    match (base, target) {
        (Value::Object(base), Value::Object(target)) => {
            let mut patch = Map::new();
            for (key, target_value) in target {
                match base.get(key) {
                    Some(base_value) if base_value == target_value => {}
                    Some(base_value) => {
                        patch.insert(key.clone(), diff(base_value, target_value));
                    }
                    None => {
                        patch.insert(key.clone(), target_value.clone());
                    }
                }
            }
            for key in base.keys() {
                if !target.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }
            Value::Object(patch)
        }
        // Arrays and scalars have no positional merge semantics.
        _ => target.clone(),
    }
}
