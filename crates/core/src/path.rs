//! Local path helpers

use std::path::Path;

use crate::error::{Error, Result};

/// Resolve the object key for an upload
///
/// An explicit, non-empty `object_name` wins; otherwise the key is the base
/// name of `local_path`.
pub fn object_key_for_upload(local_path: &Path, object_name: Option<&str>) -> Result<String> {
    if let Some(name) = object_name.filter(|n| !n.is_empty()) {
        return Ok(name.to_string());
    }

    local_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::InvalidPath(format!(
                "'{}' has no file name to use as the object key",
                local_path.display()
            ))
        })
}
