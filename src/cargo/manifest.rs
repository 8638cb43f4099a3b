//! Artifact naming from Cargo.toml
//!
//! Cargo names a binary after its `[[bin]]` target (default: the package name)
//! and a `cdylib` after the lib name with dashes turned into underscores. The
//! platform decides the extension.

use crate::core::error::{ToolchainError, WebpubResult};
use std::fs;
use std::path::Path;
use toml_edit::DocumentMut;

/// File name cargo produces for the crate at `root` when building for `target`
///
/// `package` (the `-p` argument) wins over anything the root manifest says, since
/// the root of a workspace need not be the package being built.
pub fn artifact_file_name(root: &Path, target: &str, package: Option<&str>) -> WebpubResult<String> {
  let stem = match package {
    Some(name) => name.to_string(),
    None => artifact_stem(root)?,
  };
  Ok(format!("{}{}", stem, artifact_suffix(target)))
}

/// Extension cargo uses for executables on `target`
pub fn artifact_suffix(target: &str) -> &'static str {
  if target.starts_with("wasm32-") || target.starts_with("wasm64-") {
    ".wasm"
  } else if target.contains("-windows") {
    ".exe"
  } else {
    ""
  }
}

/// Read the package name from the root manifest
pub fn package_name(root: &Path) -> WebpubResult<String> {
  let manifest_path = root.join("Cargo.toml");
  let doc = read_manifest(root)?;
  doc
    .get("package")
    .and_then(|p| p.get("name"))
    .and_then(|n| n.as_str())
    .map(str::to_string)
    .ok_or_else(|| {
      ToolchainError::Manifest {
        path: manifest_path,
        reason: "no [package] name".to_string(),
      }
      .into()
    })
}

fn artifact_stem(root: &Path) -> WebpubResult<String> {
  let manifest_path = root.join("Cargo.toml");
  let doc = read_manifest(root)?;

  let package = doc
    .get("package")
    .and_then(|p| p.get("name"))
    .and_then(|n| n.as_str())
    .ok_or_else(|| ToolchainError::Manifest {
      path: manifest_path.clone(),
      reason: "no [package] name (workspace roots need `build.package` or `build.artifact`)".to_string(),
    })?;

  let bins: Vec<&str> = doc
    .get("bin")
    .and_then(|b| b.as_array_of_tables())
    .map(|tables| tables.iter().filter_map(|t| t.get("name").and_then(|n| n.as_str())).collect())
    .unwrap_or_default();

  match bins.as_slice() {
    [single] => return Ok(single.to_string()),
    [] => {}
    _ => {
      return Err(
        ToolchainError::Manifest {
          path: manifest_path,
          reason: format!("multiple [[bin]] targets ({})", bins.join(", ")),
        }
        .into(),
      );
    }
  }

  let lib = doc.get("lib");
  let is_cdylib = lib
    .and_then(|l| l.get("crate-type"))
    .and_then(|c| c.as_array())
    .is_some_and(|types| types.iter().any(|t| t.as_str() == Some("cdylib")));

  if is_cdylib && !root.join("src").join("main.rs").exists() {
    let lib_name = lib
      .and_then(|l| l.get("name"))
      .and_then(|n| n.as_str())
      .unwrap_or(package);
    return Ok(lib_name.replace('-', "_"));
  }

  Ok(package.to_string())
}

fn read_manifest(root: &Path) -> WebpubResult<DocumentMut> {
  let manifest_path = root.join("Cargo.toml");
  let content = fs::read_to_string(&manifest_path).map_err(|e| ToolchainError::Manifest {
    path: manifest_path.clone(),
    reason: e.to_string(),
  })?;

  content.parse::<DocumentMut>().map_err(|e| {
    ToolchainError::Manifest {
      path: manifest_path,
      reason: e.to_string(),
    }
    .into()
  })
}
