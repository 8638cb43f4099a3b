//! Small helpers shared by the pipeline, plans and checks

use std::path::Path;

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Render a command line for display, quoting arguments that contain spaces
pub fn display_command<S: AsRef<str>>(program: &str, args: &[S]) -> String {
  let mut line = program.to_string();
  for arg in args {
    let arg = arg.as_ref();
    line.push(' ');
    if arg.is_empty() || arg.contains(char::is_whitespace) {
      line.push('"');
      line.push_str(arg);
      line.push('"');
    } else {
      line.push_str(arg);
    }
  }
  line
}

/// Human-readable byte size
pub fn format_size(bytes: u64) -> String {
  const KIB: f64 = 1024.0;
  let b = bytes as f64;
  if b < KIB {
    format!("{} B", bytes)
  } else if b < KIB * KIB {
    format!("{:.1} KiB", b / KIB)
  } else {
    format!("{:.1} MiB", b / (KIB * KIB))
  }
}
