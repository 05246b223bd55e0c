//! Pretty-printed JSON output with a configurable indent.

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::ExportError;

/// Indent used for the year-wise course maps.
pub const COURSE_MAP_INDENT: usize = 4;

/// Indent used for the faculty map.
pub const FACULTY_MAP_INDENT: usize = 2;

/// Serializes `value` as pretty JSON indented by `indent` spaces.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if `value` cannot be serialized.
pub fn to_json_pretty<T: Serialize + ?Sized>(
    value: &T,
    indent: usize,
) -> Result<String, ExportError> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `value` as pretty JSON to `path`, creating missing parent
/// directories.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be written or
/// [`ExportError::Json`] if `value` cannot be serialized.
pub fn write_json_pretty<T: Serialize + ?Sized>(
    value: &T,
    path: &Path,
    indent: usize,
) -> Result<(), ExportError> {
    let json = to_json_pretty(value, indent)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, json)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
