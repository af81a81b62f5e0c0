use anyhow::{Context, Result};
use serde::Serialize;

pub struct OutputGenerator;

impl OutputGenerator {
    /// Renders records as JSON indented by four spaces, non-ASCII left as is.
    pub fn render_json<T: Serialize>(records: &[T]) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records
            .serialize(&mut serializer)
            .context("Failed to serialize folder records")?;
        String::from_utf8(buf).context("Serialized JSON is not UTF-8")
    }

    pub fn summary(folders: usize, files: usize) -> String {
        format!("{} folder(s), {} file(s)", folders, files)
    }
}
