//! JSON output formatting for machine-readable output.

use super::OutputConfig;
use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as JSON string
    ///
    /// Uses pretty-printing by default. When `config.compact` is true,
    /// outputs minified JSON on a single line.
    pub fn format<T: Serialize + ?Sized>(data: &T, config: &OutputConfig) -> String {
        if config.compact {
            serde_json::to_string(data).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string_pretty(data)
                .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[derive(Serialize)]
    struct Counts {
        notes: usize,
        tags: usize,
    }

    #[test]
    fn test_pretty_and_compact() {
        let data = Counts { notes: 2, tags: 3 };
        let pretty = JsonOutput::format(&data, &OutputConfig::new(OutputFormat::Json, false));
        assert!(pretty.contains('\n'));

        let compact = JsonOutput::format(&data, &OutputConfig::new(OutputFormat::Json, true));
        assert_eq!(compact, r#"{"notes":2,"tags":3}"#);
    }
}
