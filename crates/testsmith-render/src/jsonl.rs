use serde::Serialize;
use std::io::Write;
use testsmith_core::{FunctionSpan, FunctionTable};

/// Writes located functions as JSONL: a header line, one line per function,
/// and a footer with totals.
pub struct JsonlWriter {
    source: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Header<'a> {
    version: &'a str,
    source: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct FunctionEntry<'a> {
    path: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver: Option<&'a str>,
    kind: &'a str,
    start: usize,
    end: usize,
    start_line: usize,
    end_line: usize,
    shadowed: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Footer {
    total_files: usize,
    total_functions: usize,
    failed_files: usize,
}

/// One file's worth of located functions.
pub struct FileFunctions<'a> {
    pub path: &'a str,
    pub table: &'a FunctionTable,
}

impl JsonlWriter {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
        }
    }

    pub fn render(&self, files: &[FileFunctions<'_>], failed: usize) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, files, failed)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Functions are written in source order; shadowed duplicates follow the
    /// surviving entries of their file with `Shadowed: true`.
    pub fn write_to(
        &self,
        writer: &mut dyn Write,
        files: &[FileFunctions<'_>],
        failed: usize,
    ) -> anyhow::Result<()> {
        let header = Header {
            version: "1",
            source: &self.source,
        };
        serde_json::to_writer(&mut *writer, &header)?;
        writeln!(writer)?;

        let mut total_functions = 0usize;
        for file in files {
            let live = file.table.in_source_order().into_iter().map(|s| (s, false));
            let shadowed = file.table.collisions().iter().map(|s| (s, true));
            for (span, is_shadowed) in live.chain(shadowed) {
                serde_json::to_writer(&mut *writer, &entry(file.path, span, is_shadowed))?;
                writeln!(writer)?;
            }
            total_functions += file.table.len();
        }

        let footer = Footer {
            total_files: files.len(),
            total_functions,
            failed_files: failed,
        };
        serde_json::to_writer(&mut *writer, &footer)?;
        writeln!(writer)?;

        Ok(())
    }
}

fn entry<'a>(path: &'a str, span: &'a FunctionSpan, shadowed: bool) -> FunctionEntry<'a> {
    FunctionEntry {
        path,
        name: &span.name,
        receiver: span.receiver.as_deref(),
        kind: span.kind.as_str(),
        start: span.start,
        end: span.end,
        start_line: span.start_line,
        end_line: span.end_line,
        shadowed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testsmith_core::FunctionKind;

    fn span(name: &str, receiver: Option<&str>, start: usize) -> FunctionSpan {
        FunctionSpan {
            name: name.to_string(),
            receiver: receiver.map(str::to_string),
            kind: if receiver.is_some() {
                FunctionKind::Method
            } else {
                FunctionKind::Function
            },
            start,
            end: start + 10,
            start_line: 1,
            end_line: 2,
        }
    }

    fn lines(output: &str) -> Vec<serde_json::Value> {
        output
            .trim()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn header_entries_footer() {
        let mut table = FunctionTable::new();
        table.insert(span("Sub", None, 50));
        table.insert(span("Add", None, 0));

        let out = JsonlWriter::new("functions")
            .render(
                &[FileFunctions {
                    path: "math.go",
                    table: &table,
                }],
                0,
            )
            .unwrap();
        let rows = lines(&out);
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0]["Version"], "1");
        assert_eq!(rows[0]["Source"], "functions");

        // source order, not name order
        assert_eq!(rows[1]["Name"], "Add");
        assert_eq!(rows[2]["Name"], "Sub");
        assert_eq!(rows[1]["Path"], "math.go");
        assert_eq!(rows[1]["Kind"], "function");
        assert!(rows[1].get("Receiver").is_none());

        assert_eq!(rows[3]["TotalFiles"], 1);
        assert_eq!(rows[3]["TotalFunctions"], 2);
        assert_eq!(rows[3]["FailedFiles"], 0);
    }

    #[test]
    fn shadowed_entries_are_flagged() {
        let mut table = FunctionTable::new();
        table.insert(span("String", Some("A"), 0));
        table.insert(span("String", Some("B"), 40));

        let out = JsonlWriter::new("functions")
            .render(
                &[FileFunctions {
                    path: "s.go",
                    table: &table,
                }],
                2,
            )
            .unwrap();
        let rows = lines(&out);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1]["Receiver"], "B");
        assert_eq!(rows[1]["Shadowed"], false);
        assert_eq!(rows[2]["Receiver"], "A");
        assert_eq!(rows[2]["Shadowed"], true);
        assert_eq!(rows[3]["TotalFunctions"], 1);
        assert_eq!(rows[3]["FailedFiles"], 2);
    }

    #[test]
    fn empty_input_has_header_and_footer() {
        let out = JsonlWriter::new("functions").render(&[], 0).unwrap();
        assert_eq!(lines(&out).len(), 2);
    }
}
