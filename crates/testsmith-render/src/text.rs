use std::fmt::Write;
use testsmith_core::FunctionTable;

/// Human-readable listing of one file's functions, in source order.
pub fn render_table(path: &str, table: &FunctionTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{path} ({} functions)", table.len());

    let width = table
        .iter()
        .map(|s| s.qualified_name().len())
        .max()
        .unwrap_or(0);
    for span in table.in_source_order() {
        let _ = writeln!(
            out,
            "  {:<width$}  {:<8}  lines {}-{}",
            span.qualified_name(),
            span.kind.as_str(),
            span.start_line,
            span.end_line,
        );
    }
    for span in table.collisions() {
        let _ = writeln!(
            out,
            "  warning: {} at line {} is shadowed by a later declaration",
            span.qualified_name(),
            span.start_line
        );
    }
    out
}
