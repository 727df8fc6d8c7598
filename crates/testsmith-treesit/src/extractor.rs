use testsmith_core::{ExtractError, ExtractedFunctions, FunctionTable, MatchPolicy};

/// Slice the source text of each requested function out of `source`.
///
/// Names absent from `table` are skipped and repeated names produce a single
/// entry. With [`MatchPolicy::RequireAny`] an empty result is an error.
pub fn extract_functions<S: AsRef<str>>(
    source: &str,
    table: &FunctionTable,
    requested: &[S],
    policy: MatchPolicy,
) -> Result<ExtractedFunctions, ExtractError> {
    let mut extracted = ExtractedFunctions::new();

    for name in requested {
        let name = name.as_ref();
        if extracted.contains_key(name) {
            continue;
        }
        let Some(span) = table.get(name) else {
            tracing::debug!(name, "requested function not found");
            continue;
        };
        let text = source
            .get(span.range())
            .ok_or_else(|| ExtractError::SpanOutOfBounds {
                name: span.name.clone(),
                start: span.start,
                end: span.end,
                len: source.len(),
            })?;
        extracted.insert(name.to_string(), text.to_string());
    }

    if extracted.is_empty() && policy == MatchPolicy::RequireAny {
        return Err(ExtractError::NotFound {
            requested: requested.iter().map(|n| n.as_ref().to_string()).collect(),
        });
    }

    Ok(extracted)
}

/// Extract every function in the table.
pub fn extract_all(source: &str, table: &FunctionTable) -> Result<ExtractedFunctions, ExtractError> {
    let names: Vec<&str> = table.names().collect();
    extract_functions(source, table, &names, MatchPolicy::AllowEmpty)
}
