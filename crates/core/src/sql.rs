//! Helpers for embedded SQL schema files.

/// Split a schema script into executable statements.
///
/// Statements are separated by `;`. Fragments holding only whitespace or
/// `--` comments are dropped. Semicolons inside string literals are not
/// supported.
pub fn schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}
