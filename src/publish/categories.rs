//! Category documents.

use crate::catalog::CategorySet;
use crate::pipeline::StatusTable;
use crate::publish::markdown::render_style_table;
use crate::types::safe_name;

/// Render one category: links to nested categories first, then a table per member
/// style that has an outcome. Members that are neither are dropped.
pub fn render_category(
    name: &str,
    members: &[String],
    categories: &CategorySet,
    table: &StatusTable,
) -> String {
    let mut links = String::new();
    let mut tables = String::new();
    for member in members {
        if categories.is_category(member) {
            links.push_str(&format!(
                "- [{}](/categories/{}.md)\n",
                member,
                safe_name(member)
            ));
        } else if let Some(outcome) = table.get(member) {
            tables.push_str(&render_style_table(member, outcome));
        }
    }

    let mut out = format!("# {}\n\n", name);
    out.push_str(&links);
    if !links.is_empty() && !tables.is_empty() {
        out.push('\n');
    }
    out.push_str(&tables);
    out
}
