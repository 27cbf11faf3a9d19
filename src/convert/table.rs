//! Table branch of the Markdown converter.

use kuchiki::NodeRef;

use super::dom::{element_name, elements, stripped_text};

/// Render a `<table>` element as a pipe table.
///
/// The first `<tr>` supplies the header cells; a `---` separator follows with
/// one column per header cell, then one line per remaining row. Rows of a
/// nested table are not rows of this one; their text stays in the cell that
/// holds them. Returns `None` when the table has no rows so the caller can
/// leave it in place.
pub fn table_to_markdown(table: &NodeRef) -> Option<String> {
    let rows: Vec<NodeRef> = elements(table, "tr")
        .into_iter()
        .filter(|row| owning_table(row).as_ref() == Some(table))
        .collect();
    let (header, body) = rows.split_first()?;

    let header_cells = row_cells(header);
    let mut out = String::new();
    out.push_str(&markdown_row(&header_cells));
    out.push('\n');
    out.push_str(&markdown_row(&vec!["---".to_string(); header_cells.len()]));
    out.push('\n');

    for row in body {
        out.push_str(&markdown_row(&row_cells(row)));
        out.push('\n');
    }
    Some(out)
}

fn owning_table(row: &NodeRef) -> Option<NodeRef> {
    row.ancestors()
        .find(|a| element_name(a).as_deref() == Some("table"))
}

fn row_cells(row: &NodeRef) -> Vec<String> {
    row.children()
        .filter(|cell| matches!(element_name(cell).as_deref(), Some("td" | "th")))
        .map(|cell| cell_text(&stripped_text(&cell)))
        .collect()
}

/// Keep a cell on one line and its pipes from splitting the column.
fn cell_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

fn markdown_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::convert::dom::parse;

    fn render(html: &str) -> Option<String> {
        let doc = parse(html);
        table_to_markdown(&elements(&doc, "table")[0])
    }

    #[test]
    fn test_header_separator_and_rows() {
        let md = render(
            "<table><tr><th>Name</th><th>Qty</th></tr>\
             <tr><td>Apple</td><td>3</td></tr>\
             <tr><td>Pear</td><td>5</td></tr></table>",
        )
        .unwrap();
        assert_eq!(
            md,
            "| Name | Qty |\n| --- | --- |\n| Apple | 3 |\n| Pear | 5 |\n"
        );
    }

    #[test]
    fn test_td_header_and_tbody() {
        let md = render("<table><tbody><tr><td>a</td><td>b</td></tr></tbody></table>").unwrap();
        assert_eq!(md, "| a | b |\n| --- | --- |\n");
    }

    #[test]
    fn test_table_without_rows() {
        assert_eq!(render("<table><caption>empty</caption></table>"), None);
    }

    #[test]
    fn test_cell_text_is_single_line() {
        let md = render("<table><tr><td>\n  one\n  two </td><td>a|b</td></tr></table>").unwrap();
        assert!(md.starts_with("| one two | a\\|b |\n"));
    }

    #[test]
    fn test_cell_text_nodes_are_trimmed() {
        let md = render("<table><tr><td> <b>Total</b> : 5 </td></tr></table>").unwrap();
        assert!(md.starts_with("| Total: 5 |\n"));
    }

    #[test]
    fn test_entities_in_cells_are_decoded() {
        let md = render("<table><tr><td>caf&eacute; &amp; cr&egrave;me</td></tr></table>").unwrap();
        assert!(md.starts_with("| café & crème |\n"));
    }

    #[test]
    fn test_nested_table_rows_stay_in_their_cell() {
        let md = render(
            "<table><tr><td>outer<table><tr><td>inner</td></tr></table></td></tr></table>",
        )
        .unwrap();
        assert_eq!(md, "| outerinner |\n| --- |\n");
    }

    fn unescaped_pipes(line: &str) -> usize {
        line.matches('|').count() - line.matches("\\|").count()
    }

    proptest! {
        #[test]
        fn table_has_one_line_per_row_plus_two(
            columns in 1usize..6,
            rows in 0usize..8,
            cell in "[a-z0-9|]{0,6}( [a-z0-9|]{1,6})?",
        ) {
            let mut html = String::from("<table><tr>");
            for c in 0..columns {
                html.push_str(&format!("<th>h{c}</th>"));
            }
            html.push_str("</tr>");
            for _ in 0..rows {
                html.push_str("<tr>");
                for _ in 0..columns {
                    html.push_str(&format!("<td>{cell}</td>"));
                }
                html.push_str("</tr>");
            }
            html.push_str("</table>");

            let md = render(&html).unwrap();
            let lines: Vec<&str> = md.lines().collect();
            prop_assert_eq!(lines.len(), rows + 2);
            for line in lines {
                prop_assert_eq!(unescaped_pipes(line), columns + 1, "line: {}", line);
            }
        }
    }
}
