// src/report/render.rs
use crate::normalize::ProduceRecord;
use chrono::NaiveDateTime;

/// HTML table with {raw, price, origin} columns, or a "no items found"
/// placeholder when the group is empty.
pub fn build_table(records: &[ProduceRecord]) -> String {
    if records.is_empty() {
        return "<p>No items found.</p>".to_string();
    }

    let mut html = vec![r#"<table class="data-table">"#.to_string()];
    html.push("<tr>".to_string());
    for header in ["raw", "price", "origin"] {
        html.push(format!("<th>{}</th>", header));
    }
    html.push("</tr>".to_string());

    for record in records {
        html.push("<tr>".to_string());
        html.push(format!("<td>{}</td>", record.raw));
        html.push(format!("<td>{}</td>", record.price));
        html.push(format!("<td>{}</td>", record.origin));
        html.push("</tr>".to_string());
    }

    html.push("</table>".to_string());
    html.join("\n")
}

/// Substitute the three named placeholders into the template text.
pub fn render_report(
    template: &str,
    local: &[ProduceRecord],
    non_local: &[ProduceRecord],
    generated_at: NaiveDateTime,
) -> String {
    template
        .replace(
            "{timestamp}",
            &generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .replace("{local_table}", &build_table(local))
        .replace("{non_local_table}", &build_table(non_local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn record(raw: &str, price: f64, origin: &str) -> ProduceRecord {
        ProduceRecord {
            raw: raw.to_string(),
            item: raw.to_string(),
            price,
            origin: origin.to_string(),
            is_local: false,
            is_organic: String::new(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_group_renders_placeholder() {
        assert_eq!(build_table(&[]), "<p>No items found.</p>");
    }

    #[test]
    fn table_has_one_row_per_record() {
        let table = build_table(&[
            record("Kale - Organic", 3.99, "NY"),
            record("Leeks", 2.5, "NJ"),
        ]);
        assert!(table.starts_with(r#"<table class="data-table">"#));
        assert_eq!(table.matches("<tr>").count(), 3); // header + 2 rows
        assert!(table.contains("<td>Kale - Organic</td>"));
        assert!(table.contains("<td>2.5</td>"));
        assert!(table.contains("<td>NJ</td>"));
    }

    #[test]
    fn placeholders_substituted_verbatim() {
        let generated_at = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let html = render_report(
            "ts={timestamp}\nL={local_table}\nN={non_local_table}",
            &[record("Kale", 3.99, "NY")],
            &[],
            generated_at,
        );
        assert!(html.contains("ts=2025-01-02 03:04:05"));
        assert!(html.contains("<td>Kale</td>"));
        assert!(html.contains("N=<p>No items found.</p>"));
    }
}
