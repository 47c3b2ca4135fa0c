// src/extract/mod.rs
use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use tracing::debug;

static UPPER_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.)([A-Z][a-z]+)").unwrap());
static LOWER_UPPER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Turn a display column header into a lowercase_underscore key.
/// `"MeyerLemons"` becomes `meyer_lemons`, `"Price($)"` becomes `price`.
pub fn to_snake_case(name: &str) -> String {
    let s = UPPER_RUN_RE.replace_all(name, "${1}_${2}");
    let s = LOWER_UPPER_RE.replace_all(&s, "${1}_${2}").to_lowercase();
    NON_WORD_RE
        .replace_all(&s, "_")
        .trim_matches('_')
        .to_string()
}

fn cell_text(cell: scraper::ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Locate the first `<table>` in the document and convert its rows into
/// header-keyed mappings. Rows whose cell count does not match the header
/// are dropped; a missing table is an error since it means the page layout
/// changed underneath us.
pub fn extract_table(html: &str) -> Result<Vec<BTreeMap<String, String>>> {
    let table_sel = Selector::parse("table").expect("selector should parse");
    let th_sel = Selector::parse("th").expect("selector should parse");
    let tr_sel = Selector::parse("tr").expect("selector should parse");
    let td_sel = Selector::parse("td").expect("selector should parse");

    let document = Html::parse_document(html);
    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| anyhow!("no table found on the page; the site layout may have changed"))?;

    let headers: Vec<String> = table
        .select(&th_sel)
        .map(|th| to_snake_case(&cell_text(th)))
        .collect();
    debug!(?headers, "parsed table headers");

    let mut rows = Vec::new();
    for tr in table.select(&tr_sel).skip(1) {
        let cells: Vec<String> = tr.select(&td_sel).map(cell_text).collect();
        if cells.len() != headers.len() {
            debug!(
                cells = cells.len(),
                headers = headers.len(),
                "dropping row with mismatched cell count"
            );
            continue;
        }
        rows.push(headers.iter().cloned().zip(cells).collect());
    }

    Ok(rows)
}
