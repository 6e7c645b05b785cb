use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::VecDeque;
use tracing::debug;

use crate::common::types::{Table, TableRow};

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should parse"));
static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("row selector should parse"));
static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n]+|\s{2,}").expect("whitespace regex should compile"));

/// Grid columns kept per row: label, sublabel, value
const ROW_WIDTH: usize = 3;
// Upper bounds HTML parsers apply to span attributes
const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

/// Turns a page body into row-major tables
pub trait Parser {
    fn parse(&self, html: &str) -> Vec<Table>;
}

/// Extracts every `<table>` of an HTML document, expanding row and column spans.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlTableParser;

impl Parser for HtmlTableParser {
    fn parse(&self, html: &str) -> Vec<Table> {
        extract_tables(html)
    }
}

/// Extract all tables in document order.
pub fn extract_tables(html: &str) -> Vec<Table> {
    let document = Html::parse_document(html);
    let tables: Vec<Table> = document.select(&TABLE_SELECTOR).map(extract_table).collect();
    debug!("Extracted {} tables", tables.len());
    tables
}

fn extract_table(table: ElementRef) -> Table {
    let rows: Vec<ElementRef> = table
        .select(&ROW_SELECTOR)
        .filter(|tr| owning_table(tr).map(|t| t.id()) == Some(table.id()))
        .collect();

    let has_thead = rows.iter().any(|tr| in_thead(tr, table));
    let mut body: VecDeque<ElementRef> = rows
        .into_iter()
        .filter(|tr| !in_thead(tr, table))
        .collect();

    // Without a <thead>, leading all-<th> rows are the header
    if !has_thead {
        while body.front().is_some_and(is_all_th) {
            body.pop_front();
        }
    }

    let body: Vec<ElementRef> = body.into_iter().collect();
    let rows = expand_spans(&body)
        .into_iter()
        .filter(|cells| cells.iter().any(Option::is_some))
        .map(|cells| TableRow::from_cells(&cells))
        .collect();

    Table::new(rows)
}

fn owning_table<'a>(tr: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    tr.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn in_thead(tr: &ElementRef, table: ElementRef) -> bool {
    for ancestor in tr.ancestors().filter_map(ElementRef::wrap) {
        if ancestor.id() == table.id() {
            return false;
        }
        if ancestor.value().name() == "thead" {
            return true;
        }
    }
    false
}

fn cells<'a>(tr: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

fn is_all_th(tr: &ElementRef) -> bool {
    let cells = cells(tr);
    !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th")
}

fn span(cell: &ElementRef, attr: &str, max: usize) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map_or(1, |n| n.min(max))
}

/// Collapse line breaks and whitespace runs to one space, then trim.
pub fn cell_text(cell: &ElementRef) -> Option<String> {
    let raw: String = cell.text().collect();
    let text = WHITESPACE_RUN.replace_all(&raw, " ");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Lay rows out on a grid, repeating spanned cells into every slot they cover.
/// Columns past [`ROW_WIDTH`] are never materialized.
fn expand_spans(rows: &[ElementRef]) -> Vec<Vec<Option<String>>> {
    struct Carry {
        column: usize,
        text: Option<String>,
        rows_left: usize,
    }

    fn take_carry(carry: Carry, texts: &mut Vec<Option<String>>, next: &mut VecDeque<Carry>) {
        texts.push(carry.text.clone());
        if carry.rows_left > 1 {
            next.push_back(Carry {
                rows_left: carry.rows_left - 1,
                ..carry
            });
        }
    }

    let mut grid = Vec::with_capacity(rows.len());
    let mut carried: VecDeque<Carry> = VecDeque::new();

    for tr in rows {
        let mut texts = Vec::new();
        let mut next: VecDeque<Carry> = VecDeque::new();
        let mut column = 0;

        for cell in cells(tr) {
            if column >= ROW_WIDTH {
                break;
            }
            while carried.front().is_some_and(|c| c.column <= column) {
                if let Some(carry) = carried.pop_front() {
                    take_carry(carry, &mut texts, &mut next);
                    column += 1;
                }
            }

            let text = cell_text(&cell);
            let rowspan = span(&cell, "rowspan", MAX_ROWSPAN);
            let colspan = span(&cell, "colspan", MAX_COLSPAN);
            for _ in 0..colspan.min(ROW_WIDTH.saturating_sub(column)) {
                texts.push(text.clone());
                if rowspan > 1 {
                    next.push_back(Carry {
                        column,
                        text: text.clone(),
                        rows_left: rowspan - 1,
                    });
                }
                column += 1;
            }
        }

        // Spans still pending sit after the last explicit cell
        while let Some(carry) = carried.pop_front() {
            take_carry(carry, &mut texts, &mut next);
        }

        texts.truncate(ROW_WIDTH);
        grid.push(texts);
        carried = next;
    }

    grid
}
