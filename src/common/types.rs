/// One data row of an extracted table.
///
/// Only the first three grid cells are kept: the major label, the minor
/// label and the value. Absent cells (missing or blank text) are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub label: Option<String>,
    pub sublabel: Option<String>,
    pub value: Option<String>,
}

impl TableRow {
    pub fn new(label: Option<&str>, sublabel: Option<&str>, value: Option<&str>) -> Self {
        Self {
            label: label.and_then(present),
            sublabel: sublabel.and_then(present),
            value: value.and_then(present),
        }
    }

    /// Build a row from the leading cells of a grid row, padding short rows.
    pub fn from_cells(cells: &[Option<String>]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().flatten().and_then(|s| present(&s));
        Self {
            label: cell(0),
            sublabel: cell(1),
            value: cell(2),
        }
    }
}

/// All data rows of one `<table>`, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn present(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
