use anyhow::{bail, Result};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use super::Table;

/// Outer-join tables on their first column.
///
/// The output starts with every column of the first table, followed by the
/// non-key columns of each later table. Rows are ordered by key; a key
/// missing from a table gets empty cells for that table's columns. When a
/// table repeats a key, its first row wins.
pub fn outer_join(tables: Vec<Table>) -> Result<Table> {
    let mut tables = tables.into_iter();
    let Some(first) = tables.next() else {
        return Ok(Table::default());
    };
    let Some(key) = first.columns.first().cloned() else {
        bail!("cannot join a table without columns");
    };

    let mut columns = first.columns.clone();
    let mut rows: BTreeMap<String, Vec<String>> = BTreeMap::new();
    insert_rows(&mut rows, &key, 0, first);

    for table in tables {
        if table.columns.first() != Some(&key) {
            bail!(
                "table keyed on {:?} cannot join on {}",
                table.columns.first(),
                key
            );
        }
        let width = columns.len();
        columns.extend(table.columns.iter().skip(1).cloned());
        insert_rows(&mut rows, &key, width, table);
        for row in rows.values_mut() {
            row.resize(columns.len(), String::new());
        }
    }

    Ok(Table {
        columns,
        rows: rows.into_values().collect(),
    })
}

/// Append `table`'s non-key cells to the row of each key. New keys start as
/// `width` cells holding only the key.
fn insert_rows(rows: &mut BTreeMap<String, Vec<String>>, key: &str, width: usize, table: Table) {
    let mut seen = HashSet::new();
    for mut row in table.rows {
        if row.is_empty() {
            continue;
        }
        let subject = row[0].clone();
        if !seen.insert(subject.clone()) {
            warn!(%key, %subject, "duplicate row, keeping the first");
            continue;
        }
        let entry = rows.entry(subject.clone()).or_insert_with(|| {
            let mut fresh = vec![String::new(); width.max(1)];
            fresh[0] = subject;
            fresh
        });
        if width == 0 {
            // first table: the row is the whole record
            *entry = row;
        } else {
            entry.resize(width, String::new());
            entry.extend(row.drain(1..));
        }
    }
}
