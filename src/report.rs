//! Tabular output of frequency tables
//!
//! Each table is written as CSV records: an empty record, a one-field record
//! naming the adverb label, then one `context,frequency` record per retained
//! context label.

use crate::stats::{ContextTable, FrequencyTables};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const LINE_TERMINATOR: &str = "\r\n";

/// File names of the preceding, same-level and next-level channels
pub const CHANNEL_FILES: [&str; 3] = ["prevs.csv", "sames.csv", "nexts.csv"];

/// Quote a field if it contains a delimiter, quote or line break
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format a frequency in plain decimal notation, keeping at least one
/// fractional digit
fn format_frequency(frequency: f64) -> String {
    let mut text = frequency.to_string();
    if frequency.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Write one table as CSV records
pub fn write_table<W: Write>(table: &ContextTable, out: &mut W) -> io::Result<()> {
    for row in &table.rows {
        write!(out, "{}", LINE_TERMINATOR)?;
        write!(out, "{}{}", quote(&row.label), LINE_TERMINATOR)?;
        for (context, frequency) in &row.entries {
            write!(
                out,
                "{},{}{}",
                quote(context),
                format_frequency(*frequency),
                LINE_TERMINATOR
            )?;
        }
    }
    Ok(())
}

/// Write the three tables into `dir`, returning the paths written
pub fn write_tables(tables: &FrequencyTables, dir: &Path) -> io::Result<Vec<PathBuf>> {
    let channels = [&tables.preceding, &tables.same_level, &tables.next_level];
    let mut written = Vec::with_capacity(channels.len());

    for (table, name) in channels.into_iter().zip(CHANNEL_FILES) {
        let path = dir.join(name);
        let mut out = BufWriter::new(File::create(&path)?);
        write_table(table, &mut out)?;
        out.flush()?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::LabelFrequencies;

    fn table() -> ContextTable {
        ContextTable {
            rows: vec![
                LabelFrequencies {
                    label: "ADVP-TMP".to_string(),
                    entries: vec![("S".to_string(), 0.5), ("VP".to_string(), 0.5)],
                },
                LabelFrequencies {
                    label: "ADVP".to_string(),
                    entries: vec![(",".to_string(), 1.0)],
                },
            ],
        }
    }

    #[test]
    fn test_write_table() {
        let mut out = Vec::new();
        write_table(&table(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\r\nADVP-TMP\r\nS,0.5\r\nVP,0.5\r\n\r\nADVP\r\n\",\",1.0\r\n"
        );
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("NP"), "NP");
        assert_eq!(quote(","), "\",\"");
        assert_eq!(quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote("''"), "''");
    }

    #[test]
    fn test_format_frequency() {
        assert_eq!(format_frequency(1.0), "1.0");
        assert_eq!(format_frequency(0.5), "0.5");
        assert_eq!(format_frequency(0.00001), "0.00001");
        assert_eq!(format_frequency(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_empty_table() {
        let mut out = Vec::new();
        write_table(&ContextTable::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }
}
