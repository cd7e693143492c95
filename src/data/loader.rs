//! Delimited-file loading: sniff the delimiter, parse with the csv crate,
//! hand the viewer a rectangular grid of strings.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Delimiters tried by the sniffer, in tie-break order.
const CANDIDATES: [u8; 4] = [b'\t', b',', b';', b'|'];

/// Pick the delimiter from the first line: the candidate occurring most
/// often wins, ties resolved by `CANDIDATES` order. A line containing no
/// candidate at all yields a comma, which parses the file as one column.
pub fn sniff_delimiter(first_line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0usize;
    for &cand in &CANDIDATES {
        let count = first_line.bytes().filter(|&b| b == cand).count();
        if count > best_count {
            best = cand;
            best_count = count;
        }
    }
    debug!(target: "loader", "sniffed delimiter {:?} ({} hits)", best as char, best_count);
    best
}

/// Read `path` into row records. `delimiter` forces a delimiter; `None`
/// sniffs it from the first line. Bytes are decoded as UTF-8 with lossy
/// replacement, so a mis-encoded file still loads.
pub fn load_path(path: &Path, delimiter: Option<u8>) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let delimiter = delimiter
        .unwrap_or_else(|| sniff_delimiter(text.lines().next().unwrap_or_default()));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
        records.push(record.iter().map(str::to_string).collect());
    }
    if records.is_empty() {
        warn!(target: "loader", "{} contained no rows", path.display());
        anyhow::bail!("{} contains no rows", path.display());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn sniffs_tabs_over_commas() {
        assert_eq!(sniff_delimiter("a\tb\tc,d"), b'\t');
        assert_eq!(sniff_delimiter("a,b,c"), b',');
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("plain"), b',');
    }

    #[test]
    fn loads_comma_file() {
        let f = write_temp("name,qty\npear,10\napple,2\n");
        let records = load_path(f.path(), None).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec!["name", "qty"]);
        assert_eq!(records[2], vec!["apple", "2"]);
    }

    #[test]
    fn forced_delimiter_overrides_sniffing() {
        let f = write_temp("a,b|c,d\n1,2|3,4\n");
        let records = load_path(f.path(), Some(b'|')).unwrap();
        assert_eq!(records[0], vec!["a,b", "c,d"]);
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let f = write_temp("a,b,c\n1\n2,3\n");
        let records = load_path(f.path(), None).unwrap();
        assert_eq!(records[1], vec!["1"]);
        assert_eq!(records[2], vec!["2", "3"]);
    }

    #[test]
    fn quoted_cells_keep_embedded_delimiters() {
        let f = write_temp("a,b\n\"x,y\",2\n");
        let records = load_path(f.path(), None).unwrap();
        assert_eq!(records[1][0], "x,y");
    }

    #[test]
    fn empty_file_is_an_error() {
        let f = write_temp("");
        assert!(load_path(f.path(), None).is_err());
    }
}
