// CSV side of the importer: turns a spreadsheet export into recipe records
// and drops the rows that have no recipe name.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ImportError, Result};

/// Header names that identify a recipe row.
pub const NAME_COLUMNS: [&str; 2] = ["Name", "Recipe Name"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One CSV data row, keyed by header in header order.
///
/// Columns missing from a short row are `None` and serialize as `null`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecipeRecord(IndexMap<String, Option<String>>);

impl RecipeRecord {
    /// Pair a data row with the header row. Cells past the header width are
    /// dropped; a repeated header keeps its first position and last value.
    pub fn from_row(headers: &StringRecord, row: &StringRecord) -> Self {
        if row.len() > headers.len() {
            warn!(
                line = row.position().map(|p| p.line()),
                extra = row.len() - headers.len(),
                "row has more cells than the header, dropping the extra cells"
            );
        }
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.to_string(), row.get(i).map(str::to_string)))
            .collect();
        RecipeRecord(fields)
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).and_then(|v| v.as_deref())
    }

    /// Presence check: `Name` or `Recipe Name` holds a non-empty value.
    pub fn has_name(&self) -> bool {
        NAME_COLUMNS
            .iter()
            .any(|column| self.get(column).is_some_and(|v| !v.is_empty()))
    }
}

#[cfg(test)]
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecipeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RecipeRecord(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

/// Rewrite `\r\n` and lone `\r` as `\n`, the way a text-mode read does, so
/// multi-line cells from Windows exports carry plain newlines.
fn normalize_newlines(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.contains(&b'\r') {
        return Cow::Borrowed(bytes);
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(b) = iter.next() {
        if b == b'\r' {
            iter.next_if_eq(&b'\n');
            out.push(b'\n');
        } else {
            out.push(b);
        }
    }
    Cow::Owned(out)
}

/// Parse every data row of a CSV document. The first row is the header.
/// Line endings are normalized first; uneven rows are accepted rather than
/// rejected.
pub fn read_records<R: Read>(mut input: R) -> Result<Vec<RecipeRecord>> {
    let mut raw = Vec::new();
    input.read_to_end(&mut raw).map_err(csv::Error::from)?;
    let text = normalize_newlines(&raw);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(&*text);
    let headers = reader.headers()?.clone();
    debug!(columns = headers.len(), "parsed CSV header");

    let mut records = Vec::new();
    for row in reader.records() {
        records.push(RecipeRecord::from_row(&headers, &row?));
    }
    Ok(records)
}

/// Parse a CSV document and keep only the rows that pass the presence check.
pub fn read_recipes<R: Read>(input: R) -> Result<Vec<RecipeRecord>> {
    let records = read_records(input)?;
    let total = records.len();
    let recipes: Vec<_> = records.into_iter().filter(RecipeRecord::has_name).collect();
    debug!(total, kept = recipes.len(), "filtered rows without a recipe name");
    Ok(recipes)
}

/// Read a CSV file from disk, strip a leading byte-order mark and return the
/// named recipe rows.
pub fn load_recipes(path: &Path) -> Result<Vec<RecipeRecord>> {
    let bytes = std::fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    read_recipes(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(csv: &str) -> Vec<RecipeRecord> {
        read_recipes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn keeps_rows_with_either_name_column() {
        let csv = "Name,Recipe Name,Meal\n\
                   Pancakes,,Breakfast\n\
                   ,Chili,Dinner\n\
                   ,,Lunch\n\
                   Soup,Soup,Dinner\n";
        let recipes = parse(csv);
        assert_eq!(recipes.len(), 3);
        assert_eq!(recipes[0].get("Name"), Some("Pancakes"));
        assert_eq!(recipes[1].get("Recipe Name"), Some("Chili"));
        assert_eq!(recipes[2].get("Meal"), Some("Dinner"));
    }

    #[test]
    fn empty_names_are_excluded_even_with_other_columns() {
        let csv = "Name,Recipe Name,Ingredients,Notes\n,,\"flour\neggs\",tasty\n";
        assert!(parse(csv).is_empty());
    }

    #[test]
    fn files_without_name_columns_yield_nothing() {
        let csv = "Title,Servings\nToast,1\n";
        assert!(parse(csv).is_empty());
    }

    #[test]
    fn zero_and_whitespace_count_as_present() {
        let csv = "Name\n0\nfalse\n \n";
        assert_eq!(parse(csv).len(), 3);
    }

    #[test]
    fn short_rows_fill_missing_columns_with_null() {
        let records = read_records("Name,Servings,Notes\nToast\n".as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Name"), Some("Toast"));
        assert_eq!(records[0].get("Servings"), None);
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Name": "Toast", "Servings": null, "Notes": null})
        );
    }

    #[test]
    fn long_rows_drop_extra_cells() {
        let records = read_records("Name,Servings\nToast,1,extra,more\n".as_bytes()).unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json, serde_json::json!({"Name": "Toast", "Servings": "1"}));
    }

    #[test]
    fn crlf_inside_quoted_cells_becomes_newline() {
        let csv = "Name,Instructions\r\nToast,\"toast bread\r\nbutter it\"\r\n";
        let recipes = parse(csv);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].get("Instructions"), Some("toast bread\nbutter it"));
    }

    #[test]
    fn lone_carriage_returns_become_newlines() {
        let csv = "Name,Notes\rJam,\"sweet\rsticky\"\rToast,plain\r";
        let recipes = parse(csv);
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].get("Notes"), Some("sweet\nsticky"));
        assert_eq!(recipes[1].get("Name"), Some("Toast"));
    }

    #[test]
    fn load_normalizes_windows_line_endings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFName,Notes\r\nStew,\"slow\r\ncook\"\r\n").unwrap();

        let recipes = load_recipes(file.path()).unwrap();
        assert_eq!(recipes[0].get("Name"), Some("Stew"));
        assert_eq!(recipes[0].get("Notes"), Some("slow\ncook"));
    }

    #[test]
    fn serialization_follows_header_order() {
        let records = read_records("Zeta,Name,Alpha\nz,Toast,a\n".as_bytes()).unwrap();
        let json = serde_json::to_string(&records[0]).unwrap();
        assert_eq!(json, r#"{"Zeta":"z","Name":"Toast","Alpha":"a"}"#);
    }

    #[test]
    fn quoted_fields_keep_commas_and_newlines() {
        let csv = "Name,Ingredients\n\"Mac, Cheese\",\"macaroni\ncheese\"\n";
        let recipes = parse(csv);
        assert_eq!(recipes[0].get("Name"), Some("Mac, Cheese"));
        assert_eq!(recipes[0].get("Ingredients"), Some("macaroni\ncheese"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let records = read_records("Name\nToast\n\nJam\n".as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(read_records("".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn load_strips_byte_order_mark() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xEF\xBB\xBFName,Servings\nToast,2\n").unwrap();

        let recipes = load_recipes(file.path()).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].get("Name"), Some("Toast"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.csv");
        let err = load_recipes(&missing).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn invalid_utf8_is_a_csv_error() {
        let err = read_recipes(&b"Name\n\xFF\xFE\n"[..]).unwrap_err();
        assert!(matches!(err, ImportError::Csv(_)));
    }

    #[test]
    fn collected_records_answer_presence_check() {
        let named: RecipeRecord = [("Recipe Name", "Stew")].into_iter().collect();
        let unnamed: RecipeRecord = [("Name", ""), ("Meal", "Dinner")].into_iter().collect();
        assert!(named.has_name());
        assert!(!unnamed.has_name());
    }
}
