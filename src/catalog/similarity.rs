//! Pairwise game distances
//!
//! Square CSV: the header row and the first column both list titles, each cell
//! is a distance where lower means more alike.

use super::CatalogError;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    columns: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
}

impl SimilarityMatrix {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path.as_ref()).map_err(|source| CatalogError::Io {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let mut fields = record.iter();
            let title = fields.next().unwrap_or_default().to_string();
            let values = fields
                .map(|field| {
                    field.parse::<f64>().map_err(|_| CatalogError::Parse {
                        row: line + 2,
                        message: format!("not a number: {field:?}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push((title, values));
        }

        tracing::debug!(
            columns = columns.len(),
            rows = rows.len(),
            "Loaded similarity matrix"
        );
        Ok(Self { columns, rows })
    }

    pub fn contains(&self, title: &str) -> bool {
        self.columns.iter().any(|c| c == title)
    }

    /// The `limit` closest titles to `title`.
    ///
    /// The closest entry after sorting is the game itself and is skipped.
    pub fn closest(&self, title: &str, limit: usize) -> Result<Vec<&str>, CatalogError> {
        let column = self
            .columns
            .iter()
            .position(|c| c == title)
            .ok_or_else(|| CatalogError::UnknownTitle(title.to_string()))?;

        let mut distances: Vec<(&str, f64)> = self
            .rows
            .iter()
            .filter_map(|(row_title, values)| {
                values.get(column).map(|d| (row_title.as_str(), *d))
            })
            .collect();
        distances.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(distances
            .into_iter()
            .skip(1)
            .take(limit)
            .map(|(t, _)| t)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
,Chess,Go,Catan,Shogi
Chess,0.0,0.4,0.9,0.1
Go,0.4,0.0,0.8,0.3
Catan,0.9,0.8,0.0,0.7
Shogi,0.1,0.3,0.7,0.0
";

    #[test]
    fn closest_skips_self_and_orders_by_distance() {
        let matrix = SimilarityMatrix::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(matrix.closest("Chess", 5).unwrap(), vec!["Shogi", "Go", "Catan"]);
        assert_eq!(matrix.closest("Catan", 1).unwrap(), vec!["Shogi"]);
    }

    #[test]
    fn unknown_title_is_an_error() {
        let matrix = SimilarityMatrix::from_reader(CSV.as_bytes()).unwrap();
        assert!(matches!(
            matrix.closest("chess", 5),
            Err(CatalogError::UnknownTitle(t)) if t == "chess"
        ));
    }

    #[test]
    fn non_numeric_cell_reports_row() {
        let err = SimilarityMatrix::from_reader(",A\nA,zero\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { row: 2, .. }));
    }
}
