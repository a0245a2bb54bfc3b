//! CSV Data Loader Module
//! Handles CSV file loading and typed record extraction using Polars.

use polars::prelude::*;
use thiserror::Error;

use crate::data::StudentRecord;

/// Label text used when a categorical cell is empty.
const MISSING_MARKER: &str = "null";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Missing numeric value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
}

/// Handles CSV file loading with Polars for high performance.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        // Use lazy evaluation for memory efficiency, then collect
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Extract the survey columns of the loaded frame as typed records.
    pub fn records(&self) -> Result<Vec<StudentRecord>, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;
        extract_records(df)
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }
}

/// Pull the seven survey columns out of a frame. Extra columns are
/// ignored; an absent column or a null numeric cell is a load failure.
pub fn extract_records(df: &DataFrame) -> Result<Vec<StudentRecord>, LoaderError> {
    let age = int_column(df, "age")?;
    let walc = int_column(df, "Walc")?;
    let g3 = int_column(df, "G3")?;
    let absences = int_column(df, "absences")?;
    let schoolsup = text_column(df, "schoolsup")?;
    let famsup = text_column(df, "famsup")?;
    let higher = text_column(df, "higher")?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        records.push(StudentRecord {
            age: age[i],
            walc: walc[i],
            g3: g3[i],
            absences: absences[i],
            schoolsup: schoolsup[i].clone(),
            famsup: famsup[i].clone(),
            higher: higher[i].clone(),
        });
    }
    Ok(records)
}

fn int_column(df: &DataFrame, name: &str) -> Result<Vec<i64>, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
    let casted = column.cast(&DataType::Int64)?;
    let ca = casted.i64()?;

    let mut values = Vec::with_capacity(ca.len());
    for (row, value) in ca.into_iter().enumerate() {
        values.push(value.ok_or_else(|| LoaderError::MissingValue {
            column: name.to_string(),
            row,
        })?);
    }
    Ok(values)
}

/// Categorical cells keep their raw text; nulls become the literal
/// missing marker and count as their own category downstream.
fn text_column(df: &DataFrame, name: &str) -> Result<Vec<String>, LoaderError> {
    let column = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;

    let mut values = Vec::with_capacity(column.len());
    for i in 0..column.len() {
        let value = column.get(i)?;
        if value.is_null() {
            values.push(MISSING_MARKER.to_string());
        } else {
            values.push(value.to_string().trim_matches('"').to_string());
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn survey_frame() -> DataFrame {
        df!(
            "age" => [18i64, 19],
            "Walc" => [2i64, 4],
            "G3" => [10i64, 12],
            "absences" => [0i64, 3],
            "schoolsup" => ["yes", "no"],
            "famsup" => ["no", "yes"],
            "higher" => ["yes", "no"],
            "ignored" => ["a", "b"],
        )
        .unwrap()
    }

    #[test]
    fn extracts_typed_records() {
        let records = extract_records(&survey_frame()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].age, 18);
        assert_eq!(records[0].walc, 2);
        assert_eq!(records[0].schoolsup, "yes");
        assert_eq!(records[1].absences, 3);
        assert_eq!(records[1].higher, "no");
    }

    #[test]
    fn missing_column_is_a_load_failure() {
        let df = df!("age" => [18i64]).unwrap();
        match extract_records(&df) {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, "Walc"),
            other => panic!("expected missing column error, got {other:?}"),
        }
    }

    #[test]
    fn null_categorical_cell_becomes_marker() {
        let df = df!(
            "age" => [18i64],
            "Walc" => [2i64],
            "G3" => [10i64],
            "absences" => [0i64],
            "schoolsup" => [None::<&str>],
            "famsup" => [Some("no")],
            "higher" => [Some("yes")],
        )
        .unwrap();

        let records = extract_records(&df).unwrap();
        assert_eq!(records[0].schoolsup, "null");
        assert_eq!(records[0].famsup, "no");
    }

    #[test]
    fn null_numeric_cell_is_a_load_failure() {
        let df = df!(
            "age" => [Some(18i64), None],
            "Walc" => [Some(2i64), Some(3)],
            "G3" => [Some(10i64), Some(11)],
            "absences" => [Some(0i64), Some(1)],
            "schoolsup" => ["yes", "no"],
            "famsup" => ["no", "yes"],
            "higher" => ["yes", "yes"],
        )
        .unwrap();

        match extract_records(&df) {
            Err(LoaderError::MissingValue { column, row }) => {
                assert_eq!(column, "age");
                assert_eq!(row, 1);
            }
            other => panic!("expected missing value error, got {other:?}"),
        }
    }

    #[test]
    fn load_csv_reads_survey_file() {
        let path = std::env::temp_dir().join("surveyflow_loader_test.csv");
        std::fs::write(
            &path,
            "age,Walc,G3,absences,schoolsup,famsup,higher,extra\n\
             18,2,10,0,yes,no,yes,x\n\
             19,4,12,3,no,yes,no,y\n",
        )
        .unwrap();

        let mut loader = DataLoader::new();
        let df = loader.load_csv(path.to_str().unwrap()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(loader.get_row_count(), 2);

        let records = loader.records().unwrap();
        assert_eq!(records[0].schoolsup, "yes");
        assert_eq!(records[1].walc, 4);

        let _ = std::fs::remove_file(&path);
    }
}
