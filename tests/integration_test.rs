//! Integration tests for soxml
//!
//! These tests go through the public API only: build documents, write them
//! to disk or to strings and read them back.

use soxml::codec::{is_na, is_nan_not_na, na};
use soxml::document::So;
use soxml::matrix::Matrix;
use soxml::schema::{ColumnType, Delimiter, ValueType};
use soxml::table::{ColumnData, Table};
use soxml::SoError;
use std::fs;
use tempfile::tempdir;

fn id_time_table() -> Table {
    let mut table = Table::new("Predictions");
    table.set_number_of_rows(2).unwrap();
    table
        .new_column(
            "ID",
            &[ColumnType::Id],
            ValueType::Id,
            &ColumnData::Text(vec!["58".to_string(), "59".to_string()]),
        )
        .unwrap();
    table
        .new_column(
            "TIME",
            &[],
            ValueType::Real,
            &ColumnData::Real(vec![60.3, 72.3]),
        )
        .unwrap();
    table
}

/// Two inline rows, the first holding an id leaf and a `%f` real
#[test]
fn test_inline_table_rows() {
    let mut so = So::new();
    so.add_block("b")
        .unwrap()
        .set_table("Estimation/Predictions", id_time_table())
        .unwrap();

    let xml = so.to_xml_string(false).unwrap();
    assert_eq!(xml.matches("<ds:Row>").count(), 2);
    assert!(xml.contains("<ds:Row><ct:Id>58</ct:Id><ct:Real>60.300000</ct:Real></ds:Row>"));
    assert!(xml.contains(
        "<ds:Column columnId=\"ID\" columnType=\"id\" valueType=\"id\" columnNum=\"1\"/>"
    ));
}

/// NA and NaN stay distinct through a file round trip
#[test]
fn test_missing_values_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.SO.xml");

    let mut table = Table::new("MLE");
    table.set_number_of_rows(4).unwrap();
    table
        .new_column(
            "THETA",
            &[ColumnType::PopParameter],
            ValueType::Real,
            &ColumnData::Real(vec![na(), f64::NAN, 1.5, f64::NEG_INFINITY]),
        )
        .unwrap();
    table
        .new_column(
            "FIXED",
            &[ColumnType::Undefined],
            ValueType::Boolean,
            &ColumnData::Boolean(vec![true, false, false, true]),
        )
        .unwrap();

    let mut so = So::new();
    so.add_block("b")
        .unwrap()
        .set_table("Estimation/PopulationEstimates/MLE", table)
        .unwrap();
    so.write(&path, true).unwrap();

    let back = So::read(&path).unwrap();
    let table = back
        .block("b")
        .and_then(|b| b.table_at("Estimation/PopulationEstimates/MLE"))
        .unwrap();
    let theta = table.column(0).unwrap().reals().unwrap();
    assert!(is_na(theta[0]));
    assert!(is_nan_not_na(theta[1]));
    assert_eq!(theta[2], 1.5);
    assert_eq!(theta[3], f64::NEG_INFINITY);
    assert_eq!(
        table.column(1).unwrap().booleans().unwrap(),
        &[true, false, false, true]
    );
}

#[test]
fn test_matrix_round_trip() {
    let mut cov = Matrix::new("unnamed");
    cov.set_size(3, 2).unwrap();
    for (i, name) in ["CL", "V", "KA"].iter().enumerate() {
        cov.set_row_name(i, *name).unwrap();
    }
    cov.set_column_name(0, "CL").unwrap();
    cov.set_column_name(1, "V").unwrap();
    for i in 0..3 {
        for j in 0..2 {
            cov.set(i, j, (i * 10 + j) as f64 / 4.0).unwrap();
        }
    }

    let mut so = So::new();
    so.add_block("b")
        .unwrap()
        .set_matrix(
            "Estimation/PrecisionPopulationEstimates/MLE/CovarianceMatrix",
            cov.clone(),
        )
        .unwrap();

    let back = So::from_xml_str(&so.to_xml_string(true).unwrap()).unwrap();
    let read = back
        .block("b")
        .and_then(|b| b.matrix_at("Estimation/PrecisionPopulationEstimates/MLE/CovarianceMatrix"))
        .unwrap();
    assert_eq!(read.name(), "CovarianceMatrix");
    assert_eq!(read.row_names(), cov.row_names());
    assert_eq!(read.column_names(), cov.column_names());
    assert_eq!(read.data(), cov.data());
}

/// The sibling file has one line per row and one field per column
#[test]
fn test_external_file_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.SO.xml");

    let mut table = id_time_table();
    table
        .new_column(
            "DV",
            &[ColumnType::Dv],
            ValueType::Real,
            &ColumnData::Real(vec![1.0, na()]),
        )
        .unwrap();
    table.use_external_file("pred", "pred.csv", Delimiter::Comma);

    let mut so = So::new();
    so.add_block("b")
        .unwrap()
        .set_table("Estimation/Predictions", table)
        .unwrap();
    so.write(&path, false).unwrap();

    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<ds:ExternalFile oid=\"pred\"><ds:path>pred.csv</ds:path><ds:format>CSV</ds:format><ds:delimiter>COMMA</ds:delimiter></ds:ExternalFile>"));
    assert!(!xml.contains("<ds:Table>"));

    let csv = fs::read_to_string(dir.path().join("pred.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    for line in &lines {
        assert_eq!(line.split(',').count(), 3);
    }
    assert_eq!(lines[0], "58,60.300000,1.000000");
    // Plain numeric text in the data file, no NA leaf
    assert_eq!(lines[1], "59,72.300000,nan");
}

#[test]
fn test_value_types_are_enforced() {
    let mut table = id_time_table();
    let time = table.column_mut(1).unwrap();
    assert!(matches!(
        time.append_string("x"),
        Err(SoError::TypeMismatch { .. })
    ));
    assert!(matches!(
        time.append_int(3),
        Err(SoError::TypeMismatch { .. })
    ));
    time.append_real(80.0).unwrap();

    let err = table
        .new_column(
            "DV",
            &[ColumnType::Dv],
            ValueType::Int,
            &ColumnData::Real(vec![1.0, 2.0]),
        )
        .unwrap_err();
    assert!(matches!(err, SoError::TypeMismatch { .. }));
}

#[test]
fn test_merge_documents_on_disk() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.SO.xml");
    let second = dir.path().join("second.SO.xml");

    let mut so = So::new();
    so.add_block("estim")
        .unwrap()
        .set_leaf("Estimation/Likelihood/Deviance", "-120.5")
        .unwrap();
    so.write(&first, true).unwrap();

    let mut other = So::new();
    other
        .add_block("sim")
        .unwrap()
        .push_element("Simulation/SimulationBlock")
        .unwrap()
        .push_table("SimulatedProfiles", id_time_table())
        .unwrap();
    other.write(&second, true).unwrap();

    let mut merged = So::read(&first).unwrap();
    assert_eq!(merged.merge(So::read(&second).unwrap()), 1);
    merged.write(&first, true).unwrap();

    let back = So::read(&first).unwrap();
    let ids: Vec<_> = back.blocks().filter_map(|b| b.blk_id()).collect();
    assert_eq!(ids, vec!["estim", "sim"]);
    let profiles = back
        .block("sim")
        .and_then(|b| b.table_at("Simulation/SimulationBlock/SimulatedProfiles"))
        .unwrap();
    assert_eq!(profiles.num_rows(), 2);
}

#[test]
fn test_read_missing_file() {
    let dir = tempdir().unwrap();
    let err = So::read(dir.path().join("absent.SO.xml")).unwrap_err();
    assert!(matches!(err, SoError::Io(_)));
    assert!(soxml::last_error().is_some());
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn real() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => (-1_000_000i32..1_000_000).prop_map(|v| v as f64 / 1000.0),
            1 => Just(na()),
            1 => Just(f64::NAN),
        ]
    }

    proptest! {
        /// Inline tables survive serialization with every cell intact
        #[test]
        fn test_table_roundtrip(
            rows in prop::collection::vec(
                (real(), any::<i32>(), "[A-Za-z0-9_.]{1,12}", any::<bool>()),
                1..30,
            )
        ) {
            let reals: Vec<f64> = rows.iter().map(|r| r.0).collect();
            let ints: Vec<i64> = rows.iter().map(|r| r.1 as i64).collect();
            let texts: Vec<String> = rows.iter().map(|r| r.2.clone()).collect();
            let flags: Vec<bool> = rows.iter().map(|r| r.3).collect();

            let mut table = Table::new("t");
            table.set_number_of_rows(rows.len()).unwrap();
            table.new_column("R", &[ColumnType::Dv], ValueType::Real, &ColumnData::Real(reals.clone())).unwrap();
            table.new_column("I", &[ColumnType::Covariate], ValueType::Int, &ColumnData::Int(ints.clone())).unwrap();
            table.new_column("S", &[ColumnType::Id], ValueType::String, &ColumnData::Text(texts.clone())).unwrap();
            table.new_column("B", &[ColumnType::Undefined], ValueType::Boolean, &ColumnData::Boolean(flags.clone())).unwrap();

            let mut so = So::new();
            so.add_block("b").unwrap().set_table("Estimation/Predictions", table).unwrap();
            let back = So::from_xml_str(&so.to_xml_string(false).unwrap()).unwrap();
            let table = back.block("b").and_then(|b| b.table_at("Estimation/Predictions")).unwrap();

            prop_assert_eq!(table.num_rows(), rows.len());
            for (read, expected) in table.column(0).unwrap().reals().unwrap().iter().zip(&reals) {
                prop_assert_eq!(read.to_bits(), expected.to_bits());
            }
            prop_assert_eq!(table.column(1).unwrap().ints().unwrap(), &ints[..]);
            prop_assert_eq!(table.column(2).unwrap().strings().unwrap(), &texts[..]);
            prop_assert_eq!(table.column(3).unwrap().booleans().unwrap(), &flags[..]);
        }
    }
}
