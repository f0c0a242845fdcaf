use super::*;
use crate::document::So;
use crate::error::SoError;
use crate::matrix::Matrix;
use crate::schema::{ColumnType, Delimiter, ValueType};
use crate::table::ColumnData;

fn id_time_table() -> Table {
    let mut table = Table::new("t");
    table.set_number_of_rows(2).unwrap();
    table
        .new_column(
            "ID",
            &[ColumnType::Id],
            ValueType::Id,
            &ColumnData::Text(vec!["1".to_string(), "2".to_string()]),
        )
        .unwrap();
    table
        .new_column("TIME", &[ColumnType::Idv], ValueType::Real, &ColumnData::Real(vec![0.5, 1.0]))
        .unwrap();
    table
}

#[test]
fn test_real_leaves() {
    let mut writer = Writer::new(Vec::new());
    for x in [2.0, codec::na(), f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        write_real_leaf(&mut writer, x).unwrap();
    }
    let xml = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(
        xml,
        "<ct:Real>2.000000</ct:Real><ct:NA/><ct:NaN/><ct:plusInf/><ct:minusInf/>"
    );
}

#[test]
fn test_root_and_declaration() -> Result<()> {
    let mut so = So::new();
    so.root_mut().set_attribute("metadataFile", "meta.xml")?;
    let xml = so.to_xml_string(false)?;

    assert_eq!(
        xml,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <SO xmlns=\"http://www.pharmml.org/so/0.3/StandardisedOutput\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         xmlns:ds=\"http://www.pharmml.org/pharmml/0.8/Dataset\" \
         xmlns:ct=\"http://www.pharmml.org/pharmml/0.8/CommonTypes\" \
         xsi:schemaLocation=\"http://www.pharmml.org/so/0.3/StandardisedOutput\" \
         implementedBy=\"MJS\" writtenVersion=\"0.3\" id=\"i1\" metadataFile=\"meta.xml\"></SO>"
    );
    Ok(())
}

#[test]
fn test_children_follow_schema_order() -> Result<()> {
    let mut so = So::new();
    let block = so.add_block("b")?;
    block.set_leaf("Estimation/Likelihood/Deviance", "10")?;
    block.set_table("Estimation/Predictions", id_time_table())?;
    block.set_leaf("TaskInformation/RunTime", "3")?;
    so.set_pharmml_ref("model.xml")?;

    let xml = so.to_xml_string(false)?;
    let position = |needle: &str| xml.find(needle).unwrap_or_else(|| panic!("{} missing", needle));

    assert!(position("<PharmMLRef") < position("<SOBlock"));
    assert!(position("<TaskInformation>") < position("<Estimation>"));
    assert!(position("<Predictions>") < position("<Likelihood>"));
    assert!(xml.contains("<PharmMLRef name=\"model.xml\"/>"));
    Ok(())
}

#[test]
fn test_pretty_output() -> Result<()> {
    let mut so = So::new();
    so.add_block("b")?
        .add_message("WARNING", "Monolix", "w1", "Check the model", 2)?;
    let xml = so.to_xml_string(true)?;

    assert!(xml.ends_with("</SO>\n"));
    assert!(xml.contains("\n  <SOBlock blkId=\"b\">\n"));
    assert!(xml.contains("<ct:String>Check the model</ct:String>"));
    assert!(xml.contains("<ct:Int>2</ct:Int>"));
    Ok(())
}

#[test]
fn test_document_round_trip() -> Result<()> {
    let mut so = So::new();
    // Added in schema order, so the parsed tree compares equal
    let block = so.add_block("b")?;
    block.add_rawresults_datafile(Some("raw"), Some("out.lst"), "o1")?;
    let mut fim = Matrix::new("x");
    fim.set_size(1, 1)?;
    fim.set_row_name(0, "CL")?;
    fim.set_column_name(0, "CL")?;
    fim.set(0, 0, 4.0)?;
    block.set_matrix("Estimation/PrecisionPopulationEstimates/MLE/FIM", fim)?;
    block.set_table("Estimation/Predictions", id_time_table())?;

    let back = So::from_xml_str(&so.to_xml_string(true)?)?;
    assert_eq!(back, so);
    Ok(())
}

#[test]
fn test_write_file_with_external_table() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.SO.xml");

    let mut table = id_time_table();
    table.use_external_file("p1", "predictions.csv", Delimiter::Semicolon);
    let mut so = So::new();
    so.add_block("b")?.set_table("Estimation/Predictions", table)?;

    let stats = so.write(&path, true)?;
    assert_eq!(stats.tables_written, 1);
    assert_eq!(stats.rows_written, 2);
    assert_eq!(stats.external_files_written, 1);

    let csv = std::fs::read_to_string(dir.path().join("predictions.csv")).unwrap();
    assert_eq!(csv, "1;0.500000\n2;1.000000\n");

    let xml = std::fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<ds:delimiter>SEMICOLON</ds:delimiter>"));
    assert!(!xml.contains("<ds:Row>"));

    // The reference survives a read; the data comes from the file on request
    let mut back = So::read(&path)?;
    let table = back
        .block_mut("b")
        .and_then(|b| b.table_at_mut("Estimation/Predictions"))
        .unwrap();
    assert!(!table.external_file().unwrap().write_on_serialize());
    assert_eq!(table.load_external_file(dir.path())?, 2);
    assert_eq!(table.column(1).unwrap().reals().unwrap(), &[0.5, 1.0]);
    Ok(())
}

#[test]
fn test_external_files_can_be_disabled() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let mut table = id_time_table();
    table.use_external_file("p1", "predictions.csv", Delimiter::Comma);
    let mut so = So::new();
    so.add_block("b")?.set_table("Estimation/Predictions", table)?;

    let config = WriterConfig {
        write_external_files: false,
        ..WriterConfig::compact()
    };
    let stats = so.write_with(dir.path().join("run.SO.xml"), &config)?;
    assert_eq!(stats.external_files_written, 0);
    assert!(!dir.path().join("predictions.csv").exists());

    // Writing to a sink never produces side files
    so.to_xml_string(false)?;
    assert!(!dir.path().join("predictions.csv").exists());
    Ok(())
}

#[test]
fn test_failed_write_keeps_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.SO.xml");
    std::fs::write(&path, "previous").unwrap();

    let mut table = id_time_table();
    table.column_mut(0).unwrap().append_string("3").unwrap();
    let mut so = So::new();
    so.add_block("b")
        .unwrap()
        .set_table("Estimation/Predictions", table)
        .unwrap();

    let err = so.write(&path, false).unwrap_err();
    assert!(matches!(err, SoError::RowCountMismatch { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    assert!(crate::error::last_error().is_some());
}

#[test]
fn test_stats_display() {
    let stats = WriterStats {
        elements_written: 3,
        tables_written: 2,
        rows_written: 10,
        matrices_written: 1,
        external_files_written: 0,
    };
    assert_eq!(
        stats.to_string(),
        "Wrote 2 tables (10 rows), 1 matrices and 0 external data files"
    );
}
