use super::*;
use crate::schema::{ColumnType, ValueType};
use crate::table::ColumnData;

fn one_row_table() -> Table {
    let mut table = Table::new("Unused");
    table.set_number_of_rows(1).unwrap();
    table
        .new_column("CL", &[ColumnType::PopParameter], ValueType::Real, &ColumnData::Real(vec![2.5]))
        .unwrap();
    table
}

#[test]
fn test_new_document_is_empty() {
    let so = So::new();
    assert_eq!(so.root().name(), "SO");
    assert_eq!(so.blocks().count(), 0);
    assert!(so.pharmml_ref().is_none());
}

#[test]
fn test_add_block_and_lookup() {
    let mut so = So::new();
    so.add_block("b1").unwrap();
    so.add_block("b2").unwrap();

    assert_eq!(so.blocks().count(), 2);
    assert_eq!(so.block("b2").and_then(|b| b.blk_id()), Some("b2"));
    assert!(so.block("b3").is_none());
    assert!(matches!(
        so.add_block("b1"),
        Err(SoError::InvalidStructure(_))
    ));
}

#[test]
fn test_pharmml_ref() {
    let mut so = So::new();
    so.set_pharmml_ref("model.xml").unwrap();
    so.set_pharmml_ref("model2.xml").unwrap();
    assert_eq!(so.pharmml_ref(), Some("model2.xml"));
    assert_eq!(so.root().children_named("PharmMLRef").count(), 1);
}

#[test]
fn test_set_table_creates_ancestors_and_names_table() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    block
        .set_table("Estimation/PopulationEstimates/MLE", one_row_table())
        .unwrap();

    let table = block.table_at("Estimation/PopulationEstimates/MLE").unwrap();
    assert_eq!(table.name(), "MLE");
    assert!(block.element_at("Estimation/PopulationEstimates").is_some());

    // Replacing keeps a single table
    block
        .set_table("Estimation/PopulationEstimates/MLE", Table::new("x"))
        .unwrap();
    let estimates = block.element_at("Estimation/PopulationEstimates").unwrap();
    assert_eq!(estimates.children_named("MLE").count(), 1);
    assert_eq!(
        block
            .table_at("Estimation/PopulationEstimates/MLE")
            .unwrap()
            .num_columns(),
        0
    );
}

#[test]
fn test_structure_violations() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();

    let unknown = block.set_table("Estimation/Unknown", Table::new("t"));
    assert!(matches!(unknown, Err(SoError::InvalidStructure(_))));

    // CovarianceMatrix is a matrix, not a table
    let wrong_kind = block.set_table(
        "Estimation/PrecisionPopulationEstimates/MLE/CovarianceMatrix",
        Table::new("t"),
    );
    assert!(matches!(wrong_kind, Err(SoError::InvalidStructure(_))));

    // MLE under PopulationEstimates is a table, not a container
    let not_container = block.ensure_element("Estimation/PopulationEstimates/MLE");
    assert!(matches!(not_container, Err(SoError::InvalidStructure(_))));

    assert!(matches!(
        block.set_attribute("unknownAttribute", "x"),
        Err(SoError::InvalidStructure(_))
    ));
}

#[test]
fn test_push_table_only_for_repeated_children() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    let sim = block.push_element("Simulation/SimulationBlock").unwrap();
    sim.set_attribute("replicate", "1").unwrap();
    sim.push_table("SimulatedProfiles", Table::new("a")).unwrap();
    sim.push_table("SimulatedProfiles", Table::new("b")).unwrap();
    assert_eq!(sim.children_named("SimulatedProfiles").count(), 2);

    let err = block.push_table("Estimation/Predictions", Table::new("p"));
    assert!(matches!(err, Err(SoError::InvalidStructure(_))));
}

#[test]
fn test_push_element_rejects_second_single_child() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    block.push_element("Estimation").unwrap();
    assert!(matches!(
        block.push_element("Estimation"),
        Err(SoError::InvalidStructure(_))
    ));
}

#[test]
fn test_set_matrix_and_leaf() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();

    let mut matrix = Matrix::new("m");
    matrix.set_size(2, 2).unwrap();
    block
        .set_matrix("Estimation/PrecisionPopulationEstimates/MLE/FIM", matrix)
        .unwrap();
    block.set_leaf("TaskInformation/RunTime", "12.5").unwrap();
    block
        .set_leaf("Estimation/Likelihood/Deviance", "1234.5")
        .unwrap();

    let fim = block
        .matrix_at("Estimation/PrecisionPopulationEstimates/MLE/FIM")
        .unwrap();
    assert_eq!(fim.name(), "FIM");
    assert_eq!(fim.num_rows(), 2);
    assert_eq!(block.leaf_at("TaskInformation/RunTime"), Some("12.5"));
    assert_eq!(
        block.leaf_at("Estimation/Likelihood/Deviance"),
        Some("1234.5")
    );
}

#[test]
fn test_add_message() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    block
        .add_message("ERROR", "NONMEM", "run", "Minimization terminated", 10)
        .unwrap();
    block
        .add_message("INFORMATION", "NONMEM", "cov", "Covariance step done", 0)
        .unwrap();

    let messages: Vec<_> = block.messages().collect();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].attribute("type"), Some("ERROR"));
    assert_eq!(messages[0].leaf_at("Toolname/String"), Some("NONMEM"));
    assert_eq!(
        messages[0].leaf_at("Content/String"),
        Some("Minimization terminated")
    );
    assert_eq!(messages[0].leaf_at("Severity/Int"), Some("10"));
    assert_eq!(messages[1].leaf_at("Name/String"), Some("cov"));
}

#[test]
fn test_block_operations_need_a_block() {
    let mut so = So::new();
    let err = so
        .root_mut()
        .add_message("ERROR", "tool", "n", "c", 1)
        .unwrap_err();
    assert!(matches!(err, SoError::InvalidStructure(_)));
}

#[test]
fn test_raw_results_files() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    block
        .add_rawresults_datafile(Some("Output tables"), Some("sdtab1"), "d1")
        .unwrap();
    block.add_rawresults_datafile(None, Some("patab1"), "d2").unwrap();
    block
        .add_rawresults_graphicsfile(Some("GOF"), None, "g1")
        .unwrap();

    let data = block.external_files_at("RawResults/DataFile");
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].name(), "DataFile");
    assert_eq!(data[0].path(), Some("sdtab1"));
    assert_eq!(data[0].description(), Some("Output tables"));
    assert_eq!(data[1].oid(), Some("d2"));
    assert!(data[1].description().is_none());

    let graphics = block.external_files_at("RawResults/GraphicsFile");
    assert_eq!(graphics.len(), 1);
    assert_eq!(graphics[0].oid(), Some("g1"));
    assert!(graphics[0].path().is_none());
}

#[test]
fn test_external_files_outlive_the_path() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    block.add_rawresults_datafile(None, Some("sdtab1"), "d1").unwrap();

    let files = {
        let path = format!("{}/{}", "RawResults", "DataFile");
        block.external_files_at(&path)
    };
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path(), Some("sdtab1"));
    assert!(block.external_files_at("RawResults/GraphicsFile").is_empty());
}

#[test]
fn test_tables_lists_paths() {
    let mut so = So::new();
    let block = so.add_block("b1").unwrap();
    block
        .set_table("Estimation/PopulationEstimates/MLE", one_row_table())
        .unwrap();
    block
        .set_table("Estimation/Predictions", one_row_table())
        .unwrap();

    let paths: Vec<String> = block.tables().into_iter().map(|(p, _)| p).collect();
    assert_eq!(
        paths,
        vec![
            "Estimation/PopulationEstimates/MLE".to_string(),
            "Estimation/Predictions".to_string()
        ]
    );
    assert_eq!(block.tables_mut().len(), 2);
}

#[test]
fn test_merge_appends_blocks() {
    let mut first = So::new();
    first.add_block("a").unwrap();

    let mut second = So::new();
    second.set_pharmml_ref("model.xml").unwrap();
    second.add_block("b").unwrap();
    second.add_block("c").unwrap();

    assert_eq!(first.merge(second), 2);
    let ids: Vec<_> = first.blocks().filter_map(|b| b.blk_id()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(first.pharmml_ref(), Some("model.xml"));
}

#[test]
fn test_remove_children() {
    let mut so = So::new();
    so.add_block("a").unwrap();
    so.add_block("b").unwrap();
    assert_eq!(so.root_mut().remove_children("SOBlock"), 2);
    assert_eq!(so.blocks().count(), 0);
}
