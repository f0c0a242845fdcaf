use super::*;

#[test]
fn test_column_type_names_round_trip() {
    for name in ["id", "idv", "dv", "popParameter", "varParameter_stdev", "ssEndTime"] {
        let tag = ColumnType::from_name(name).unwrap();
        assert_eq!(tag.as_str(), name);
    }
    assert!(ColumnType::from_name("ID").is_none());
}

#[test]
fn test_column_type_list_parsing() {
    let tags = ColumnType::parse_list("popParameter  structParameter popParameter");
    assert_eq!(tags, vec![ColumnType::PopParameter, ColumnType::StructParameter]);

    // undefined and unknown names never end up in the set
    assert!(ColumnType::parse_list("undefined").is_empty());
    assert_eq!(ColumnType::parse_list("bogus id"), vec![ColumnType::Id]);
    assert!(ColumnType::parse_list("").is_empty());
}

#[test]
fn test_column_type_list_formatting() {
    assert_eq!(ColumnType::format_list(&[]), "undefined");
    assert_eq!(
        ColumnType::format_list(&[ColumnType::Id, ColumnType::Covariate]),
        "id covariate"
    );
    assert_eq!(ColumnType::format_list(&[ColumnType::Undefined]), "undefined");
}

#[test]
fn test_summary_statistic_roles() {
    let tags = ColumnType::parse_list("median mean");
    assert_eq!(tags, vec![ColumnType::Median, ColumnType::Mean]);
    assert_eq!(ColumnType::format_list(&tags), "median mean");
}

#[test]
fn test_value_type_parsing() {
    assert_eq!("real".parse::<ValueType>().unwrap(), ValueType::Real);
    assert_eq!("boolean".parse::<ValueType>().unwrap(), ValueType::Boolean);
    assert!("double".parse::<ValueType>().is_err());

    assert_eq!(ValueType::Id.element_name(), Some("Id"));
    assert_eq!(ValueType::Boolean.element_name(), None);
    assert!(ValueType::String.is_text());
    assert!(!ValueType::Int.is_text());
}

#[test]
fn test_delimiters() {
    assert_eq!("SEMICOLON".parse::<Delimiter>().unwrap(), Delimiter::Semicolon);
    assert_eq!(" TAB\n".parse::<Delimiter>().unwrap(), Delimiter::Tab);
    assert!("PIPE".parse::<Delimiter>().is_err());
    assert_eq!(Delimiter::default(), Delimiter::Comma);
    assert_eq!(Delimiter::Space.as_byte(), b' ');
    assert_eq!(Delimiter::Comma.to_string(), "COMMA");
}

#[test]
fn test_root_attribute_order() {
    let names: Vec<&str> = ROOT_ATTRIBUTES.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        names,
        vec![
            "xmlns",
            "xmlns:xsi",
            "xmlns:ds",
            "xmlns:ct",
            "xsi:schemaLocation",
            "implementedBy",
            "writtenVersion",
            "id"
        ]
    );
}

#[test]
fn test_name_helpers() {
    assert_eq!(qualified(DS_PREFIX, elements::ROW), "ds:Row");
    assert_eq!(local_name("ct:Real"), "Real");
    assert_eq!(local_name("SOBlock"), "SOBlock");
}
