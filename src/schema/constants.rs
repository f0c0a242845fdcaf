/// Default namespace of SO documents
pub const SO_NAMESPACE: &str = "http://www.pharmml.org/so/0.3/StandardisedOutput";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// PharmML Dataset namespace, bound to the `ds:` prefix
pub const DATASET_NAMESPACE: &str = "http://www.pharmml.org/pharmml/0.8/Dataset";

/// PharmML CommonTypes namespace, bound to the `ct:` prefix
pub const COMMON_TYPES_NAMESPACE: &str = "http://www.pharmml.org/pharmml/0.8/CommonTypes";

/// Value of `xsi:schemaLocation` on the root element
pub const SCHEMA_LOCATION: &str = "http://www.pharmml.org/so/0.3/StandardisedOutput";

/// Value of `implementedBy` on the root element
pub const IMPLEMENTED_BY: &str = "MJS";

/// SO schema version written into `writtenVersion`
pub const WRITTEN_VERSION: &str = "0.3";

/// Value of the root `id` attribute
pub const ROOT_ID: &str = "i1";

/// Namespace prefix of the Dataset schema
pub const DS_PREFIX: &str = "ds";

/// Namespace prefix of the CommonTypes schema
pub const CT_PREFIX: &str = "ct";

/// Root element name
pub const ROOT_ELEMENT: &str = "SO";

/// Root attributes, in the order they are written
pub const ROOT_ATTRIBUTES: [(&str, &str); 8] = [
    ("xmlns", SO_NAMESPACE),
    ("xmlns:xsi", XSI_NAMESPACE),
    ("xmlns:ds", DATASET_NAMESPACE),
    ("xmlns:ct", COMMON_TYPES_NAMESPACE),
    ("xsi:schemaLocation", SCHEMA_LOCATION),
    ("implementedBy", IMPLEMENTED_BY),
    ("writtenVersion", WRITTEN_VERSION),
    ("id", ROOT_ID),
];

/// Element names used inside tables, matrices and external file references.
pub mod elements {
    /// Column definitions of a table
    pub const DEFINITION: &str = "Definition";
    /// One column definition
    pub const COLUMN: &str = "Column";
    /// Inline row container
    pub const TABLE: &str = "Table";
    /// One inline row
    pub const ROW: &str = "Row";
    /// External file reference
    pub const EXTERNAL_FILE: &str = "ExternalFile";
    /// Path of an external file
    pub const PATH: &str = "path";
    /// Format of an external file
    pub const FORMAT: &str = "format";
    /// Delimiter of an external file
    pub const DELIMITER: &str = "delimiter";
    /// Missing data code of an external file
    pub const MISSING_DATA: &str = "MissingData";
    /// Free text description
    pub const DESCRIPTION: &str = "Description";

    /// Matrix body
    pub const MATRIX: &str = "Matrix";
    /// Matrix row names
    pub const ROW_NAMES: &str = "RowNames";
    /// Matrix column names
    pub const COLUMN_NAMES: &str = "ColumnNames";
    /// One matrix row
    pub const MATRIX_ROW: &str = "MatrixRow";

    /// Real leaf
    pub const REAL: &str = "Real";
    /// Int leaf
    pub const INT: &str = "Int";
    /// String leaf
    pub const STRING: &str = "String";
    /// Id leaf
    pub const ID: &str = "Id";
    /// Boolean true leaf
    pub const TRUE: &str = "True";
    /// Boolean false leaf
    pub const FALSE: &str = "False";
    /// Missing value leaf
    pub const NA: &str = "NA";
    /// Not-a-number leaf
    pub const NAN: &str = "NaN";
    /// Positive infinity leaf
    pub const PLUS_INF: &str = "plusInf";
    /// Negative infinity leaf
    pub const MINUS_INF: &str = "minusInf";
}

/// Attribute names used inside tables, matrices and external file references.
pub mod attributes {
    /// Column identifier
    pub const COLUMN_ID: &str = "columnId";
    /// Column role list
    pub const COLUMN_TYPE: &str = "columnType";
    /// Column value type
    pub const VALUE_TYPE: &str = "valueType";
    /// 1-based column position
    pub const COLUMN_NUM: &str = "columnNum";
    /// Object identifier of an external file
    pub const OID: &str = "oid";
    /// Matrix type
    pub const MATRIX_TYPE: &str = "matrixType";
    /// Block identifier of an SOBlock
    pub const BLK_ID: &str = "blkId";
    /// Missing data code
    pub const DATA_CODE: &str = "dataCode";
    /// Missing data kind
    pub const MISSING_DATA_TYPE: &str = "missingDataType";
}

/// Value of the `format` child of external file references
pub const EXTERNAL_FORMAT_CSV: &str = "CSV";

/// Value of the `matrixType` attribute
pub const MATRIX_TYPE_ANY: &str = "Any";

/// Qualified name with a namespace prefix
pub fn qualified(prefix: &str, name: &str) -> String {
    format!("{}:{}", prefix, name)
}

/// Strip the namespace prefix from a qualified name
pub fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}
