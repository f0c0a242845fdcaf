use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::error::SoError;

/// Semantic role of a table column (`columnType` attribute).
///
/// A column may carry several roles; the attribute is a space separated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ColumnType {
    Undefined,
    Addl,
    Adm,
    Arm,
    Censoring,
    Cmt,
    Covariate,
    Demographic,
    Dose,
    Duration,
    Dv,
    Dvid,
    Epoch,
    Evid,
    Id,
    Idv,
    Ii,
    Limit,
    Mdv,
    Occasion,
    Rate,
    Reg,
    Replicate,
    Ss,
    SsEndTime,
    SsPeriod,
    Time,
    StructParameter,
    PopParameter,
    IndivParameter,
    RandEffect,
    Residual,
    StatPrecision,
    Median,
    Mean,
    VarParameter,
    VarParameterVar,
    VarParameterStdev,
    VarParameterCov,
    VarParameterCorr,
}

const COLUMN_TYPE_NAMES: &[(ColumnType, &str)] = &[
    (ColumnType::Undefined, "undefined"),
    (ColumnType::Addl, "addl"),
    (ColumnType::Adm, "adm"),
    (ColumnType::Arm, "arm"),
    (ColumnType::Censoring, "censoring"),
    (ColumnType::Cmt, "cmt"),
    (ColumnType::Covariate, "covariate"),
    (ColumnType::Demographic, "demographic"),
    (ColumnType::Dose, "dose"),
    (ColumnType::Duration, "duration"),
    (ColumnType::Dv, "dv"),
    (ColumnType::Dvid, "dvid"),
    (ColumnType::Epoch, "epoch"),
    (ColumnType::Evid, "evid"),
    (ColumnType::Id, "id"),
    (ColumnType::Idv, "idv"),
    (ColumnType::Ii, "ii"),
    (ColumnType::Limit, "limit"),
    (ColumnType::Mdv, "mdv"),
    (ColumnType::Occasion, "occasion"),
    (ColumnType::Rate, "rate"),
    (ColumnType::Reg, "reg"),
    (ColumnType::Replicate, "replicate"),
    (ColumnType::Ss, "ss"),
    (ColumnType::SsEndTime, "ssEndTime"),
    (ColumnType::SsPeriod, "ssPeriod"),
    (ColumnType::Time, "time"),
    (ColumnType::StructParameter, "structParameter"),
    (ColumnType::PopParameter, "popParameter"),
    (ColumnType::IndivParameter, "indivParameter"),
    (ColumnType::RandEffect, "randEffect"),
    (ColumnType::Residual, "residual"),
    (ColumnType::StatPrecision, "statPrecision"),
    (ColumnType::Median, "median"),
    (ColumnType::Mean, "mean"),
    (ColumnType::VarParameter, "varParameter"),
    (ColumnType::VarParameterVar, "varParameter_var"),
    (ColumnType::VarParameterStdev, "varParameter_stdev"),
    (ColumnType::VarParameterCov, "varParameter_cov"),
    (ColumnType::VarParameterCorr, "varParameter_corr"),
];

impl ColumnType {
    /// Schema name of the role
    pub fn as_str(&self) -> &'static str {
        COLUMN_TYPE_NAMES
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, name)| *name)
            .unwrap_or("undefined")
    }

    /// Look up a role by its schema name
    pub fn from_name(name: &str) -> Option<Self> {
        COLUMN_TYPE_NAMES
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(t, _)| *t)
    }

    /// Parse a `columnType` attribute value.
    ///
    /// Unknown names are reported and treated as `undefined`; `undefined` is
    /// not kept in the returned set.
    pub fn parse_list(value: &str) -> Vec<ColumnType> {
        let mut types = Vec::new();
        for name in value.split_whitespace() {
            match Self::from_name(name) {
                Some(ColumnType::Undefined) => {}
                Some(t) => {
                    if !types.contains(&t) {
                        types.push(t);
                    }
                }
                None => warn!("Unknown columnType '{}', treating as undefined", name),
            }
        }
        types
    }

    /// Format a role set as a `columnType` attribute value
    pub fn format_list(types: &[ColumnType]) -> String {
        let names: Vec<&str> = types
            .iter()
            .filter(|t| **t != ColumnType::Undefined)
            .map(|t| t.as_str())
            .collect();
        if names.is_empty() {
            ColumnType::Undefined.as_str().to_string()
        } else {
            names.join(" ")
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage type of the cells of a column (`valueType` attribute)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// 64-bit floating point
    Real,
    /// Integer
    Int,
    /// Free text
    String,
    /// Identifier text
    Id,
    /// Boolean
    Boolean,
}

impl ValueType {
    /// Schema name (`real`, `int`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Real => "real",
            ValueType::Int => "int",
            ValueType::String => "string",
            ValueType::Id => "id",
            ValueType::Boolean => "boolean",
        }
    }

    /// Local name of the leaf element holding a value of this type.
    ///
    /// Booleans have no single element; `True`/`False` are chosen per value.
    pub fn element_name(&self) -> Option<&'static str> {
        use super::constants::elements;
        match self {
            ValueType::Real => Some(elements::REAL),
            ValueType::Int => Some(elements::INT),
            ValueType::String => Some(elements::STRING),
            ValueType::Id => Some(elements::ID),
            ValueType::Boolean => None,
        }
    }

    /// True for the two text value types
    pub fn is_text(&self) -> bool {
        matches!(self, ValueType::String | ValueType::Id)
    }
}

impl FromStr for ValueType {
    type Err = SoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "real" => Ok(ValueType::Real),
            "int" => Ok(ValueType::Int),
            "string" => Ok(ValueType::String),
            "id" => Ok(ValueType::Id),
            "boolean" => Ok(ValueType::Boolean),
            other => Err(SoError::MalformedDocument(format!(
                "Unknown valueType '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field delimiter of an external table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Delimiter {
    /// Tab separated
    Tab,
    /// Space separated
    Space,
    /// Comma separated
    #[default]
    Comma,
    /// Semicolon separated
    Semicolon,
}

impl Delimiter {
    /// Schema name (`TAB`, `SPACE`, `COMMA`, `SEMICOLON`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Tab => "TAB",
            Delimiter::Space => "SPACE",
            Delimiter::Comma => "COMMA",
            Delimiter::Semicolon => "SEMICOLON",
        }
    }

    /// Byte written between fields
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Space => b' ',
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

impl FromStr for Delimiter {
    type Err = SoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "TAB" => Ok(Delimiter::Tab),
            "SPACE" => Ok(Delimiter::Space),
            "COMMA" => Ok(Delimiter::Comma),
            "SEMICOLON" => Ok(Delimiter::Semicolon),
            other => Err(SoError::MalformedDocument(format!(
                "Unknown delimiter '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
