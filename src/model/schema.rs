//! Column metadata and type information

use serde::{Deserialize, Serialize};

use super::table::CellValue;

/// Type tag carried by every column.
///
/// `Numeric` and `Object` are what ingestion infers; the remaining variants are
/// only reached through an explicit coercion (or, for `Boolean` and `Date`, from
/// spreadsheet cells that already carry that type).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Numeric,
    #[default]
    Object,
    Float,
    Integer,
    Double,
    String,
    Date,
    Boolean,
}

impl DataType {
    /// Whether values of this column take part in numeric statistics
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DataType::Numeric | DataType::Float | DataType::Integer | DataType::Double
        )
    }

    /// Widen the type to accommodate another type
    pub fn widen(self, other: DataType) -> DataType {
        if self == other {
            self
        } else {
            DataType::Object
        }
    }

    /// Infer the type of a column from its cells.
    ///
    /// Missing cells are ignored; a column with no present value is `Numeric`.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> DataType {
        let mut inferred: Option<DataType> = None;

        for cell in cells {
            let kind = match cell {
                CellValue::Null => continue,
                CellValue::Int(_) | CellValue::Float(_) => DataType::Numeric,
                CellValue::Bool(_) => DataType::Boolean,
                CellValue::Date(_) | CellValue::DateTime(_) => DataType::Date,
                CellValue::String(_) => DataType::Object,
            };

            inferred = Some(match inferred {
                Some(current) => current.widen(kind),
                None => kind,
            });

            if inferred == Some(DataType::Object) {
                break;
            }
        }

        inferred.unwrap_or(DataType::Numeric)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Numeric => write!(f, "numeric"),
            DataType::Object => write!(f, "object"),
            DataType::Float => write!(f, "float"),
            DataType::Integer => write!(f, "integer"),
            DataType::Double => write!(f, "double"),
            DataType::String => write!(f, "string"),
            DataType::Date => write!(f, "date"),
            DataType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Parses a coercion target. Inferred-only types are not accepted.
impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "float" => Ok(DataType::Float),
            "integer" | "int" => Ok(DataType::Integer),
            "double" => Ok(DataType::Double),
            "string" | "str" => Ok(DataType::String),
            "date" => Ok(DataType::Date),
            "boolean" | "bool" => Ok(DataType::Boolean),
            _ => Err(format!("Unknown target type: {}", s)),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header)
    pub name: String,
    /// Declared or inferred type
    pub data_type: DataType,
}

impl Column {
    /// Create a new column; its type is settled once the data is known
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::default(),
        }
    }

    /// Create a column with a specified type
    pub fn with_type(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_numeric_and_object() {
        let cells = vec![CellValue::Int(1), CellValue::Null, CellValue::Float(2.5)];
        assert_eq!(DataType::infer(&cells), DataType::Numeric);

        let cells = vec![CellValue::Int(1), CellValue::from("x")];
        assert_eq!(DataType::infer(&cells), DataType::Object);

        let cells = vec![CellValue::Null, CellValue::Null];
        assert_eq!(DataType::infer(&cells), DataType::Numeric);
    }

    #[test]
    fn test_new_column_is_object() {
        assert_eq!(DataType::default(), DataType::Object);
        assert_eq!(Column::new("c").data_type, DataType::Object);
    }

    #[test]
    fn test_parse_target_type() {
        assert_eq!("Integer".parse::<DataType>(), Ok(DataType::Integer));
        assert_eq!("bool".parse::<DataType>(), Ok(DataType::Boolean));
        assert!("numeric".parse::<DataType>().is_err());
    }
}
