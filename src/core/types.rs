// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core type definitions: DataType, AccessPathType

use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// SQL data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum DataType {
    /// NULL data type, used for unknown/unspecified types
    #[default]
    Null = 0,

    /// 64-bit signed integer
    Integer = 1,

    /// 64-bit floating point number
    Float = 2,

    /// UTF-8 text string
    Text = 3,

    /// Boolean true/false
    Boolean = 4,

    /// Timestamp (stored as UTC)
    Timestamp = 5,
}

impl DataType {
    /// Returns true if this type is numeric (INTEGER or FLOAT)
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Precision used when a column is declared without one
    pub fn default_precision(&self) -> u64 {
        match self {
            DataType::Null => 1,
            DataType::Integer => 19,
            DataType::Float => 17,
            DataType::Text => i32::MAX as u64,
            DataType::Boolean => 1,
            DataType::Timestamp => 23,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Null => write!(f, "NULL"),
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NULL" => Ok(DataType::Null),
            "INTEGER" | "INT" | "BIGINT" | "SMALLINT" | "TINYINT" => Ok(DataType::Integer),
            "FLOAT" | "DOUBLE" | "REAL" | "DECIMAL" | "NUMERIC" => Ok(DataType::Float),
            "TEXT" | "VARCHAR" | "CHAR" | "STRING" => Ok(DataType::Text),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "TIMESTAMP" | "DATETIME" | "DATE" | "TIME" => Ok(DataType::Timestamp),
            _ => Err(Error::InvalidArgument(format!("unknown data type: {}", s))),
        }
    }
}

/// Classification of an access path
///
/// Scan paths index nothing and visit every row. Primary and unique paths
/// reject a second row with the same non-null key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPathType {
    /// Full scan over the relation's storage
    Scan,

    /// Primary key
    Primary,

    /// Unique secondary index
    Unique,

    /// Secondary index allowing duplicate keys
    NonUnique,
}

impl AccessPathType {
    /// Returns true if duplicate non-null keys are rejected
    pub fn is_unique(&self) -> bool {
        matches!(self, AccessPathType::Primary | AccessPathType::Unique)
    }

    /// Returns true for the primary key
    pub fn is_primary_key(&self) -> bool {
        matches!(self, AccessPathType::Primary)
    }

    /// Returns true for full scan paths
    pub fn is_scan(&self) -> bool {
        matches!(self, AccessPathType::Scan)
    }

    /// Keyword used in CREATE statements
    pub fn sql(&self) -> &'static str {
        match self {
            AccessPathType::Scan => "SCAN",
            AccessPathType::Primary => "PRIMARY KEY",
            AccessPathType::Unique => "UNIQUE INDEX",
            AccessPathType::NonUnique => "INDEX",
        }
    }
}

impl fmt::Display for AccessPathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_parse() {
        assert_eq!("int".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("VARCHAR".parse::<DataType>().unwrap(), DataType::Text);
        assert_eq!("double".parse::<DataType>().unwrap(), DataType::Float);
        assert!("blob".parse::<DataType>().is_err());
    }

    #[test]
    fn test_data_type_display_roundtrip() {
        for dt in [
            DataType::Integer,
            DataType::Float,
            DataType::Text,
            DataType::Boolean,
            DataType::Timestamp,
        ] {
            assert_eq!(dt.to_string().parse::<DataType>().unwrap(), dt);
        }
    }

    #[test]
    fn test_access_path_type() {
        assert!(AccessPathType::Primary.is_unique());
        assert!(AccessPathType::Unique.is_unique());
        assert!(!AccessPathType::NonUnique.is_unique());
        assert!(!AccessPathType::Scan.is_unique());
        assert!(AccessPathType::Scan.is_scan());
        assert!(AccessPathType::Primary.is_primary_key());
        assert_eq!(AccessPathType::Unique.to_string(), "UNIQUE INDEX");
    }
}
