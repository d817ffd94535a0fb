use chrono::{NaiveDate, NaiveDateTime};

use storesmith_core::{ColumnSpec, SemanticType};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_T_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Infer a column spec per header entry from all rows of a table.
///
/// Classification per column, over every non-empty value: integer if all
/// parse as whole numbers, else real if all parse as decimals (mixed
/// integer/real widens to real), else date if all match an ISO-8601 date
/// or datetime, else text. A column is nullable if any value is empty or
/// absent. Zero rows, or a column with no non-empty values, yields a
/// nullable text column.
pub fn infer_columns(header: &[String], rows: &[Vec<String>]) -> Vec<ColumnSpec> {
    header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let profile = profile_column(idx, rows);
            ColumnSpec {
                name: name.clone(),
                semantic_type: profile.classify(),
                nullable: profile.nullable,
                unique: false,
            }
        })
        .collect()
}

struct ColumnProfile {
    all_integer: bool,
    all_real: bool,
    all_date: bool,
    nullable: bool,
    non_empty: usize,
}

impl ColumnProfile {
    fn classify(&self) -> SemanticType {
        if self.non_empty == 0 {
            SemanticType::Text
        } else if self.all_integer {
            SemanticType::Integer
        } else if self.all_real {
            SemanticType::Real
        } else if self.all_date {
            SemanticType::Date
        } else {
            SemanticType::Text
        }
    }
}

fn profile_column(idx: usize, rows: &[Vec<String>]) -> ColumnProfile {
    let mut profile = ColumnProfile {
        all_integer: true,
        all_real: true,
        all_date: true,
        nullable: rows.is_empty(),
        non_empty: 0,
    };

    for row in rows {
        let value = row.get(idx).map(String::as_str).unwrap_or("");
        if value.is_empty() {
            profile.nullable = true;
            continue;
        }

        profile.non_empty += 1;
        profile.all_integer = profile.all_integer && parses_integer(value);
        profile.all_real = profile.all_real && parses_real(value);
        profile.all_date = profile.all_date && parses_date(value);
    }

    profile
}

fn parses_integer(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

fn parses_real(value: &str) -> bool {
    value.parse::<f64>().is_ok()
}

fn parses_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
        || NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).is_ok()
        || NaiveDateTime::parse_from_str(value, DATETIME_T_FORMAT).is_ok()
}
