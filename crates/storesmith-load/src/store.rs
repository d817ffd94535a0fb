use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::errors::LoadError;
use crate::model::LoadReport;

/// Open a read-only handle to a populated store.
///
/// Refused while the report carries outstanding violations, unless the
/// caller explicitly accepts a partial load.
pub fn open_read_only(
    store_path: &Path,
    report: &LoadReport,
    accept_partial: bool,
) -> Result<Connection, LoadError> {
    if report.violations_total > 0 && !accept_partial {
        return Err(LoadError::Violations(report.violations_total));
    }
    let conn = Connection::open_with_flags(store_path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    Ok(conn)
}
