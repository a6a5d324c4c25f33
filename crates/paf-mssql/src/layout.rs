use super::*;
use tiberius::ColumnType;

/// A destination column as the server describes it.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl From<&tiberius::Column> for Column {
    fn from(column: &tiberius::Column) -> Self {
        Self::new(column.name(), column.column_type())
    }
}

/// Columns of `table` in server order.
///
/// Reads the same `SELECT TOP 0 *` metadata the bulk-load request encodes
/// against, so rows can be converted and checked before `INSERT BULK`.
pub async fn layout(client: &mut Mssql, table: &str) -> Result<Vec<Column>, MssqlError> {
    let mut stream = client
        .simple_query(format!("SELECT TOP 0 * FROM {}", table))
        .await?;
    let columns: Vec<Column> = stream
        .columns()
        .await?
        .map(|columns| columns.iter().map(Column::from).collect())
        .unwrap_or_default();
    stream.into_results().await?;
    Ok(columns)
}
