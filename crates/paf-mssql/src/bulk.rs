use super::*;
use tiberius::TokenRow;

/// Rows pending for one destination table.
///
/// The in-memory half of a prepared bulk statement: rows are checked
/// against the table's column list as they are appended, converted to the
/// server's column types by [`Bulk::encode`], and shipped in one round
/// trip by [`Session::copy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bulk {
    table: &'static str,
    columns: &'static [&'static str],
    insert: &'static str,
    rows: Vec<Vec<Value>>,
}

impl Bulk {
    /// Empty bulk set for the table described by `S`.
    pub fn prepare<S: Schema>() -> Self {
        Self {
            table: S::name(),
            columns: S::columns(),
            insert: S::insert(),
            rows: Vec::new(),
        }
    }
    /// Appends one row after checking table and arity.
    pub fn append<R: Row>(&mut self, row: R) -> Result<(), MssqlError> {
        if R::name() != self.table {
            return Err(MssqlError::Table {
                expected: self.table,
                found: R::name(),
            });
        }
        let values = row.values();
        if values.len() != self.columns.len() {
            return Err(MssqlError::Arity {
                table: self.table,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(values);
        Ok(())
    }
    pub fn table(&self) -> &'static str {
        self.table
    }
    pub fn insert(&self) -> &'static str {
        self.insert
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }
    /// Converts every row to the server's column layout.
    ///
    /// The layout must list exactly this table's columns in order (names
    /// compared without case). Nothing is sent until every row converts.
    pub fn encode(self, layout: &[Column]) -> Result<Vec<TokenRow<'static>>, MssqlError> {
        let table = self.table;
        let aligned = layout.len() == self.columns.len()
            && layout
                .iter()
                .zip(self.columns)
                .all(|(column, name)| column.name.eq_ignore_ascii_case(name));
        if !aligned {
            return Err(MssqlError::Layout {
                table,
                expected: self.columns.join(", "),
                found: layout
                    .iter()
                    .map(|column| column.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        self.rows
            .into_iter()
            .map(|values| {
                let mut row = TokenRow::new();
                for (value, column) in values.into_iter().zip(layout) {
                    let kind = value.kind();
                    let data = value.encode(column.ty).ok_or_else(|| MssqlError::Conversion {
                        table,
                        column: column.name.clone(),
                        value: kind,
                        found: format!("{:?}", column.ty),
                    })?;
                    row.push(data);
                }
                Ok(row)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use paf_metrics::SqlText;
    use paf_metrics::WaitEvent;
    use tiberius::ColumnType;

    /// Row that lies about its shape.
    struct Short;
    impl Schema for Short {
        fn name() -> &'static str {
            DPA_SQL
        }
        fn columns() -> &'static [&'static str] {
            &["hash"]
        }
        fn insert() -> &'static str {
            "INSERT BULK dpa_sql (hash)"
        }
    }
    impl Row for Short {
        fn values(self) -> Vec<Value> {
            vec![Value::NVarChar("h".into())]
        }
    }

    fn sql(hash: &str) -> SqlText {
        SqlText {
            hash: hash.into(),
            text: "t".into(),
        }
    }

    #[test]
    fn append_keeps_input_order() {
        let mut bulk = Bulk::prepare::<SqlText>();
        for hash in ["a", "b", "c"] {
            bulk.append(sql(hash)).unwrap();
        }
        assert_eq!(bulk.table(), DPA_SQL);
        let hashes = bulk
            .into_rows()
            .into_iter()
            .map(|row| row[0].clone())
            .collect::<Vec<_>>();
        assert_eq!(
            hashes,
            vec![
                Value::NVarChar("a".into()),
                Value::NVarChar("b".into()),
                Value::NVarChar("c".into()),
            ]
        );
    }
    #[test]
    fn append_rejects_wrong_arity() {
        let mut bulk = Bulk::prepare::<SqlText>();
        let err = bulk.append(Short).unwrap_err();
        assert!(matches!(
            err,
            MssqlError::Arity {
                expected: 2,
                found: 1,
                ..
            }
        ));
        assert!(bulk.is_empty());
    }
    #[test]
    fn append_rejects_rows_for_other_tables() {
        let mut bulk = Bulk::prepare::<WaitEvent>();
        let err = bulk.append(sql("a")).unwrap_err();
        assert!(matches!(
            err,
            MssqlError::Table {
                expected: DPA_WAIT,
                found: DPA_SQL
            }
        ));
    }

    fn wait(test_run: i64) -> WaitEvent {
        WaitEvent {
            test_run,
            hash: "h1".into(),
            kind: "cpu".into(),
            event_date: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
            value: 42,
        }
    }
    /// `dpa_wait` declared with `int` run ids and legacy `datetime`.
    fn narrow() -> Vec<Column> {
        vec![
            Column::new("test_run_id", ColumnType::Int4),
            Column::new("hash", ColumnType::BigVarChar),
            Column::new("type", ColumnType::NVarchar),
            Column::new("event_date", ColumnType::Datetime),
            Column::new("value", ColumnType::Int4),
        ]
    }

    #[test]
    fn encode_converts_rows_to_server_types() {
        let mut bulk = Bulk::prepare::<WaitEvent>();
        bulk.append(wait(7)).unwrap();
        bulk.append(wait(8)).unwrap();
        assert_eq!(bulk.encode(&narrow()).unwrap().len(), 2);
    }
    #[test]
    fn encode_accepts_column_names_in_any_case() {
        let mut bulk = Bulk::prepare::<SqlText>();
        bulk.append(sql("a")).unwrap();
        let layout = vec![
            Column::new("HASH", ColumnType::NVarchar),
            Column::new("Sql", ColumnType::NVarchar),
        ];
        assert_eq!(bulk.encode(&layout).unwrap().len(), 1);
    }
    #[test]
    fn encode_rejects_a_table_laid_out_differently() {
        let mut swapped = narrow();
        swapped.swap(1, 2);
        let mut short = narrow();
        short.pop();
        for layout in [swapped, short] {
            let mut bulk = Bulk::prepare::<WaitEvent>();
            bulk.append(wait(7)).unwrap();
            let err = bulk.encode(&layout).unwrap_err();
            assert!(matches!(err, MssqlError::Layout { table: DPA_WAIT, .. }));
            assert!(!err.is_fatal());
        }
    }
    #[test]
    fn encode_rejects_the_whole_set_when_one_value_does_not_fit() {
        let mut bulk = Bulk::prepare::<WaitEvent>();
        bulk.append(wait(7)).unwrap();
        bulk.append(wait(3_000_000_000)).unwrap();
        let err = bulk.encode(&narrow()).unwrap_err();
        assert!(matches!(
            err,
            MssqlError::Conversion {
                table: DPA_WAIT,
                value: "bigint",
                ref column,
                ..
            } if column == "test_run_id"
        ));
    }
    #[test]
    fn encode_of_an_empty_set_only_checks_the_layout() {
        assert!(Bulk::prepare::<WaitEvent>().encode(&narrow()).unwrap().is_empty());
    }
}
