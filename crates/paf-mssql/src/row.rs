use super::*;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Timelike;
use paf_metrics::SqlText;
use paf_metrics::WaitEvent;
use tiberius::ColumnData;
use tiberius::ColumnType;
use tiberius::IntoSql;

/// A single bulk-load cell, before it meets its destination column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    BigInt(i64),
    NVarChar(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::BigInt(_) => "bigint",
            Self::NVarChar(_) => "nvarchar",
            Self::DateTime(_) => "datetime",
        }
    }

    /// Converts into the wire type of a column of type `ty`.
    ///
    /// Bulk loads are encoded against the server's column metadata, so the
    /// cell has to arrive in exactly that type. `None` means the value has
    /// no lossless form in `ty`.
    pub fn encode(self, ty: ColumnType) -> Option<ColumnData<'static>> {
        match (self, ty) {
            (Self::Int(v), ty) => Self::integer(i64::from(v), ty),
            (Self::BigInt(v), ty) => Self::integer(v, ty),
            (
                Self::NVarChar(v),
                ColumnType::NVarchar | ColumnType::NChar | ColumnType::BigVarChar | ColumnType::BigChar,
            ) => Some(ColumnData::String(Some(v.into()))),
            (Self::DateTime(v), ColumnType::Datetime2) => Some(v.into_sql()),
            // a nullable `datetime` reports as Datetimen
            (Self::DateTime(v), ColumnType::Datetime | ColumnType::Datetimen) => Self::datetime(v),
            (Self::DateTime(v), ColumnType::Datetime4) => Self::smalldatetime(v),
            _ => None,
        }
    }

    fn integer(v: i64, ty: ColumnType) -> Option<ColumnData<'static>> {
        match ty {
            ColumnType::Int8 => Some(ColumnData::I64(Some(v))),
            ColumnType::Int4 => i32::try_from(v).ok().map(|v| ColumnData::I32(Some(v))),
            ColumnType::Int2 => i16::try_from(v).ok().map(|v| ColumnData::I16(Some(v))),
            ColumnType::Int1 => u8::try_from(v).ok().map(|v| ColumnData::U8(Some(v))),
            _ => None,
        }
    }

    /// Days since 1900-01-01 and seconds since midnight.
    fn epoch(v: NaiveDateTime) -> Option<(i64, u32, u32)> {
        let base = NaiveDate::from_ymd_opt(1900, 1, 1)?;
        let days = (v.date() - base).num_days();
        let nanos = v.time().nanosecond().min(999_999_999);
        Some((days, v.time().num_seconds_from_midnight(), nanos))
    }

    /// `datetime`: 1/300 second ticks.
    fn datetime(v: NaiveDateTime) -> Option<ColumnData<'static>> {
        let (days, seconds, nanos) = Self::epoch(v)?;
        let days = i32::try_from(days).ok()?;
        let ticks = seconds * 300 + (u64::from(nanos) * 300 / 1_000_000_000) as u32;
        Some(ColumnData::DateTime(Some(tiberius::time::DateTime::new(days, ticks))))
    }

    /// `smalldatetime`: whole minutes.
    fn smalldatetime(v: NaiveDateTime) -> Option<ColumnData<'static>> {
        let (days, seconds, _) = Self::epoch(v)?;
        let days = u16::try_from(days).ok()?;
        let minutes = (seconds / 60) as u16;
        Some(ColumnData::SmallDateTime(Some(tiberius::time::SmallDateTime::new(
            days, minutes,
        ))))
    }
}

/// Positional row serialization for the bulk-load path.
///
/// Field order must exactly match the column list of the corresponding
/// [`Schema`] implementation. Wire types are settled per column at flush
/// time by [`Value::encode`].
pub trait Row: Schema + Send {
    /// Values of this row in column order.
    fn values(self) -> Vec<Value>;
}

/// Row format for statement text.
///
/// - `NVarChar`: Statement hash
/// - `NVarChar`: Statement text
impl Row for SqlText {
    fn values(self) -> Vec<Value> {
        vec![
            //          (hash,     sql)
            Value::NVarChar(self.hash),
            Value::NVarChar(self.text),
        ]
    }
}

/// Row format for wait-event samples.
///
/// - `BigInt`: Test run id
/// - `NVarChar`: Statement hash
/// - `NVarChar`: Wait type
/// - `DateTime`: Classification time
/// - `Int`: Wait magnitude
impl Row for WaitEvent {
    fn values(self) -> Vec<Value> {
        vec![
            //          (test_run_id, hash, type, event_date, value)
            Value::BigInt(self.test_run),
            Value::NVarChar(self.hash),
            Value::NVarChar(self.kind),
            Value::DateTime(self.event_date),
            Value::Int(self.value),
        ]
    }
}
