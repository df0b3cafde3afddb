use super::{SoftDeleteDeleteClause, SoftDeleteField, SoftDeleteQueryClause, SoftDeleteUpdateClause};
use crate::{DbErr, Field, FieldClauses, Schema, StatementModifier, Value, is_null};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use sea_query::{ArrayType, ColumnType, Nullable, ValueType, ValueTypeErr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

/// A nullable `DateTime<Utc>` that turns its column into a soft delete column.
///
/// `None` means the row is not deleted; `Some(t)` means it was deleted at `t`.
/// Attach it to a field with [Field::with_clauses] to have reads and updates skip
/// deleted rows and deletes rewritten into updates.
#[derive(derive_more::Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[debug("{_0:?}")]
pub struct DeletedAt(pub Option<DateTime<Utc>>);

impl DeletedAt {
    /// Deleted at the given time
    pub fn at(time: DateTime<Utc>) -> Self {
        Self(Some(time))
    }

    /// Not deleted
    pub fn none() -> Self {
        Self(None)
    }

    /// Whether the row is deleted
    pub fn is_deleted(&self) -> bool {
        self.0.is_some()
    }

    /// Read a value coming from storage
    pub fn scan(value: Value) -> Result<Self, DbErr> {
        if is_null(&value) {
            return Ok(Self(None));
        }
        if let Ok(t) = <DateTime<Utc> as ValueType>::try_from(value.clone()) {
            return Ok(Self(Some(t)));
        }
        if let Ok(t) = <NaiveDateTime as ValueType>::try_from(value.clone()) {
            return Ok(Self(Some(Utc.from_utc_datetime(&t))));
        }
        if let Ok(t) = <DateTime<FixedOffset> as ValueType>::try_from(value.clone()) {
            return Ok(Self(Some(t.with_timezone(&Utc))));
        }
        if let Ok(t) = <DateTime<Local> as ValueType>::try_from(value.clone()) {
            return Ok(Self(Some(t.with_timezone(&Utc))));
        }
        if let Ok(s) = <String as ValueType>::try_from(value.clone()) {
            return parse_storage_text(&s)
                .map(|t| Self(Some(t)))
                .ok_or_else(|| DbErr::Scan(format!("cannot parse `{s}` as DeletedAt")));
        }
        Err(DbErr::Scan(format!("cannot scan {value:?} as DeletedAt")))
    }

    /// Encode as JSON text: `null`, or the RFC 3339 time
    pub fn to_json(&self) -> Result<String, DbErr> {
        serde_json::to_string(self).map_err(|e| DbErr::Type(e.to_string()))
    }

    /// Decode JSON text: `null`, or a time string
    pub fn from_json(bytes: &[u8]) -> Result<Self, DbErr> {
        serde_json::from_slice(bytes).map_err(|e| DbErr::Parse(e.to_string()))
    }
}

fn parse_storage_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f %:z") {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|t| Utc.from_utc_datetime(&t))
}

impl From<DateTime<Utc>> for DeletedAt {
    fn from(time: DateTime<Utc>) -> Self {
        Self(Some(time))
    }
}

impl From<Option<DateTime<Utc>>> for DeletedAt {
    fn from(time: Option<DateTime<Utc>>) -> Self {
        Self(time)
    }
}

impl From<DeletedAt> for Value {
    fn from(source: DeletedAt) -> Self {
        source.0.into()
    }
}

impl TryFrom<Value> for DeletedAt {
    type Error = DbErr;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::scan(value)
    }
}

impl ValueType for DeletedAt {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        Self::scan(v).map_err(|_| ValueTypeErr)
    }

    fn type_name() -> String {
        stringify!(DeletedAt).to_owned()
    }

    fn array_type() -> ArrayType {
        <DateTime<Utc> as ValueType>::array_type()
    }

    fn column_type() -> ColumnType {
        <DateTime<Utc> as ValueType>::column_type()
    }
}

impl Nullable for DeletedAt {
    fn null() -> Value {
        <DateTime<Utc> as Nullable>::null()
    }
}

impl Deref for DeletedAt {
    type Target = Option<DateTime<Utc>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DeletedAt {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Serialize for DeletedAt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.0 {
            Some(time) => time.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DeletedAt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer).map(Self)
    }
}

impl FieldClauses for DeletedAt {
    fn query_clauses(schema: &Schema, field: &Field) -> Vec<Arc<dyn StatementModifier>> {
        vec![Arc::new(SoftDeleteQueryClause(SoftDeleteField::resolve(
            schema, field,
        )))]
    }

    fn update_clauses(schema: &Schema, field: &Field) -> Vec<Arc<dyn StatementModifier>> {
        vec![Arc::new(SoftDeleteUpdateClause(SoftDeleteField::resolve(
            schema, field,
        )))]
    }

    fn delete_clauses(schema: &Schema, field: &Field) -> Vec<Arc<dyn StatementModifier>> {
        vec![Arc::new(SoftDeleteDeleteClause(SoftDeleteField::resolve(
            schema, field,
        )))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn scan_null() {
        assert_eq!(DeletedAt::scan(Value::ChronoDateTimeUtc(None)), Ok(DeletedAt::none()));
        assert_eq!(DeletedAt::scan(Value::String(None)), Ok(DeletedAt::none()));
        assert_eq!(DeletedAt::scan(Value::Int(None)), Ok(DeletedAt::none()));
    }

    #[test]
    fn scan_times() {
        assert_eq!(DeletedAt::scan(time().into()), Ok(DeletedAt::at(time())));

        let naive = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(DeletedAt::scan(naive.into()), Ok(DeletedAt::at(time())));

        let offset = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, 7, 6, 7)
            .unwrap();
        assert_eq!(DeletedAt::scan(offset.into()), Ok(DeletedAt::at(time())));

        assert_eq!(
            DeletedAt::scan("2024-03-04 05:06:07".into()),
            Ok(DeletedAt::at(time()))
        );
        assert_eq!(
            DeletedAt::scan("2024-03-04T05:06:07Z".into()),
            Ok(DeletedAt::at(time()))
        );
    }

    #[test]
    fn scan_error() {
        assert!(matches!(DeletedAt::scan(1.into()), Err(DbErr::Scan(_))));
        assert!(matches!(DeletedAt::scan(true.into()), Err(DbErr::Scan(_))));
        assert!(matches!(
            DeletedAt::scan("yesterday".into()),
            Err(DbErr::Scan(_))
        ));
    }

    #[test]
    fn into_value() {
        assert_eq!(Value::from(DeletedAt::none()), Value::ChronoDateTimeUtc(None));
        assert_eq!(Value::from(DeletedAt::at(time())), Value::from(time()));
        assert_eq!(<DeletedAt as Nullable>::null(), Value::ChronoDateTimeUtc(None));
        assert_eq!(
            <DeletedAt as ValueType>::try_from(Value::from(time())).ok(),
            Some(DeletedAt::at(time()))
        );
        assert!(<DeletedAt as ValueType>::try_from(Value::from(1)).is_err());
    }

    #[test]
    fn json() {
        assert_eq!(DeletedAt::none().to_json(), Ok("null".to_owned()));
        assert_eq!(DeletedAt::from_json(b"null"), Ok(DeletedAt::none()));

        let deleted = DeletedAt::at(time());
        let json = deleted.to_json().unwrap();
        assert_eq!(json, r#""2024-03-04T05:06:07Z""#);
        assert_eq!(DeletedAt::from_json(json.as_bytes()), Ok(deleted));

        assert!(matches!(
            DeletedAt::from_json(br#""not a time""#),
            Err(DbErr::Parse(_))
        ));
        assert!(matches!(DeletedAt::from_json(b"42"), Err(DbErr::Parse(_))));
    }

    #[test]
    fn deref() {
        let mut deleted = DeletedAt::none();
        assert!(!deleted.is_deleted());
        *deleted = Some(time());
        assert!(deleted.is_deleted());
        assert_eq!(deleted.map(|t| t.timestamp()), Some(time().timestamp()));
    }
}
