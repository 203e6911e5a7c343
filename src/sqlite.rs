use crate::vector::Vector;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};

// Stored as a BLOB in the binary wire layout so rows can be copied to a
// `vector` column byte for byte.
impl ToSql for Vector {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let mut buf = Vec::new();
        self.encode_binary(&mut buf)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::Owned(Value::Blob(buf)))
    }
}

impl FromSql for Vector {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Blob(bytes) => Vector::decode_binary(bytes).map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Text(bytes) => Vector::decode_text(bytes).map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}
