//! Minimal stand-in for a driver's type map.
//!
//! The driver owns the real registry. This module models the part of it the
//! vector codec plugs into: codecs keyed by server OID, looked up when a
//! parameter is bound or a column is read.

use crate::codec::{Codec, CodecConfig, VectorCodec};
use crate::format::FormatCode;
use crate::plan::{EncodePlan, ScanPlan};
use crate::{Result, VectorCodecError};
use log::debug;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A server type and the codec that handles it.
#[derive(Clone)]
pub struct DataType {
    pub name: String,
    pub oid: u32,
    pub codec: Arc<dyn Codec>,
}

impl DataType {
    pub fn new(name: impl Into<String>, oid: u32, codec: Arc<dyn Codec>) -> Self {
        Self {
            name: name.into(),
            oid,
            codec,
        }
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataType")
            .field("name", &self.name)
            .field("oid", &self.oid)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct TypeMap {
    types: HashMap<u32, DataType>,
    names: HashMap<String, u32>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `data_type`, replacing any type already registered under the
    /// same OID or name.
    pub fn register_type(&mut self, data_type: DataType) {
        debug!("registering type {} with oid {}", data_type.name, data_type.oid);
        if let Some(previous) = self.types.remove(&data_type.oid) {
            self.names.remove(&previous.name);
        }
        if let Some(previous_oid) = self.names.remove(&data_type.name) {
            self.types.remove(&previous_oid);
        }
        self.names.insert(data_type.name.clone(), data_type.oid);
        self.types.insert(data_type.oid, data_type);
    }

    pub fn type_for_oid(&self, oid: u32) -> Option<&DataType> {
        self.types.get(&oid)
    }

    pub fn type_for_name(&self, name: &str) -> Option<&DataType> {
        self.names.get(name).and_then(|oid| self.types.get(oid))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn plan_encode(&self, oid: u32, format: FormatCode, value: &dyn Any) -> Option<&'static dyn EncodePlan> {
        self.type_for_oid(oid)?.codec.plan_encode(oid, format, value)
    }

    pub fn plan_scan(&self, oid: u32, format: FormatCode, target: &dyn Any) -> Option<&'static dyn ScanPlan> {
        self.type_for_oid(oid)?.codec.plan_scan(oid, format, target)
    }

    /// Plans and runs an encode, appending to `buf`.
    pub fn encode(&self, oid: u32, format: FormatCode, value: &dyn Any, buf: &mut Vec<u8>) -> Result<()> {
        let plan = self.plan_encode(oid, format, value).ok_or_else(|| {
            VectorCodecError::PlanError(format!("Unable to encode value as oid {} in format code {}", oid, format))
        })?;
        plan.encode(value, buf)
    }

    /// Plans and runs a scan into `dst`.
    pub fn scan(&self, oid: u32, format: FormatCode, src: &[u8], dst: &mut dyn Any) -> Result<()> {
        let plan = self.plan_scan(oid, format, &*dst).ok_or_else(|| {
            VectorCodecError::PlanError(format!("Unable to scan oid {} in format code {}", oid, format))
        })?;
        plan.scan(src, dst)
    }

    pub fn decode_value(
        &self,
        oid: u32,
        format: FormatCode,
        src: Option<&[u8]>,
    ) -> Result<Option<Box<dyn Any + Send + Sync>>> {
        let data_type = self
            .type_for_oid(oid)
            .ok_or_else(|| VectorCodecError::PlanError(format!("No codec registered for oid {}", oid)))?;
        data_type.codec.decode_value(oid, format, src)
    }
}

/// Registers the vector codec under the OID the server assigned to
/// `config.type_name`.
///
/// `resolve_oid` is the driver's catalog lookup, typically
/// `SELECT $1::regtype::oid`. Its errors are returned unchanged.
pub fn register_types<F>(map: &mut TypeMap, config: CodecConfig, resolve_oid: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<u32>,
{
    let oid = resolve_oid(&config.type_name)?;
    let name = config.type_name.clone();
    map.register_type(DataType::new(name, oid, Arc::new(VectorCodec::new(config))));
    Ok(())
}
