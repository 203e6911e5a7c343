use crate::format::{Format, FormatCode, BINARY_FORMAT_CODE};
use crate::plan::{
    EncodePlan, EncodePlanVectorBinary, EncodePlanVectorText, ScanPlan, ScanPlanVectorBinary,
    ScanPlanVectorBinaryStrict, ScanPlanVectorText,
};
use crate::vector::{ReservedBytes, Vector};
use crate::{Result, VectorCodecError};
use log::trace;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type name the extension declares for its column type.
pub const DEFAULT_TYPE_NAME: &str = "vector";

/// Plugin contract a driver's type map expects from a per-type codec.
///
/// Every method is a pure function of its arguments. `None` from a plan query
/// means "not mine", so the driver can fall through to another codec; it is
/// never used to report a malformed value.
pub trait Codec: Send + Sync {
    fn format_supported(&self, format: FormatCode) -> bool;

    fn preferred_format(&self) -> FormatCode;

    fn plan_encode(&self, oid: u32, format: FormatCode, value: &dyn Any) -> Option<&'static dyn EncodePlan>;

    fn plan_scan(&self, oid: u32, format: FormatCode, target: &dyn Any) -> Option<&'static dyn ScanPlan>;

    /// Decodes into a freshly allocated, dynamically typed value.
    /// A SQL NULL (`src == None`) yields `Ok(None)`.
    fn decode_value(
        &self,
        oid: u32,
        format: FormatCode,
        src: Option<&[u8]>,
    ) -> Result<Option<Box<dyn Any + Send + Sync>>>;

    fn decode_database_sql_value(
        &self,
        oid: u32,
        format: FormatCode,
        src: Option<&[u8]>,
    ) -> Result<Option<Box<dyn Any + Send + Sync>>> {
        self.decode_value(oid, format, src)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Name the vector type is registered under in the server catalog.
    pub type_name: String,
    pub reserved_bytes: ReservedBytes,
}

impl CodecConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| VectorCodecError::SerializationError(format!("Failed to parse codec config: {}", e)))
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            type_name: DEFAULT_TYPE_NAME.to_string(),
            reserved_bytes: ReservedBytes::Ignore,
        }
    }
}

/// Codec for the `vector` column type, in both text and binary format.
#[derive(Debug, Clone, Default)]
pub struct VectorCodec {
    config: CodecConfig,
}

impl VectorCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Typed form of [`Codec::decode_value`].
    pub fn decode_vector(&self, format: FormatCode, src: Option<&[u8]>) -> Result<Option<Vector>> {
        let src = match src {
            Some(src) => src,
            None => return Ok(None),
        };

        let mut vector = Vector::default();
        let plan = self.plan_scan(0, format, &vector).ok_or_else(|| {
            VectorCodecError::PlanError(format!("Unable to decode vector type in format code {}", format))
        })?;
        plan.scan(src, &mut vector)?;

        Ok(Some(vector))
    }
}

impl Codec for VectorCodec {
    fn format_supported(&self, format: FormatCode) -> bool {
        Format::from_code(format).is_some()
    }

    fn preferred_format(&self) -> FormatCode {
        BINARY_FORMAT_CODE
    }

    fn plan_encode(&self, oid: u32, format: FormatCode, value: &dyn Any) -> Option<&'static dyn EncodePlan> {
        if !value.is::<Vector>() {
            trace!("vector codec declines encode for oid {}: value is not a Vector", oid);
            return None;
        }

        let plan: &'static dyn EncodePlan = match Format::from_code(format)? {
            Format::Binary => &EncodePlanVectorBinary,
            Format::Text => &EncodePlanVectorText,
        };
        Some(plan)
    }

    fn plan_scan(&self, oid: u32, format: FormatCode, target: &dyn Any) -> Option<&'static dyn ScanPlan> {
        if !target.is::<Vector>() {
            trace!("vector codec declines scan for oid {}: target is not a Vector", oid);
            return None;
        }

        let plan: &'static dyn ScanPlan = match Format::from_code(format)? {
            Format::Binary => match self.config.reserved_bytes {
                ReservedBytes::Ignore => &ScanPlanVectorBinary,
                ReservedBytes::Reject => &ScanPlanVectorBinaryStrict,
            },
            Format::Text => &ScanPlanVectorText,
        };
        Some(plan)
    }

    fn decode_value(
        &self,
        _oid: u32,
        format: FormatCode,
        src: Option<&[u8]>,
    ) -> Result<Option<Box<dyn Any + Send + Sync>>> {
        Ok(self
            .decode_vector(format, src)?
            .map(|vector| Box::new(vector) as Box<dyn Any + Send + Sync>))
    }
}
