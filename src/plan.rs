//! Encode and scan strategies handed out by codecs.
//!
//! A plan is chosen once per parameter or column (by value type and wire
//! format) and then invoked for each value. Plans carry no state, so the vector
//! plans are zero-sized and shared as `&'static` references.

use crate::{vector::Vector, Result, VectorCodecError};
use std::any::Any;

/// Serializes a query parameter into an outgoing message buffer.
pub trait EncodePlan: Send + Sync {
    /// Appends the encoded form of `value` to `buf`.
    fn encode(&self, value: &dyn Any, buf: &mut Vec<u8>) -> Result<()>;
}

/// Deserializes a result column into a caller-owned target.
pub trait ScanPlan: Send + Sync {
    /// Decodes `src` into `dst`. On failure `dst` is left as it was.
    fn scan(&self, src: &[u8], dst: &mut dyn Any) -> Result<()>;
}

fn encode_source(value: &dyn Any) -> Result<&Vector> {
    value
        .downcast_ref::<Vector>()
        .ok_or_else(|| VectorCodecError::PlanError("vector encode plan invoked with a non-vector value".to_string()))
}

fn scan_target(dst: &mut dyn Any) -> Result<&mut Vector> {
    dst.downcast_mut::<Vector>()
        .ok_or_else(|| VectorCodecError::PlanError("vector scan plan invoked with a non-vector target".to_string()))
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct EncodePlanVectorBinary;

impl EncodePlan for EncodePlanVectorBinary {
    fn encode(&self, value: &dyn Any, buf: &mut Vec<u8>) -> Result<()> {
        encode_source(value)?.encode_binary(buf)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct EncodePlanVectorText;

impl EncodePlan for EncodePlanVectorText {
    fn encode(&self, value: &dyn Any, buf: &mut Vec<u8>) -> Result<()> {
        encode_source(value)?.encode_text(buf)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanPlanVectorBinary;

impl ScanPlan for ScanPlanVectorBinary {
    fn scan(&self, src: &[u8], dst: &mut dyn Any) -> Result<()> {
        let target = scan_target(dst)?;
        *target = Vector::decode_binary(src)?;
        Ok(())
    }
}

/// Binary scan that rejects nonzero reserved header bytes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanPlanVectorBinaryStrict;

impl ScanPlan for ScanPlanVectorBinaryStrict {
    fn scan(&self, src: &[u8], dst: &mut dyn Any) -> Result<()> {
        let target = scan_target(dst)?;
        *target = Vector::decode_binary_with(src, crate::vector::ReservedBytes::Reject)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanPlanVectorText;

impl ScanPlan for ScanPlanVectorText {
    fn scan(&self, src: &[u8], dst: &mut dyn Any) -> Result<()> {
        let target = scan_target(dst)?;
        *target = Vector::decode_text(src)?;
        Ok(())
    }
}
