use crate::{Result, VectorCodecError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Largest dimension the binary header can carry.
pub const MAX_DIM: usize = u16::MAX as usize;

/// `dim: u16` followed by `unused: u16`.
const HEADER_LEN: usize = 4;
const ELEMENT_LEN: usize = std::mem::size_of::<f32>();

/// How binary decoding treats the two reserved header bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedBytes {
    /// Skip them. Matches what servers emit today and accepts future layouts.
    #[default]
    Ignore,
    /// Fail the decode when they are not zero.
    Reject,
}

/// A dense float4 vector as stored by the `vector` extension type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn to_array(&self) -> Array1<f32> {
        Array1::from_vec(self.data.clone())
    }

    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Appends the binary wire form to `buf`.
    ///
    /// Layout (network byte order): `dim: u16 | unused: u16 = 0 | dim x f32`.
    /// Existing contents of `buf` are left in place so several values can share
    /// one message buffer.
    pub fn encode_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        let dim = u16::try_from(self.data.len()).map_err(|_| {
            VectorCodecError::EncodeError(format!(
                "vector has {} dimensions, binary format allows at most {}",
                self.data.len(),
                MAX_DIM
            ))
        })?;

        buf.reserve(HEADER_LEN + ELEMENT_LEN * self.data.len());
        let write_err = |e: std::io::Error| VectorCodecError::EncodeError(format!("Failed to write vector: {}", e));

        buf.write_u16::<BigEndian>(dim).map_err(write_err)?;
        buf.write_u16::<BigEndian>(0).map_err(write_err)?;
        for value in &self.data {
            buf.write_f32::<BigEndian>(*value).map_err(write_err)?;
        }

        Ok(())
    }

    /// Appends the text wire form (`[1,2.5]`) to `buf`.
    pub fn encode_text(&self, buf: &mut Vec<u8>) -> Result<()> {
        write!(buf, "{}", self)
            .map_err(|e| VectorCodecError::EncodeError(format!("Failed to write vector text: {}", e)))
    }

    /// Decodes the binary wire form, ignoring the reserved header bytes.
    pub fn decode_binary(src: &[u8]) -> Result<Self> {
        Self::decode_binary_with(src, ReservedBytes::Ignore)
    }

    /// Decodes the binary wire form. `src` must hold exactly `4 + 4 * dim` bytes.
    pub fn decode_binary_with(src: &[u8], reserved: ReservedBytes) -> Result<Self> {
        if src.len() < HEADER_LEN {
            return Err(VectorCodecError::DecodeError(format!(
                "insufficient data for vector header: got {} bytes, need {}",
                src.len(),
                HEADER_LEN
            )));
        }

        let mut rdr = src;
        let read_err = |e: std::io::Error| VectorCodecError::DecodeError(format!("Failed to read vector: {}", e));

        let dim = rdr.read_u16::<BigEndian>().map_err(read_err)? as usize;
        let unused = rdr.read_u16::<BigEndian>().map_err(read_err)?;
        if reserved == ReservedBytes::Reject && unused != 0 {
            return Err(VectorCodecError::DecodeError(format!(
                "reserved vector header bytes must be zero, got {:#06x}",
                unused
            )));
        }

        let expected = ELEMENT_LEN * dim;
        if rdr.len() < expected {
            return Err(VectorCodecError::DecodeError(format!(
                "insufficient data for {} dimensions: got {} bytes, need {}",
                dim,
                rdr.len(),
                expected
            )));
        }
        if rdr.len() > expected {
            return Err(VectorCodecError::DecodeError(format!(
                "trailing data after {} dimensions: {} extra bytes",
                dim,
                rdr.len() - expected
            )));
        }

        let mut data = Vec::with_capacity(dim);
        for _ in 0..dim {
            data.push(rdr.read_f32::<BigEndian>().map_err(read_err)?);
        }

        Ok(Self { data })
    }

    /// Decodes the text wire form. The bytes must be UTF-8.
    pub fn decode_text(src: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(src)
            .map_err(|e| VectorCodecError::ParseError(format!("vector text is not valid UTF-8: {}", e)))?;
        text.parse()
    }
}

impl fmt::Display for Vector {
    // f32's Display is the shortest string that parses back to the same bits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

impl FromStr for Vector {
    type Err = VectorCodecError;

    fn from_str(s: &str) -> Result<Self> {
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| VectorCodecError::ParseError(format!("vector text must be enclosed in brackets: {:?}", s)))?;

        if inner.trim().is_empty() {
            return Ok(Self::default());
        }

        let data = inner
            .split(',')
            .enumerate()
            .map(|(i, element)| {
                let element = element.trim();
                if element.is_empty() {
                    return Err(VectorCodecError::ParseError(format!("empty vector element at position {}", i)));
                }
                element.parse::<f32>().map_err(|e| {
                    VectorCodecError::ParseError(format!("invalid vector element {:?} at position {}: {}", element, i, e))
                })
            })
            .collect::<Result<Vec<f32>>>()?;

        Ok(Self { data })
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl From<&[f32]> for Vector {
    fn from(data: &[f32]) -> Self {
        Self::new(data.to_vec())
    }
}

impl From<Array1<f32>> for Vector {
    fn from(data: Array1<f32>) -> Self {
        Self::new(data.to_vec())
    }
}

impl From<Vector> for Vec<f32> {
    fn from(vector: Vector) -> Self {
        vector.into_vec()
    }
}

impl AsRef<[f32]> for Vector {
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_big_endian() {
        let mut buf = Vec::new();
        Vector::new(vec![1.0]).encode_binary(&mut buf).unwrap();
        assert_eq!(buf, [0x00, 0x01, 0x00, 0x00, 0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn reserved_bytes_policy() {
        let src = [0x00, 0x01, 0xAB, 0xCD, 0x3F, 0x80, 0x00, 0x00];
        assert_eq!(Vector::decode_binary(&src).unwrap().as_slice(), &[1.0]);
        assert!(matches!(
            Vector::decode_binary_with(&src, ReservedBytes::Reject),
            Err(VectorCodecError::DecodeError(_))
        ));
    }

    #[test]
    fn oversized_vector_is_not_truncated() {
        let vector = Vector::new(vec![0.0; MAX_DIM + 1]);
        let mut buf = vec![0xFF];
        assert!(matches!(vector.encode_binary(&mut buf), Err(VectorCodecError::EncodeError(_))));
        assert_eq!(buf, [0xFF]);
    }

    #[test]
    fn text_tolerates_whitespace() {
        let vector: Vector = " [ 1 , 2.5 ] ".parse().unwrap();
        assert_eq!(vector.as_slice(), &[1.0, 2.5]);
    }
}
