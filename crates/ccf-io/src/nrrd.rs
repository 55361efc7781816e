// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Minimal NRRD codec for integer label volumes.

Handles what the published annotation volumes use (3-D, integer element
types, raw or gzip encoding, attached data) plus ASCII payloads. Detached
headers (`data file`) and floating point volumes are rejected.

Payload order is NRRD order: the first axis varies fastest.
*/

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{Array3, ShapeBuilder};

use crate::error::{AtlasIoError, AtlasIoResult};

const MAGIC_PREFIX: &str = "NRRD000";

/// Integer element types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NrrdType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
}

impl NrrdType {
    fn parse(value: &str) -> AtlasIoResult<Self> {
        let normalized = value.trim().to_lowercase();
        let element_type = match normalized.as_str() {
            "signed char" | "int8" | "int8_t" => NrrdType::I8,
            "uchar" | "unsigned char" | "uint8" | "uint8_t" => NrrdType::U8,
            "short" | "short int" | "signed short" | "signed short int" | "int16" | "int16_t" => {
                NrrdType::I16
            }
            "ushort" | "unsigned short" | "unsigned short int" | "uint16" | "uint16_t" => {
                NrrdType::U16
            }
            "int" | "signed int" | "int32" | "int32_t" => NrrdType::I32,
            "uint" | "unsigned int" | "uint32" | "uint32_t" => NrrdType::U32,
            "longlong" | "long long" | "long long int" | "signed long long"
            | "signed long long int" | "int64" | "int64_t" => NrrdType::I64,
            "ulonglong" | "unsigned long long" | "unsigned long long int" | "uint64"
            | "uint64_t" => NrrdType::U64,
            "float" | "double" | "block" => {
                return Err(AtlasIoError::unsupported(format!(
                    "element type '{}' is not an integer label type",
                    value.trim()
                )))
            }
            _ => {
                return Err(AtlasIoError::invalid(format!(
                    "unknown element type '{}'",
                    value.trim()
                )))
            }
        };
        Ok(element_type)
    }

    /// Bytes per element
    pub fn size(self) -> usize {
        match self {
            NrrdType::I8 | NrrdType::U8 => 1,
            NrrdType::I16 | NrrdType::U16 => 2,
            NrrdType::I32 | NrrdType::U32 => 4,
            NrrdType::I64 | NrrdType::U64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NrrdEncoding {
    Raw,
    Gzip,
    Ascii,
}

impl NrrdEncoding {
    fn parse(value: &str) -> AtlasIoResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "raw" => Ok(NrrdEncoding::Raw),
            "gzip" | "gz" => Ok(NrrdEncoding::Gzip),
            "ascii" | "text" | "txt" => Ok(NrrdEncoding::Ascii),
            other => Err(AtlasIoError::unsupported(format!("encoding '{}'", other))),
        }
    }

    fn name(self) -> &'static str {
        match self {
            NrrdEncoding::Raw => "raw",
            NrrdEncoding::Gzip => "gzip",
            NrrdEncoding::Ascii => "ascii",
        }
    }
}

/// Parsed NRRD header
#[derive(Debug, Clone, PartialEq)]
pub struct NrrdHeader {
    pub element_type: NrrdType,
    pub sizes: [usize; 3],
    pub endian: Endian,
    pub encoding: NrrdEncoding,
    /// Every other field, in file order (e.g. `space directions`)
    pub fields: Vec<(String, String)>,
}

impl NrrdHeader {
    /// Voxels described by `sizes`; saturates instead of overflowing
    pub fn voxel_count(&self) -> usize {
        self.sizes.iter().fold(1usize, |acc, &size| acc.saturating_mul(size))
    }

    /// Encoded payload length in bytes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNrrd` when `sizes` times the element size does not fit
    /// in `usize`
    pub fn payload_len(&self) -> AtlasIoResult<usize> {
        self.sizes
            .iter()
            .try_fold(self.element_type.size(), |acc, &size| acc.checked_mul(size))
            .ok_or_else(|| {
                AtlasIoError::invalid(format!("sizes {:?} overflow the payload length", self.sizes))
            })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Read a header, leaving `reader` positioned at the start of the payload
pub fn read_nrrd_header<R: BufRead>(reader: &mut R) -> AtlasIoResult<NrrdHeader> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if !line.trim_end().starts_with(MAGIC_PREFIX) {
        return Err(AtlasIoError::invalid("missing NRRD000x magic line"));
    }

    let mut element_type = None;
    let mut dimension = None;
    let mut sizes = None;
    let mut endian = None;
    let mut encoding = None;
    let mut fields = Vec::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(AtlasIoError::invalid("header ended before the blank separator line"));
        }
        let entry = line.trim_end_matches(['\r', '\n']);
        if entry.is_empty() {
            break;
        }
        if entry.starts_with('#') {
            continue;
        }
        // key:=value pairs carry no geometry
        if entry.contains(":=") {
            continue;
        }
        let Some((key, value)) = entry.split_once(": ") else {
            return Err(AtlasIoError::invalid(format!("malformed header line '{}'", entry)));
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "type" => element_type = Some(NrrdType::parse(value)?),
            "dimension" => {
                dimension = Some(value.parse::<usize>().map_err(|_| {
                    AtlasIoError::invalid(format!("dimension '{}' is not a number", value))
                })?)
            }
            "sizes" => sizes = Some(parse_sizes(value)?),
            "endian" => {
                endian = Some(match value.to_lowercase().as_str() {
                    "little" => Endian::Little,
                    "big" => Endian::Big,
                    other => {
                        return Err(AtlasIoError::invalid(format!("endian '{}'", other)));
                    }
                })
            }
            "encoding" => encoding = Some(NrrdEncoding::parse(value)?),
            "data file" | "datafile" => {
                return Err(AtlasIoError::unsupported("detached data files"));
            }
            "line skip" | "lineskip" | "byte skip" | "byteskip" if value != "0" => {
                return Err(AtlasIoError::unsupported(format!("{} {}", key, value)));
            }
            _ => fields.push((key, value.to_string())),
        }
    }

    let element_type = element_type.ok_or_else(|| AtlasIoError::invalid("missing 'type' field"))?;
    let dimension = dimension.ok_or_else(|| AtlasIoError::invalid("missing 'dimension' field"))?;
    if dimension != 3 {
        return Err(AtlasIoError::unsupported(format!(
            "dimension {} (label volumes are 3-D)",
            dimension
        )));
    }
    let sizes = sizes.ok_or_else(|| AtlasIoError::invalid("missing 'sizes' field"))?;
    let sizes: [usize; 3] = sizes.try_into().map_err(|sizes: Vec<usize>| {
        AtlasIoError::invalid(format!("dimension is 3 but sizes lists {} axes", sizes.len()))
    })?;
    let encoding = encoding.ok_or_else(|| AtlasIoError::invalid("missing 'encoding' field"))?;
    let endian = match endian {
        Some(endian) => endian,
        None if element_type.size() == 1 || encoding == NrrdEncoding::Ascii => Endian::Little,
        None => return Err(AtlasIoError::invalid("missing 'endian' field")),
    };

    let header = NrrdHeader {
        element_type,
        sizes,
        endian,
        encoding,
        fields,
    };
    header.payload_len()?;
    Ok(header)
}

fn parse_sizes(value: &str) -> AtlasIoResult<Vec<usize>> {
    value
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| AtlasIoError::invalid(format!("size '{}' is not a number", token)))
        })
        .collect()
}

/// Read a label volume from any NRRD stream, in native (file) axis order
pub fn read_nrrd_labels<R: BufRead>(mut reader: R) -> AtlasIoResult<(NrrdHeader, Array3<u32>)> {
    let header = read_nrrd_header(&mut reader)?;
    let count = header.voxel_count();

    let labels = match header.encoding {
        NrrdEncoding::Raw => decode_binary(&header, read_payload(&mut reader, &header)?)?,
        NrrdEncoding::Gzip => {
            let mut decoder = GzDecoder::new(reader);
            decode_binary(&header, read_payload(&mut decoder, &header)?)?
        }
        NrrdEncoding::Ascii => decode_ascii(&mut reader, count)?,
    };

    let [s0, s1, s2] = header.sizes;
    let volume = Array3::from_shape_vec((s0, s1, s2).f(), labels)
        .map_err(|e| AtlasIoError::invalid(format!("payload does not fit sizes: {}", e)))?;
    Ok((header, volume))
}

/// Read a label volume from an NRRD file, in native (file) axis order
pub fn read_nrrd_file(path: &Path) -> AtlasIoResult<(NrrdHeader, Array3<u32>)> {
    let file = File::open(path)?;
    read_nrrd_labels(BufReader::new(file))
}

/// Upper bound on the buffer reserved before any payload byte is read
const MAX_PREALLOCATION: usize = 1 << 24;

fn read_payload<R: Read>(reader: &mut R, header: &NrrdHeader) -> AtlasIoResult<Vec<u8>> {
    let expected = header.payload_len()?;
    // Sizes are untrusted; grow with the bytes actually present
    let mut bytes = Vec::with_capacity(expected.min(MAX_PREALLOCATION));
    reader.take(expected as u64).read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        return Err(AtlasIoError::invalid(format!(
            "payload truncated: expected {} bytes, got {}",
            expected,
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn decode_binary(header: &NrrdHeader, bytes: Vec<u8>) -> AtlasIoResult<Vec<u32>> {
    let little = header.endian == Endian::Little;
    match header.element_type {
        NrrdType::U8 => Ok(bytes.into_iter().map(u32::from).collect()),
        NrrdType::I8 => decode_chunks::<1>(&bytes, |b| i8::from_le_bytes(b) as i128),
        NrrdType::I16 => decode_chunks::<2>(&bytes, |b| {
            (if little { i16::from_le_bytes(b) } else { i16::from_be_bytes(b) }) as i128
        }),
        NrrdType::U16 => decode_chunks::<2>(&bytes, |b| {
            (if little { u16::from_le_bytes(b) } else { u16::from_be_bytes(b) }) as i128
        }),
        NrrdType::I32 => decode_chunks::<4>(&bytes, |b| {
            (if little { i32::from_le_bytes(b) } else { i32::from_be_bytes(b) }) as i128
        }),
        NrrdType::U32 => decode_chunks::<4>(&bytes, |b| {
            (if little { u32::from_le_bytes(b) } else { u32::from_be_bytes(b) }) as i128
        }),
        NrrdType::I64 => decode_chunks::<8>(&bytes, |b| {
            (if little { i64::from_le_bytes(b) } else { i64::from_be_bytes(b) }) as i128
        }),
        NrrdType::U64 => decode_chunks::<8>(&bytes, |b| {
            (if little { u64::from_le_bytes(b) } else { u64::from_be_bytes(b) }) as i128
        }),
    }
}

fn decode_chunks<const N: usize>(
    bytes: &[u8],
    decode: impl Fn([u8; N]) -> i128,
) -> AtlasIoResult<Vec<u32>> {
    bytes
        .chunks_exact(N)
        .enumerate()
        .map(|(index, chunk)| {
            let mut buf = [0u8; N];
            buf.copy_from_slice(chunk);
            to_label(decode(buf), index)
        })
        .collect()
}

fn to_label(value: i128, index: usize) -> AtlasIoResult<u32> {
    u32::try_from(value).map_err(|_| {
        AtlasIoError::invalid(format!(
            "value {} at element {} is not a valid structure ID",
            value, index
        ))
    })
}

fn decode_ascii<R: Read>(reader: &mut R, count: usize) -> AtlasIoResult<Vec<u32>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let labels = text
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            let value = token
                .parse::<i128>()
                .map_err(|_| AtlasIoError::invalid(format!("'{}' is not an integer", token)))?;
            to_label(value, index)
        })
        .collect::<AtlasIoResult<Vec<u32>>>()?;
    if labels.len() != count {
        return Err(AtlasIoError::invalid(format!(
            "expected {} values, found {}",
            count,
            labels.len()
        )));
    }
    Ok(labels)
}

/// Write `labels` (native axis order) as a `uint32` little-endian NRRD stream
pub fn write_nrrd_labels<W: Write>(
    mut writer: W,
    labels: &Array3<u32>,
    encoding: NrrdEncoding,
) -> AtlasIoResult<()> {
    let (s0, s1, s2) = labels.dim();
    writeln!(writer, "NRRD0004")?;
    writeln!(writer, "type: uint32")?;
    writeln!(writer, "dimension: 3")?;
    writeln!(writer, "sizes: {} {} {}", s0, s1, s2)?;
    writeln!(writer, "endian: little")?;
    writeln!(writer, "encoding: {}", encoding.name())?;
    writeln!(writer)?;

    // Reversing the axes makes logical iteration first-axis-fastest
    let ordered = labels.t();
    match encoding {
        NrrdEncoding::Raw => {
            for value in ordered.iter() {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        NrrdEncoding::Gzip => {
            let mut encoder = GzEncoder::new(&mut writer, Compression::default());
            for value in ordered.iter() {
                encoder.write_all(&value.to_le_bytes())?;
            }
            encoder.finish()?;
        }
        NrrdEncoding::Ascii => {
            for value in ordered.iter() {
                writeln!(writer, "{}", value)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write `labels` (native axis order) to an NRRD file
pub fn write_nrrd_file(path: &Path, labels: &Array3<u32>, encoding: NrrdEncoding) -> AtlasIoResult<()> {
    let file = File::create(path)?;
    write_nrrd_labels(BufWriter::new(file), labels, encoding)
}
