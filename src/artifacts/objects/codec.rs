//! Object header codec
//!
//! Every stored object shares the same framing: `<type> <len>\0<payload>`
//! where `<len>` is the decimal ASCII length of the payload. The framed
//! bytes are what gets hashed into an [`ObjectId`](super::object_id::ObjectId)
//! and what gets compressed on disk.

use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::CodecError;
use bytes::Bytes;

/// Frame `payload` with its object header
pub fn encode(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut object_bytes = Vec::with_capacity(header.len() + payload.len());
    object_bytes.extend_from_slice(header.as_bytes());
    object_bytes.extend_from_slice(payload);

    Bytes::from(object_bytes)
}

/// Split framed bytes into their type and payload
///
/// The payload is exactly `<len>` bytes long; anything past it is ignored.
pub fn decode(data: &[u8]) -> Result<(ObjectType, Bytes), CodecError> {
    let space = data
        .iter()
        .position(|&b| b == b' ')
        .ok_or(CodecError::MalformedHeader("missing type separator"))?;
    let object_type = ObjectType::try_from(&data[..space])?;

    let length_start = space + 1;
    let nul = data[length_start..]
        .iter()
        .position(|&b| b == 0)
        .map(|offset| length_start + offset)
        .ok_or(CodecError::MalformedHeader("missing header terminator"))?;

    let length_token = &data[length_start..nul];
    let length = parse_length(length_token).ok_or_else(|| {
        CodecError::MalformedLength(String::from_utf8_lossy(length_token).into_owned())
    })?;

    let payload = &data[nul + 1..];
    if payload.len() < length {
        return Err(CodecError::TruncatedPayload {
            expected: length,
            actual: payload.len(),
        });
    }

    Ok((object_type, Bytes::copy_from_slice(&payload[..length])))
}

fn parse_length(token: &[u8]) -> Option<usize> {
    if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
        return None;
    }

    std::str::from_utf8(token).ok()?.parse().ok()
}
