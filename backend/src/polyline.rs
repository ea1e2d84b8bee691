//! Encoded polyline format (Google / OpenRouteService).
//!
//! Each coordinate is stored as the delta from the previous one, scaled by
//! `10^precision`, zigzag-encoded and split into 5-bit chunks offset by 63.

use crate::models::Coordinate;

pub const DEFAULT_PRECISION: u32 = 5;

/// Shift of the seventh chunk, the last one a 32-bit value can need.
const MAX_SHIFT: u32 = 30;
const MAX_VALUE_BITS: u32 = 32;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const CHAR_OFFSET: u8 = 63;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    #[error("invalid polyline character {character:?} at position {position}")]
    InvalidCharacter { position: usize, character: char },
    #[error("polyline ends in the middle of a value at position {position}")]
    Truncated { position: usize },
    #[error("polyline value at position {position} does not fit in 32 bits")]
    Overflow { position: usize },
}

pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, PolylineError> {
    let factor = 10_f64.powi(precision as i32);
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut coordinates = Vec::with_capacity(bytes.len() / 4);

    while index < bytes.len() {
        lat += next_value(bytes, &mut index)?;
        if index >= bytes.len() {
            return Err(PolylineError::Truncated { position: index });
        }
        lng += next_value(bytes, &mut index)?;
        coordinates.push(Coordinate::new(lat as f64 / factor, lng as f64 / factor));
    }

    Ok(coordinates)
}

pub fn encode(path: &[Coordinate], precision: u32) -> String {
    let factor = 10_f64.powi(precision as i32);
    let mut encoded = String::with_capacity(path.len() * 8);
    let (mut prev_lat, mut prev_lng) = (0_i64, 0_i64);

    for coord in path {
        let lat = (coord.latitude * factor).round() as i64;
        let lng = (coord.longitude * factor).round() as i64;
        push_value(lat - prev_lat, &mut encoded);
        push_value(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let start = *index;
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(PolylineError::Truncated { position: *index });
        };
        if !(CHAR_OFFSET..=126).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position: *index,
                character: byte as char,
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { position: start });
        }

        let chunk = i64::from(byte - CHAR_OFFSET);
        *index += 1;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }
    if result >> MAX_VALUE_BITS != 0 {
        return Err(PolylineError::Overflow { position: start });
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn push_value(value: i64, out: &mut String) {
    let mut zigzag = if value < 0 { !(value << 1) } else { value << 1 };
    while zigzag >= CONTINUATION_BIT {
        out.push(char::from((CONTINUATION_BIT | (zigzag & CHUNK_MASK)) as u8 + CHAR_OFFSET));
        zigzag >>= 5;
    }
    out.push(char::from(zigzag as u8 + CHAR_OFFSET));
}
