//! Fixed-width point/scalar byte encodings for [`super`] (spec §6 "Point
//! encoding": 64-byte concatenation of 32-byte big-endian x and y).
//!
//! `generic_ec::Point` does not expose raw affine coordinates directly (the
//! crate deliberately keeps curve backends interchangeable); the teacher
//! reaches its transcript bytes via `Point::to_bytes(compressed)`
//! (`data.x.to_bytes(true)` in
//! `group_element_vs_paillier_encryption_in_range.rs`). This module derives
//! the spec's x-only and x‖y encodings from that same call, by stripping the
//! SEC1 parity/tag prefix byte.

use generic_ec::{Curve, Point};

/// The point's x-coordinate only, 32-byte big-endian, used for the
/// Fiat-Shamir transcript step `L.x` in spec §4.3.
pub fn x_only(point: &Point<impl Curve>) -> [u8; 32] {
    let compressed = point.to_bytes(true);
    let bytes = compressed.as_bytes();
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes[bytes.len() - 32..]);
    out
}

/// The point's x‖y coordinates, 64 bytes total, the wire encoding of spec
/// §6 ("Point encoding").
pub fn xy(point: &Point<impl Curve>) -> [u8; 64] {
    let uncompressed = point.to_bytes(false);
    let bytes = uncompressed.as_bytes();
    let mut out = [0u8; 64];
    out.copy_from_slice(&bytes[bytes.len() - 64..]);
    out
}
