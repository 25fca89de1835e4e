//! Base58 point encoding for text logs (spec §6: "optionally wrapped in
//! Base58 for text logs"), resolved into a concrete implementation from
//! `original_source/Simulation.py`'s `serialize_point`/`deserialize_point`,
//! which literally calls `base58.b58encode`/`b58decode` over the point's
//! raw `x || y` bytes.

use generic_ec::{Curve, Point};

use super::point_codec;

/// Encodes `point` as Base58 of its 64-byte `x || y` encoding.
pub fn encode_point_b58(point: &Point<impl Curve>) -> String {
    bs58::encode(point_codec::xy(point)).into_string()
}

/// Decodes a Base58 string produced by [`encode_point_b58`] back into a
/// curve point. Returns `None` for malformed input (bad Base58 alphabet,
/// wrong length, or coordinates that are not on the curve) rather than
/// panicking, since this path is reachable from untrusted text logs.
pub fn decode_point_b58<C: Curve>(encoded: &str) -> Option<Point<C>> {
    let raw = bs58::decode(encoded).into_vec().ok()?;
    if raw.len() != 64 {
        return None;
    }
    let mut uncompressed = [0u8; 65];
    uncompressed[0] = 0x04;
    uncompressed[1..].copy_from_slice(&raw);
    Point::from_bytes(uncompressed).ok()
}
