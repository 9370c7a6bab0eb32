//! Canned OCR payloads and image headers for tests
#![allow(dead_code)]

use serde_json::{json, Value};

/// Locality every fixture deployment requires.
pub const LOCALITY: &str = "Bigte";

/// Smallest byte string `image::guess_format` recognizes as PNG, plus padding.
pub fn png_id() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

pub fn jpeg_id() -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

pub fn gif_upload() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x00\x00\x00".to_vec()
}

/// Proxy reply for a Bigte resident's ID.
pub fn remote_match() -> Value {
    json!({
        "success": true,
        "ok": true,
        "hasMatch": true,
        "fullText": "REPUBLIC OF THE PHILIPPINES\nBARANGAY BIGTE, NORZAGARAY, BULACAN",
        "firstName": "Juan",
        "middleName": "",
        "lastName": "Dela Cruz"
    })
}

/// Proxy reply for an ID from another barangay.
pub fn remote_no_match() -> Value {
    json!({
        "success": true,
        "ok": true,
        "hasMatch": false,
        "fullText": "BARANGAY BUNGA, PLARIDEL",
        "firstName": "Maria",
        "middleName": "Santos",
        "lastName": "Reyes"
    })
}

/// Well-formed reply where the proxy itself failed.
pub fn remote_semantic_failure() -> Value {
    json!({ "success": true, "ok": false, "error": "vision quota exceeded" })
}

pub const LOCAL_TEXT_BIGTE: &str = "Resident of Bigte, Norzagaray";

pub const LOCAL_TEXT_WITH_NAME: &str =
    "REPUBLIC OF THE PHILIPPINES\nName: Pedro Bautista Santos\nBARANGAY BIGTE, BULACAN";

pub const LOCAL_TEXT_BUNGA: &str = "Barangay Bunga";
