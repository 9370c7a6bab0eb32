pub mod extraction;
pub mod gate;
pub mod local_ocr;
pub mod remote_ocr;
pub mod session;
pub mod upload;
pub mod verifier;
