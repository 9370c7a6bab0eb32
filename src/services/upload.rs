use image::ImageFormat;

/// Check an upload against the size limit and the accepted image formats
/// before it reaches the verifier.
pub fn check_upload(data: &[u8], max_bytes: usize) -> Result<ImageFormat, UploadError> {
    if data.len() > max_bytes {
        return Err(UploadError::TooLarge(max_bytes));
    }

    match image::guess_format(data) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => Ok(format),
        _ => Err(UploadError::UnsupportedMediaType),
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Upload exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("Only JPEG and PNG images are accepted")]
    UnsupportedMediaType,
}
