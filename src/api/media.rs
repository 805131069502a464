//! Photo upload endpoints.
//!
//! Accepted mime types are `image/jpeg`, `image/jpg`, `image/pjpeg`,
//! `image/gif`, `image/png` and `image/x-png`, up to 10 MB.

use std::path::Path;

use serde_json::Value;

use super::WykopApi;
use super::classify::{StatusPolicy, reasons};
use crate::core::connector::ApiRequest;
use crate::core::http::{DELETE_TIMEOUT, FilePart};
use crate::core::params::Params;
use crate::error::Result;

const UPLOAD: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::NO_FILE),
    (413, reasons::FILE_TOO_LARGE),
    (415, reasons::BAD_MIME),
    (429, reasons::UPLOAD_RATE_LIMITED),
]);
const UPLOAD_BY_URL: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::NO_FILE),
    (409, reasons::FORM_INVALID),
    (413, reasons::FILE_TOO_LARGE),
    (415, reasons::BAD_MIME),
    (429, reasons::UPLOAD_RATE_LIMITED),
]);
const DELETE: StatusPolicy = StatusPolicy::new(&[
    (400, reasons::PHOTO_DELETE_FORBIDDEN),
    (404, reasons::PHOTO_MISSING),
]);

/// Media area names: `settings`, `comments`, `links`, `content`.
pub const MEDIA_TYPES: &[&str] = &["settings", "comments", "links", "content"];

/// Guess a mime type from a file extension; `None` for unsupported files.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "pjpeg" => Some("image/pjpeg"),
        "gif" => Some("image/gif"),
        "png" => Some("image/png"),
        _ => None,
    }
}

fn type_param(media_type: &str) -> Params {
    Params::new().with("type", Some(media_type))
}

impl WykopApi {
    /// Upload a photo into `media_type` and return its descriptor (with the
    /// `key` used to attach it elsewhere).
    ///
    /// # Errors
    ///
    /// `Api(400)` without a file, `Api(413)` for an oversized file,
    /// `Api(415)` for an unsupported mime type, `Api(429)` when rate limited.
    pub async fn post_media_photo(
        &self,
        media_type: &str,
        photo: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Value> {
        let request = ApiRequest::post("media/photos/upload")
            .query(type_param(media_type))
            .file(FilePart::new(file_name, mime_type, photo));
        self.call(request, UPLOAD).await
    }

    /// Have the service fetch a photo from `photo_url`.
    ///
    /// # Errors
    ///
    /// As [`WykopApi::post_media_photo`], plus `Api(409)` when validation
    /// fails.
    pub async fn post_media_photo_by_url(&self, media_type: &str, photo_url: &str) -> Result<Value> {
        let request = ApiRequest::post("media/photos")
            .query(type_param(media_type))
            .body(Params::new().with("url", Some(photo_url)));
        self.call(request, UPLOAD_BY_URL).await
    }

    /// Delete one of the caller's photos.
    ///
    /// # Errors
    ///
    /// `Api(400)` without permission, `Api(404)` when the photo is missing
    /// or belongs to someone else.
    pub async fn delete_media_photo(&self, photo_key: &str) -> Result<()> {
        let request = ApiRequest::delete(format!("media/photos/{photo_key}")).timeout(DELETE_TIMEOUT);
        self.call_unit(request, DELETE).await
    }
}
