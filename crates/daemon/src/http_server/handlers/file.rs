use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio_util::io::ReaderStream;

use common::prelude::Download;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

/// Stream an open file with content type, length and disposition headers.
pub fn file_response(
    download: Download,
    disposition: Disposition,
) -> Result<Response, axum::http::Error> {
    let disposition = match disposition {
        Disposition::Inline => format!("inline; filename=\"{}\"", download.filename),
        Disposition::Attachment => format!("attachment; filename=\"{}\"", download.filename),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.mime)
        .header(header::CONTENT_LENGTH, download.size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(ReaderStream::new(download.file)))
}
