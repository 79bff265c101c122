//! Multipart form data through the factory.

use crate::helpers::*;
use server_request::request::UploadLimits;
use server_request::{Error, SimulatedServerRequestFactory};

const BOUNDARY: &str = "----FormBoundary7MA4YWxk";

fn multipart_request(body: Vec<u8>) -> http::Request<bytes::Bytes> {
    request(
        "POST",
        "/upload",
        &[(
            "Content-Type",
            "multipart/form-data; boundary=----FormBoundary7MA4YWxk",
        )],
        body,
    )
}

/// Test text field and text/plain file part both become fields
#[test]
fn test_text_plain_parts_are_fields() {
    let body = multipart_body(
        BOUNDARY,
        &[
            part(
                BOUNDARY,
                &["Content-Disposition: form-data; name=\"title\""],
                b"Hello",
            ),
            part(
                BOUNDARY,
                &[
                    "Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"",
                    "Content-Type: text/plain",
                ],
                b"plain text",
            ),
        ],
    );

    let req = convert(multipart_request(body));

    assert_eq!(req.parsed_field("title"), Some("Hello"));
    assert_eq!(req.parsed_field("upload"), Some("plain text"));
    assert!(req.uploaded_file("upload").is_none());
    assert!(req.uploaded_files().is_empty());
}

/// Test binary part becomes an uploaded file
#[test]
fn test_png_part_is_file() {
    let png: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    let body = multipart_body(
        BOUNDARY,
        &[
            part(
                BOUNDARY,
                &["Content-Disposition: form-data; name=\"title\""],
                b"Hello",
            ),
            part(
                BOUNDARY,
                &[
                    "Content-Disposition: form-data; name=\"upload\"; filename=\"a.png\"",
                    "Content-Type: image/png",
                ],
                png,
            ),
        ],
    );

    let mut req = convert(multipart_request(body));

    assert_eq!(req.parsed_field("title"), Some("Hello"));

    let mut file = req.take_uploaded_file("upload").expect("upload missing");
    // Files keep the CRLF before the next delimiter
    assert_eq!(file.size, png.len() as u64 + 2);
    assert!(file.is_ok());
    assert_eq!(file.client_filename.as_deref(), Some("a.png"));
    assert_eq!(file.client_media_type.as_deref(), Some("image/png"));
    assert_eq!(file.read_all().unwrap(), [png, b"\r\n"].concat());

    assert!(req.uploaded_files().is_empty());
}

/// Test file part without filename
#[test]
fn test_file_without_filename() {
    let body = multipart_body(
        BOUNDARY,
        &[part(
            BOUNDARY,
            &[
                "Content-Disposition: form-data; name=\"data\"",
                "Content-Type: application/octet-stream",
            ],
            b"\x00\x01\x02",
        )],
    );

    let req = convert(multipart_request(body));
    let file = req.uploaded_file("data").expect("data missing");

    assert_eq!(file.size, 5);
    assert!(file.client_filename.is_none());
}

/// Test header names are case-insensitive
#[test]
fn test_header_case() {
    let body = multipart_body(
        BOUNDARY,
        &[part(
            BOUNDARY,
            &[
                "CONTENT-DISPOSITION: form-data; name=\"doc\"; filename=\"d.pdf\"",
                "content-type: application/pdf",
            ],
            b"%PDF",
        )],
    );

    let req = convert(multipart_request(body));
    assert!(req.uploaded_file("doc").is_some());
}

/// Test malformed part surfaces a distinct error
#[test]
fn test_malformed_part() {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"a\"\r\nno blank line\r\n--{b}--\r\n",
        b = BOUNDARY
    );

    let err = try_convert(multipart_request(body.into_bytes())).unwrap_err();
    assert!(matches!(err, Error::MalformedMultipartPart { index: 1, .. }));
}

/// Test oversize files are flagged, not dropped
#[test]
fn test_oversize_file() {
    let body = multipart_body(
        BOUNDARY,
        &[part(
            BOUNDARY,
            &[
                "Content-Disposition: form-data; name=\"big\"; filename=\"big.bin\"",
                "Content-Type: application/octet-stream",
            ],
            &[0u8; 64],
        )],
    );

    let factory = SimulatedServerRequestFactory::new().upload_limits(UploadLimits {
        max_file_size: Some(16),
        ..UploadLimits::default()
    });
    let req = factory.convert(multipart_request(body)).unwrap();
    let file = req.uploaded_file("big").expect("big missing");

    assert_eq!(file.size, 66);
    assert_eq!(file.error, 1);
    assert!(!file.is_ok());
}

/// Test files larger than the spool threshold still round-trip
#[test]
fn test_spooled_to_disk() {
    let content = vec![b'x'; 4096];
    let body = multipart_body(
        BOUNDARY,
        &[part(
            BOUNDARY,
            &[
                "Content-Disposition: form-data; name=\"f\"; filename=\"f.bin\"",
                "Content-Type: application/octet-stream",
            ],
            &content,
        )],
    );

    let factory = SimulatedServerRequestFactory::new().upload_limits(UploadLimits {
        spool_threshold: 1024,
        max_file_size: None,
    });
    let req = factory.convert(multipart_request(body)).unwrap();

    let mut files = req.into_uploaded_files();
    let (name, file) = &mut files[0];
    assert_eq!(name, "f");
    assert!(file.stream.is_rolled());
    assert_eq!(file.read_all().unwrap(), [&content[..], b"\r\n"].concat());
}
