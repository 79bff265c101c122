//! Request body dispatch by Content-Type.

use super::values;
use crate::core::{Request, Result};
use crate::request::{parse_multipart, parse_query_string, UploadLimits};
use crate::types::{FileList, ParamList};

/// Parsed form body and uploaded files.
#[derive(Debug, Default)]
pub struct ParsedBody {
    /// `None` when the content type is not a form.
    pub fields: Option<ParamList>,
    pub files: FileList,
}

/// Parse the request body according to its Content-Type.
///
/// - exactly `application/x-www-form-urlencoded`: urlencoded fields
/// - contains `multipart/form-data`: fields and uploaded files
/// - anything else: nothing parsed, the raw body is left to the caller
pub fn parse_body(request: &Request, limits: &UploadLimits) -> Result<ParsedBody> {
    let content_type = request.content_type();

    if content_type.eq_ignore_ascii_case(values::FORM_URLENCODED) {
        let fields = parse_query_string(&request.body_lossy());
        tracing::debug!(fields = fields.len(), "parse_body: urlencoded form");
        return Ok(ParsedBody {
            fields: Some(fields),
            files: FileList::new(),
        });
    }

    if content_type
        .to_ascii_lowercase()
        .contains(values::MULTIPART_FORM_DATA)
    {
        let (fields, files) = parse_multipart(request.body(), limits)?;
        return Ok(ParsedBody {
            fields: Some(fields),
            files,
        });
    }

    tracing::debug!(content_type = %content_type, "parse_body: passthrough");
    Ok(ParsedBody::default())
}
