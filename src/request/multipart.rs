//! Multipart form data decoding.
//!
//! The boundary is taken from the first line of the body rather than the
//! Content-Type parameter, and the body is split on every occurrence of it.
//! This is a best-effort decoder for simple single-level form submissions:
//! a boundary string that occurs inside a binary part body splits that part,
//! nested multipart bodies are not descended into, and each header line is
//! split on its first colon only.

use std::io::{Seek, SeekFrom, Write};
use std::sync::LazyLock;

use regex::Regex;
use tempfile::SpooledTempFile;

use crate::core::{Error, Result};
use crate::types::{get_param, set_param, upload_error, FileList, ParamList, UploadedFile};

/// `php://temp` keeps up to 2 MiB in memory before spilling to disk.
pub const DEFAULT_SPOOL_THRESHOLD: usize = 2 * 1024 * 1024;

const CRLF: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

static CONTENT_DISPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(.+); *name="([^"]+)"(; *filename="([^"]+)")?"#).expect("Invalid regex")
});

/// Limits applied to file parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadLimits {
    /// Bytes held in memory before a file stream spills to a temporary file.
    pub spool_threshold: usize,
    /// Larger files are reported with `UPLOAD_ERR_INI_SIZE` and no content.
    pub max_file_size: Option<u64>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            spool_threshold: DEFAULT_SPOOL_THRESHOLD,
            max_file_size: None,
        }
    }
}

/// One undecoded part: lower-cased headers and the body up to the next delimiter.
#[derive(Debug)]
struct RawPart<'a> {
    index: usize,
    headers: ParamList,
    body: &'a [u8],
}

enum State {
    SeekingBoundary,
    ReadingHeaders,
    ReadingBody(ParamList),
    Done,
}

/// Cursor over a multipart body yielding parts in order.
struct PartReader<'a> {
    data: &'a [u8],
    boundary: &'a [u8],
    /// Current cursor position.
    pos: usize,
    /// End of the current part (next boundary or end of data).
    part_end: usize,
    index: usize,
    state: State,
}

impl<'a> PartReader<'a> {
    /// Take the boundary from the first line of the body.
    fn new(data: &'a [u8]) -> Result<Self> {
        let line_end =
            find(data, CRLF).ok_or_else(|| Error::multipart(0, "missing boundary line"))?;
        if line_end == 0 {
            return Err(Error::multipart(0, "empty boundary line"));
        }

        Ok(Self {
            data,
            boundary: &data[..line_end],
            pos: 0,
            part_end: 0,
            index: 0,
            state: State::SeekingBoundary,
        })
    }

    fn fail(&mut self, reason: impl Into<String>) -> Option<Result<RawPart<'a>>> {
        self.state = State::Done;
        Some(Err(Error::multipart(self.index, reason)))
    }
}

impl<'a> Iterator for PartReader<'a> {
    type Item = Result<RawPart<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::SeekingBoundary => {
                    // Cursor sits on a boundary occurrence.
                    let start = self.pos + self.boundary.len();
                    let end = find(&data[start..], self.boundary)
                        .map(|i| start + i)
                        .unwrap_or(data.len());

                    // Close delimiter; anything after it is epilogue.
                    if data[start..end].starts_with(b"--") {
                        return None;
                    }

                    self.index += 1;
                    self.pos = start;
                    self.part_end = end;
                    self.state = State::ReadingHeaders;
                }
                State::ReadingHeaders => {
                    let part = &data[self.pos..self.part_end];
                    let skip = part
                        .iter()
                        .take_while(|b| **b == b'\r' || **b == b'\n')
                        .count();
                    let part = &part[skip..];

                    let Some(split) = find(part, HEADER_END) else {
                        return self.fail("missing blank line after part headers");
                    };

                    let headers = match parse_part_headers(&part[..split]) {
                        Ok(headers) => headers,
                        Err(reason) => return self.fail(reason),
                    };

                    self.pos += skip + split + HEADER_END.len();
                    self.state = State::ReadingBody(headers);
                }
                State::ReadingBody(headers) => {
                    let body = &data[self.pos..self.part_end];

                    self.pos = self.part_end;
                    if self.part_end < data.len() {
                        self.state = State::SeekingBoundary;
                    }

                    return Some(Ok(RawPart {
                        index: self.index,
                        headers,
                        body,
                    }));
                }
                State::Done => return None,
            }
        }
    }
}

/// Parse `Name: value` lines; names are lower-cased, leading spaces trimmed from values.
fn parse_part_headers(block: &[u8]) -> std::result::Result<ParamList, String> {
    let block = String::from_utf8_lossy(block);
    let mut headers = ParamList::new();

    for line in block.split("\r\n") {
        let Some((name, value)) = line.split_once(':') else {
            return Err(format!("header line without colon: {:?}", line));
        };
        set_param(
            &mut headers,
            name.to_lowercase(),
            value.trim_start_matches(' ').to_string(),
        );
    }

    Ok(headers)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Decode a multipart/form-data body.
///
/// Returns a tuple of (form fields, uploaded files). Parts with a
/// Content-Type other than `text/plain` become files; the rest are fields.
/// Parts without a Content-Disposition header are skipped.
pub fn parse_multipart(body: &[u8], limits: &UploadLimits) -> Result<(ParamList, FileList)> {
    tracing::debug!(body_len = body.len(), "parse_multipart: starting");

    let mut params = ParamList::new();
    let mut files = FileList::new();

    if body.is_empty() {
        return Ok((params, files));
    }

    for part in PartReader::new(body)? {
        let part = part?;

        let Some(disposition) = get_param(&part.headers, "content-disposition") else {
            tracing::debug!(
                index = part.index,
                "parse_multipart: part without content-disposition skipped"
            );
            continue;
        };

        let caps = CONTENT_DISPOSITION.captures(disposition).ok_or_else(|| {
            Error::multipart(
                part.index,
                format!("content-disposition without name: {}", disposition),
            )
        })?;
        let field_name = caps[2].to_string();
        let file_name = caps.get(4).map(|m| m.as_str().to_string());

        match get_param(&part.headers, "content-type") {
            Some(media_type) if media_type != "text/plain" => {
                let uploaded_file = store_file(part.body, file_name, media_type.clone(), limits)?;

                tracing::debug!(
                    field_name = %field_name,
                    file_name = ?uploaded_file.client_filename,
                    size = uploaded_file.size,
                    error = uploaded_file.error,
                    "parse_multipart: parsed uploaded file"
                );

                set_param(&mut files, field_name, uploaded_file);
            }
            _ => {
                // Fields drop the CRLF that precedes the next delimiter; files keep it.
                let body = part.body.strip_suffix(CRLF).unwrap_or(part.body);
                let value = String::from_utf8_lossy(body).into_owned();
                tracing::debug!(
                    field_name = %field_name,
                    value_len = value.len(),
                    "parse_multipart: parsed form field"
                );
                set_param(&mut params, field_name, value);
            }
        }
    }

    tracing::debug!(
        params_count = params.len(),
        files_count = files.len(),
        "parse_multipart: completed"
    );

    Ok((params, files))
}

fn store_file(
    data: &[u8],
    client_filename: Option<String>,
    media_type: String,
    limits: &UploadLimits,
) -> Result<UploadedFile> {
    let size = data.len() as u64;
    let mut stream = SpooledTempFile::new(limits.spool_threshold);

    let error = if limits.max_file_size.is_some_and(|max| size > max) {
        upload_error::INI_SIZE
    } else {
        stream.write_all(data)?;
        stream.flush()?;
        stream.seek(SeekFrom::Start(0))?;
        upload_error::OK
    };

    Ok(UploadedFile {
        stream,
        size,
        error,
        client_filename,
        client_media_type: Some(media_type),
    })
}
