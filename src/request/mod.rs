//! Request body and query parsing.

mod entities;
mod multipart;
mod parser;

pub use multipart::{parse_multipart, UploadLimits, DEFAULT_SPOOL_THRESHOLD};
pub use parser::{
    build_query_string, decode_html_entities, form_decode, form_encode, parse_cookies,
    parse_query_string,
};
