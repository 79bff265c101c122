//! Inbound (server-side) HTTP request.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};

use crate::types::{get_param, Environment, FileList, ParamList, ServerValue, UploadedFile};

/// Request as a server would have observed it: the client request plus
/// environment, parsed body, uploaded files, query parameters and cookies.
#[derive(Debug)]
pub struct ServerRequest {
    environment: Environment,
    uploaded_files: FileList,
    uri: Uri,
    method: Method,
    body: Bytes,
    headers: HeaderMap,
    cookies: ParamList,
    query_params: ParamList,
    parsed_body: Option<ParamList>,
    version: Version,
}

impl ServerRequest {
    /// Assemble a server request from synthesized parts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        environment: Environment,
        uploaded_files: FileList,
        uri: Uri,
        method: Method,
        body: Bytes,
        headers: HeaderMap,
        cookies: ParamList,
        query_params: ParamList,
        parsed_body: Option<ParamList>,
        version: Version,
    ) -> Self {
        Self {
            environment,
            uploaded_files,
            uri,
            method,
            body,
            headers,
            cookies,
            query_params,
            parsed_body,
            version,
        }
    }

    /// Server environment (`$_SERVER`).
    #[inline]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Single server environment value.
    #[inline]
    pub fn server_param(&self, key: &str) -> Option<&ServerValue> {
        self.environment.get(key)
    }

    #[inline]
    pub fn uploaded_files(&self) -> &FileList {
        &self.uploaded_files
    }

    #[inline]
    pub fn uploaded_file(&self, name: &str) -> Option<&UploadedFile> {
        get_param(&self.uploaded_files, name)
    }

    /// Remove an uploaded file, handing its stream to the caller.
    pub fn take_uploaded_file(&mut self, name: &str) -> Option<UploadedFile> {
        let pos = self.uploaded_files.iter().position(|(k, _)| k == name)?;
        Some(self.uploaded_files.remove(pos).1)
    }

    /// Consume the request, keeping only the uploaded files.
    pub fn into_uploaded_files(self) -> FileList {
        self.uploaded_files
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw body, unchanged from the client request.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn cookies(&self) -> &ParamList {
        &self.cookies
    }

    #[inline]
    pub fn query_params(&self) -> &ParamList {
        &self.query_params
    }

    #[inline]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        get_param(&self.query_params, key).map(String::as_str)
    }

    /// Parsed form body; `None` for content types that are not forms.
    #[inline]
    pub fn parsed_body(&self) -> Option<&ParamList> {
        self.parsed_body.as_ref()
    }

    #[inline]
    pub fn parsed_field(&self, key: &str) -> Option<&str> {
        self.parsed_body
            .as_deref()
            .and_then(|body| get_param(body, key))
            .map(String::as_str)
    }

    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }
}
