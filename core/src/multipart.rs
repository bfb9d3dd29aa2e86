//! Minimal `multipart/form-data` encoder for photo uploads.
//!
//! Text parts are written as UTF-8; file parts carry the photo's file name
//! and content type. Boundaries are random per body.

use uuid::Uuid;

use crate::types::PetPhoto;

#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::with_boundary(format!("petfriends-{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: Vec::new(),
        }
    }

    #[cfg(test)]
    fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"",
            escape_quoted(name)
        ));
        self.push_line("");
        self.buf.extend_from_slice(value.as_bytes());
        self.push_line("");
        self
    }

    pub fn file(mut self, name: &str, photo: &PetPhoto) -> Self {
        self.open_part();
        self.push_line(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
            escape_quoted(name),
            escape_quoted(&photo.file_name)
        ));
        self.push_line(&format!("Content-Type: {}", photo.content_type));
        self.push_line("");
        self.buf.extend_from_slice(&photo.bytes);
        self.push_line("");
        self
    }

    /// Close the body, returning its `content-type` header value and bytes.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        let closing = format!("--{}--\r\n", self.boundary);
        self.buf.extend_from_slice(closing.as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.buf,
        )
    }

    fn open_part(&mut self) {
        let line = format!("--{}", self.boundary);
        self.push_line(&line);
    }

    fn push_line(&mut self, line: &str) {
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('"', "%22").replace(['\r', '\n'], " ")
}
