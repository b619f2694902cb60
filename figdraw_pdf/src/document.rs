// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PDF object serialization.

use std::fmt::Write as _;

/// Writes numbered indirect objects and the cross-reference table.
#[derive(Debug)]
pub(crate) struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<Option<usize>>,
}

impl ObjectWriter {
    pub(crate) fn new(object_count: usize) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: vec![None; object_count],
        }
    }

    pub(crate) fn object(&mut self, id: usize, body: &str) {
        self.begin(id);
        self.buf.extend_from_slice(body.as_bytes());
        self.buf.extend_from_slice(b"\nendobj\n");
    }

    pub(crate) fn stream(&mut self, id: usize, dict: &str, data: &[u8]) {
        self.begin(id);
        let sep = if dict.is_empty() { "" } else { " " };
        let header = format!("<< {dict}{sep}/Length {} >>\nstream\n", data.len());
        self.buf.extend_from_slice(header.as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn begin(&mut self, id: usize) {
        if let Some(slot) = id.checked_sub(1).and_then(|i| self.offsets.get_mut(i)) {
            *slot = Some(self.buf.len());
        }
        let header = format!("{id} 0 obj\n");
        self.buf.extend_from_slice(header.as_bytes());
    }

    /// Append the xref table and trailer.
    pub(crate) fn finish(mut self, root: usize, info: usize) -> Vec<u8> {
        let xref_at = self.buf.len();
        let mut xref = String::new();
        let _ = write!(xref, "xref\n0 {}\n0000000000 65535 f \n", self.offsets.len() + 1);
        for offset in &self.offsets {
            match offset {
                Some(at) => {
                    let _ = write!(xref, "{at:010} 00000 n \n");
                }
                None => xref.push_str("0000000000 65535 f \n"),
            }
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root {root} 0 R /Info {info} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// A PDF literal string, `(...)`, with escapes.
///
/// Characters outside Latin-1 become `?`.
pub(crate) fn pdf_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => match u8::try_from(u32::from(c)) {
                Ok(byte) => {
                    let _ = write!(out, "\\{byte:03o}");
                }
                Err(_) => out.push('?'),
            },
        }
    }
    out.push(')');
    out
}

/// Compact decimal for content streams.
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{v:.4}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
