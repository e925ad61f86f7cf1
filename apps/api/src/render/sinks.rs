//! Output sinks: what a rendered PDF is handed to.
//!
//! `Download` is the save-to-file sink; `PrintView` is an HTML page that loads the PDF
//! from a Blob into an iframe and opens the print dialog. Both implement `IntoResponse`.

use std::time::Duration;

use axum::{
    http::header,
    response::{Html, IntoResponse, Response},
};
use base64::Engine;

const FALLBACK_FILENAME: &str = "story.pdf";
const MAX_STEM_LEN: usize = 80;

// ────────────────────────────────────────────────────────────────────────────
// Save sink
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(title: &str, bytes: Vec<u8>) -> Self {
        Self {
            filename: download_filename(title),
            bytes,
        }
    }
}

impl IntoResponse for Download {
    fn into_response(self) -> Response {
        let headers = [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", self.filename),
            ),
        ];
        (headers, self.bytes).into_response()
    }
}

/// Turns a story title into a safe ASCII file name.
///
/// Letters, digits and '-' are kept, runs of whitespace or '_' become a single '_',
/// everything else is dropped. A title with nothing left becomes `story.pdf`.
pub fn download_filename(title: &str) -> String {
    let mut stem = String::new();
    let mut pending_sep = false;

    for c in title.chars() {
        if stem.len() >= MAX_STEM_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() || c == '-' {
            if pending_sep && !stem.is_empty() {
                stem.push('_');
            }
            pending_sep = false;
            stem.push(c);
        } else if c.is_whitespace() || c == '_' {
            pending_sep = true;
        }
    }

    if stem.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{stem}.pdf")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Print sink
// ────────────────────────────────────────────────────────────────────────────

/// `printed` makes the trigger idempotent: whichever of `onload` and the fallback
/// timer fires first prints, the other is a no-op.
const PRINT_VIEW_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>html,body{margin:0;height:100%}iframe{border:0;width:100%;height:100%}</style>
</head>
<body>
<iframe id="story-frame" title="{title}"></iframe>
<script>
(function () {
  var printed = false;
  var frame = document.getElementById("story-frame");
  function triggerPrint() {
    if (printed) { return; }
    printed = true;
    try {
      frame.contentWindow.focus();
      frame.contentWindow.print();
    } catch (e) {
      window.print();
    }
  }
  var raw = atob("{pdf_base64}");
  var bytes = new Uint8Array(raw.length);
  for (var i = 0; i < raw.length; i++) { bytes[i] = raw.charCodeAt(i); }
  var blob = new Blob([bytes], { type: "application/pdf" });
  frame.onload = triggerPrint;
  frame.src = URL.createObjectURL(blob);
  setTimeout(triggerPrint, {fallback_ms});
})();
</script>
</body>
</html>
"#;

#[derive(Debug, Clone)]
pub struct PrintView {
    pub html: String,
}

impl PrintView {
    pub fn new(title: &str, pdf: &[u8], fallback: Duration) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(pdf);
        // Title last, so placeholder text inside a title is never expanded.
        let html = PRINT_VIEW_TEMPLATE
            .replace("{fallback_ms}", &fallback.as_millis().to_string())
            .replace("{pdf_base64}", &payload)
            .replace("{title}", &escape_html(title));
        Self { html }
    }
}

impl IntoResponse for PrintView {
    fn into_response(self) -> Response {
        Html(self.html).into_response()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
