//! Content type detection for resolved files.
//!
//! Magic bytes are checked first, then the route's extension, then a
//! text/binary heuristic.

/// Common MIME type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const MARKDOWN: &str = "text/markdown; charset=utf-8";
    pub const CSV: &str = "text/csv; charset=utf-8";
    pub const PDF: &str = "application/pdf";
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const ZIP: &str = "application/zip";
    pub const GZIP: &str = "application/gzip";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";
    pub const MP3: &str = "audio/mpeg";
    pub const MP4: &str = "video/mp4";
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
}

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", types::PNG),
    (b"\xFF\xD8\xFF", types::JPEG),
    (b"GIF87a", types::GIF),
    (b"GIF89a", types::GIF),
    (b"\x00\x00\x01\x00", types::ICO),
    (b"BM", types::BMP),
    (b"%PDF-", types::PDF),
    (b"PK\x03\x04", types::ZIP),
    (b"\x1F\x8B\x08", types::GZIP),
    (b"wOFF", types::WOFF),
    (b"wOF2", types::WOFF2),
    (b"ID3", types::MP3),
];

/// Detect a Content-Type for `data` served at a route ending in `name`.
pub fn detect(data: &[u8], name: &str) -> &'static str {
    if let Some(mime) = sniff(data) {
        return mime;
    }
    if let Some(mime) = from_extension(extension(name)) {
        return mime;
    }
    if looks_like_text(data) {
        types::PLAIN
    } else {
        types::OCTET_STREAM
    }
}

/// Content type from magic bytes alone.
pub fn sniff(data: &[u8]) -> Option<&'static str> {
    if let Some((_, mime)) = SIGNATURES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return Some(*mime);
    }
    if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return Some(types::WEBP);
    }
    if data.len() >= 8 && &data[4..8] == b"ftyp" {
        return Some(types::MP4);
    }

    let head = leading_text(data);
    if starts_with_ignore_case(head, "<!doctype html") || starts_with_ignore_case(head, "<html") {
        return Some(types::HTML);
    }
    if starts_with_ignore_case(head, "<svg") {
        return Some(types::SVG);
    }
    if starts_with_ignore_case(head, "<?xml") {
        return Some(if head.contains("<svg") { types::SVG } else { types::XML });
    }
    None
}

/// Content type from a file extension.
pub fn from_extension(ext: Option<&str>) -> Option<&'static str> {
    let ext = ext?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "html" | "htm" => types::HTML,
        "css" => types::CSS,
        "js" | "mjs" => types::JAVASCRIPT,
        "json" => types::JSON,
        "xml" => types::XML,
        "md" | "markdown" => types::MARKDOWN,
        "csv" => types::CSV,
        "txt" => types::PLAIN,
        "svg" => types::SVG,
        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "ico" => types::ICO,
        "pdf" => types::PDF,
        "zip" => types::ZIP,
        "gz" => types::GZIP,
        "woff" => types::WOFF,
        "woff2" => types::WOFF2,
        "ttf" => types::TTF,
        "mp3" => types::MP3,
        "mp4" => types::MP4,
        _ => return None,
    };
    Some(mime)
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.contains('/'))
}

fn leading_text(data: &[u8]) -> &str {
    let head = &data[..data.len().min(512)];
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or_default(),
    };
    text.trim_start_matches(['\u{feff}', ' ', '\t', '\r', '\n'])
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

fn looks_like_text(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    !head.contains(&0)
        && match std::str::from_utf8(head) {
            Ok(_) => true,
            // A multi-byte char may be cut at the window edge.
            Err(e) => e.error_len().is_none(),
        }
}
