//! Find the advertised body size in response header lines.

/// Decoded-size headers, consulted when the body is content-encoded.
const DECODED_LENGTH_HEADERS: [&str; 2] =
    ["x-decompressed-content-length", "x-original-content-length"];

/// Size-related headers of the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SizeHeaders {
    pub content_length: Option<u64>,
    pub content_encoding: Option<String>,
    pub decoded_length: Option<u64>,
}

impl SizeHeaders {
    fn is_encoded(&self) -> bool {
        self.content_encoding
            .as_deref()
            .is_some_and(|enc| !enc.eq_ignore_ascii_case("identity"))
    }

    /// Total number of body bytes the write callback will see, if known.
    ///
    /// libcurl decodes compressed bodies, so `Content-Length` only counts when
    /// no `Content-Encoding` is applied.
    pub fn advertised_total(&self) -> Option<u64> {
        let total = if self.is_encoded() {
            self.decoded_length
        } else {
            self.content_length.or(self.decoded_length)
        };
        total.filter(|&n| n > 0)
    }
}

/// Parse the header lines of one response (status line included or not).
pub(crate) fn parse_size_headers(lines: &[String]) -> SizeHeaders {
    let mut out = SizeHeaders::default();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            out.content_length = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case("content-encoding") {
            if !value.is_empty() {
                out.content_encoding = Some(value.to_string());
            }
        } else if DECODED_LENGTH_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h))
        {
            out.decoded_length = value.parse::<u64>().ok();
        }
    }
    out
}
