//! Map HTTP status codes and curl errors onto retry failure kinds.

use super::policy::FailureKind;
use crate::fetch::FetchError;

pub fn classify_http_status(code: u32) -> FailureKind {
    match code {
        429 | 503 => FailureKind::Throttled,
        500..=599 => FailureKind::ServerError(code as u16),
        _ => FailureKind::Fatal,
    }
}

pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return FailureKind::Connection;
    }
    FailureKind::Fatal
}

pub fn classify(e: &FetchError) -> FailureKind {
    match e {
        FetchError::Curl(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::Cancelled | FetchError::Join(_) | FetchError::InvalidUrl(_) => {
            FailureKind::Fatal
        }
    }
}
