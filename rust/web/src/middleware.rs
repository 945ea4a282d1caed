use warp::http::StatusCode;
use warp::log::{Info, Log};

/// Access log for every routed request, emitted through [`log_response`].
pub fn request_log() -> Log<impl Fn(Info<'_>) + Copy> {
    warp::log::custom(|info: Info<'_>| {
        log_response(
            info.status(),
            info.path(),
            info.method().as_str(),
            info.elapsed().as_millis(),
        );
    })
}

/// Severity of an access-log line, derived from the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Ok,
    ClientError,
    ServerError,
}

impl ResponseClass {
    pub fn of(status: StatusCode) -> Self {
        if status.is_server_error() {
            ResponseClass::ServerError
        } else if status.is_client_error() {
            ResponseClass::ClientError
        } else {
            ResponseClass::Ok
        }
    }

    fn message(self) -> &'static str {
        match self {
            ResponseClass::Ok => "response sent",
            ResponseClass::ClientError => "client error",
            ResponseClass::ServerError => "server error",
        }
    }
}

/// Match id addressed by a `/api/matches/{id}/...` path.
pub fn match_id_from_path(path: &str) -> Option<&str> {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("api"), Some("matches"), Some(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}

/// One access-log line: info for success, warn for 4xx, error for 5xx.
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    let class = ResponseClass::of(status);
    let match_id = match_id_from_path(path).unwrap_or("-");
    let status = status.as_u16();

    match class {
        ResponseClass::Ok => tracing::info!(
            status,
            method,
            path,
            match_id,
            duration_ms = duration_ms as u64,
            "{}",
            class.message()
        ),
        ResponseClass::ClientError => tracing::warn!(
            status,
            method,
            path,
            match_id,
            duration_ms = duration_ms as u64,
            "{}",
            class.message()
        ),
        ResponseClass::ServerError => tracing::error!(
            status,
            method,
            path,
            match_id,
            duration_ms = duration_ms as u64,
            "{}",
            class.message()
        ),
    }
}
