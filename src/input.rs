/// Acquisition strategy for a user-supplied input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Device,
    Server,
}

/// A classified input; `identifier` is the path or host[:port] to acquire from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    pub kind: InputKind,
    pub identifier: String,
}

impl ResolvedInput {
    fn new(kind: InputKind, identifier: &str) -> Self {
        ResolvedInput {
            kind,
            identifier: identifier.to_string(),
        }
    }
}

/// Classify a raw input string. Pure string matching, no I/O, never fails:
/// anything that is not a device path or a server reference is a file name.
pub fn resolve(raw: &str) -> ResolvedInput {
    if raw.starts_with("/dev/") || raw.starts_with('/') || raw.starts_with("./") || raw.starts_with("../") {
        return ResolvedInput::new(InputKind::Device, raw);
    }
    if let Some(rest) = raw.strip_prefix("host://") {
        return ResolvedInput::new(InputKind::Server, rest);
    }
    if let Some(rest) = raw.strip_prefix("https://") {
        return ResolvedInput::new(InputKind::Server, rest);
    }
    if looks_like_host_port(raw) {
        return ResolvedInput::new(InputKind::Server, raw);
    }
    ResolvedInput::new(InputKind::File, raw)
}

// Matches a scheme-less host:port pair (word characters and dots, then a
// numeric port), e.g. "example.com:8443".
fn looks_like_host_port(raw: &str) -> bool {
    match raw.split_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && host.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                && !port.is_empty()
                && port.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
