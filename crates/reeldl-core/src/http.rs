//! Blocking HTTP exchange over libcurl.
//!
//! One call is one round-trip: the complete body is collected in memory before
//! returning, or the call fails as a whole. Runs in the current thread; call
//! from `spawn_blocking` when used from async code.

use std::time::Duration;

/// Timeouts applied to every exchange.
#[derive(Debug, Clone, Copy)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Upper bound for the whole exchange, body included.
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Status, final header block and body of a completed exchange.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u32,
    /// Header lines of the last response (earlier redirect hops are dropped).
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of header `name` (case-insensitive), trimmed.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (n, v) = line.split_once(':')?;
            n.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

/// POSTs `body` as `application/json` to `url`.
pub fn post_json(url: &str, body: &[u8], opts: HttpOptions) -> Result<RawResponse, curl::Error> {
    let mut easy = base_handle(url, opts)?;
    easy.post(true)?;
    easy.post_fields_copy(body)?;

    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json")?;
    list.append("Accept: */*")?;
    easy.http_headers(list)?;

    perform(easy)
}

/// Plain GET of `url`.
pub fn get(url: &str, opts: HttpOptions) -> Result<RawResponse, curl::Error> {
    let mut easy = base_handle(url, opts)?;
    easy.get(true)?;
    perform(easy)
}

fn base_handle(url: &str, opts: HttpOptions) -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    Ok(easy)
}

fn perform(mut easy: curl::easy::Easy) -> Result<RawResponse, curl::Error> {
    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            push_header_line(&mut headers, data);
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::debug!(status, bytes = body.len(), "http exchange complete");
    Ok(RawResponse {
        status,
        headers,
        body,
    })
}

/// Records one raw header line. Bytes that are not UTF-8 (Latin-1 filenames)
/// are kept as replacement characters rather than dropping the line.
fn push_header_line(headers: &mut Vec<String>, data: &[u8]) {
    let decoded = String::from_utf8_lossy(data);
    let line = decoded.trim_end();
    // A status line opens a new header block (redirect hop or 100-continue).
    if line.starts_with("HTTP/") {
        headers.clear();
    } else if !line.is_empty() {
        headers.push(line.to_string());
    }
}
