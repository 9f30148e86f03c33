use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::{HeaderMap, HeaderName, HeaderValue, header::InvalidHeaderValue};
use maxctl_common::time::{format_amz_date, format_amz_short_date};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use sha2::{Digest, Sha256};
use url::Url;

use crate::{credentials::Credentials, parser::AuthHeader};

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const SERVICE: &str = "s3";

pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

const AWS_URI_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'!')
    .add(b'"')
    .add(b'#')
    .add(b'$')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'*')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'?')
    .add(b'@')
    .add(b'[')
    .add(b']')
    .add(b'{')
    .add(b'}')
    .add(b'<')
    .add(b'>')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'`');

/// The parts of an HTTP request that take part in a SigV4 signature.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalParts<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub headers: &'a HeaderMap,
    pub payload_hash: &'a str,
}

/// Computes the SigV4 headers for a request to `url`.
///
/// The returned map holds `host`, `x-amz-date`, `x-amz-content-sha256` and
/// `authorization`; callers merge it into the outgoing request unchanged.
pub fn sign_request(
    credentials: &Credentials,
    region: &str,
    method: &str,
    url: &Url,
    payload: &[u8],
    at: DateTime<Utc>,
) -> Result<HeaderMap, InvalidHeaderValue> {
    let payload_hash = sha256_hex(payload);
    let date_time = format_amz_date(&at);
    let date = format_amz_short_date(&at);

    let mut headers = HeaderMap::new();
    headers.insert(http::header::HOST, HeaderValue::from_str(&host_header(url))?);
    headers.insert(
        HeaderName::from_static(X_AMZ_DATE),
        HeaderValue::from_str(&date_time)?,
    );
    headers.insert(
        HeaderName::from_static(X_AMZ_CONTENT_SHA256),
        HeaderValue::from_str(&payload_hash)?,
    );

    let signed_headers = vec![
        "host".to_string(),
        X_AMZ_CONTENT_SHA256.to_string(),
        X_AMZ_DATE.to_string(),
    ];
    let parts = CanonicalParts {
        method,
        path: url.path(),
        query: url.query().unwrap_or(""),
        headers: &headers,
        payload_hash: &payload_hash,
    };
    // Every signed header was inserted above, so the canonical form always exists.
    let canonical_request = canonical_request(&parts, &signed_headers).unwrap_or_default();

    let mut auth = AuthHeader {
        access_key: credentials.access_key.clone(),
        date,
        region: region.to_string(),
        service: SERVICE.to_string(),
        signed_headers,
        signature: String::new(),
    };
    let string_to_sign = string_to_sign(&canonical_request, &date_time, &auth.scope());
    let signing_key = signing_key(&credentials.secret_key, &auth.date, region);
    auth.signature = signature(&signing_key, &string_to_sign);

    headers.insert(
        http::header::AUTHORIZATION,
        HeaderValue::from_str(&auth.to_header_value())?,
    );
    Ok(headers)
}

/// Recomputes the signature carried by `auth` and compares it to the request.
pub fn verify_request(secret_key: &str, parts: &CanonicalParts<'_>, auth: &AuthHeader) -> bool {
    let Some(date_time) = parts
        .headers
        .get(X_AMZ_DATE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let Some(canonical_request) = canonical_request(parts, &auth.signed_headers) else {
        return false;
    };

    let string_to_sign = string_to_sign(&canonical_request, date_time, &auth.scope());
    let signing_key = signing_key(secret_key, &auth.date, &auth.region);
    let computed = signature(&signing_key, &string_to_sign);
    constant_time_eq(computed.as_bytes(), auth.signature.as_bytes())
}

pub fn signing_key(secret_key: &str, date: &str, region: &str) -> Vec<u8> {
    let date_key = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let region_key = hmac_sha256(&date_key, region.as_bytes());
    let service_key = hmac_sha256(&region_key, SERVICE.as_bytes());
    hmac_sha256(&service_key, b"aws4_request")
}

fn canonical_request(parts: &CanonicalParts<'_>, signed_header_names: &[String]) -> Option<String> {
    let mut names = signed_header_names
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect::<Vec<_>>();
    names.sort();

    let canonical_headers = canonical_headers(parts.headers, &names)?;
    Some(format!(
        "{}\n{}\n{}\n{canonical_headers}\n{}\n{}",
        parts.method,
        canonical_uri(parts.path),
        canonical_query_string(parts.query),
        names.join(";"),
        parts.payload_hash
    ))
}

fn string_to_sign(canonical_request: &str, date_time: &str, scope: &str) -> String {
    let canonical_hash = sha256_hex(canonical_request.as_bytes());
    format!("AWS4-HMAC-SHA256\n{date_time}\n{scope}\n{canonical_hash}")
}

fn signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

pub fn canonical_uri(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let encoded = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_encode(&percent_decode_path(segment)))
        .collect::<Vec<_>>()
        .join("/");

    let mut out = String::with_capacity(encoded.len() + 2);
    if path.starts_with('/') {
        out.push('/');
    }
    out.push_str(&encoded);
    if path.ends_with('/') && !out.ends_with('/') {
        out.push('/');
    }
    if out.is_empty() { "/".to_string() } else { out }
}

/// Sorted, strictly encoded query string. Input may already be URL-encoded.
pub fn canonical_query_string(query_string: &str) -> String {
    let mut params = query_string
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                percent_encode(&percent_decode_query(name)),
                percent_encode(&percent_decode_query(value)),
            )
        })
        .collect::<Vec<_>>();

    params.sort();

    params
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

fn canonical_headers(headers: &HeaderMap, sorted_names: &[String]) -> Option<String> {
    let mut out = String::new();
    for name in sorted_names {
        let value = headers.get(name.as_str())?.to_str().ok()?;
        out.push_str(name);
        out.push(':');
        out.push_str(&normalize_header_value(value));
        out.push('\n');
    }
    Some(out)
}

fn normalize_header_value(value: &str) -> String {
    value.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return Vec::new();
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, AWS_URI_ENCODE_SET).to_string()
}

fn percent_decode_path(value: &str) -> String {
    percent_encoding::percent_decode_str(value)
        .decode_utf8_lossy()
        .into_owned()
}

fn percent_decode_query(value: &str) -> String {
    percent_decode_path(&value.replace('+', " "))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let mut diff = a.len() ^ b.len();
    for i in 0..a.len().max(b.len()) {
        let left = a.get(i).copied().unwrap_or(0);
        let right = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(left ^ right);
    }
    diff == 0
}
