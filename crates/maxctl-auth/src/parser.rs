use thiserror::Error;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub access_key: String,
    pub date: String,
    pub region: String,
    pub service: String,
    pub signed_headers: Vec<String>,
    pub signature: String,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unsupported authorization algorithm")]
    UnsupportedAlgorithm,
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("invalid credential scope")]
    InvalidCredentialScope,
    #[error("invalid authorization header format")]
    InvalidFormat,
}

impl AuthHeader {
    pub fn scope(&self) -> String {
        format!("{}/{}/{}/aws4_request", self.date, self.region, self.service)
    }

    /// Renders the `Authorization` header value sent with a signed request.
    pub fn to_header_value(&self) -> String {
        format!(
            "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key,
            self.scope(),
            self.signed_headers.join(";"),
            self.signature
        )
    }

    pub fn parse(value: &str) -> Result<Self> {
        let fields = value
            .strip_prefix(ALGORITHM)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or(ParseError::UnsupportedAlgorithm)?;

        let mut credential = None;
        let mut signed_headers = None;
        let mut signature = None;

        for field in fields.split(',').map(str::trim) {
            let (key, value) = field.split_once('=').ok_or(ParseError::InvalidFormat)?;
            let value = value.trim();
            match key {
                "Credential" => credential = Some(value),
                "SignedHeaders" => signed_headers = Some(value),
                "Signature" => signature = Some(value),
                _ => {}
            }
        }

        let credential = credential.ok_or(ParseError::MissingField("Credential"))?;
        let signature = signature.ok_or(ParseError::MissingField("Signature"))?;
        let signed_headers = signed_headers
            .ok_or(ParseError::MissingField("SignedHeaders"))?
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>();
        if signed_headers.is_empty() {
            return Err(ParseError::MissingField("SignedHeaders"));
        }

        let [access_key, date, region, service, terminator] = credential
            .split('/')
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| ParseError::InvalidCredentialScope)?;
        if terminator != "aws4_request" {
            return Err(ParseError::InvalidCredentialScope);
        }

        Ok(Self {
            access_key: access_key.to_string(),
            date: date.to_string(),
            region: region.to_string(),
            service: service.to_string(),
            signed_headers,
            signature: signature.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_parses_back() {
        let header = AuthHeader {
            access_key: "minioadmin".to_string(),
            date: "20240501".to_string(),
            region: "us-east-1".to_string(),
            service: "s3".to_string(),
            signed_headers: vec![
                "host".to_string(),
                "x-amz-content-sha256".to_string(),
                "x-amz-date".to_string(),
            ],
            signature: "abc123".to_string(),
        };

        let value = header.to_header_value();
        assert_eq!(
            value,
            "AWS4-HMAC-SHA256 Credential=minioadmin/20240501/us-east-1/s3/aws4_request, \
             SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature=abc123"
        );
        assert_eq!(AuthHeader::parse(&value).unwrap(), header);
    }

    #[test]
    fn rejects_other_algorithms() {
        assert!(matches!(
            AuthHeader::parse("AWS AKIA:signature"),
            Err(ParseError::UnsupportedAlgorithm)
        ));
    }

    #[test]
    fn rejects_short_scope() {
        let value = "AWS4-HMAC-SHA256 Credential=ak/20240501/us-east-1, SignedHeaders=host, Signature=x";
        assert!(matches!(
            AuthHeader::parse(value),
            Err(ParseError::InvalidCredentialScope)
        ));
    }

    #[test]
    fn missing_signature_is_reported() {
        let value = "AWS4-HMAC-SHA256 Credential=ak/20240501/us-east-1/s3/aws4_request, SignedHeaders=host";
        assert!(matches!(
            AuthHeader::parse(value),
            Err(ParseError::MissingField("Signature"))
        ));
    }
}
