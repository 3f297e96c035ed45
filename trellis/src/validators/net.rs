//! Email and URL validators.

use once_cell::sync::Lazy;
use regex::Regex;
use trellis_core::{CustomValidator, ErrorKind, Node, Value, ValidationError};
use url::Url;

static USER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*$|^"([\x01-\x08\x0b\x0c\x0e-\x1f!#-\[\]-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*"$"#,
    )
    .expect("user pattern compiles")
});

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?$|[A-Z0-9-]{2,}\.?$)|^\[(25[0-5]|2[0-4]\d|[0-1]?\d?\d)(\.(25[0-5]|2[0-4]\d|[0-1]?\d?\d)){3}\]$",
    )
    .expect("domain pattern compiles")
});

fn failure(message: &str) -> trellis_core::ValidationErrors {
    ValidationError::new(ErrorKind::Pattern, message.to_string()).into()
}

/// Verify that the value is an email address.
#[must_use]
pub fn email() -> Node {
    Node::Custom(CustomValidator::new("email", |value: &Value| {
        let Value::Str(s) = value else {
            return Err(failure("expected an email address"));
        };
        let Some((user, domain)) = s.rsplit_once('@') else {
            return Err(failure("expected an email address"));
        };
        if user.is_empty() || domain.is_empty() {
            return Err(failure("expected an email address"));
        }
        if USER_RE.is_match(user) && DOMAIN_RE.is_match(domain) {
            Ok(value.clone())
        } else {
            Err(failure("expected an email address"))
        }
    }))
}

fn parse_url(value: &Value) -> Option<Url> {
    let s = value.as_str()?;
    let parsed = Url::parse(s).ok()?;
    if parsed.host_str().is_some() {
        Some(parsed)
    } else {
        None
    }
}

/// Verify that the value is a URL with a scheme and host.
#[must_use]
pub fn url() -> Node {
    Node::Custom(CustomValidator::new("url", |value: &Value| {
        match parse_url(value) {
            Some(_) => Ok(value.clone()),
            None => Err(failure("expected a URL")),
        }
    }))
}

/// Verify that the value is a URL whose host is a fully qualified domain
/// name (so `http://localhost/` fails).
#[must_use]
pub fn fqdn_url() -> Node {
    Node::Custom(CustomValidator::new("fqdn_url", |value: &Value| {
        let fqdn = parse_url(value)
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .map_or(false, |host| host.contains('.'));
        if fqdn {
            Ok(value.clone())
        } else {
            Err(failure("expected a fully qualified domain name URL"))
        }
    }))
}
