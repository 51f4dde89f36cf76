//! `Link` header pagination (RFC 8288), as used by every Okta list endpoint.
//!
//! ```text
//! Link: <https://acme.okta.com/api/v1/groups?limit=200>; rel="self"
//! Link: <https://acme.okta.com/api/v1/groups?after=00g...&limit=200>; rel="next"
//! ```

use reqwest::header::{HeaderMap, LINK};
use url::Url;

/// Find the `rel="next"` target among all `Link` headers of a response.
pub fn next_page_url(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(link_values)
        .find_map(|(target, params)| is_next(params).then(|| target.to_string()))
}

/// Split a header value into `(target, params)` pairs.
///
/// Commas inside `<...>` belong to the URL, so values are separated only on commas
/// after the target and outside quoted parameter values.
fn link_values(header: &str) -> Vec<(&str, &str)> {
    let mut values = Vec::new();
    let mut rest = header;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        let Some(open) = rest.strip_prefix('<') else {
            break;
        };
        let Some(close) = open.find('>') else {
            break;
        };

        let target = &open[..close];
        let tail = &open[close + 1..];
        let end = top_level_comma(tail).unwrap_or(tail.len());
        values.push((target, &tail[..end]));
        rest = &tail[end..];
    }

    values
}

fn top_level_comma(params: &str) -> Option<usize> {
    let mut quoted = false;
    params.char_indices().find_map(|(i, c)| match c {
        '"' => {
            quoted = !quoted;
            None
        }
        ',' if !quoted => Some(i),
        _ => None,
    })
}

fn is_next(params: &str) -> bool {
    params.split(';').any(|param| {
        param
            .trim()
            .strip_prefix("rel=")
            .map(|rel| rel.trim_matches('"'))
            .is_some_and(|rel| rel.split_whitespace().any(|r| r == "next"))
    })
}

/// Scheme, host and port of both URLs agree.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(LINK, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_next_in_separate_headers() {
        let headers = headers(&[
            r#"<https://acme.okta.com/api/v1/groups?limit=200>; rel="self""#,
            r#"<https://acme.okta.com/api/v1/groups?after=00gabc&limit=200>; rel="next""#,
        ]);
        assert_eq!(
            next_page_url(&headers).as_deref(),
            Some("https://acme.okta.com/api/v1/groups?after=00gabc&limit=200")
        );
    }

    #[test]
    fn test_next_in_combined_header() {
        let headers = headers(&[
            r#"<https://acme.okta.com/a?limit=2>; rel="self", <https://acme.okta.com/a?after=x>; rel="next""#,
        ]);
        assert_eq!(
            next_page_url(&headers).as_deref(),
            Some("https://acme.okta.com/a?after=x")
        );
    }

    #[test]
    fn test_comma_inside_target() {
        let combined = headers(&[
            r#"<https://acme.okta.com/api/v1/groups/rules?limit=200&search=Eng,Ops>; rel="self", <https://acme.okta.com/api/v1/groups/rules?after=0pr2&limit=200&search=Eng,Ops>; rel="next""#,
        ]);
        assert_eq!(
            next_page_url(&combined).as_deref(),
            Some("https://acme.okta.com/api/v1/groups/rules?after=0pr2&limit=200&search=Eng,Ops")
        );

        let single = headers(&[
            r#"<https://acme.okta.com/api/v1/groups/rules?after=0pr2&limit=200&search=Eng,Ops>; rel="next""#,
        ]);
        assert_eq!(
            next_page_url(&single).as_deref(),
            Some("https://acme.okta.com/api/v1/groups/rules?after=0pr2&limit=200&search=Eng,Ops")
        );
    }

    #[test]
    fn test_quoted_comma_in_params() {
        let headers = headers(&[
            r#"<https://acme.okta.com/a?limit=2>; rel="self"; title="a, b", <https://acme.okta.com/a?after=z>; rel="next""#,
        ]);
        assert_eq!(
            next_page_url(&headers).as_deref(),
            Some("https://acme.okta.com/a?after=z")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let headers = headers(&[r#"<https://acme.okta.com/api/v1/groups?limit=200>; rel="self""#]);
        assert_eq!(next_page_url(&headers), None);
        assert_eq!(next_page_url(&HeaderMap::new()), None);
    }

    #[test]
    fn test_unquoted_rel() {
        let headers = headers(&["<https://acme.okta.com/a?after=y>; rel=next"]);
        assert_eq!(
            next_page_url(&headers).as_deref(),
            Some("https://acme.okta.com/a?after=y")
        );
    }

    #[test]
    fn test_same_origin() {
        let base = Url::parse("https://acme.okta.com").unwrap();
        assert!(same_origin(
            &base,
            &Url::parse("https://acme.okta.com/api/v1/groups?after=1").unwrap()
        ));
        assert!(!same_origin(
            &base,
            &Url::parse("https://evil.example.com/api/v1/groups").unwrap()
        ));
        assert!(!same_origin(
            &base,
            &Url::parse("http://acme.okta.com/api/v1/groups").unwrap()
        ));
    }
}
