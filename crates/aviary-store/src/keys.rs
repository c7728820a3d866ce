//! Bucket/key derivation from canonical media URLs.
//!
//! Canonical identifiers are storage URLs of the form
//! `https://{bucket}.{provider-host}/{key...}`. The bucket is the first
//! dotted label of the host; the key is the URL path. All backends split
//! URLs through here so delete stays consistent with how uploads name
//! objects.

use crate::traits::{StoreError, StoreResult};

/// Split a canonical URL into `(bucket, key)`.
pub fn split_bucket_key(url: &str) -> StoreResult<(String, String)> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| StoreError::InvalidUrl(format!("'{}' is not an http(s) URL", url)))?;

    let (host, key) = rest
        .split_once('/')
        .ok_or_else(|| StoreError::InvalidUrl(format!("'{}' has no object key path", url)))?;

    let bucket = host
        .split('.')
        .next()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| StoreError::InvalidUrl(format!("'{}' has no bucket host label", url)))?;

    if key.is_empty() {
        return Err(StoreError::InvalidUrl(format!(
            "'{}' has an empty object key",
            url
        )));
    }

    Ok((bucket.to_string(), key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_standard_s3_url() {
        let (bucket, key) =
            split_bucket_key("https://birds.s3.amazonaws.com/media/file123.jpg").unwrap();
        assert_eq!(bucket, "birds");
        assert_eq!(key, "media/file123.jpg");
    }

    #[test]
    fn test_split_nested_key() {
        let (bucket, key) =
            split_bucket_key("https://birds.s3.amazonaws.com/media/thumbs/file123-thumb.jpg")
                .unwrap();
        assert_eq!(bucket, "birds");
        assert_eq!(key, "media/thumbs/file123-thumb.jpg");
    }

    #[test]
    fn test_split_rejects_non_http() {
        assert!(split_bucket_key("s3://birds/media/a.jpg").is_err());
    }

    #[test]
    fn test_split_rejects_missing_key() {
        assert!(split_bucket_key("https://birds.s3.amazonaws.com").is_err());
        assert!(split_bucket_key("https://birds.s3.amazonaws.com/").is_err());
    }
}
