use axum::http::Uri;
use url::Url;

pub trait UrlExt {
    fn with_path(&self, path: &str) -> Url;
    /// Scheme, host and port, without a trailing slash.
    fn origin_str(&self) -> String;
}

impl UrlExt for Url {
    #[inline]
    fn with_path(&self, path: &str) -> Url {
        let mut out = self.clone();
        out.set_path(path);
        out.set_query(None);
        out.set_fragment(None);
        out
    }

    #[inline]
    fn origin_str(&self) -> String { self.origin().ascii_serialization() }
}

/// Convert an absolute request URI into a [`Url`].
pub fn uri_to_url(uri: &Uri) -> Result<Url, url::ParseError> { Url::parse(&uri.to_string()) }
