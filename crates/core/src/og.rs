//! Open Graph card requests and the URLs that point at them.

use std::{fmt, str::FromStr};

use url::{Url, form_urlencoded};

use crate::config::SiteConfig;

/// Path the card generator is served from.
pub const OG_PATH: &str = "/og";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum ImageKind {
    #[default]
    Generic,
    Prompt,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Prompt => "prompt",
        }
    }

    /// Anything other than `prompt` falls back to the generic card.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for ImageKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prompt" => Ok(Self::Prompt),
            "generic" => Ok(Self::Generic),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Query parameters of the card generator. Every field is optional.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ImageQuery {
    pub kind: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub chat_template: Option<String>,
}

impl ImageQuery {
    /// Decode a raw query string. Never fails: unknown keys are ignored and
    /// the first occurrence of a repeated key wins.
    pub fn parse(raw: Option<&str>) -> Self {
        let mut out = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "kind" => &mut out.kind,
                "title" => &mut out.title,
                "description" => &mut out.description,
                "chatTemplate" => &mut out.chat_template,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ImageRequest {
    pub kind: ImageKind,
    pub title: String,
    pub description: String,
    pub chat_template: Option<String>,
    pub origin_url: String,
}

impl ImageRequest {
    pub fn from_query(query: ImageQuery, origin_url: impl Into<String>, site: &SiteConfig) -> Self {
        Self {
            kind: ImageKind::from_param(query.kind.as_deref()),
            title: query.title.unwrap_or_else(|| site.title.clone()),
            description: query.description.unwrap_or_else(|| site.description.clone()),
            chat_template: query.chat_template,
            origin_url: origin_url.into(),
        }
    }

    /// Host shown in the card footer.
    pub fn origin_host(&self) -> &str {
        let host = self
            .origin_url
            .split_once("://")
            .map_or(self.origin_url.as_str(), |(_, rest)| rest);
        host.trim_end_matches('/')
    }
}

/// Link to the generic card for a page.
pub fn generator_url(
    origin: &str,
    title: &str,
    description: Option<&str>,
) -> Result<Url, url::ParseError> {
    build_url(origin, &[("title", Some(title)), ("description", description)], None)
}

/// Link to the prompt card. The query always carries `kind=prompt`.
pub fn generator_for_prompt_url(
    origin: &str,
    title: &str,
    description: Option<&str>,
    chat_template: Option<&str>,
) -> Result<Url, url::ParseError> {
    build_url(
        origin,
        &[("title", Some(title)), ("description", description), ("chatTemplate", chat_template)],
        Some(ImageKind::Prompt),
    )
}

fn build_url(
    origin: &str,
    params: &[(&str, Option<&str>)],
    kind: Option<ImageKind>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(origin)?.join(OG_PATH)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        if let Some(kind) = kind {
            pairs.append_pair("kind", kind.as_str());
        }
        for (key, value) in params {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                pairs.append_pair(key, value);
            }
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    Ok(url)
}
