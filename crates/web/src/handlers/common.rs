use axum::{http::header, response::IntoResponse};
use maud::{Markup, html};
use url::Url;

pub fn page_head() -> Markup {
    html! {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1.0";
        meta name="color-scheme" content="light";
    }
}

/// Link preview metadata for a page.
pub struct PageMeta<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image: Url,
    pub url: Url,
}

impl PageMeta<'_> {
    pub fn render(&self) -> Markup {
        html! {
            title { (self.title) }
            link rel="canonical" href=(self.url);
            meta name="description" content=(self.description);
            meta property="og:type" content="website";
            meta property="og:title" content=(self.title);
            meta property="og:description" content=(self.description);
            meta property="og:image" content=(self.image);
            meta property="og:image:width" content="1200";
            meta property="og:image:height" content="630";
            meta property="og:url" content=(self.url);
            meta name="twitter:card" content="summary_large_image";
            meta name="twitter:title" content=(self.title);
            meta name="twitter:description" content=(self.description);
            meta name="twitter:image" content=(self.image);
        }
    }
}

pub async fn get_robots() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "User-agent: *\nAllow: /\n")
}
