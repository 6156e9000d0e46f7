use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{RawQuery, State},
    response::{Html, IntoResponse, Response},
};
use maud::{DOCTYPE, html};
use pwf_core::{
    AppError, FullUri,
    config::Config,
    og::{ImageQuery, generator_for_prompt_url, generator_url},
    util::{UrlExt, uri_to_url},
};

use crate::handlers::common::{PageMeta, page_head};

pub async fn get_home(
    State(config): State<Arc<Config>>,
    FullUri(uri): FullUri,
) -> Result<Response, AppError> {
    let request_url = uri_to_url(&uri).context("Failed to parse URI")?;
    let canonical_url = request_url.with_path("/");
    let site = &config.site;
    let image =
        generator_url(&request_url.origin_str(), &site.title, Some(site.description.as_str()))?;
    let page_meta = PageMeta {
        title: &site.title,
        description: &site.description,
        image,
        url: canonical_url,
    };
    let rendered = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                (page_head())
                (page_meta.render())
            }
            body {
                main {
                    h1 { (site.title) }
                    p { (site.description) }
                }
            }
        }
    };
    Ok(Html(rendered.into_string()).into_response())
}

/// Public preview of a shared prompt. Fields default like the card generator.
pub async fn get_prompt(
    State(config): State<Arc<Config>>,
    FullUri(uri): FullUri,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let request_url = uri_to_url(&uri).context("Failed to parse URI")?;
    let query = ImageQuery::parse(query.as_deref());
    let site = &config.site;
    let title = query.title.as_deref().unwrap_or(&site.title);
    let description = query.description.as_deref().unwrap_or(&site.description);
    let chat_template = query.chat_template.as_deref();
    let image = generator_for_prompt_url(
        &request_url.origin_str(),
        title,
        Some(description),
        chat_template,
    )?;
    let page_meta = PageMeta { title, description, image, url: request_url };
    let rendered = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                (page_head())
                (page_meta.render())
                meta name="robots" content="noindex";
            }
            body {
                main {
                    small { a href="/" { (site.title) } }
                    h1 { (title) }
                    p { (description) }
                    @if let Some(chat_template) = chat_template {
                        pre { code { (chat_template) } }
                    }
                }
            }
        }
    };
    Ok(Html(rendered.into_string()).into_response())
}
