pub mod fonts;
pub mod og;
pub mod svg;

use std::{sync::Arc, time::Instant};

use anyhow::Result;
use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{IntoResponse, Response},
};
use image::ImageFormat;
use pwf_core::{
    AppError, FullUri,
    config::Config,
    og::{ImageQuery, ImageRequest},
    util::{UrlExt, uri_to_url},
};

use crate::{
    fonts::FontSet,
    og::{OG_HEIGHT, OG_WIDTH, OgOptions},
};

pub const CACHE_CONTROL_DEV: &str = "no-store";
pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

pub fn cache_control(dev: bool) -> &'static str {
    if dev { CACHE_CONTROL_DEV } else { CACHE_CONTROL_IMMUTABLE }
}

/// Render the Open Graph card for `request` as PNG.
pub fn render_og(request: &ImageRequest, fonts: &FontSet, options: &OgOptions) -> Result<Vec<u8>> {
    let svg = og::select_layout(request, options);
    svg::render_image(&svg, fonts, OG_WIDTH, OG_HEIGHT, ImageFormat::Png)
}

pub fn og_response(data: Vec<u8>, dev: bool) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime::IMAGE_PNG.as_ref()),
            (header::CACHE_CONTROL, cache_control(dev)),
        ],
        data,
    )
        .into_response()
}

pub async fn get_og(
    State(config): State<Arc<Config>>,
    FullUri(uri): FullUri,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    let start = Instant::now();
    let origin = uri_to_url(&uri)?.origin_str();
    let request =
        ImageRequest::from_query(ImageQuery::parse(query.as_deref()), origin, &config.site);
    let fonts = fonts::load_font(
        &config.og.fonts_dir,
        &config.og.font_family,
        &[config.og.font_weight],
    )
    .await?;
    let options = OgOptions::from_config(&config.og);
    let kind = request.kind;
    let data =
        tokio::task::spawn_blocking(move || render_og(&request, &fonts, &options)).await??;
    tracing::debug!(
        %kind,
        elapsed = ?start.elapsed(),
        size = data.len(),
        "Rendered Open Graph image"
    );
    Ok(og_response(data, config.server.dev))
}
