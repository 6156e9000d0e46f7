use axum::{Router, routing::get};
use pwf_core::og::OG_PATH;

use crate::AppState;

mod common;
mod pages;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route("/robots.txt", get(common::get_robots))
        .route(OG_PATH, get(pwf_images::get_og))
        .route("/og.png", get(pwf_images::get_og))
        .route("/prompt", get(pages::get_prompt))
        .route("/", get(pages::get_home))
}
