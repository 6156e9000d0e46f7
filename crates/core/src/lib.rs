pub mod config;
pub mod og;
pub mod util;

use std::{convert::Infallible, net::SocketAddr, str::FromStr};

use axum::{
    Extension,
    extract::{ConnectInfo, FromRequestParts, OriginalUri},
    http::{
        StatusCode, Uri, header,
        request::Parts,
        uri::{Authority, Scheme},
    },
    response::{IntoResponse, Response},
};

pub enum AppError {
    Status(StatusCode),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Status(status) if status == StatusCode::NOT_FOUND => {
                (status, "Not found").into_response()
            }
            Self::Status(status) => status.into_response(),
            Self::Internal(err) => {
                tracing::error!("{:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Something went wrong: {}", err))
                    .into_response()
            }
        }
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self { Self::Internal(err.into()) }
}

/// Extractor for the full URI of the request, including the scheme and authority.
/// Uses the `x-forwarded-proto` and `x-forwarded-host` headers if present.
pub struct FullUri(pub Uri);

impl<S> FromRequestParts<S> for FullUri
where S: Send + Sync
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let uri = Extension::<OriginalUri>::from_request_parts(parts, state)
            .await
            .map_or_else(|_| parts.uri.clone(), |Extension(OriginalUri(uri))| uri);
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Scheme::from_str(value).ok())
            .or_else(|| uri.scheme().cloned())
            .unwrap_or(Scheme::HTTP);
        // Unparseable host headers fall through to the next source
        let authority = [parts.headers.get("x-forwarded-host"), parts.headers.get(header::HOST)]
            .into_iter()
            .flatten()
            .find_map(|value| value.to_str().ok().and_then(|s| Authority::from_str(s).ok()))
            .or_else(|| uri.authority().cloned());
        let authority = match authority {
            Some(authority) => authority,
            None => match ConnectInfo::<SocketAddr>::from_request_parts(parts, state).await {
                Ok(ConnectInfo(socket_addr)) => Authority::from_str(&socket_addr.to_string())
                    .unwrap_or_else(|_| Authority::from_static("localhost")),
                Err(_) => Authority::from_static("localhost"),
            },
        };
        let mut builder = Uri::builder().scheme(scheme).authority(authority);
        if let Some(path_and_query) = uri.path_and_query().cloned() {
            builder = builder.path_and_query(path_and_query);
        } else {
            builder = builder.path_and_query("/");
        }
        Ok(FullUri(builder.build().unwrap_or(uri)))
    }
}
