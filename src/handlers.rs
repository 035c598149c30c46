use crate::{
    AppState,
    config::AppConfig,
    models::{ResolveQuery, Resolution, RouteInfo, ViewChunk},
    navigation::Navigator,
    views::View,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::borrow::Cow;

// --- Route Table API ---

/// list_routes
///
/// Returns the route table in resolution order.
#[utoipa::path(
    get,
    path = "/api/routes",
    responses((status = 200, description = "Route table", body = [RouteInfo]))
)]
pub async fn list_routes(State(navigator): State<Navigator>) -> Json<Vec<RouteInfo>> {
    Json(navigator.table().infos())
}

/// resolve_route
///
/// Resolves a location path the way the shell does, loading the component if
/// it is deferred.
#[utoipa::path(
    get,
    path = "/api/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Resolved route", body = Resolution),
        (status = 404, description = "No route matches"),
        (status = 502, description = "Chunk failed to load")
    )
)]
pub async fn resolve_route(
    State(navigator): State<Navigator>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<Resolution>, StatusCode> {
    navigator
        .navigate(&query.path)
        .await
        .map(|navigation| Json(navigation.resolution()))
        .map_err(|e| e.status_code())
}

// --- Chunk Delivery ---

/// get_chunk
///
/// Serves one split view bundle from the chunk store.
#[utoipa::path(
    get,
    path = "/chunks/{chunk}",
    params(("chunk" = String, Path, description = "Chunk name, e.g. `about`")),
    responses(
        (status = 200, description = "View chunk", body = ViewChunk),
        (status = 404, description = "Unknown chunk"),
        (status = 502, description = "Chunk store failure")
    )
)]
pub async fn get_chunk(
    State(state): State<AppState>,
    Path(chunk): Path<String>,
) -> Result<Json<ViewChunk>, StatusCode> {
    state.chunks.fetch_chunk(&chunk).await.map(Json).map_err(|e| {
        tracing::warn!(%chunk, error = %e, "chunk request failed");
        e.status_code()
    })
}

// --- History-Mode Shell ---

/// render_location
///
/// Fallback for every path not claimed by the API: resolve it against the
/// route table and render the application shell around the matched view.
pub async fn render_location(
    method: Method,
    uri: Uri,
    State(navigator): State<Navigator>,
    State(config): State<AppConfig>,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let location = decode_location(uri.path());
    match navigator.navigate(&location).await {
        Ok(navigation) => Html(
            render_document(&config.site_title, Some(&navigation.route_name), &navigation.view)
                .into_string(),
        )
        .into_response(),
        Err(e) => {
            let status = e.status_code();
            let message = html! {
                section class="error" {
                    p { (e.to_string()) }
                }
            };
            let view = View::new(
                "error",
                status.canonical_reason().unwrap_or("Error"),
                message.into_string(),
            );
            let document = render_document(&config.site_title, None, &view);
            (status, Html(document.into_string())).into_response()
        }
    }
}

/// decode_location
///
/// Percent-decodes the request path before matching, as the browser router
/// sees the decoded location. Invalid UTF-8 leaves the path untouched.
pub fn decode_location(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

/// render_document
///
/// The HTML shell. `data-route` carries the matched route name (empty when no
/// route matched). View markup is trusted and inserted unescaped.
pub fn render_document(site_title: &str, route_name: Option<&str>, view: &View) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1.0";
                title { (view.title) " | " (site_title) }
            }
            body {
                div id="app" data-route=(route_name.unwrap_or("")) {
                    (PreEscaped(view.markup.as_str()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_carries_route_name_and_title() {
        let view = View::new("teams", "Teams", "<p>t</p>\n");
        let html = render_document("Poll", Some("teams"), &view).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data-route=\"teams\""));
        assert!(html.contains("<title>Teams | Poll</title>"));
        assert!(html.contains("<p>t</p>"));
    }

    #[test]
    fn document_escapes_titles_but_not_view_markup() {
        let view = View::new("teams", "A&M <Aggies>", "<b>bold</b>");
        let html = render_document("Poll", None, &view).into_string();
        assert!(html.contains("<title>A&amp;M &lt;Aggies&gt; | Poll</title>"));
        assert!(html.contains("<b>bold</b>"));
        assert!(html.contains("data-route=\"\""));
    }

    #[test]
    fn locations_are_percent_decoded() {
        assert_eq!(decode_location("/%61bout"), "/about");
        assert_eq!(decode_location("/results%2F"), "/results/");
        assert!(matches!(decode_location("/teams"), Cow::Borrowed("/teams")));
        assert_eq!(decode_location("/%FF"), "/%FF");
    }
}
