use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::views::View;

// --- Route Table Schemas (Output) ---

/// LoadKind
///
/// How a route's component reaches the browser: bundled with the shell, or
/// fetched as a separate chunk on first visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum LoadKind {
    Eager,
    Lazy,
}

/// RouteInfo
///
/// Public description of one route table entry (GET /api/routes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RouteInfo {
    pub path: String,
    pub name: String,
    pub load: LoadKind,
    /// Chunk name for lazy routes; absent for eager ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
}

/// Resolution
///
/// Result of resolving a location path (GET /api/resolve).
/// `fetched` is true only when this navigation issued the chunk fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Resolution {
    pub path: String,
    pub name: String,
    pub load: LoadKind,
    pub fetched: bool,
    pub title: String,
}

// --- Chunk Payload ---

/// ViewChunk
///
/// A separately fetched view bundle (GET /chunks/{chunk}).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ViewChunk {
    pub chunk: String,
    pub title: String,
    pub markup: String,
    #[ts(type = "string")]
    pub fetched_at: DateTime<Utc>,
}

impl ViewChunk {
    pub fn into_view(self) -> View {
        View::new(self.chunk, self.title, self.markup)
    }
}

/// ResolveQuery
///
/// Query parameters accepted by GET /api/resolve.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResolveQuery {
    /// Location path to resolve, e.g. `/results?week=3`.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eager_routes_omit_chunk_field() {
        let info = RouteInfo {
            path: "/".into(),
            name: "home".into(),
            load: LoadKind::Eager,
            chunk: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["load"], "eager");
        assert!(json.get("chunk").is_none());
    }
}
