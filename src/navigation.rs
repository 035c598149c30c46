use std::sync::Arc;

use crate::{
    chunks::ChunkState,
    error::NavigationError,
    models::{LoadKind, Resolution},
    route_table::{Component, RouteTable, normalize_path},
    views::View,
};

/// Navigation
///
/// A completed navigation: the matched route and the view ready to render.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub route_name: String,
    /// Normalized location path.
    pub path: String,
    pub load: LoadKind,
    pub view: View,
    /// True when this navigation fetched the view's chunk.
    pub fetched: bool,
}

impl Navigation {
    pub fn resolution(&self) -> Resolution {
        Resolution {
            path: self.path.clone(),
            name: self.route_name.clone(),
            load: self.load,
            fetched: self.fetched,
            title: self.view.title.clone(),
        }
    }
}

/// Navigator
///
/// Resolves locations against the route table and loads the matched component,
/// awaiting the chunk fetch for deferred routes.
#[derive(Clone)]
pub struct Navigator {
    table: Arc<RouteTable>,
    chunks: ChunkState,
}

impl Navigator {
    pub fn new(table: Arc<RouteTable>, chunks: ChunkState) -> Self {
        Self { table, chunks }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub async fn navigate(&self, location: &str) -> Result<Navigation, NavigationError> {
        let path = normalize_path(location).into_owned();
        let route = self
            .table
            .resolve(&path)
            .ok_or_else(|| NavigationError::NotFound(path.clone()))?;

        let (view, fetched) = match &route.component {
            Component::Eager(view) => (view.clone(), false),
            Component::Lazy(lazy) => lazy.load(&*self.chunks).await.map_err(|source| {
                tracing::warn!(route = %route.name, chunk = lazy.chunk(), error = %source, "deferred view failed to load");
                NavigationError::ChunkLoad {
                    route: route.name.clone(),
                    chunk: lazy.chunk().to_string(),
                    source,
                }
            })?,
        };

        tracing::debug!(route = %route.name, %path, fetched, "navigation resolved");

        Ok(Navigation {
            route_name: route.name.clone(),
            path,
            load: route.component.load_kind(),
            view,
            fetched,
        })
    }
}
