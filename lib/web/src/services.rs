use crate::error::{registry_error_status, RegistryServerError};
use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use registry::model::{Facets, FilterSelection};
use registry::SearchResponse;
use serde::Deserialize;

/// The body of a filter request.
///
/// `filters` is either an object such as `{"Publisher": ["Org A"]}` or a string holding that
/// object serialized as JSON, as submitted by the registry form.
#[derive(Debug, Default, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub filters: serde_json::Value,
}

impl FilterRequest {
    fn selection(&self) -> Result<FilterSelection, RegistryServerError> {
        match &self.filters {
            serde_json::Value::String(encoded) => {
                let decoded = serde_json::from_str::<serde_json::Value>(encoded).map_err(|e| {
                    RegistryServerError::BadRequest(format!("Invalid filters: {e}"))
                })?;
                Ok(FilterSelection::from_json(&decoded))
            }
            filters => Ok(FilterSelection::from_json(filters)),
        }
    }
}

pub async fn handle_services_get(State(state): State<AppState>) -> (StatusCode, Json<SearchResponse>) {
    search(&state, &FilterSelection::new()).await
}

pub async fn handle_services_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<(StatusCode, Json<SearchResponse>), RegistryServerError> {
    let selection = request.selection()?;
    Ok(search(&state, &selection).await)
}

pub async fn handle_facets_get(
    State(state): State<AppState>,
) -> Result<Json<Facets>, RegistryServerError> {
    Ok(Json(state.registry.facet_options().await?))
}

async fn search(state: &AppState, selection: &FilterSelection) -> (StatusCode, Json<SearchResponse>) {
    match state.registry.try_search(selection).await {
        Ok(result) => (StatusCode::OK, Json(result.into())),
        Err(error) => {
            tracing::warn!(%error, "Search failed");
            (registry_error_status(&error), Json(SearchResponse::failed(error)))
        }
    }
}
