//! Demo data administration for the entity table.

use crate::dtos::{PurgeResponse, SeedResponse};
use crate::models::NewEntity;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use tracing::info;

/// Insert the given entities, but only into an empty table.
pub async fn seed_entities(
    State(state): State<AppState>,
    Json(entities): Json<Vec<NewEntity>>,
) -> Result<(StatusCode, Json<SeedResponse>), AppError> {
    if entities.is_empty() {
        return Err(AppError::bad_request("Se requiere al menos una entidad"));
    }
    if entities.iter().any(|e| e.nombre.trim().is_empty()) {
        return Err(AppError::bad_request("Cada entidad requiere 'nombre'"));
    }

    let existing = state.store.count_entities().await?;
    if existing > 0 {
        info!(existing, "Entity table not empty, seeding skipped");
        return Ok((
            StatusCode::OK,
            Json(SeedResponse {
                success: true,
                inserted: 0,
                existing,
                message: format!("La tabla ya contiene {} entidades", existing),
            }),
        ));
    }

    for entity in &entities {
        state.store.insert_entity(entity).await?;
    }

    info!(inserted = entities.len(), "Entity table seeded");
    Ok((
        StatusCode::CREATED,
        Json(SeedResponse {
            success: true,
            inserted: entities.len(),
            existing: 0,
            message: format!("{} entidades insertadas", entities.len()),
        }),
    ))
}

/// Delete every entity and restart the id sequence.
pub async fn purge_entities(
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, AppError> {
    let deleted = state.store.purge_entities().await?;
    Ok(Json(PurgeResponse {
        success: true,
        deleted,
        message: format!("{} entidades eliminadas", deleted),
    }))
}
