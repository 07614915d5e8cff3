use crate::dtos::{EntityIdParams, EntityListResponse, EntityRelationsParams, EntityResponse, ListResponse};
use crate::models::{ClientProfile, Entity, EntityRelations, InvoiceLine, SupplierProfile};
use crate::services::record_report;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

/// The client listing is capped.
const CLIENT_LIST_LIMIT: i64 = 100;

pub async fn list_entities(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Entity>>, AppError> {
    let rows = state.store.list_entities().await?;
    Ok(Json(ListResponse::new(
        rows.into_iter().map(Entity::from).collect(),
    )))
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ClientProfile>>, AppError> {
    let rows = state.store.list_clients(CLIENT_LIST_LIMIT).await?;
    Ok(Json(ListResponse::new(
        rows.into_iter().map(ClientProfile::from).collect(),
    )))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<SupplierProfile>>, AppError> {
    let rows = state.store.list_suppliers().await?;
    Ok(Json(ListResponse::new(
        rows.into_iter().map(SupplierProfile::from).collect(),
    )))
}

pub async fn entity_relations(
    State(state): State<AppState>,
    Query(params): Query<EntityRelationsParams>,
) -> Result<Json<EntityResponse<EntityRelations>>, AppError> {
    let entity_id = params.entity_id()?;
    let range = params.date_range()?;

    let result = state.entities.relations(entity_id, range).await;
    record_report("entity_relations", &result);

    Ok(Json(EntityResponse {
        success: true,
        data: result?,
        entidad_id: entity_id,
    }))
}

pub async fn entity_articles(
    State(state): State<AppState>,
    Query(params): Query<EntityIdParams>,
) -> Result<Json<EntityListResponse<InvoiceLine>>, AppError> {
    let entity_id = params.entity_id()?;

    let result = state.invoices.article_summary(entity_id).await;
    record_report("entity_articles", &result);
    let data = result?;

    Ok(Json(EntityListResponse {
        success: true,
        count: data.len(),
        data,
        entidad_id: entity_id,
    }))
}
