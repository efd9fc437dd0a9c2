//! Categories API endpoints.

use api_types::{
    Created,
    category::{CategoryCreate, CategoryNameQuery, CategoryUpdate, CategoryView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
};
use engine::{CreateCategoryCmd, UpdateCategoryCmd};

use crate::{
    ServerError,
    extract::{JsonBody, RequestContext, parse_path_uuid},
    server::{CATEGORIES_PATH, ServerState},
};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        uuid: category.id,
        user_uuid: category.user_id,
        name: category.name,
        kind: category.kind.as_str().to_string(),
        version: category.version,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    JsonBody(payload): JsonBody<CategoryCreate>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Created>), ServerError> {
    tracing::info!("create category");
    if payload.name.trim().is_empty() || payload.kind.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "missing required fields: name, type".to_string(),
        ));
    }

    let mut cmd = CreateCategoryCmd::new(payload.name, payload.kind);
    if let Some(user_id) = payload.user_uuid {
        cmd = cmd.user_id(user_id);
    }
    let id = state.engine.categories().create(&ctx, cmd).await?;

    tracing::info!("category {id} created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{CATEGORIES_PATH}/one/{id}"))],
        Json(Created { uuid: id }),
    ))
}

pub async fn list_all(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    tracing::info!("get all categories");
    let categories: Vec<CategoryView> = state
        .engine
        .categories()
        .get_all(&ctx)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    tracing::info!("{} categories found", categories.len());
    Ok(Json(categories))
}

pub async fn get(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_id): Path<String>,
) -> Result<Json<CategoryView>, ServerError> {
    let id = parse_path_uuid(&raw_id, "category uuid")?;
    tracing::info!("get category {id}");
    let category = state.engine.categories().get_by_uuid(&ctx, id).await?;
    tracing::info!("category {id} found");
    Ok(Json(map_category(category)))
}

pub async fn list_by_user(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_user_id): Path<String>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let user_id = parse_path_uuid(&raw_user_id, "user uuid")?;
    tracing::info!("get categories of user {user_id}");
    let categories: Vec<CategoryView> = state
        .engine
        .categories()
        .get_by_user_uuid(&ctx, user_id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    tracing::info!("{} categories found for user {user_id}", categories.len());
    Ok(Json(categories))
}

pub async fn get_by_name(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(name): Path<String>,
    Query(query): Query<CategoryNameQuery>,
) -> Result<Json<CategoryView>, ServerError> {
    if name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "category name must not be empty".to_string(),
        ));
    }
    tracing::info!("get category by name {name:?}");
    let category = state
        .engine
        .categories()
        .get_by_name(&ctx, query.user_uuid, &name)
        .await?;
    tracing::info!("category {} found by name", category.id);
    Ok(Json(map_category(category)))
}

/// Partial update. Absent fields keep their stored value; `{}` is a no-op.
pub async fn update(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<CategoryUpdate>,
) -> Result<StatusCode, ServerError> {
    let id = parse_path_uuid(&raw_id, "category uuid")?;
    tracing::info!("update category {id}");

    let mut cmd = UpdateCategoryCmd::new(id);
    if let Some(name) = payload.name {
        cmd = cmd.name(name);
    }
    if let Some(version) = payload.version {
        cmd = cmd.expected_version(version);
    }
    state.engine.categories().update(&ctx, cmd).await?;

    tracing::info!("category {id} updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_path_uuid(&raw_id, "category uuid")?;
    tracing::info!("delete category {id}");
    state.engine.categories().delete(&ctx, id).await?;
    tracing::info!("category {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
