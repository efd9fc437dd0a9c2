//! Operations API endpoints.

use api_types::{
    Created,
    operation::{OperationCreate, OperationUpdate, OperationView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
};
use chrono::Utc;
use engine::{CreateOperationCmd, MoneyCents, UpdateOperationCmd};

use crate::{
    ServerError,
    extract::{JsonBody, RequestContext, parse_path_uuid},
    server::{OPERATIONS_PATH, ServerState},
};

fn map_operation(operation: engine::Operation) -> OperationView {
    OperationView {
        uuid: operation.id,
        category_uuid: operation.category_id,
        money_sum: operation.money_sum.as_decimal(),
        description: operation.description,
        date_time: operation.date_time.fixed_offset(),
        version: operation.version,
    }
}

fn parse_money(value: f64) -> Result<MoneyCents, ServerError> {
    MoneyCents::try_from(value).map_err(|err| ServerError::BadRequest(err.message().to_string()))
}

pub async fn create(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    JsonBody(payload): JsonBody<OperationCreate>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Created>), ServerError> {
    tracing::info!("create operation");
    if payload.category_uuid.is_nil() {
        return Err(ServerError::BadRequest(
            "missing required fields: category_uuid".to_string(),
        ));
    }

    let money_sum = parse_money(payload.money_sum)?;
    let date_time = payload
        .date_time
        .map(|date_time| date_time.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let mut cmd = CreateOperationCmd::new(payload.category_uuid, money_sum, date_time);
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    let id = state.engine.operations().create(&ctx, cmd).await?;

    tracing::info!("operation {id} created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{OPERATIONS_PATH}/one/{id}"))],
        Json(Created { uuid: id }),
    ))
}

pub async fn get(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_id): Path<String>,
) -> Result<Json<OperationView>, ServerError> {
    let id = parse_path_uuid(&raw_id, "operation uuid")?;
    tracing::info!("get operation {id}");
    let operation = state.engine.operations().get_by_uuid(&ctx, id).await?;
    tracing::info!("operation {id} found");
    Ok(Json(map_operation(operation)))
}

/// Partial update. An empty `description` clears it; the timestamp is fixed.
pub async fn update(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<OperationUpdate>,
) -> Result<StatusCode, ServerError> {
    let id = parse_path_uuid(&raw_id, "operation uuid")?;
    tracing::info!("update operation {id}");

    let mut cmd = UpdateOperationCmd::new(id);
    if let Some(category_id) = payload.category_uuid {
        cmd = cmd.category_id(category_id);
    }
    if let Some(money_sum) = payload.money_sum {
        cmd = cmd.money_sum(parse_money(money_sum)?);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(version) = payload.version {
        cmd = cmd.expected_version(version);
    }
    state.engine.operations().update(&ctx, cmd).await?;

    tracing::info!("operation {id} updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<ServerState>,
    RequestContext(ctx): RequestContext,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_path_uuid(&raw_id, "operation uuid")?;
    tracing::info!("delete operation {id}");
    state.engine.operations().delete(&ctx, id).await?;
    tracing::info!("operation {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
