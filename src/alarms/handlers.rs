use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::{
    alarms::{
        dto::{
            parse_alarm_id, parse_user_id, AlarmListResponse, AlarmResponse, CreateAlarmRequest,
            DeleteAlarmRequest, MessageResponse, UpdateAlarmRequest,
        },
        repo,
    },
    error::ApiError,
    state::AppState,
};

#[instrument(skip(state, payload))]
pub async fn create_alarm(
    State(state): State<AppState>,
    Json(payload): Json<CreateAlarmRequest>,
) -> Result<(StatusCode, Json<AlarmResponse>), ApiError> {
    let new_alarm = payload.validate()?;

    if !repo::user_exists(&state.db, new_alarm.user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    let alarm = repo::insert(
        &state.db,
        new_alarm.user_id,
        &new_alarm.title,
        &new_alarm.description,
        new_alarm.time,
    )
    .await?;

    info!(alarm_id = %alarm.id, user_id = %alarm.user_id, "alarm created");
    Ok((
        StatusCode::CREATED,
        Json(AlarmResponse {
            message: "Alarm created successfully".into(),
            alarm,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_alarms(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AlarmListResponse>, ApiError> {
    let user_id = parse_user_id(&user_id)?;

    if !repo::user_exists(&state.db, user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    let alarms = repo::list_by_user(&state.db, user_id).await?;
    Ok(Json(AlarmListResponse { alarms }))
}

#[instrument(skip(state, payload))]
pub async fn update_alarm(
    State(state): State<AppState>,
    Path(alarm_id): Path<String>,
    Json(payload): Json<UpdateAlarmRequest>,
) -> Result<Json<AlarmResponse>, ApiError> {
    payload.validate()?;
    let alarm_id = parse_alarm_id(&alarm_id)?;

    let alarm = repo::update(
        &state.db,
        alarm_id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.time,
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Alarm not found"))?;

    info!(alarm_id = %alarm.id, "alarm updated");
    Ok(Json(AlarmResponse {
        message: "Alarm updated successfully".into(),
        alarm,
    }))
}

#[instrument(skip(state, payload))]
pub async fn delete_alarm(
    State(state): State<AppState>,
    Path(alarm_id): Path<String>,
    Json(payload): Json<DeleteAlarmRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Some(user_id) = payload.user_id else {
        return Err(ApiError::validation("User ID is required."));
    };
    let alarm_id = parse_alarm_id(&alarm_id)?;
    let user_id = parse_user_id(&user_id)?;

    if !repo::user_exists(&state.db, user_id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    if !repo::delete(&state.db, alarm_id, user_id).await? {
        return Err(ApiError::not_found("Alarm not found"));
    }

    info!(%alarm_id, %user_id, "alarm deleted");
    Ok(Json(MessageResponse {
        message: "Alarm deleted successfully".into(),
    }))
}
