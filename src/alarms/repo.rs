use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored alarm urgency. The server only ever writes the create-time
/// default; clients derive display urgency from the time remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, sqlx::Type)]
#[sqlx(type_name = "alarm_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    #[default]
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub status: AlarmStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub async fn user_exists(db: &PgPool, user_id: Uuid) -> anyhow::Result<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

/// Insert an alarm owned by `user_id`. The foreign key keeps the owner
/// relationship consistent in the same statement.
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    title: &str,
    description: &str,
    time: OffsetDateTime,
) -> anyhow::Result<Alarm> {
    let alarm = sqlx::query_as::<_, Alarm>(
        r#"
        INSERT INTO alarms (user_id, title, description, time)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, title, description, time, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(time)
    .fetch_one(db)
    .await?;
    Ok(alarm)
}

/// All alarms of a user in creation order.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Alarm>> {
    let rows = sqlx::query_as::<_, Alarm>(
        r#"
        SELECT id, user_id, title, description, time, status, created_at
        FROM alarms
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Partial overwrite: absent fields keep their stored values. Returns None
/// when the alarm does not exist.
pub async fn update(
    db: &PgPool,
    alarm_id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    time: Option<OffsetDateTime>,
) -> anyhow::Result<Option<Alarm>> {
    let alarm = sqlx::query_as::<_, Alarm>(
        r#"
        UPDATE alarms
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            time = COALESCE($4, time)
        WHERE id = $1
        RETURNING id, user_id, title, description, time, status, created_at
        "#,
    )
    .bind(alarm_id)
    .bind(title)
    .bind(description)
    .bind(time)
    .fetch_optional(db)
    .await?;
    Ok(alarm)
}

/// Delete an alarm owned by `user_id`. Returns false when no such alarm
/// exists for that user.
pub async fn delete(db: &PgPool, alarm_id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM alarms WHERE id = $1 AND user_id = $2")
        .bind(alarm_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_green_and_serializes_lowercase() {
        assert_eq!(AlarmStatus::default(), AlarmStatus::Green);
        assert_eq!(
            serde_json::to_string(&AlarmStatus::default()).unwrap(),
            r#""green""#
        );
        assert_eq!(
            serde_json::to_string(&AlarmStatus::Red).unwrap(),
            r#""red""#
        );
    }

    #[test]
    fn alarm_serializes_camel_case_rfc3339() {
        let alarm = Alarm {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            title: "Exam".into(),
            description: Some("Math".into()),
            time: OffsetDateTime::UNIX_EPOCH,
            status: AlarmStatus::Green,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&alarm).unwrap();
        assert_eq!(json["userId"], alarm.user_id.to_string());
        assert_eq!(json["status"], "green");
        assert_eq!(json["time"], "1970-01-01T00:00:00Z");
        assert!(json.get("createdAt").is_some());
    }
}
