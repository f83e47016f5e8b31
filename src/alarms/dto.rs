use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::alarms::repo::Alarm;
use crate::error::ApiError;

pub fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid user ID format."))
}

pub fn parse_alarm_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid alarm ID format."))
}

/// Body of POST /api/alarms. Fields are optional at the serde layer so that
/// missing ones produce the contract's 400 message instead of a decode
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlarmRequest {
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub time: Option<OffsetDateTime>,
}

/// Validated create payload.
#[derive(Debug)]
pub struct NewAlarm {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub time: OffsetDateTime,
}

impl CreateAlarmRequest {
    pub fn validate(self) -> Result<NewAlarm, ApiError> {
        let (Some(user_id), Some(title), Some(description), Some(time)) =
            (self.user_id, self.title, self.description, self.time)
        else {
            return Err(ApiError::validation("All fields are required."));
        };
        Ok(NewAlarm {
            user_id: parse_user_id(&user_id)?,
            title,
            description,
            time,
        })
    }
}

/// Body of PUT /api/alarms/:alarmId, any subset of the mutable fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlarmRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub time: Option<OffsetDateTime>,
}

impl UpdateAlarmRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.is_none() && self.description.is_none() && self.time.is_none() {
            return Err(ApiError::validation(
                "At least one field is required to update.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAlarmRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlarmResponse {
    pub message: String,
    pub alarm: Alarm,
}

#[derive(Debug, Serialize)]
pub struct AlarmListResponse {
    pub alarms: Vec<Alarm>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateAlarmRequest {
        CreateAlarmRequest {
            user_id: Some(Uuid::nil().to_string()),
            title: Some("Exam".into()),
            description: Some("Math".into()),
            time: Some(OffsetDateTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn create_accepts_a_full_payload() {
        let alarm = full_request().validate().expect("valid payload");
        assert_eq!(alarm.user_id, Uuid::nil());
        assert_eq!(alarm.title, "Exam");
    }

    #[test]
    fn create_rejects_any_missing_field() {
        for strip in 0..4 {
            let mut req = full_request();
            match strip {
                0 => req.user_id = None,
                1 => req.title = None,
                2 => req.description = None,
                _ => req.time = None,
            }
            let err = req.validate().unwrap_err();
            assert_eq!(err.to_string(), "All fields are required.");
        }
    }

    #[test]
    fn create_rejects_malformed_user_id() {
        let mut req = full_request();
        req.user_id = Some("5f4dcc3b5aa765d61d8327de".into());
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid user ID format.");
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let empty = UpdateAlarmRequest {
            title: None,
            description: None,
            time: None,
        };
        let err = empty.validate().unwrap_err();
        assert_eq!(err.to_string(), "At least one field is required to update.");

        let partial = UpdateAlarmRequest {
            title: Some("New title".into()),
            description: None,
            time: None,
        };
        assert!(partial.validate().is_ok());
    }

    #[test]
    fn create_body_parses_rfc3339_time() {
        let req: CreateAlarmRequest = serde_json::from_str(
            r#"{"userId":"00000000-0000-0000-0000-000000000000",
                "title":"Exam","description":"Math",
                "time":"2025-01-01T10:00:00Z"}"#,
        )
        .unwrap();
        let alarm = req.validate().unwrap();
        assert_eq!(alarm.time.year(), 2025);
    }
}
