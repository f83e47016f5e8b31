use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub chat_api_key: String,
    pub notes_api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendgridConfig {
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub rev_access_token: String,
    pub sendgrid: SendgridConfig,
    pub client_url: String,
    pub upload_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "studyone".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "studyone-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let gemini = GeminiConfig {
            chat_api_key: std::env::var("GEMINI_API_KEY")?,
            notes_api_key: std::env::var("GEMINI_API_KEY_FOR_L2NOTES")?,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-pro-002".into()),
        };
        let sendgrid = SendgridConfig {
            api_key: std::env::var("SENDGRID_API_KEY")?,
            from_email: std::env::var("SENDGRID_FROM_EMAIL")
                .unwrap_or_else(|_| "no-reply@studyone.app".into()),
            from_name: std::env::var("SENDGRID_FROM_NAME").unwrap_or_else(|_| "StudyONE".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            gemini,
            rev_access_token: std::env::var("REV_ACCESS_TOKEN")?,
            sendgrid,
            client_url: std::env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
        })
    }
}
