use core_config::{ConfigError, FromEnv, env_parse_or, env_required};

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_EXPIRATION_SECS: i64 = 3600;

/// Token signing settings.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_EXPIRATION_SECS` (default 3600)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret(&secret)?;

        Ok(Self {
            secret,
            expiration_secs: DEFAULT_EXPIRATION_SECS,
        })
    }

    pub fn with_expiration_secs(mut self, expiration_secs: i64) -> Self {
        self.expiration_secs = expiration_secs;
        self
    }
}

fn check_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {})",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        check_secret(&secret)?;

        let expiration_secs = env_parse_or("JWT_EXPIRATION_SECS", DEFAULT_EXPIRATION_SECS)?;
        if expiration_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self {
            secret,
            expiration_secs,
        })
    }
}
