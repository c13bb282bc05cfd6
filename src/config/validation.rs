use std::fmt;

use crate::config::models::OpenaiWebChatModel;
use crate::config::schema::{
    ConfigModel, DEFAULT_JWT_SECRET, DEFAULT_USER_SECRET, NEVER_EXPIRE, SQLITE_URL_PREFIX,
};

const MIN_PASSWORD_LEN: usize = 6;
const PROXY_SCHEMES: [&str; 4] = ["http://", "https://", "socks5://", "socks5h://"];

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Checks every section of `config` and collects all violations.
///
/// Expects a normalized model; see [`ConfigModel::normalize`].
pub fn validate_config(config: &ConfigModel) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    validate_common(config, &mut errors, &mut warnings);

    if config.http.port == 0 {
        errors.push(ValidationError {
            field: "http.port".to_string(),
            message: "HTTP port must be between 1 and 65535, got 0".to_string(),
            suggestion: Some("Use a port between 1 and 65535".to_string()),
        });
    }

    if !config.data.database_url.starts_with(SQLITE_URL_PREFIX) {
        errors.push(ValidationError {
            field: "data.database_url".to_string(),
            message: format!(
                "Only sqlite is supported, got {}",
                redact_credentials(&config.data.database_url)
            ),
            suggestion: Some(format!("Use a URL starting with '{SQLITE_URL_PREFIX}'")),
        });
    }

    validate_auth(config, &mut errors, &mut warnings);
    validate_openai_web(config, &mut errors, &mut warnings);
    validate_openai_api(config, &mut errors, &mut warnings);

    if config.stats.request_stats_ttl < NEVER_EXPIRE {
        errors.push(ValidationError {
            field: "stats.request_stats_ttl".to_string(),
            message: format!(
                "Request stats TTL must be at least -1, got {}",
                config.stats.request_stats_ttl
            ),
            suggestion: Some("Use -1 to keep request stats forever".to_string()),
        });
    }

    ValidationResult { errors, warnings }
}

fn validate_common(
    config: &ConfigModel,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let common = &config.common;
    let password_len = common.initial_admin_user_password.chars().count();
    if password_len < MIN_PASSWORD_LEN {
        errors.push(ValidationError {
            field: "common.initial_admin_user_password".to_string(),
            message: format!(
                "Password too short: {password_len} characters, at least {MIN_PASSWORD_LEN} required"
            ),
            suggestion: None,
        });
    } else if common.create_initial_admin_user && common.initial_admin_user_password == "password"
    {
        warnings.push(ValidationWarning {
            field: "common.initial_admin_user_password".to_string(),
            message: "Initial admin user still uses the default password".to_string(),
        });
    }
}

fn validate_auth(
    config: &ConfigModel,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let auth = &config.auth;
    require_positive("auth.jwt_lifetime_seconds", auth.jwt_lifetime_seconds, errors);
    require_positive("auth.cookie_max_age", auth.cookie_max_age, errors);

    if auth.jwt_secret == DEFAULT_JWT_SECRET {
        warnings.push(ValidationWarning {
            field: "auth.jwt_secret".to_string(),
            message: "JWT secret is still the placeholder value".to_string(),
        });
    }
    if auth.user_secret == DEFAULT_USER_SECRET {
        warnings.push(ValidationWarning {
            field: "auth.user_secret".to_string(),
            message: "User secret is still the placeholder value".to_string(),
        });
    }
}

fn validate_openai_web(
    config: &ConfigModel,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let web = &config.openai_web;
    require_positive("openai_web.common_timeout", web.common_timeout, errors);
    require_positive("openai_web.ask_timeout", web.ask_timeout, errors);
    require_positive(
        "openai_web.sync_conversations_schedule_interval_hours",
        web.sync_conversations_schedule_interval_hours,
        errors,
    );
    require_positive(
        "openai_web.max_completion_concurrency",
        u64::from(web.max_completion_concurrency),
        errors,
    );

    let missing: Vec<&str> = OpenaiWebChatModel::ALL
        .iter()
        .filter(|model| !web.model_code_mapping.contains_key(*model))
        .map(|model| model.as_str())
        .collect();
    if !missing.is_empty() {
        errors.push(ValidationError {
            field: "openai_web.model_code_mapping".to_string(),
            message: format!("Missing model codes for: {}", missing.join(", ")),
            suggestion: Some("Normalize the configuration before validating".to_string()),
        });
    }

    if let Some(ref base_url) = web.chatgpt_base_url {
        if !is_http_url(base_url) {
            warnings.push(ValidationWarning {
                field: "openai_web.chatgpt_base_url".to_string(),
                message: "ChatGPT base URL should start with http:// or https://".to_string(),
            });
        }
    }

    if web.enable_team_subscription && web.team_account_id.is_none() {
        warnings.push(ValidationWarning {
            field: "openai_web.team_account_id".to_string(),
            message: "Team subscription enabled but no team_account_id configured".to_string(),
        });
    }

    if web.enable_arkose_endpoint && web.arkose_endpoint_base.is_none() {
        warnings.push(ValidationWarning {
            field: "openai_web.arkose_endpoint_base".to_string(),
            message: "Arkose endpoint enabled but no arkose_endpoint_base configured".to_string(),
        });
    }

    if web.enabled && web.enabled_models.is_empty() {
        warnings.push(ValidationWarning {
            field: "openai_web.enabled_models".to_string(),
            message: "Integration enabled with no models; nothing can be asked".to_string(),
        });
    }

    check_proxy("openai_web.proxy", web.proxy.as_deref(), warnings);
    check_proxy("openai_web.wss_proxy", web.wss_proxy.as_deref(), warnings);
}

fn validate_openai_api(
    config: &ConfigModel,
    errors: &mut Vec<ValidationError>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let api = &config.openai_api;
    require_positive("openai_api.connect_timeout", api.connect_timeout, errors);
    require_positive("openai_api.read_timeout", api.read_timeout, errors);

    if !is_http_url(&api.openai_base_url) {
        warnings.push(ValidationWarning {
            field: "openai_api.openai_base_url".to_string(),
            message: "OpenAI base URL should start with http:// or https://".to_string(),
        });
    }

    if api.enabled && api.enabled_models.is_empty() {
        warnings.push(ValidationWarning {
            field: "openai_api.enabled_models".to_string(),
            message: "Integration enabled with no models; nothing can be asked".to_string(),
        });
    }

    for model in &api.enabled_models {
        if !api.model_code_mapping.contains_key(model) {
            warnings.push(ValidationWarning {
                field: format!("openai_api.model_code_mapping.{model}"),
                message: format!("Enabled model {model} has no model code"),
            });
        }
    }

    check_proxy("openai_api.proxy", api.proxy.as_deref(), warnings);
}

fn require_positive(field: &str, value: u64, errors: &mut Vec<ValidationError>) {
    if value == 0 {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "Value must be at least 1, got 0".to_string(),
            suggestion: None,
        });
    }
}

fn check_proxy(field: &str, proxy: Option<&str>, warnings: &mut Vec<ValidationWarning>) {
    let Some(proxy) = proxy else {
        return;
    };
    let lowered = proxy.trim().to_lowercase();
    if !PROXY_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        warnings.push(ValidationWarning {
            field: field.to_string(),
            message: format!("Unrecognized proxy scheme in {proxy}"),
        });
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    value.starts_with("http://") || value.starts_with("https://")
}

// Keeps `user:pass@` out of error messages.
fn redact_credentials(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
