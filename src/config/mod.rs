//! Configuration management module.

pub mod loader;
pub mod models;
pub mod paths;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, load};
pub use models::{
    ConsoleLogLevel, OpenaiApiChatModel, OpenaiWebChatModel, OpenaiWebFileUploadStrategy,
};
pub use paths::{PathError, Paths};
pub use schema::{
    AuthSetting, CommonSetting, ConfigModel, DataSetting, HttpSetting, LogSetting,
    OpenaiApiSetting, OpenaiWebChatGPTSetting, StatsSetting,
};
pub use settings::{Settings, get, global, reload};
pub use validation::{ValidationError, ValidationResult, ValidationWarning, validate_config};
