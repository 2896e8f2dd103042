use std::env;
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod catalog;
mod logging;

pub use logging::{LoggingGuard, LoggingOptions};

/// 설정 로드 및 로깅 초기화 과정에서 발생하는 에러
#[derive(Debug)]
pub enum ConfigError {
    /// 설정 파일을 읽거나 역직렬화 하지 못함
    Load(config::ConfigError),

    /// 허용 되지 않는 설정 값
    InvalidOption(String),

    /// 로깅 초기화 실패
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Cannot load config, {}", e),
            ConfigError::InvalidOption(message) => write!(f, "Invalid option, {}", message),
            ConfigError::Logging(message) => write!(f, "Cannot initialize logging, {}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(e: config::ConfigError) -> Self {
        ConfigError::Load(e)
    }
}

/// 실행 환경에 따라 .env 파일을 로드한다.
pub fn load_dotenv() {
    let env_filename = env::var("RUN_MODE")
        .map(|env| format!(".env.{}", env))
        .unwrap_or_else(|_| ".env".into());

    dotenvy::from_filename(env_filename).ok();
}

/// 환경 변수로 로깅 옵션을 읽어 전역 로깅을 설정한다.
///
/// 반환된 [`LoggingGuard`]가 살아있는 동안에만 파일 로그가 기록 됨으로 프로그램 종료 시까지 유지해야 한다.
pub fn set_global_logging_config() -> Result<LoggingGuard, ConfigError> {
    let options = LoggingOptions::from_env()?;
    logging::set_global_logging_config(&options)
}
