use crate::configs::ConfigError;
use serde::Deserialize;
use std::env;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoggingOptions {
    /// 로그 파일을 저장할 디렉토리, 파일 이름과 함께 설정 되지 않으면 stderr에만 로깅한다.
    pub dir: Option<String>,
    pub name: Option<String>,

    /// 최대 로그 파일 개수로 로그 파일이 설정한 개수보다 커질 경우 기존의 로그파일들은 삭제 된다.
    /// 설정 되지 않을 시 로그 파일은 삭제 되지 않는다.
    pub keep: Option<usize>,

    /// 로깅할 최소 레벨, 설정하지 않을시 로그 파일이 있으면 DEBUG, 없으면 WARN으로 설정 된다.
    ///
    /// 이 값은 [`tracing::Level`]로 변환 됨으로 자세한 사항은 해당 파일을 확인
    pub level: Option<String>,

    /// 로깅 파일이 분리 되는 기간으로 설정 되지 않을시 기본값은 DAILY로 설정된다.
    ///
    /// 이 값은 [`rolling::Rotation`]으로 변환 됨으로 자세한 사항은 해당 파일을 확인
    pub rotation: Option<String>,
}

impl LoggingOptions {
    pub fn has_log_file(&self) -> bool {
        self.dir.is_some() && self.name.is_some()
    }

    /// 설정된 레벨이 없으면 로그 파일 여부에 따라 기본 레벨을 정한다.
    pub fn max_level(&self) -> Result<tracing::Level, ConfigError> {
        match self.level.as_deref() {
            Some(level) => parse_level(level),
            None if self.has_log_file() => Ok(tracing::Level::DEBUG),
            None => Ok(tracing::Level::WARN),
        }
    }

    /// `LOGGER_*` 환경 변수에서 옵션을 읽는다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let keep = match env::var("LOGGER_KEEP") {
            Ok(v) => Some(v.parse::<usize>()
                .map_err(|e| ConfigError::InvalidOption(format!("LOGGER_KEEP: {}", e)))?),
            Err(_) => None,
        };

        Ok(Self {
            dir: env::var("LOGGER_DIR").ok(),
            name: env::var("LOGGER_FILE_NAME").ok(),
            keep,
            level: env::var("LOGGER_LEVEL").ok(),
            rotation: env::var("LOGGER_ROTATION").ok(),
        })
    }
}

/// 파일 로깅을 위한 백그라운드 워커를 유지한다.
#[derive(Debug)]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

pub(crate) fn set_global_logging_config(c: &LoggingOptions) -> Result<LoggingGuard, ConfigError> {
    let level = c.max_level()?;

    // 콘솔 로그는 stderr로 보내 프로그램의 stdout 출력과 섞이지 않게 한다.
    let (Some(dir), Some(name)) = (&c.dir, &c.name) else {
        init_subscriber(std::io::stderr, level)?;
        return Ok(LoggingGuard { _worker: None });
    };

    let rotation = c.rotation.as_deref().map(parse_rotation).transpose()?
        .unwrap_or(rolling::Rotation::DAILY);

    let mut file_appender = rolling::RollingFileAppender::builder()
        .filename_prefix(name.clone())
        .filename_suffix("log")
        .rotation(rotation);

    if let Some(keep) = c.keep {
        file_appender = file_appender.max_log_files(keep);
    }

    let file_appender = file_appender.build(dir)
        .map_err(|e| ConfigError::Logging(e.to_string()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    init_subscriber(std::io::stderr.and(non_blocking), level)?;

    Ok(LoggingGuard { _worker: Some(guard) })
}

fn init_subscriber<W>(writer: W, level: tracing::Level) -> Result<(), ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_timer(LocalTime::new(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")))
        .with_writer(writer)
        .with_max_level(level)
        .try_init()
        .map_err(|e| ConfigError::Logging(e.to_string()))
}

fn parse_rotation(s: &str) -> Result<rolling::Rotation, ConfigError> {
    match s {
        "DAILY" => Ok(rolling::Rotation::DAILY),
        "HOURLY" => Ok(rolling::Rotation::HOURLY),
        "MINUTELY" => Ok(rolling::Rotation::MINUTELY),
        "NEVER" => Ok(rolling::Rotation::NEVER),
        _ => Err(ConfigError::InvalidOption(format!(
            "로깅 파일 로테이션(rotation)은 DAILY, HOURLY, MINUTELY, NEVER만 가능 합니다. ({})", s
        ))),
    }
}

fn parse_level(l: &str) -> Result<tracing::Level, ConfigError> {
    match l {
        "TRACE" => Ok(tracing::Level::TRACE),
        "DEBUG" => Ok(tracing::Level::DEBUG),
        "INFO" => Ok(tracing::Level::INFO),
        "WARN" => Ok(tracing::Level::WARN),
        "ERROR" => Ok(tracing::Level::ERROR),
        _ => Err(ConfigError::InvalidOption(format!(
            "로그 레벨(level)은 TRACE, DEBUG, INFO, WARN, ERROR만 가능 합니다. ({})", l
        ))),
    }
}
