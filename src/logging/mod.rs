//! 日志初始化模块.
//!
//! 双输出:
//! - console: 输出到 stderr, 终端下彩色, 级别由 -v 次数或 GAMMA_LOG 决定
//! - file: 可选, 无色, 写入 {directory}/{prefix}.{date}.log
//!
//! 库 crate 通过 `log` 记录, 由 tracing-subscriber 的 log 桥接转发.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

pub mod maintenance;

/// 控制台日志过滤器的环境变量
pub const LOG_ENV: &str = "GAMMA_LOG";

/// 日志目录的环境变量
pub const LOG_DIR_ENV: &str = "GAMMA_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 控制台过滤器 (EnvFilter 语法)
    pub level: String,
    /// 日志文件目录, 为空时不写文件
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default = "default_file_level")]
    pub file_level: String,
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    #[serde(default = "default_true")]
    pub compress_history: bool,
}

fn default_true() -> bool {
    true
}

fn default_file_prefix() -> String {
    "gamma".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

fn default_retention_days() -> i64 {
    14
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_verbosity(0)
    }
}

impl LoggingConfig {
    /// 按 -v 次数构造: 0=warn, 1=info, 2=debug, 3+=trace
    pub fn from_verbosity(verbosity: u8) -> Self {
        Self {
            level: level_for_verbosity(verbosity).to_string(),
            directory: None,
            file_prefix: default_file_prefix(),
            file_level: default_file_level(),
            retention_days: default_retention_days(),
            compress_history: true,
        }
    }

    /// 启用文件输出
    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }
}

/// -v 次数对应的级别
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// 日志系统守卫
///
/// 持有文件写入线程的 guard, drop 时刷新缓冲.
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// 初始化日志系统
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let console_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));
    let ansi = std::io::stderr().is_terminal();
    let console_layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .event_format(ConsoleFormatter { ansi })
        .with_filter(console_filter);

    let mut file_guard = None;
    let mut report = None;
    let file_layer = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory)
                .with_context(|| format!("创建日志目录失败, path={}", directory.display()))?;
            let today = Local::now().date_naive();
            report = Some(maintenance::run(config, directory, today));

            let path = build_current_log_path(directory, &config.file_prefix, today);
            let (non_blocking, guard) = tracing_appender::non_blocking(open_append_file(&path)?);
            file_guard = Some(guard);
            Some(
                fmt::Layer::default()
                    .with_writer(non_blocking)
                    .with_ansi(false)
                    .event_format(FileFormatter)
                    .with_filter(EnvFilter::new(&config.file_level)),
            )
        }
        None => None,
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("初始化日志订阅器失败")?;

    // 订阅器就绪后再报告维护结果
    match report {
        Some(Ok(report)) if !report.is_empty() => tracing::debug!("日志维护: {report}"),
        Some(Err(err)) => tracing::warn!("日志维护失败: {err:#}"),
        _ => {}
    }

    Ok(LoggingGuard { _file: file_guard })
}

fn open_append_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("打开日志文件失败, path={}", path.display()))
}

pub(crate) fn build_current_log_path(directory: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    directory.join(format!("{}.{}.log", prefix, date.format("%Y-%m-%d")))
}

/// Console 格式: 时间戳 + 级别 (终端下彩色) + 消息
struct ConsoleFormatter {
    ansi: bool,
}

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let level = *event.metadata().level();
        write!(
            writer,
            "[{:02}:{:02}:{:02}.{:03}] ",
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis()
        )?;
        if self.ansi {
            let color = match level {
                tracing::Level::ERROR => "\x1b[31m",
                tracing::Level::WARN => "\x1b[33m",
                tracing::Level::INFO => "\x1b[32m",
                _ => "\x1b[34m",
            };
            write!(writer, "{color}{level:5}\x1b[0m > ")?;
        } else {
            write!(writer, "{level:5} > ")?;
        }
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// File 格式: 无色, 日期时间 + 级别 + 源码位置 + 消息
struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = Local::now();
        let meta = event.metadata();
        write!(
            writer,
            "[{:02}-{:02} {:02}:{:02}:{:02}.{:03}] {:5} {}:{} > ",
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            now.timestamp_subsec_millis(),
            meta.level().to_string(),
            meta.file().unwrap_or("unknown"),
            meta.line().unwrap_or(0)
        )?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
