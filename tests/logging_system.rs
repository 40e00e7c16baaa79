use chrono::{Duration, Local};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use gamma::logging::{LoggingConfig, init, level_for_verbosity, maintenance};

// 注意: tracing 的全局订阅器只能初始化一次,
// 本文件中只有一个测试调用 init()

fn dated_log_name(prefix: &str, days_ago: i64) -> String {
    let date = Local::now().date_naive() - Duration::days(days_ago);
    format!("{}.{}.log", prefix, date.format("%Y-%m-%d"))
}

fn read_to_string(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => panic!("读取 {} 失败: {err}", path.display()),
    }
}

#[test]
fn test_logging_init_writes_file_and_runs_maintenance() {
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");
    fs::create_dir_all(&log_dir).unwrap();

    // 预置历史日志: 昨天的应被压缩, 过期的应被删除
    let yesterday = log_dir.join(dated_log_name("gamma-test", 1));
    let expired = log_dir.join(dated_log_name("gamma-test", 40));
    fs::write(&yesterday, "昨天的日志\n").unwrap();
    fs::write(&expired, "过期日志\n").unwrap();

    let config = LoggingConfig {
        file_prefix: "gamma-test".to_string(),
        retention_days: 30,
        ..LoggingConfig::from_verbosity(1)
    }
    .with_directory(Some(log_dir.clone()));

    let guard = init(&config).expect("日志初始化失败");

    tracing::info!("测试信息日志");
    tracing::debug!("测试调试日志");
    tracing::trace!("不应写入的跟踪日志");
    // 库 crate 通过 log 记录, 经桥接写入同一文件
    log::info!("来自 log 的日志");

    // drop guard 刷新后台写入线程
    drop(guard);

    let today = log_dir.join(dated_log_name("gamma-test", 0));
    let text = read_to_string(&today);
    assert!(text.contains("测试信息日志"), "缺少 info 日志: {text}");
    assert!(text.contains("测试调试日志"), "缺少 debug 日志: {text}");
    assert!(!text.contains("不应写入的跟踪日志"));
    assert!(text.contains("来自 log 的日志"), "log 桥接失败: {text}");
    assert!(text.contains("INFO "));

    assert!(!yesterday.exists(), "昨天的日志应已压缩");
    assert!(Path::new(&format!("{}.gz", yesterday.display())).exists());
    assert!(!expired.exists(), "过期日志应已删除");
}

#[test]
fn test_maintenance_ignores_other_prefixes() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let other = dir.join(dated_log_name("other", 60));
    fs::write(&other, "x").unwrap();

    let config = LoggingConfig::default();
    let today = Local::now().date_naive();
    let report = maintenance::run(&config, dir, today).unwrap();
    assert!(report.is_empty());
    assert!(other.exists());
}

#[test]
fn test_verbosity_levels() {
    assert_eq!(LoggingConfig::default().level, "warn");
    assert_eq!(LoggingConfig::from_verbosity(2).level, level_for_verbosity(2));
    assert_eq!(LoggingConfig::default().directory, None);
}
