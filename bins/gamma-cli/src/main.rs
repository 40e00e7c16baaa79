//! gamma - DRM 伽马查找表设置工具
//!
//! 用法:
//! - `gamma [--crtc ID] [--presets FILE] <gamma> [lift gain r g b]`
//! - `gamma [--crtc ID] [--presets FILE] <preset>`
//! - `gamma [--presets FILE] --list`
//!
//! 退出码: 0 成功, 1 平台/硬件错误, 2 用法或取值错误.

mod cli;
mod report;

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{debug, info};

use gamma::logging::{self, LoggingConfig};
use gamma_core::preset::list_presets;
use gamma_core::resolve::resolve_base_target;
use gamma_core::{ErrorClass, GammaError, GammaResult, resolve_params, synthesize};

use cli::Cli;
use report::{DryRunReport, describe_target};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = LoggingConfig::from_verbosity(cli.verbose).with_directory(cli.log_dir.clone());
    let guard = match logging::init(&config) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("警告: 日志初始化失败: {err:#}");
            None
        }
    };

    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&cli, &err);
            ExitCode::from(err.exit_code())
        }
    };

    // 退出前刷新日志文件
    drop(guard);
    code
}

fn run(cli: &Cli) -> GammaResult<()> {
    let invocation = cli.invocation();
    let sources = invocation.sources();

    if cli.list {
        // 无 --crtc 时仍要读取 [config], 其中的无效 crtc 是致命错误
        let (crtc, origin) = resolve_base_target(cli.crtc, &sources)?;
        debug!("默认 CRTC {crtc} ({})", describe_target(&origin));
        print!("{}", list_presets(&sources));
        return Ok(());
    }

    if cli.args.is_empty() {
        return Err(GammaError::Usage("缺少参数".to_string()));
    }

    let resolution = resolve_params(&invocation)?;
    let params = resolution.params;
    info!(
        "CRTC {} ({}): {}",
        params.target,
        describe_target(&resolution.target_origin),
        params.curve
    );

    if cli.dry_run {
        let lut = synthesize(&params.curve, cli.lut_size as usize)?;
        let report = DryRunReport::new(&resolution, lut);
        if cli.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|err| GammaError::Io(err.into()))?;
            println!("{json}");
        } else {
            print!("{}", report.to_text());
        }
        return Ok(());
    }

    let written = gamma::apply(&params)?;
    debug!("共写入 {written} 项");
    Ok(())
}

/// 错误输出: 错误信息写入 stderr, 预设列表写入 stdout
#[derive(Debug, Default, PartialEq, Eq)]
struct ErrorOutput {
    stderr: String,
    stdout: String,
}

/// 渲染错误; 用法错误附带用法说明, 预设不存在时附带预设列表
fn render_error(cli: &Cli, err: &GammaError) -> ErrorOutput {
    match err.class() {
        ErrorClass::Usage => {
            let kind = match err {
                GammaError::ArgumentCount(_) => ErrorKind::WrongNumberOfValues,
                _ => ErrorKind::MissingRequiredArgument,
            };
            ErrorOutput {
                stderr: Cli::command().error(kind, err).render().to_string(),
                stdout: String::new(),
            }
        }
        ErrorClass::Lookup => ErrorOutput {
            stderr: format!("错误: {err}\n"),
            stdout: list_presets(&cli.invocation().sources()).to_string(),
        },
        _ => ErrorOutput {
            stderr: format!("错误: {err}\n"),
            stdout: String::new(),
        },
    }
}

fn report_error(cli: &Cli, err: &GammaError) {
    let output = render_error(cli, err);
    eprint!("{}", output.stderr);
    print!("{}", output.stdout);
}
