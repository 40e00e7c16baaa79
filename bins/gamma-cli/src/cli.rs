//! 命令行参数定义.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use gamma::logging::LOG_DIR_ENV;
use gamma_core::number::parse_crtc;
use gamma_core::params::POSITIONAL_RANGES;
use gamma_core::preset::{LOCAL_PRESETS, SYSTEM_PRESETS};
use gamma_core::{CrtcId, DEFAULT_CRTC, GammaError, Invocation};

/// 设置 DRM CRTC 的伽马查找表
#[derive(Parser, Debug)]
#[command(
    name = "gamma",
    version,
    about = "通过 DRM 原子提交设置显示输出的伽马查找表",
    after_help = after_help()
)]
pub struct Cli {
    /// 目标 CRTC 标识 (支持 0x 十六进制与 0 前缀八进制)
    #[arg(long, value_name = "ID", value_parser = parse_crtc_arg)]
    pub crtc: Option<CrtcId>,

    /// 预设文件路径
    #[arg(long, value_name = "FILE")]
    pub presets: Option<PathBuf>,

    /// 列出可用预设
    #[arg(long, conflicts_with = "args")]
    pub list: bool,

    /// 只解析并合成查找表, 打印结果而不写入硬件
    #[arg(long)]
    pub dry_run: bool,

    /// --dry-run 时的查找表长度
    #[arg(
        long,
        value_name = "N",
        default_value_t = 256,
        requires = "dry_run",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub lut_size: u32,

    /// --dry-run 结果输出为 JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// 日志级别 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// 日志文件目录
    #[arg(long, value_name = "DIR", env = LOG_DIR_ENV)]
    pub log_dir: Option<PathBuf>,

    /// `gamma [lift gain r g b]` 数值, 或预设名
    #[arg(value_name = "GAMMA|PRESET", allow_negative_numbers = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// 转换为配置合并的输入
    pub fn invocation(&self) -> Invocation {
        Invocation {
            crtc: self.crtc,
            presets: self.presets.clone(),
            positionals: self.args.clone(),
        }
    }
}

fn parse_crtc_arg(text: &str) -> Result<CrtcId, GammaError> {
    parse_crtc("--crtc", text)
}

fn after_help() -> String {
    let mut text = String::from("取值范围:\n");
    for range in &POSITIONAL_RANGES {
        let _ = writeln!(text, "  {range}");
    }
    let _ = writeln!(text, "\n默认 CRTC: {DEFAULT_CRTC}");
    let _ = write!(
        text,
        "预设文件搜索顺序: {LOCAL_PRESETS}, {SYSTEM_PRESETS} (--presets 指定时只读该文件)\n\
         内置预设: reset (gamma=1 lift=0 gain=1 r=g=b=1)"
    );
    text
}
