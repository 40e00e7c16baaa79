//! 预设文件与配置合并集成测试.
//!
//! 在临时目录中写入真实的预设文件, 验证:
//! 预设查找 → `[config]` 默认 CRTC → 目标优先级 → 预设列举

use std::fs;
use std::path::{Path, PathBuf};

use gamma::core::preset::{PresetSources, list_presets, load_preset};
use gamma::core::resolve::{CurveOrigin, TargetOrigin, resolve_base_target};
use gamma::core::{CurveParams, DEFAULT_CRTC, GammaError, Invocation, resolve_params, synthesize};
use tempfile::TempDir;

// ============================================================
// 辅助函数
// ============================================================

fn write_file(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    if let Err(err) = fs::write(&path, text) {
        panic!("写入 {} 失败: {err}", path.display());
    }
    path
}

fn invocation(crtc: Option<u32>, presets: &Path, args: &[&str]) -> Invocation {
    Invocation {
        crtc,
        presets: Some(presets.to_path_buf()),
        positionals: args.iter().map(|s| s.to_string()).collect(),
    }
}

const PRESETS: &str = "\
; 显示器预设
[config]
crtc = 70

[warm]
gamma = 1.2
r = 1.1
b = 0.9

[night]
gamma = 1.5   # 夜间
gain = 0.8
crtc = 0x50

[cool]
b = 1.1
";

// ============================================================
// 目标优先级
// ============================================================

#[test]
fn test_preset_uses_config_crtc() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", PRESETS);

    let res = resolve_params(&invocation(None, &path, &["warm"])).unwrap();
    assert_eq!(res.params.target, 70);
    assert_eq!(res.target_origin, TargetOrigin::Config(path.clone()));
    assert_eq!(
        res.params.curve,
        CurveParams {
            gamma: 1.2,
            red: 1.1,
            blue: 0.9,
            ..CurveParams::NEUTRAL
        }
    );
    match res.curve_origin {
        CurveOrigin::Preset(preset) => assert_eq!(preset.source, Some(path)),
        CurveOrigin::Numeric => panic!("期望预设来源"),
    }
}

#[test]
fn test_preset_crtc_beats_config() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", PRESETS);

    let res = resolve_params(&invocation(None, &path, &["night"])).unwrap();
    assert_eq!(res.params.target, 0x50);
    assert_eq!(res.target_origin, TargetOrigin::Preset);
    assert_eq!(res.params.curve.gain, 0.8);
}

#[test]
fn test_command_line_crtc_beats_everything() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", PRESETS);

    let res = resolve_params(&invocation(Some(5), &path, &["night"])).unwrap();
    assert_eq!(res.params.target, 5);
    assert_eq!(res.target_origin, TargetOrigin::CommandLine);

    let res = resolve_params(&invocation(Some(5), &path, &["2.2"])).unwrap();
    assert_eq!(res.params.target, 5);
}

#[test]
fn test_numeric_path_uses_config_crtc() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", PRESETS);

    let res = resolve_params(&invocation(None, &path, &["1.8", "0.05"])).unwrap();
    assert_eq!(res.params.target, 70);
    assert_eq!(res.curve_origin, CurveOrigin::Numeric);
    assert_eq!(res.params.curve.lift, 0.05);
}

#[test]
fn test_config_crtc_falls_through_search_order() {
    let dir = TempDir::new().unwrap();
    let first = write_file(dir.path(), "a.ini", "[warm]\ngamma = 1.1\n");
    let second = write_file(dir.path(), "b.ini", "[config]\ncrtc = 012\n");
    let sources = PresetSources::SearchOrder(vec![first, second.clone()]);

    let (crtc, origin) = resolve_base_target(None, &sources).unwrap();
    assert_eq!(crtc, 10);
    assert_eq!(origin, TargetOrigin::Config(second));

    let empty = PresetSources::SearchOrder(vec![dir.path().join("missing.ini")]);
    let (crtc, origin) = resolve_base_target(None, &empty).unwrap();
    assert_eq!((crtc, origin), (DEFAULT_CRTC, TargetOrigin::BuiltIn));
}

#[test]
fn test_invalid_config_crtc_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", "[config]\ncrtc = sixty\n[warm]\ngamma=1\n");

    let err = resolve_params(&invocation(None, &path, &["2.2"])).unwrap_err();
    assert!(matches!(err, GammaError::ConfigParse { line: 2, .. }));
    assert_eq!(err.exit_code(), 2);

    // --list 同样会读取 [config]
    let sources = PresetSources::Explicit(path.clone());
    assert!(resolve_base_target(None, &sources).is_err());

    // 命令行给出 --crtc 时不读取 [config]
    assert!(resolve_params(&invocation(Some(1), &path, &["warm"])).is_ok());
}

// ============================================================
// 预设解析
// ============================================================

#[test]
fn test_preset_without_gamma_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", PRESETS);

    let err = resolve_params(&invocation(None, &path, &["cool"])).unwrap_err();
    match &err {
        GammaError::MissingGamma(name) => assert_eq!(name, "cool"),
        other => panic!("期望缺少 gamma, 实际: {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_invalid_value_names_preset_and_line() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "presets.ini",
        "[warm]\ngamma = 1.2\nlift = 0.9\ngain = oops\n",
    );

    let err = resolve_params(&invocation(None, &path, &["warm"])).unwrap_err();
    match &err {
        GammaError::PresetParse { preset, line, source, .. } => {
            assert_eq!(preset, "warm");
            assert_eq!(*line, 3);
            assert!(matches!(**source, GammaError::OutOfRange { field: "lift", .. }));
        }
        other => panic!("期望解析错误, 实际: {other:?}"),
    }
    assert!(err.to_string().contains("'warm'"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_repeated_section_accumulates() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "presets.ini",
        "[warm]\ngamma = 1.2\nr = 1.1\n[cool]\ngamma = 0.9\n[warm]\nr = 1.3\nlift = 0.02\n",
    );

    let preset = load_preset("warm", &PresetSources::Explicit(path)).unwrap();
    assert_eq!(preset.gamma, Some(1.2));
    assert_eq!(preset.red, Some(1.3));
    assert_eq!(preset.lift, Some(0.02));
}

#[test]
fn test_first_file_wins_without_merge() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.ini", "[warm]\ngamma = 1.1\n");
    let b = write_file(dir.path(), "b.ini", "[warm]\ngamma = 1.3\nlift = 0.1\n");
    let sources = PresetSources::SearchOrder(vec![a.clone(), b]);

    let preset = load_preset("warm", &sources).unwrap();
    assert_eq!(preset.gamma, Some(1.1));
    assert_eq!(preset.lift, None);
    assert_eq!(preset.source, Some(a));
}

#[test]
fn test_builtin_reset_shadows_file_section() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", "[reset]\ngamma = 3\n");

    let res = resolve_params(&invocation(None, &path, &["reset"])).unwrap();
    assert_eq!(res.params.curve, CurveParams::NEUTRAL);

    let lut = synthesize(&res.params.curve, 256).unwrap();
    for (i, e) in lut.entries().iter().enumerate() {
        let expected = (i as f64 / 255.0 * 65535.0).round() as u16;
        assert_eq!((e.red, e.green, e.blue), (expected, expected, expected));
    }
}

#[test]
fn test_bom_and_crlf_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "presets.ini",
        "\u{feff}[warm]\r\ngamma = 1.25\r\ng = 0.95\r\n",
    );

    let res = resolve_params(&invocation(Some(1), &path, &["warm"])).unwrap();
    assert_eq!(res.params.curve.gamma, 1.25);
    assert_eq!(res.params.curve.green, 0.95);
}

#[test]
fn test_unknown_preset_with_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "presets.ini", PRESETS);

    let err = resolve_params(&invocation(None, &path, &["sepia"])).unwrap_err();
    assert!(matches!(err, GammaError::PresetNotFound(ref name) if name == "sepia"));
    assert_eq!(err.exit_code(), 2);
}

// ============================================================
// 预设列举
// ============================================================

#[test]
fn test_listing_without_files_is_reset_only() {
    let dir = TempDir::new().unwrap();
    let sources = PresetSources::SearchOrder(vec![
        dir.path().join("presets.ini"),
        dir.path().join("gamma-presets.ini"),
    ]);

    let listing = list_presets(&sources);
    assert_eq!(listing.names(), vec!["reset"]);
    assert_eq!(listing.to_string(), "未找到 presets.ini.\n  reset\n");

    let missing = dir.path().join("nope.ini");
    let listing = list_presets(&PresetSources::Explicit(missing.clone()));
    assert_eq!(listing.names(), vec!["reset"]);
    assert_eq!(
        listing.to_string(),
        format!("{} 中没有预设.\n  reset\n", missing.display())
    );
}

#[test]
fn test_listing_two_files_no_dedup() {
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "a.ini", "[config]\ncrtc=70\n[warm]\ngamma=1.1\n");
    let b = write_file(dir.path(), "b.ini", "[warm]\ngamma=1.3\n[night]\ngamma=1.5\n");
    let sources = PresetSources::SearchOrder(vec![a.clone(), b.clone()]);

    let listing = list_presets(&sources);
    assert_eq!(listing.names(), vec!["warm", "warm", "night", "reset"]);
    assert_eq!(
        listing.to_string(),
        format!(
            "{} 中的可用预设:\n  warm\n{} 中的可用预设:\n  warm\n  night\n  reset\n",
            a.display(),
            b.display()
        )
    );
}
