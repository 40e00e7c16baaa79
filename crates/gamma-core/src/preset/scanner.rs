//! 预设文件的逐行扫描器.
//!
//! 文件格式 (INI 风格, 无嵌套):
//! - `#` 或 `;` 之后到行尾为注释
//! - 行首尾空白被裁剪, 随后去掉行首的 UTF-8 BOM
//! - `[name]` 开始一个段, `key = value` 为段内条目
//! - 缺少 `]` 的段头和不含 `=` 的行被忽略

use std::iter::Enumerate;
use std::str::Lines;

/// 段名最大字节数, 超出部分截断后再裁剪空白
pub(crate) const SECTION_NAME_MAX: usize = 255;

/// 一行有效内容的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IniLine<'a> {
    /// 段头 `[name]`
    Section(&'a str),
    /// 条目 `key = value`
    Entry { key: &'a str, value: &'a str },
}

/// 逐行产出有效内容, 附带 1 起始的行号
pub(crate) struct IniLines<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl<'a> IniLines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }
}

impl<'a> Iterator for IniLines<'a> {
    type Item = (usize, IniLine<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, raw) in self.lines.by_ref() {
            if let Some(line) = classify(raw) {
                return Some((idx + 1, line));
            }
        }
        None
    }
}

/// 裁剪空白 (空格、制表符、回车、换行), 再去掉行首 BOM
pub(crate) fn trim_field(s: &str) -> &str {
    let trimmed = s.trim_matches([' ', '\t', '\r', '\n']);
    trimmed.strip_prefix('\u{feff}').unwrap_or(trimmed)
}

/// 对单行分类, 空行/注释行/无法识别的行返回 `None`
fn classify(raw: &str) -> Option<IniLine<'_>> {
    let content = match raw.find(['#', ';']) {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let line = trim_field(content);
    if line.is_empty() {
        return None;
    }

    if let Some(rest) = line.strip_prefix('[') {
        let end = rest.find(']')?;
        return Some(IniLine::Section(section_name(&rest[..end])));
    }

    let (key, value) = line.split_once('=')?;
    Some(IniLine::Entry {
        key: trim_field(key),
        value: trim_field(value),
    })
}

/// 段名截断到 [`SECTION_NAME_MAX`] 字节 (按字符边界), 再裁剪
fn section_name(raw: &str) -> &str {
    let mut end = raw.len().min(SECTION_NAME_MAX);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    trim_field(&raw[..end])
}

/// 段内条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SectionEntry<'a> {
    /// 行号 (1 起始)
    pub(crate) line: usize,
    pub(crate) key: &'a str,
    pub(crate) value: &'a str,
}

/// 扫描状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'a> {
    /// 当前不在目标段内 (可能在其他段或文件开头)
    Outside,
    /// 当前位于目标段内
    Inside { section: &'a str },
}

/// 目标段扫描器
///
/// 只产出位于目标段内的条目. 同一文件中目标段出现多次时,
/// 各次出现的条目按文件顺序依次产出.
pub(crate) struct SectionScanner<'a> {
    lines: IniLines<'a>,
    target: &'a str,
    state: ScanState<'a>,
    found: bool,
}

impl<'a> SectionScanner<'a> {
    pub(crate) fn new(text: &'a str, target: &'a str) -> Self {
        Self {
            lines: IniLines::new(text),
            target,
            state: ScanState::Outside,
            found: false,
        }
    }

    /// 已扫描部分中是否出现过目标段
    pub(crate) fn found(&self) -> bool {
        self.found
    }
}

impl<'a> Iterator for SectionScanner<'a> {
    type Item = SectionEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (line, item) in self.lines.by_ref() {
            match item {
                IniLine::Section(name) if name == self.target => {
                    self.found = true;
                    self.state = ScanState::Inside { section: name };
                }
                IniLine::Section(_) => self.state = ScanState::Outside,
                IniLine::Entry { key, value } => match self.state {
                    ScanState::Inside { section } => {
                        log::trace!("[{section}] 第 {line} 行: {key} = {value}");
                        return Some(SectionEntry { line, key, value });
                    }
                    ScanState::Outside => {}
                },
            }
        }
        None
    }
}

/// 文件中所有段名 (按出现顺序, 不去重)
pub(crate) fn section_names(text: &str) -> impl Iterator<Item = &str> {
    IniLines::new(text).filter_map(|(_, line)| match line {
        IniLine::Section(name) => Some(name),
        IniLine::Entry { .. } => None,
    })
}
