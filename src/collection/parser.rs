use std::path::Path;

use crate::collection::types::Collection;

/// 计划源解析错误
///
/// line 为源文档中发生语法或类型错误的 1 基行号，
/// 是诊断畸形计划的首要信息，与 message 一起原样保留。
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} (行 {line})")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// 解析计划源（JSON 集合文档）
///
/// 解析只发生一次；成功后的 Collection 不再变化。
pub fn parse(source: &[u8]) -> Result<Collection, ParseError> {
    serde_json::from_slice(source).map_err(|err| ParseError {
        line: err.line(),
        message: err.to_string(),
    })
}

/// 从文件路径解析计划源
pub fn parse_file<P: AsRef<Path>>(path: P) -> crate::Result<Collection> {
    let source = std::fs::read(path)?;
    Ok(parse(&source)?)
}
