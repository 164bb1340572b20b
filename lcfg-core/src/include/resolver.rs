//! 包含解析器
//!
//! 在词法层识别 `@include "path"`，把被包含文件的 token 原地拼接进流中。
//!
//! # 查找规则
//! - 绝对路径原样使用
//! - 否则依次拼接每个搜索路径，第一个存在的文件胜出
//! - 没有搜索路径时，相对于包含者所在目录；字符串输入则按原样解析

use super::error::{IncludeError, IncludeErrorKind};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::parser::{ParseError, ParseErrorKind};
use lcfg_config::{MissingInclude, ParseConfig};
use lcfg_vfs::{normalize, VirtualFileSystem};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

const TARGET: &str = "lcfg::include";

/// 包含解析器
pub struct IncludeResolver<'a> {
    /// 虚拟文件系统
    vfs: &'a dyn VirtualFileSystem,
    /// 最大包含深度
    max_depth: usize,
    /// 缺失文件策略
    missing: MissingInclude,
    /// 搜索路径（按顺序）
    search_paths: Vec<PathBuf>,
}

impl<'a> IncludeResolver<'a> {
    pub fn new(vfs: &'a dyn VirtualFileSystem, config: &ParseConfig) -> Self {
        Self {
            vfs,
            max_depth: config.max_include_depth,
            missing: config.missing_include,
            search_paths: Vec::new(),
        }
    }

    /// 设置搜索路径
    pub fn with_search_paths<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// 从文本开始解析，`origin` 为文本所属文件（字符串输入为 None）
    pub fn resolve(self, text: &str, origin: Option<&Path>) -> TokenStream<'a> {
        let mut lexer = Lexer::new(text);
        if let Some(origin) = origin {
            lexer = lexer.with_file(Arc::from(origin));
        }
        TokenStream {
            resolver: self,
            frames: vec![Frame {
                lexer,
                path: origin.map(normalize),
            }],
            finished: false,
        }
    }

    /// 按查找规则生成候选路径
    fn candidates(&self, include: &str, includer: Option<&Path>) -> Vec<PathBuf> {
        let path = Path::new(include);
        if path.is_absolute() {
            vec![path.to_path_buf()]
        } else if !self.search_paths.is_empty() {
            self.search_paths.iter().map(|dir| dir.join(path)).collect()
        } else if let Some(dir) = includer.and_then(Path::parent) {
            vec![dir.join(path)]
        } else {
            vec![path.to_path_buf()]
        }
    }
}

/// 正在扫描的一个文件
struct Frame {
    lexer: Lexer,
    /// 规范化路径，用于环检测
    path: Option<PathBuf>,
}

/// 展开包含后的 token 流，以单个 `Eof` 结束
pub struct TokenStream<'a> {
    resolver: IncludeResolver<'a>,
    frames: Vec<Frame>,
    finished: bool,
}

impl TokenStream<'_> {
    /// 当前包含深度（顶层为 0）
    pub fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// 处理 `@include` 之后的路径字符串
    fn include(&mut self, directive: &Token) -> Result<()> {
        let next = self.frames.last_mut().and_then(|frame| frame.lexer.next());
        let target = match next {
            Some(Ok(Token {
                kind: TokenKind::String(target),
                ..
            })) => target,
            Some(Ok(other)) => return Err(unexpected_path(&other)),
            Some(Err(err)) => return Err(err.into()),
            None => return Err(unexpected_path(directive)),
        };
        self.enter(&target, directive)
    }

    fn enter(&mut self, target: &str, directive: &Token) -> Result<()> {
        let limit = self.resolver.max_depth;
        if self.depth() >= limit {
            return Err(self.error(directive, IncludeErrorKind::TooDeep { limit }));
        }

        let tried = self.resolver.candidates(target, directive.file.as_deref());
        let found = tried.iter().find(|path| self.resolver.vfs.is_file(path)).cloned();
        let Some(found) = found else {
            if self.resolver.missing == MissingInclude::Skip {
                warn!(target: TARGET, path = target, line = directive.line(), "Include file not found, skipping");
                return Ok(());
            }
            return Err(self.error(
                directive,
                IncludeErrorKind::NotFound {
                    path: target.to_string(),
                    tried,
                },
            ));
        };

        let normalized = normalize(&found);
        if self.frames.iter().any(|frame| frame.path.as_ref() == Some(&normalized)) {
            let chain = self
                .frames
                .iter()
                .filter_map(|frame| frame.path.as_ref())
                .chain(std::iter::once(&normalized))
                .map(|path| path.display().to_string())
                .collect();
            return Err(self.error(directive, IncludeErrorKind::Cycle { chain }));
        }

        let text = self.resolver.vfs.read_to_string(&found).map_err(|err| {
            self.error(
                directive,
                IncludeErrorKind::Read {
                    path: found.clone(),
                    message: err.to_string(),
                },
            )
        })?;

        debug!(target: TARGET, path = %found.display(), depth = self.depth() + 1, "Entering include");
        self.frames.push(Frame {
            lexer: Lexer::new(&text).with_file(Arc::from(found.as_path())),
            path: Some(normalized),
        });
        Ok(())
    }

    fn error(&self, directive: &Token, kind: IncludeErrorKind) -> Error {
        IncludeError::at(kind, directive.position, directive.file.clone()).into()
    }
}

fn unexpected_path(token: &Token) -> Error {
    ParseError::at(
        ParseErrorKind::UnexpectedToken {
            expected: "include file path".to_string(),
            found: token.kind.describe().to_string(),
        },
        token.line(),
        token.column(),
        token.file.clone(),
    )
    .into()
}

impl Iterator for TokenStream<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            let next = match self.frames.last_mut() {
                Some(frame) => frame.lexer.next(),
                None => {
                    self.finished = true;
                    return None;
                }
            };
            match next {
                Some(Ok(token)) if token.is_eof() && self.frames.len() > 1 => {
                    self.frames.pop();
                    debug!(target: TARGET, depth = self.depth(), "Leaving include");
                }
                Some(Ok(token)) if token.kind == TokenKind::Include => {
                    if let Err(err) = self.include(&token) {
                        self.finished = true;
                        return Some(Err(err));
                    }
                }
                Some(Ok(token)) => {
                    if token.is_eof() {
                        self.finished = true;
                    }
                    return Some(Ok(token));
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err.into()));
                }
                None => {
                    self.frames.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lcfg_vfs::MemoryFileSystem;

    fn fs(files: &[(&str, &str)]) -> MemoryFileSystem {
        MemoryFileSystem::with_files(files.iter().map(|(p, c)| (*p, c.as_bytes().to_vec())))
    }

    fn identifiers(stream: TokenStream<'_>) -> Result<Vec<String>> {
        let tokens: Result<Vec<Token>> = stream.collect();
        Ok(tokens?
            .into_iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| t.text)
            .collect())
    }

    #[test]
    fn test_no_includes_passes_through() {
        let vfs = MemoryFileSystem::new();
        let stream = IncludeResolver::new(&vfs, &ParseConfig::default()).resolve("a = 1;", None);
        let tokens: Vec<Token> = stream.map(|r| r.unwrap()).collect();
        assert_eq!(tokens.len(), 5);
        assert!(tokens[4].is_eof());
    }

    #[test]
    fn test_include_is_spliced_in_place() {
        let vfs = fs(&[("conf/b.cfg", "b = 2;")]);
        let stream = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("a = 1;\n@include \"b.cfg\"\nc = 3;", Some(Path::new("conf/main.cfg")));
        assert_eq!(identifiers(stream).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_included_tokens_carry_their_file() {
        let vfs = fs(&[("b.cfg", "\n\nb = 2;")]);
        let mut stream = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("@include \"b.cfg\"", Some(Path::new("main.cfg")));
        let b = stream.next().unwrap().unwrap();
        assert_eq!(b.text, "b");
        assert_eq!(b.line(), 3);
        assert_eq!(b.file.as_deref(), Some(Path::new("b.cfg")));
    }

    #[test]
    fn test_search_paths_in_order() {
        let vfs = fs(&[("second/x.cfg", "from_second = 1;"), ("third/x.cfg", "from_third = 1;")]);
        let stream = IncludeResolver::new(&vfs, &ParseConfig::default())
            .with_search_paths(["first", "second", "third"])
            .resolve("@include \"x.cfg\"", None);
        assert_eq!(identifiers(stream).unwrap(), vec!["from_second"]);
    }

    #[test]
    fn test_absolute_path_used_as_is() {
        let vfs = fs(&[("/etc/app/abs.cfg", "abs = true;")]);
        let stream = IncludeResolver::new(&vfs, &ParseConfig::default())
            .with_search_paths(["conf"])
            .resolve("@include \"/etc/app/abs.cfg\"", None);
        assert_eq!(identifiers(stream).unwrap(), vec!["abs"]);
    }

    #[test]
    fn test_adjacent_strings_form_include_path() {
        let vfs = fs(&[("dir/file.cfg", "merged = 1;")]);
        let stream = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("@include \"dir/\" \"file.cfg\"", None);
        assert_eq!(identifiers(stream).unwrap(), vec!["merged"]);
    }

    #[test]
    fn test_missing_include_fails() {
        let vfs = MemoryFileSystem::new();
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("a = 1;\n@include \"gone.cfg\"", Some(Path::new("main.cfg")))
            .collect();
        match result {
            Err(Error::Include(err)) => {
                assert_eq!(err.line(), 2);
                assert_eq!(
                    err.kind,
                    IncludeErrorKind::NotFound {
                        path: "gone.cfg".to_string(),
                        tried: vec![PathBuf::from("gone.cfg")],
                    }
                );
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_include_skipped() {
        let vfs = MemoryFileSystem::new();
        let stream = IncludeResolver::new(&vfs, &ParseConfig::skip_missing_includes())
            .resolve("a = 1;\n@include \"gone.cfg\"\nb = 2;", None);
        assert_eq!(identifiers(stream).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_cycle_detected() {
        let vfs = fs(&[
            ("a.cfg", "a = 1;\n@include \"b.cfg\""),
            ("b.cfg", "b = 1;\n@include \"a.cfg\""),
        ]);
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("a = 1;\n@include \"b.cfg\"", Some(Path::new("a.cfg")))
            .collect();
        match result {
            Err(Error::Include(err)) => assert_eq!(
                err.kind,
                IncludeErrorKind::Cycle {
                    chain: vec!["a.cfg".into(), "b.cfg".into(), "a.cfg".into()],
                }
            ),
            other => panic!("expected Cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_include_detected() {
        let vfs = fs(&[("loop.cfg", "@include \"./loop.cfg\"")]);
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("@include \"loop.cfg\"", None)
            .collect();
        assert!(matches!(
            result,
            Err(Error::Include(IncludeError {
                kind: IncludeErrorKind::Cycle { .. },
                ..
            }))
        ));
    }

    #[test]
    fn test_same_file_twice_sequentially() {
        let vfs = fs(&[("common.cfg", "shared = 1;")]);
        let stream = IncludeResolver::new(&vfs, &ParseConfig::default()).resolve(
            "g1 = { @include \"common.cfg\" };\ng2 = { @include \"common.cfg\" };",
            None,
        );
        assert_eq!(identifiers(stream).unwrap(), vec!["g1", "shared", "g2", "shared"]);
    }

    #[test]
    fn test_depth_limit() {
        let vfs = fs(&[
            ("d1.cfg", "@include \"d2.cfg\""),
            ("d2.cfg", "@include \"d3.cfg\""),
            ("d3.cfg", "deep = 1;"),
        ]);
        let config = ParseConfig {
            max_include_depth: 2,
            ..ParseConfig::default()
        };
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &config)
            .resolve("@include \"d1.cfg\"", None)
            .collect();
        assert!(matches!(
            result,
            Err(Error::Include(IncludeError {
                kind: IncludeErrorKind::TooDeep { limit: 2 },
                ..
            }))
        ));

        let config = ParseConfig {
            max_include_depth: 3,
            ..ParseConfig::default()
        };
        let stream = IncludeResolver::new(&vfs, &config).resolve("@include \"d1.cfg\"", None);
        assert_eq!(identifiers(stream).unwrap(), vec!["deep"]);
    }

    #[test]
    fn test_invalid_utf8_is_read_error() {
        let vfs = MemoryFileSystem::with_files([("bin.cfg", vec![0xff, 0xfe])]);
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("@include \"bin.cfg\"", None)
            .collect();
        assert!(matches!(
            result,
            Err(Error::Include(IncludeError {
                kind: IncludeErrorKind::Read { .. },
                ..
            }))
        ));
    }

    #[test]
    fn test_include_requires_string() {
        let vfs = MemoryFileSystem::new();
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("@include 42", None)
            .collect();
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_lex_error_in_included_file_names_file() {
        let vfs = fs(&[("bad.cfg", "x = $;")]);
        let result: Result<Vec<Token>> = IncludeResolver::new(&vfs, &ParseConfig::default())
            .resolve("@include \"bad.cfg\"", None)
            .collect();
        match result {
            Err(err @ Error::Lex(_)) => assert_eq!(err.file(), Some(Path::new("bad.cfg"))),
            other => panic!("expected lex error, got {:?}", other),
        }
    }
}
