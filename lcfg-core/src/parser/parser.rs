//! 递归下降解析器
//!
//! 单趟、一个 token 前瞻、无回溯。失败时不产生部分文档。
//!
//! ```text
//! document := setting*
//! setting  := IDENT ('=' | ':') value (';' | ',')?
//! value    := scalar | array | list | group
//! group    := '{' setting* '}'
//! list     := '(' [value (',' value)* ','?] ')'
//! array    := '[' [scalar (',' scalar)* ','?] ']'
//! ```

use super::error::{ParseError, ParseErrorKind};
use crate::error::{Error, Result};
use crate::lexer::{LexError, LexErrorKind, Lexer, SourcePosition, Token, TokenKind};
use crate::tree::document::{Node, NodeKind};
use crate::tree::{Document, SettingId, SettingType, Value};
use lcfg_config::{IntFormat, ParseConfig};
use tracing::{debug, instrument, trace};

const TARGET: &str = "lcfg::parser";

/// 未经包含展开的原始 token 流
pub type LexerTokens = std::iter::Map<Lexer, fn(std::result::Result<Token, LexError>) -> Result<Token>>;

pub struct Parser<I> {
    tokens: I,
    current: Token,
    max_nesting_depth: usize,
    depth: usize,
    document: Document,
}

impl Parser<LexerTokens> {
    /// 直接解析文本（不展开 `@include`）
    pub fn from_source(source: &str) -> Self {
        let to_error: fn(std::result::Result<Token, LexError>) -> Result<Token> =
            |r| r.map_err(Error::from);
        Parser::new(Lexer::new(source).map(to_error))
    }
}

impl<I> Parser<I>
where
    I: Iterator<Item = Result<Token>>,
{
    pub fn new(tokens: I) -> Self {
        Self {
            tokens,
            current: Token::new(TokenKind::Eof, "", SourcePosition::start()),
            max_nesting_depth: ParseConfig::default().max_nesting_depth,
            depth: 0,
            document: Document::new(),
        }
    }

    pub fn with_config(mut self, config: &ParseConfig) -> Self {
        self.max_nesting_depth = config.max_nesting_depth;
        self
    }

    /// 解析整个文档
    #[instrument(target = "lcfg::parser", skip_all)]
    pub fn parse(mut self) -> Result<Document> {
        self.current = self.next_token()?;
        let root = self.document.root_id();
        while !self.check_eof() {
            self.parse_setting(root)?;
        }
        debug!(target: TARGET, settings = self.document.node_count() - 1, "Parsed document");
        Ok(self.document)
    }

    /// 从流中读取下一个 token；词法层的未终止字符串转为语法错误
    fn next_token(&mut self) -> Result<Token> {
        match self.tokens.next() {
            Some(Ok(token)) => Ok(token),
            Some(Err(Error::Lex(err))) if err.kind == LexErrorKind::UnterminatedString => {
                Err(ParseError::at(
                    ParseErrorKind::UnterminatedString,
                    err.line(),
                    err.column(),
                    err.file,
                )
                .into())
            }
            Some(Err(err)) => Err(err),
            // 流提前结束，补一个 Eof
            None => {
                let mut eof = Token::new(TokenKind::Eof, "", self.current.position);
                eof.file = self.current.file.clone();
                Ok(eof)
            }
        }
    }

    /// 消费当前 token 并读取下一个，返回被消费的 token
    fn consume(&mut self) -> Result<Token> {
        let next = self.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn check_eof(&self) -> bool {
        self.current.is_eof()
    }

    fn match_token(&mut self, kind: &TokenKind) -> Result<bool> {
        if self.check(kind) {
            self.consume()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            self.consume()
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn error_at(&self, token: &Token, kind: ParseErrorKind) -> Error {
        ParseError::at(kind, token.line(), token.column(), token.file.clone()).into()
    }

    fn unexpected(&self, expected: &str) -> Error {
        self.error_at(
            &self.current,
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current.kind.describe().to_string(),
            },
        )
    }

    /// setting := IDENT ('=' | ':') value (';' | ',')?
    fn parse_setting(&mut self, group: SettingId) -> Result<()> {
        if !self.check(&TokenKind::Identifier) {
            return Err(self.unexpected("setting name"));
        }
        let name_token = self.consume()?;
        let name = name_token.text.clone();

        if !(self.match_token(&TokenKind::Equal)? || self.match_token(&TokenKind::Colon)?) {
            return Err(self.unexpected("'=' or ':'"));
        }

        let duplicate = self
            .document
            .setting(group)
            .map(|g| g.member(&name).is_some())
            .unwrap_or(false);
        if duplicate {
            return Err(self.error_at(&name_token, ParseErrorKind::DuplicateKey { name }));
        }

        trace!(target: TARGET, name = %name, line = name_token.line(), "setting");
        self.parse_value(group, Some(name), &name_token)?;

        if !self.match_token(&TokenKind::Semicolon)? {
            self.match_token(&TokenKind::Comma)?;
        }
        Ok(())
    }

    /// value := scalar | array | list | group
    ///
    /// `origin` 为设置的起始 token（有名称时是名称），决定记录的源行号
    fn parse_value(&mut self, parent: SettingId, name: Option<String>, origin: &Token) -> Result<SettingId> {
        match self.current.kind {
            TokenKind::LeftCurlyBrace => self.parse_group(parent, name, origin),
            TokenKind::LeftParenthesis => self.parse_list(parent, name, origin),
            TokenKind::LeftSquareBracket => self.parse_array(parent, name, origin),
            _ => self.parse_scalar(parent, name, origin),
        }
    }

    fn parse_scalar(&mut self, parent: SettingId, name: Option<String>, origin: &Token) -> Result<SettingId> {
        let (value, format) = match &self.current.kind {
            TokenKind::String(s) => (Value::String(s.clone()), IntFormat::Decimal),
            TokenKind::Integer { value, format } => (Value::Integer(*value), *format),
            TokenKind::Integer64 { value, format } => (Value::Int64(*value), *format),
            TokenKind::Float(f) => (Value::Float(*f), IntFormat::Decimal),
            TokenKind::Boolean(b) => (Value::Bool(*b), IntFormat::Decimal),
            _ => return Err(self.unexpected("value")),
        };
        self.consume()?;
        let mut node = self.node(name, NodeKind::Scalar(value), origin);
        node.format = format;
        Ok(self.document.attach(parent, node))
    }

    /// group := '{' setting* '}'
    fn parse_group(&mut self, parent: SettingId, name: Option<String>, origin: &Token) -> Result<SettingId> {
        self.enter_aggregate()?;
        let node = self.node(name, NodeKind::empty(SettingType::Group), origin);
        let id = self.document.attach(parent, node);

        while !self.check(&TokenKind::RightCurlyBrace) {
            if self.check_eof() {
                return Err(self.unexpected("'}'"));
            }
            self.parse_setting(id)?;
        }
        self.consume()?;
        self.depth -= 1;
        Ok(id)
    }

    /// list := '(' [value (',' value)* ','?] ')'
    fn parse_list(&mut self, parent: SettingId, name: Option<String>, origin: &Token) -> Result<SettingId> {
        self.enter_aggregate()?;
        let node = self.node(name, NodeKind::empty(SettingType::List), origin);
        let id = self.document.attach(parent, node);

        while !self.check(&TokenKind::RightParenthesis) {
            let element = self.current.clone();
            self.parse_value(id, None, &element)?;
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RightParenthesis)?;
        self.depth -= 1;
        Ok(id)
    }

    /// array := '[' [scalar (',' scalar)* ','?] ']'
    fn parse_array(&mut self, parent: SettingId, name: Option<String>, origin: &Token) -> Result<SettingId> {
        self.enter_aggregate()?;
        let node = self.node(name, NodeKind::empty(SettingType::Array), origin);
        let id = self.document.attach(parent, node);
        let mut element_type: Option<SettingType> = None;

        while !self.check(&TokenKind::RightSquareBracket) {
            if !self.current.kind.is_scalar() {
                return Err(self.unexpected("scalar value"));
            }
            let element = self.current.clone();
            let child = self.parse_scalar(id, None, &element)?;
            let found = self.document.setting(child)?.setting_type();
            match element_type {
                None => element_type = Some(found),
                Some(expected) if expected != found => {
                    return Err(self.error_at(
                        &element,
                        ParseErrorKind::TypeMismatch { expected, found },
                    ));
                }
                Some(_) => {}
            }
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RightSquareBracket)?;
        self.depth -= 1;
        Ok(id)
    }

    fn enter_aggregate(&mut self) -> Result<()> {
        if self.depth >= self.max_nesting_depth {
            return Err(self.error_at(
                &self.current,
                ParseErrorKind::NestingTooDeep {
                    limit: self.max_nesting_depth,
                },
            ));
        }
        self.depth += 1;
        self.consume()?;
        Ok(())
    }

    fn node(&self, name: Option<String>, kind: NodeKind, origin: &Token) -> Node {
        let mut node = Node::new(name, kind);
        node.source_line = origin.line();
        node.source_file = origin.file.clone();
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SettingError;

    fn parse(source: &str) -> Result<Document> {
        Parser::from_source(source).parse()
    }

    fn parse_error(source: &str) -> ParseError {
        match parse(source) {
            Err(Error::Parse(err)) => err,
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_basic_document() {
        let doc = parse("x = 5; y = \"hi\"; z = [1,2,3];").unwrap();
        let root = doc.root();
        assert_eq!(root.len(), 3);
        assert_eq!(doc.get::<i32>("x").unwrap(), 5);
        assert_eq!(doc.get::<String>("y").unwrap(), "hi");
        let z = doc.lookup("z").unwrap();
        assert_eq!(z.setting_type(), SettingType::Array);
        let values: Vec<i32> = z.children().map(|c| c.as_int().unwrap()).collect();
        assert_eq!(values, vec![1, 2, 3]);
        assert!(matches!(
            doc.lookup("z[5]"),
            Err(SettingError::IndexOutOfRange { index: 5, len: 3, .. })
        ));
    }

    #[test]
    fn test_empty_document() {
        let doc = parse("  # nothing here\n").unwrap();
        assert!(doc.root().is_empty());
    }

    #[test]
    fn test_colon_and_optional_terminators() {
        let doc = parse("a: 1\nb = 2,\nc = 3;").unwrap();
        assert_eq!(doc.root().len(), 3);
        assert_eq!(doc.get::<i32>("c").unwrap(), 3);
    }

    #[test]
    fn test_nested_structures() {
        let source = r#"
            app = {
                name = "demo";
                servers = (
                    { host = "a"; port = 80; },
                    { host = "b"; port = 0x1F90; }
                );
                weights = [0.5, 1.5];
                big = 10000000000;
            };
        "#;
        let doc = parse(source).unwrap();
        assert_eq!(doc.get::<String>("app.servers[1].host").unwrap(), "b");
        assert_eq!(doc.get::<i32>("app.servers.[1].port").unwrap(), 8080);
        assert_eq!(
            doc.lookup("app.servers[1].port").unwrap().format(),
            IntFormat::Hex
        );
        assert_eq!(doc.get::<f64>("app.weights[1]").unwrap(), 1.5);
        assert_eq!(doc.get::<i64>("app.big").unwrap(), 10_000_000_000);
    }

    #[test]
    fn test_empty_aggregates() {
        let doc = parse("g = {}; l = (); a = [];").unwrap();
        assert_eq!(doc.lookup("g").unwrap().setting_type(), SettingType::Group);
        assert_eq!(doc.lookup("l").unwrap().setting_type(), SettingType::List);
        assert_eq!(doc.lookup("a").unwrap().setting_type(), SettingType::Array);
        assert!(doc.lookup("a").unwrap().is_empty());
    }

    #[test]
    fn test_trailing_commas() {
        let doc = parse("a = [1, 2,]; l = (1, \"x\",);").unwrap();
        assert_eq!(doc.lookup("a").unwrap().len(), 2);
        assert_eq!(doc.lookup("l").unwrap().len(), 2);
    }

    #[test]
    fn test_source_lines() {
        let doc = parse("a = 1;\n\nb = {\n  c = true;\n};").unwrap();
        assert_eq!(doc.lookup("a").unwrap().source_line(), 1);
        assert_eq!(doc.lookup("b").unwrap().source_line(), 3);
        assert_eq!(doc.lookup("b.c").unwrap().source_line(), 4);
    }

    #[test]
    fn test_array_type_mismatch() {
        let err = parse_error("x = [1, \"a\"];");
        assert_eq!(
            err.kind,
            ParseErrorKind::TypeMismatch {
                expected: SettingType::Integer,
                found: SettingType::String,
            }
        );
        assert_eq!((err.line, err.column), (1, 9));
    }

    #[test]
    fn test_array_integer_and_float_are_distinct() {
        let err = parse_error("x = [1, 2.0];");
        assert!(matches!(err.kind, ParseErrorKind::TypeMismatch { .. }));
        let err = parse_error("x = [1, 2L];");
        assert!(matches!(err.kind, ParseErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn test_array_rejects_aggregates() {
        let err = parse_error("x = [{}];");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_duplicate_key() {
        let err = parse_error("a = 1;\na = 2;");
        assert_eq!(
            err.kind,
            ParseErrorKind::DuplicateKey {
                name: "a".to_string()
            }
        );
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_same_name_in_different_groups() {
        let doc = parse("a = { v = 1; }; b = { v = 2; };").unwrap();
        assert_eq!(doc.get::<i32>("b.v").unwrap(), 2);
    }

    #[test]
    fn test_missing_assignment() {
        let err = parse_error("a 1;");
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                expected: "'=' or ':'".to_string(),
                found: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse_error("a = { b = 1;");
        assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { ref found, .. } if found == "end of input"));
    }

    #[test]
    fn test_unterminated_string_is_parse_error() {
        let err = parse_error("a = \"oops;");
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!((err.line, err.column), (1, 5));
    }

    #[test]
    fn test_lex_error_passes_through() {
        assert!(matches!(parse("a = $;"), Err(Error::Lex(_))));
    }

    #[test]
    fn test_include_without_resolver_is_rejected() {
        assert!(matches!(parse("@include \"x.cfg\""), Err(Error::Parse(_))));
    }

    #[test]
    fn test_nesting_limit() {
        let config = ParseConfig {
            max_nesting_depth: 3,
            ..ParseConfig::default()
        };
        let ok = Parser::from_source("a = ((()));").with_config(&config).parse();
        assert!(ok.is_ok());
        let err = Parser::from_source("a = (((())));").with_config(&config).parse();
        assert!(matches!(
            err,
            Err(Error::Parse(ParseError {
                kind: ParseErrorKind::NestingTooDeep { limit: 3 },
                ..
            }))
        ));
    }

    #[test]
    fn test_deep_nesting_default_limit() {
        let source = format!("a = {}{};", "(".repeat(300), ")".repeat(300));
        assert!(matches!(parse(&source), Err(Error::Parse(_))));
    }
}
