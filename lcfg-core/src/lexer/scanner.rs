//! 配置文件词法分析器
//!
//! 拉取式扫描：每次 `next()` 产出一个 token，以单个 `Eof` 结束。
//! 支持：
//! - 注释 `#`、`//`、`/* */`
//! - 字符串（转义、相邻字面量合并）
//! - 十进制/十六进制整数、`L` 后缀、浮点数
//! - `@include` 指令

use super::error::{LexError, LexErrorKind};
use super::position::SourcePosition;
use super::token::{Token, TokenKind};
use lcfg_config::IntFormat;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

const TARGET: &str = "lcfg::lexer";

/// 标识符首字符
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '*'
}

/// 标识符后续字符
pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '*')
}

/// 词法分析器
pub struct Lexer {
    input: Vec<char>,
    current: usize,
    position: SourcePosition,
    file: Option<Arc<Path>>,
    finished: bool,
}

impl Lexer {
    /// 从源文本创建
    pub fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            current: 0,
            position: SourcePosition::start(),
            file: None,
            finished: false,
        }
    }

    /// 标记来源文件（写入每个 token 和错误）
    pub fn with_file(mut self, file: Arc<Path>) -> Self {
        self.file = Some(file);
        self
    }

    pub fn file(&self) -> Option<&Arc<Path>> {
        self.file.as_ref()
    }

    /// 扫描下一个 token
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        match self.scan() {
            Ok(mut token) => {
                token.file = self.file.clone();
                Ok(token)
            }
            Err(mut err) => {
                err.file = self.file.clone();
                Err(err)
            }
        }
    }

    fn scan(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let start = self.position;
        let begin = self.current;
        let c = match self.peek(0) {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, "", start)),
        };

        let kind = match c {
            '{' => self.single(TokenKind::LeftCurlyBrace),
            '}' => self.single(TokenKind::RightCurlyBrace),
            '[' => self.single(TokenKind::LeftSquareBracket),
            ']' => self.single(TokenKind::RightSquareBracket),
            '(' => self.single(TokenKind::LeftParenthesis),
            ')' => self.single(TokenKind::RightParenthesis),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '=' => self.single(TokenKind::Equal),
            ':' => self.single(TokenKind::Colon),
            '"' => self.scan_strings()?,
            '@' => self.scan_directive(start)?,
            c if c.is_ascii_digit() => self.scan_number(start)?,
            '+' | '-' | '.' if self.starts_number() => self.scan_number(start)?,
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => return Err(LexError::at(LexErrorKind::InvalidChar(c), start)),
        };

        let text: String = self.input[begin..self.current].iter().collect();
        trace!(target: TARGET, line = start.line, column = start.column, kind = kind.describe(), "token");
        Ok(Token::new(kind, text, start))
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.current + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.current += 1;
        self.position.advance(c);
        Some(c)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek(0), self.peek(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.advance();
                }
                (Some('#'), _) | (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek(0) {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.position;
                    self.advance();
                    self.advance();
                    loop {
                        match (self.peek(0), self.peek(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => {
                                self.advance();
                            }
                            (None, _) => {
                                return Err(LexError::at(LexErrorKind::UnterminatedComment, start));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// 扫描一个或多个相邻字符串字面量
    ///
    /// `\xHH` 是原始字节，整段拼接后统一按 UTF-8 解码。
    fn scan_strings(&mut self) -> Result<TokenKind, LexError> {
        let start = self.position;
        let mut bytes = Vec::new();
        self.scan_string(&mut bytes)?;
        loop {
            let saved = (self.current, self.position);
            self.skip_whitespace_and_comments()?;
            if self.peek(0) == Some('"') {
                self.scan_string(&mut bytes)?;
            } else {
                // 回退，使 token 文本不包含尾随空白
                (self.current, self.position) = saved;
                break;
            }
        }
        String::from_utf8(bytes).map(TokenKind::String).map_err(|err| {
            let byte = err.as_bytes()[err.utf8_error().valid_up_to()];
            LexError::at(LexErrorKind::InvalidEscape(format!("\\x{:02X}", byte)), start)
        })
    }

    fn scan_string(&mut self, bytes: &mut Vec<u8>) -> Result<(), LexError> {
        let start = self.position;
        self.advance(); // '"'
        let mut buf = [0u8; 4];
        loop {
            let escape_start = self.position;
            match self.advance() {
                None => return Err(LexError::at(LexErrorKind::UnterminatedString, start)),
                Some('"') => return Ok(()),
                Some('\\') => bytes.push(self.scan_escape(escape_start)?),
                Some(c) => bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
            }
        }
    }

    fn scan_escape(&mut self, start: SourcePosition) -> Result<u8, LexError> {
        let c = match self.advance() {
            Some(c) => c,
            None => return Err(LexError::at(LexErrorKind::UnterminatedString, start)),
        };
        match c {
            'n' => Ok(b'\n'),
            't' => Ok(b'\t'),
            'r' => Ok(b'\r'),
            'f' => Ok(0x0c),
            '"' => Ok(b'"'),
            '\\' => Ok(b'\\'),
            'x' => {
                let digits: String = (0..2).filter_map(|i| self.peek(i)).collect();
                match u8::from_str_radix(&digits, 16) {
                    Ok(byte) if digits.len() == 2 => {
                        self.advance();
                        self.advance();
                        Ok(byte)
                    }
                    _ => Err(LexError::at(
                        LexErrorKind::InvalidEscape(format!("\\x{}", digits)),
                        start,
                    )),
                }
            }
            other => Err(LexError::at(
                LexErrorKind::InvalidEscape(format!("\\{}", other)),
                start,
            )),
        }
    }

    /// `@include` 是唯一的指令
    fn scan_directive(&mut self, start: SourcePosition) -> Result<TokenKind, LexError> {
        let word: String = (1..)
            .map_while(|i| self.peek(i).filter(|c| c.is_ascii_alphabetic()))
            .collect();
        if word != "include" {
            return Err(LexError::at(LexErrorKind::InvalidChar('@'), start));
        }
        for _ in 0..=word.len() {
            self.advance();
        }
        Ok(TokenKind::Include)
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(c) = self.peek(0).filter(|c| is_identifier_continue(*c)) {
            word.push(c);
            self.advance();
        }
        if word.eq_ignore_ascii_case("true") {
            TokenKind::Boolean(true)
        } else if word.eq_ignore_ascii_case("false") {
            TokenKind::Boolean(false)
        } else {
            TokenKind::Identifier
        }
    }

    /// 符号或小数点后紧跟数字才是数字
    fn starts_number(&self) -> bool {
        let digit_at = |i: usize| self.peek(i).is_some_and(|c| c.is_ascii_digit());
        match self.peek(0) {
            Some('.') => digit_at(1),
            Some('+' | '-') => digit_at(1) || (self.peek(1) == Some('.') && digit_at(2)),
            _ => false,
        }
    }

    fn take_digits(&mut self, radix: u32) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek(0).filter(|c| c.is_digit(radix)) {
            digits.push(c);
            self.advance();
        }
        digits
    }

    fn take_long_suffix(&mut self) -> bool {
        if self.peek(0) != Some('L') {
            return false;
        }
        self.advance();
        if self.peek(0) == Some('L') {
            self.advance();
        }
        true
    }

    fn scan_number(&mut self, start: SourcePosition) -> Result<TokenKind, LexError> {
        let begin = self.current;
        let invalid = |lexer: &Self| {
            let text: String = lexer.input[begin..lexer.current].iter().collect();
            LexError::at(LexErrorKind::InvalidNumber(text), start)
        };

        if self.peek(0) == Some('0') && matches!(self.peek(1), Some('x' | 'X')) {
            self.advance();
            self.advance();
            let digits = self.take_digits(16);
            let long = self.take_long_suffix();
            if digits.is_empty() || self.peek(0).is_some_and(is_identifier_continue) {
                self.consume_identifier_tail();
                return Err(invalid(self));
            }
            let raw = u64::from_str_radix(&digits, 16).map_err(|_| invalid(self))?;
            // 超过 i64 的十六进制按位重解释
            let value = raw as i64;
            return Ok(if !long && raw <= i32::MAX as u64 {
                TokenKind::Integer {
                    value: value as i32,
                    format: IntFormat::Hex,
                }
            } else {
                TokenKind::Integer64 {
                    value,
                    format: IntFormat::Hex,
                }
            });
        }

        let negative = match self.peek(0) {
            Some(sign @ ('+' | '-')) => {
                self.advance();
                sign == '-'
            }
            _ => false,
        };
        let int_part = self.take_digits(10);
        let mut frac_part = None;
        let mut exponent = None;

        if self.peek(0) == Some('.') {
            self.advance();
            frac_part = Some(self.take_digits(10));
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            self.advance();
            let mut exp = String::new();
            if let Some(sign @ ('+' | '-')) = self.peek(0) {
                exp.push(sign);
                self.advance();
            }
            let digits = self.take_digits(10);
            if digits.is_empty() {
                return Err(invalid(self));
            }
            exp.push_str(&digits);
            exponent = Some(exp);
        }

        let is_float = frac_part.is_some() || exponent.is_some();
        let long = !is_float && self.take_long_suffix();
        if self.peek(0).is_some_and(is_identifier_continue) {
            self.consume_identifier_tail();
            return Err(invalid(self));
        }

        if is_float {
            let frac = frac_part.unwrap_or_default();
            if int_part.is_empty() && frac.is_empty() {
                return Err(invalid(self));
            }
            let normalized = format!(
                "{}{}.{}e{}",
                if negative { "-" } else { "" },
                if int_part.is_empty() { "0" } else { &int_part },
                if frac.is_empty() { "0" } else { &frac },
                exponent.as_deref().unwrap_or("0"),
            );
            return match normalized.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(TokenKind::Float(value)),
                _ => Err(invalid(self)),
            };
        }

        let signed = format!("{}{}", if negative { "-" } else { "" }, int_part);
        let value: i64 = signed.parse().map_err(|_| invalid(self))?;
        Ok(match i32::try_from(value) {
            Ok(value) if !long => TokenKind::Integer {
                value,
                format: IntFormat::Decimal,
            },
            _ => TokenKind::Integer64 {
                value,
                format: IntFormat::Decimal,
            },
        })
    }

    /// 吞掉数字后粘连的字符，让错误文本完整
    fn consume_identifier_tail(&mut self) {
        while self.peek(0).is_some_and(is_identifier_continue) {
            self.advance();
        }
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.is_eof() => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        Some(result)
    }
}
