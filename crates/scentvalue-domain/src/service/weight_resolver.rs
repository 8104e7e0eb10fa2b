//! Weight expression resolution
//!
//! Scale readings are typed as free text: plain grams ("950"), decimal
//! kilograms ("1.2kg"), lab notation where the number after `kg` is a gram
//! remainder ("1kg136" = 1136 g), or small sums of several bottles
//! ("500g+20g"). Unit shorthands are rewritten to plain gram numbers, the
//! remaining text must consist of arithmetic characters only, and it is then
//! evaluated by a small recursive-descent parser supporting `+ - * /` and
//! parentheses.

use std::iter::Peekable;
use std::str::Chars;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

static KG_WITH_GRAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)kg([0-9]+)").expect("kg+g pattern"));
static KILOGRAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]*\.?[0-9]+)\s*kg").expect("kg pattern"));
static GRAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]*\.?[0-9]+)\s*g").expect("g pattern"));

const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightError {
    #[error("unsupported character '{0}' in weight expression")]
    DisallowedCharacter(char),

    #[error("malformed weight expression: {0}")]
    Syntax(String),

    #[error("weight expression does not evaluate to a finite number")]
    NonFinite,
}

/// Resolve a weight expression to grams.
///
/// Empty or whitespace-only input resolves to `0.0`, which callers treat as
/// "nothing entered". Negative results are passed through unchanged.
pub fn resolve_weight(expression: &str) -> Result<f64, WeightError> {
    let raw = expression.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }

    let cleaned = normalize_units(raw);

    if cleaned.is_empty() {
        return Err(WeightError::Syntax("nothing left after removing separators".to_string()));
    }
    if let Some(c) = cleaned.chars().find(|c| !is_arithmetic_char(*c)) {
        return Err(WeightError::DisallowedCharacter(c));
    }

    let value = evaluate(&cleaned)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(WeightError::NonFinite)
    }
}

/// Lower-case, drop thousands separators and rewrite unit shorthands to grams.
///
/// The kg+g rule must run before the plain kg rule.
fn normalize_units(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace(',', "");

    let step = KG_WITH_GRAMS.replace_all(&lowered, |caps: &Captures| {
        let kg: f64 = caps[1].parse().unwrap_or_default();
        let grams: f64 = caps[2].parse().unwrap_or_default();
        (kg * 1000.0 + grams).to_string()
    });
    let step = KILOGRAMS.replace_all(&step, |caps: &Captures| {
        let kg: f64 = caps[1].parse().unwrap_or_default();
        (kg * 1000.0).to_string()
    });
    GRAMS.replace_all(&step, "${1}").into_owned()
}

fn is_arithmetic_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')') || c.is_whitespace()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, WeightError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => tokens.push(Token::Number(read_number(&mut chars)?)),
            '+' | '-' => {
                chars.next();
                if chars.peek() == Some(&c) {
                    return Err(WeightError::Syntax(format!("'{c}{c}' is not an arithmetic operator")));
                }
                tokens.push(if c == '+' { Token::Plus } else { Token::Minus });
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            other => return Err(WeightError::DisallowedCharacter(other)),
        }
    }

    Ok(tokens)
}

/// Digits with at most one decimal point; "5." and ".5" are both accepted.
fn read_number(chars: &mut Peekable<Chars<'_>>) -> Result<f64, WeightError> {
    let mut literal = String::new();
    let mut seen_point = false;

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            literal.push(c);
        } else if c == '.' && !seen_point {
            seen_point = true;
            literal.push(c);
        } else {
            break;
        }
        chars.next();
    }

    if literal == "." {
        return Err(WeightError::Syntax("lone decimal point".to_string()));
    }
    let normalized = if literal.ends_with('.') {
        &literal[..literal.len() - 1]
    } else {
        literal.as_str()
    };
    normalized
        .parse::<f64>()
        .map_err(|e| WeightError::Syntax(format!("bad number '{literal}': {e}")))
}

fn evaluate(input: &str) -> Result<f64, WeightError> {
    let tokens = tokenize(input)?;
    let mut parser = ExpressionParser { tokens: &tokens, pos: 0, depth: 0 };
    let value = parser.expression()?;
    match parser.peek() {
        None => Ok(value),
        Some(token) => Err(WeightError::Syntax(format!("unexpected {token:?}"))),
    }
}

/// expression := term (('+' | '-') term)*
/// term       := unary (('*' | '/') unary)*
/// unary      := ('+' | '-') unary | primary
/// primary    := number | '(' expression ')'
struct ExpressionParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl ExpressionParser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<f64, WeightError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.advance();
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, WeightError> {
        let mut value = self.unary()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.advance();
            let rhs = self.unary()?;
            value = if op == Token::Star { value * rhs } else { value / rhs };
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, WeightError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                self.nested(|p| p.unary()).map(|v| -v)
            }
            Some(Token::Plus) => {
                self.advance();
                self.nested(|p| p.unary())
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, WeightError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.nested(|p| p.expression())?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(WeightError::Syntax("missing ')'".to_string())),
                }
            }
            Some(token) => Err(WeightError::Syntax(format!("unexpected {token:?}"))),
            None => Err(WeightError::Syntax("unexpected end of expression".to_string())),
        }
    }

    fn nested(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<f64, WeightError>,
    ) -> Result<f64, WeightError> {
        if self.depth >= MAX_NESTING {
            return Err(WeightError::Syntax("expression nested too deeply".to_string()));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
