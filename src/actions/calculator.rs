// Arithmetic for the calculator intent
//
// Strips everything that isn't part of an expression, then evaluates it with
// a small recursive-descent parser. Integer math stays integral, `/` always
// gives a float, `//` floors toward negative infinity and `%` takes the
// sign of the divisor.

use crate::error::{AgentError, Result};
use regex::Regex;
use std::fmt;
use tracing::warn;

// Anything not in this set gets dropped before parsing
const NON_EXPRESSION_CHARS: &str = r"[^0-9+\-*/().%\s]";

// Spoken operators, rewritten before the cleanup pass
const WORD_OPERATORS: &[(&str, &str)] = &[
    (r"\bmultiplied\s+by\b", "*"),
    (r"\bdivided\s+by\b", "/"),
    (r"\btimes\b", "*"),
    (r"\bplus\b", "+"),
    (r"\bminus\b", "-"),
];

/// Result of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

pub struct Calculator {
    cleanup: Regex,
    word_operators: Vec<(Regex, &'static str)>,
}

impl Calculator {
    pub fn new() -> Result<Self> {
        let cleanup = Regex::new(NON_EXPRESSION_CHARS)?;
        let word_operators = WORD_OPERATORS
            .iter()
            .map(|&(pattern, op)| -> Result<(Regex, &'static str)> {
                Ok((Regex::new(pattern)?, op))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            cleanup,
            word_operators,
        })
    }

    /// Evaluate `expression` and render the reply the user sees
    pub fn calculate(&self, expression: &str) -> String {
        let shown = expression
            .trim()
            .trim_end_matches(|c| c == '?' || c == '=')
            .trim_end();

        match self.evaluate(expression) {
            Ok(result) => format!("{} = {}", shown, result),
            Err(AgentError::InvalidExpression(reason)) if reason == EMPTY_EXPRESSION => {
                "Please provide a valid mathematical expression.".to_string()
            }
            Err(e) => {
                warn!("Calculation error: {}", e);
                e.user_message()
            }
        }
    }

    /// Clean up free text and evaluate what's left
    pub fn evaluate(&self, expression: &str) -> Result<Number> {
        let mut text = expression.to_lowercase();
        for (regex, op) in &self.word_operators {
            text = regex.replace_all(&text, *op).into_owned();
        }

        let cleaned = self.cleanup.replace_all(&text, "");
        if cleaned.trim().is_empty() {
            return Err(AgentError::InvalidExpression(EMPTY_EXPRESSION.to_string()));
        }

        let tokens = tokenize(&cleaned)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let value = parser.expr()?;

        if parser.pos != parser.tokens.len() {
            return Err(AgentError::InvalidExpression(format!(
                "unexpected input after position {}",
                parser.pos
            )));
        }

        Ok(value)
    }
}

const EMPTY_EXPRESSION: &str = "empty expression";

// Deepest run of nested parens / unary signs the parser will follow
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::DoubleStar);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                tokens.push(Token::Num(parse_number(&literal)?));
            }
            other => {
                return Err(AgentError::InvalidExpression(format!(
                    "unexpected character '{}'",
                    other
                )))
            }
        }
    }

    Ok(tokens)
}

fn parse_number(literal: &str) -> Result<Number> {
    let invalid = || AgentError::InvalidExpression(format!("bad number '{}'", literal));

    if literal.contains('.') {
        if literal == "." || literal.matches('.').count() > 1 {
            return Err(invalid());
        }
        literal.parse::<f64>().map(Number::Float).map_err(|_| invalid())
    } else {
        match literal.parse::<i64>() {
            Ok(i) => Ok(Number::Int(i)),
            // Too big for i64, keep going as a float
            Err(_) => literal.parse::<f64>().map(Number::Float).map_err(|_| invalid()),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Number> {
        let mut value = self.term()?;

        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = apply(op, value, rhs)?;
        }

        Ok(value)
    }

    // term := unary (('*' | '/' | '//' | '%') unary)*
    fn term(&mut self) -> Result<Number> {
        let mut value = self.unary()?;

        while let Some(op @ (Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent)) =
            self.peek()
        {
            self.pos += 1;
            let rhs = self.unary()?;
            value = apply(op, value, rhs)?;
        }

        Ok(value)
    }

    // unary := ('+' | '-') unary | power
    //
    // Every nesting level (parens, signs, exponents) passes through here,
    // so this is where depth is bounded.
    fn unary(&mut self) -> Result<Number> {
        if self.depth >= MAX_DEPTH {
            return Err(AgentError::InvalidExpression(
                "expression nested too deeply".to_string(),
            ));
        }

        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<Number> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(match self.unary()? {
                    Number::Int(i) => i
                        .checked_neg()
                        .map(Number::Int)
                        .unwrap_or(Number::Float(-(i as f64))),
                    Number::Float(f) => Number::Float(-f),
                })
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    // power := atom ('**' unary)?   -- right-associative, -2**2 == -4
    fn power(&mut self) -> Result<Number> {
        let base = self.atom()?;

        if self.peek() == Some(Token::DoubleStar) {
            self.pos += 1;
            let exponent = self.unary()?;
            return apply(Token::DoubleStar, base, exponent);
        }

        Ok(base)
    }

    fn atom(&mut self) -> Result<Number> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(AgentError::InvalidExpression("missing ')'".to_string())),
                }
            }
            Some(token) => Err(AgentError::InvalidExpression(format!(
                "unexpected {:?}",
                token
            ))),
            None => Err(AgentError::InvalidExpression(
                "expression ended early".to_string(),
            )),
        }
    }
}

fn apply(op: Token, lhs: Number, rhs: Number) -> Result<Number> {
    use Number::{Float, Int};

    let needs_nonzero = matches!(op, Token::Slash | Token::DoubleSlash | Token::Percent);
    if needs_nonzero && rhs.is_zero() {
        return Err(AgentError::DivisionByZero);
    }

    let result = match (op, lhs, rhs) {
        (Token::Plus, Int(a), Int(b)) => a.checked_add(b).map(Int),
        (Token::Minus, Int(a), Int(b)) => a.checked_sub(b).map(Int),
        (Token::Star, Int(a), Int(b)) => a.checked_mul(b).map(Int),
        (Token::DoubleSlash, Int(a), Int(b)) => floor_div(a, b).map(Int),
        (Token::Percent, Int(a), Int(b)) => Some(Int(floor_mod(a, b))),
        (Token::DoubleStar, Int(a), Int(b)) if b >= 0 => {
            u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp)).map(Int)
        }
        _ => None,
    };

    if let Some(n) = result {
        return Ok(n);
    }

    // Anything left (floats, negative powers, overflow) goes through f64
    let (a, b) = (lhs.as_f64(), rhs.as_f64());
    let value = match op {
        Token::Plus => a + b,
        Token::Minus => a - b,
        Token::Star => a * b,
        Token::Slash => a / b,
        Token::DoubleSlash => (a / b).floor(),
        Token::Percent => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                r + b
            } else {
                r
            }
        }
        Token::DoubleStar => {
            if a == 0.0 && b < 0.0 {
                return Err(AgentError::DivisionByZero);
            }
            a.powf(b)
        }
        other => {
            return Err(AgentError::InvalidExpression(format!(
                "{:?} is not an operator",
                other
            )))
        }
    };

    if value.is_nan() {
        return Err(AgentError::InvalidExpression("result is not a number".to_string()));
    }

    Ok(Float(value))
}

// None on overflow (i64::MIN // -1), which sends the caller to f64
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        q.checked_sub(1)
    } else {
        Some(q)
    }
}

// The only overflowing remainder is i64::MIN % -1, which is 0
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}
