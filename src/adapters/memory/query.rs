//! Cosmos SQL subset for the in-memory backend
//!
//! Supported grammar (keywords are case-insensitive):
//!
//! ```text
//! SELECT [TOP n] * FROM c
//!     [WHERE c.path op operand [AND c.path op operand]...]
//!     [ORDER BY c.path [ASC|DESC]]
//! ```
//!
//! `op` is one of `= != <> < <= > >=`. An operand is a named parameter
//! (`@name`), a quoted string, a number, `true`, `false` or `null`. Anything
//! else is rejected with a query error, the same way the service rejects
//! syntax it cannot execute.

use crate::domain::{ApiError, CosmosDbError, DocumentQuery, Result};
use serde_json::{Number, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Param(String),
    Str(String),
    Num(f64),
    Op(&'static str),
    Star,
    Dot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone)]
struct Filter {
    path: Vec<String>,
    comparison: Comparison,
    operand: Value,
}

#[derive(Debug, Clone)]
struct OrderBy {
    path: Vec<String>,
    descending: bool,
}

/// A parsed query, ready to run against documents
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    top: Option<usize>,
    filters: Vec<Filter>,
    order_by: Option<OrderBy>,
}

impl CompiledQuery {
    /// Parse a query and bind its parameters
    ///
    /// # Errors
    ///
    /// `QueryFailed` for unsupported syntax, `Validation` for a parameter
    /// referenced in the text but not supplied.
    pub fn compile(query: &DocumentQuery) -> Result<Self> {
        let tokens = tokenize(query.text())?;
        Parser {
            tokens,
            pos: 0,
            query,
            alias: String::new(),
        }
        .parse()
    }

    /// Whether a document satisfies every WHERE condition
    pub fn matches(&self, document: &Value) -> bool {
        self.filters.iter().all(|filter| {
            lookup(document, &filter.path)
                .map(|value| compare(value, filter.comparison, &filter.operand))
                .unwrap_or(false)
        })
    }

    /// Apply ORDER BY and TOP to the matched documents
    pub fn finish(&self, mut documents: Vec<Value>) -> Vec<Value> {
        if let Some(order_by) = &self.order_by {
            documents.sort_by(|a, b| {
                let ordering = order_values(lookup(a, &order_by.path), lookup(b, &order_by.path));
                if order_by.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        if let Some(top) = self.top {
            documents.truncate(top);
        }
        documents
    }
}

fn unsupported(message: impl Into<String>) -> ApiError {
    ApiError::CosmosDb(CosmosDbError::QueryFailed(message.into()))
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            '=' => {
                tokens.push(Token::Op("="));
                i += 1;
            }
            '!' if next == Some('=') => {
                tokens.push(Token::Op("!="));
                i += 2;
            }
            '<' => match next {
                Some('=') => {
                    tokens.push(Token::Op("<="));
                    i += 2;
                }
                Some('>') => {
                    tokens.push(Token::Op("!="));
                    i += 2;
                }
                _ => {
                    tokens.push(Token::Op("<"));
                    i += 1;
                }
            },
            '>' => {
                if next == Some('=') {
                    tokens.push(Token::Op(">="));
                    i += 2;
                } else {
                    tokens.push(Token::Op(">"));
                    i += 1;
                }
            }
            '\'' | '"' => {
                let quote = c;
                let mut value = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(unsupported("unterminated string literal")),
                        // A doubled quote is an escaped quote
                        Some(&ch) if ch == quote && chars.get(i + 1) == Some(&quote) => {
                            value.push(quote);
                            i += 2;
                        }
                        Some(&ch) if ch == quote => {
                            i += 1;
                            break;
                        }
                        Some(&ch) => {
                            value.push(ch);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(value));
            }
            '@' => {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                if i == start + 1 {
                    return Err(unsupported("empty parameter name"));
                }
                tokens.push(Token::Param(chars[start..i].iter().collect()));
            }
            c if c.is_ascii_digit()
                || (c == '-' && next.map(|n| n.is_ascii_digit()).unwrap_or(false)) =>
            {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| unsupported(format!("invalid number '{literal}'")))?;
                tokens.push(Token::Num(number));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
            other => return Err(unsupported(format!("unsupported character '{other}'"))),
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    query: &'a DocumentQuery,
    alias: String,
}

impl Parser<'_> {
    fn parse(mut self) -> Result<CompiledQuery> {
        self.expect_keyword("SELECT")?;

        let top = if self.eat_keyword("TOP") {
            match self.advance() {
                Some(Token::Num(n)) if n >= 0.0 && n.fract() == 0.0 => Some(n as usize),
                _ => return Err(unsupported("TOP expects a non-negative integer")),
            }
        } else {
            None
        };

        match self.advance() {
            Some(Token::Star) => {}
            _ => return Err(unsupported("only SELECT * projections are supported")),
        }

        self.expect_keyword("FROM")?;
        self.alias = match self.advance() {
            Some(Token::Word(alias)) => alias,
            _ => return Err(unsupported("expected a collection alias after FROM")),
        };

        let mut filters = Vec::new();
        if self.eat_keyword("WHERE") {
            loop {
                filters.push(self.parse_filter()?);
                if !self.eat_keyword("AND") {
                    break;
                }
            }
        }

        let order_by = if self.eat_keyword("ORDER") {
            self.expect_keyword("BY")?;
            let path = self.parse_path()?;
            let descending = if self.eat_keyword("DESC") {
                true
            } else {
                self.eat_keyword("ASC");
                false
            };
            Some(OrderBy { path, descending })
        } else {
            None
        };

        if let Some(token) = self.tokens.get(self.pos) {
            return Err(unsupported(format!("unexpected token {token:?}")));
        }

        Ok(CompiledQuery {
            top,
            filters,
            order_by,
        })
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.tokens.get(self.pos) {
            Some(Token::Word(word)) if word.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(unsupported(format!("expected {keyword}")))
        }
    }

    fn parse_path(&mut self) -> Result<Vec<String>> {
        match self.advance() {
            Some(Token::Word(alias)) if alias == self.alias => {}
            _ => {
                return Err(unsupported(format!(
                    "expected a property path starting with '{}.'",
                    self.alias
                )))
            }
        }

        let mut path = Vec::new();
        while self.tokens.get(self.pos) == Some(&Token::Dot) {
            self.pos += 1;
            match self.advance() {
                Some(Token::Word(field)) => path.push(field),
                _ => return Err(unsupported("expected a property name after '.'")),
            }
        }

        if path.is_empty() {
            return Err(unsupported("comparisons must target a property"));
        }
        Ok(path)
    }

    fn parse_filter(&mut self) -> Result<Filter> {
        let path = self.parse_path()?;

        let comparison = match self.advance() {
            Some(Token::Op("=")) => Comparison::Eq,
            Some(Token::Op("!=")) => Comparison::Ne,
            Some(Token::Op("<")) => Comparison::Lt,
            Some(Token::Op("<=")) => Comparison::Le,
            Some(Token::Op(">")) => Comparison::Gt,
            Some(Token::Op(">=")) => Comparison::Ge,
            _ => return Err(unsupported("expected a comparison operator")),
        };

        let operand = match self.advance() {
            Some(Token::Param(name)) => self.query.parameter(&name).cloned().ok_or_else(|| {
                ApiError::Validation(format!("Missing query parameter {name}"))
            })?,
            Some(Token::Str(value)) => Value::String(value),
            Some(Token::Num(n)) => number_value(n),
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("true") => Value::Bool(true),
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("false") => Value::Bool(false),
            Some(Token::Word(word)) if word.eq_ignore_ascii_case("null") => Value::Null,
            _ => return Err(unsupported("expected a parameter or literal")),
        };

        Ok(Filter {
            path,
            comparison,
            operand,
        })
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn lookup<'v>(document: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter()
        .try_fold(document, |value, field| value.as_object()?.get(field))
}

fn compare(value: &Value, comparison: Comparison, operand: &Value) -> bool {
    let ordering = match (value, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64().zip(b.as_f64()).and_then(|(a, b)| a.partial_cmp(&b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (a, b) if comparison == Comparison::Eq || comparison == Comparison::Ne => {
            // Mismatched or structured types only support (in)equality
            return (a == b) == (comparison == Comparison::Eq);
        }
        _ => None,
    };

    let Some(ordering) = ordering else {
        return false;
    };

    match comparison {
        Comparison::Eq => ordering == Ordering::Equal,
        Comparison::Ne => ordering != Ordering::Equal,
        Comparison::Lt => ordering == Ordering::Less,
        Comparison::Le => ordering != Ordering::Greater,
        Comparison::Gt => ordering == Ordering::Greater,
        Comparison::Ge => ordering != Ordering::Less,
    }
}

// undefined < null < false/true < numbers < strings < arrays/objects
fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) | Some(Value::Object(_)) => 5,
    }
}

fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .zip(y.as_f64())
            .and_then(|(x, y)| x.partial_cmp(&y))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn run(query: &DocumentQuery, documents: &[Value]) -> Vec<Value> {
        let compiled = CompiledQuery::compile(query).unwrap();
        let matched = documents
            .iter()
            .filter(|d| compiled.matches(d))
            .cloned()
            .collect();
        compiled.finish(matched)
    }

    fn sample() -> Vec<Value> {
        vec![
            json!({"id": "a", "user_id": "u1", "duration": 30, "status": "done", "meta": {"lang": "en"}}),
            json!({"id": "b", "user_id": "u1", "duration": 90, "status": "failed"}),
            json!({"id": "c", "user_id": "u2", "duration": 60, "status": "done", "meta": {"lang": "de"}}),
        ]
    }

    #[test]
    fn test_select_all() {
        let results = run(&DocumentQuery::new("SELECT * FROM c"), &sample());
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_parameter_filter() {
        let query = DocumentQuery::new("SELECT * FROM c WHERE c.user_id = @user_id")
            .with_parameter("@user_id", "u1");
        let results = run(&query, &sample());
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_and_filters_and_literals() {
        let query = DocumentQuery::new(
            "select * from c where c.status = 'done' and c.duration >= 45",
        );
        let results = run(&query, &sample());
        assert_eq!(results, vec![sample()[2].clone()]);
    }

    #[test]
    fn test_nested_path() {
        let query = DocumentQuery::new("SELECT * FROM c WHERE c.meta.lang = @lang")
            .with_parameter("@lang", "en");
        let results = run(&query, &sample());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], "a");
    }

    #[test]
    fn test_missing_field_never_matches() {
        let query = DocumentQuery::new("SELECT * FROM c WHERE c.meta.lang != 'fr'");
        let results = run(&query, &sample());
        // "b" has no meta and is excluded, like undefined in Cosmos
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_order_by_desc_with_top() {
        let query = DocumentQuery::new("SELECT TOP 2 * FROM c ORDER BY c.duration DESC");
        let results = run(&query, &sample());
        let ids: Vec<_> = results.iter().map(|d| d["id"].clone()).collect();
        assert_eq!(ids, vec![json!("b"), json!("c")]);
    }

    #[test]
    fn test_escaped_quote_literal() {
        let docs = vec![json!({"id": "x", "name": "O'Brien"})];
        let query = DocumentQuery::new("SELECT * FROM c WHERE c.name = 'O''Brien'");
        assert_eq!(run(&query, &docs).len(), 1);
    }

    #[test]
    fn test_missing_parameter_is_validation_error() {
        let query = DocumentQuery::new("SELECT * FROM c WHERE c.user_id = @user_id");
        let err = CompiledQuery::compile(&query).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test_case("SELECT c.id FROM c" ; "projection")]
    #[test_case("SELECT * FROM c WHERE c.a = 1 OR c.b = 2" ; "or")]
    #[test_case("SELECT * FROM c WHERE x.a = 1" ; "wrong alias")]
    #[test_case("SELECT * FROM c JOIN t IN c.tags" ; "join")]
    #[test_case("DELETE FROM c" ; "not a select")]
    #[test_case("SELECT * FROM c WHERE c.name = 'open" ; "unterminated string")]
    fn test_unsupported_queries(text: &str) {
        let err = CompiledQuery::compile(&DocumentQuery::new(text)).unwrap_err();
        assert!(matches!(err, ApiError::CosmosDb(CosmosDbError::QueryFailed(_))));
    }
}
