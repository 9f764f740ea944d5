//! A `nom`-based compiler from query text to an evaluable [`Path`].
//!
//! Each query step becomes one selector, handed to the path builder in
//! reading order. Filters, computed keys and scripts are parsed into
//! [`Expression`]s, which may themselves embed `@` or `$` rooted queries.
use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::error::SyntaxError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize, value},
    error::ErrorKind,
    multi::{many0, separated_list1},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded},
};
use pathwalk_engine::{AmbiguousSelector, Evaluable, Literal, Path, PlainSelector};
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

// --- Main Public Parsers ---

/// Compiles a query such as `$.store.book[?(@.price < 10)].title`.
pub fn compile(query: &str) -> Result<Path, SyntaxError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(SyntaxError::EmptyQuery);
    }
    match path(trimmed) {
        Ok(("", path)) => {
            log::debug!(
                "Compiled '{}' with {} ambiguous step(s)",
                trimmed,
                path.branch_depth()
            );
            Ok(path)
        }
        Ok((rem, _)) => Err(SyntaxError::parse(
            query,
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(SyntaxError::parse(query, e.to_string())),
    }
}

/// Parses a standalone filter or script expression such as `@.price < 10`.
pub fn parse_expression(input: &str) -> Result<Expression, SyntaxError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(SyntaxError::parse(
            input,
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(SyntaxError::parse(input, e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

/// `operand (operator operand)*`, folded to the left.
fn left_assoc<'a>(
    operand: fn(&'a str) -> IResult<&'a str, Expression>,
    operator: fn(&'a str) -> IResult<&'a str, BinaryOperator>,
    input: &'a str,
) -> IResult<&'a str, Expression> {
    let (input, first) = operand(input)?;
    let (input, rest) = many0(pair(ws(operator), operand)).parse(input)?;
    let expr = rest
        .into_iter()
        .fold(first, |left, (op, right)| Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        });
    Ok((input, expr))
}

fn fail(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(input, ErrorKind::Char))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_').parse(input)
}

fn integer(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })
    .parse(input)
}

/// A single- or double-quoted string with backslash escapes.
fn quoted_string(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('\'' | '"'))) => c,
        _ => return Err(fail(input)),
    };
    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            out.push(match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[i + c.len_utf8()..], out));
        } else {
            out.push(c);
        }
    }
    Err(fail(input))
}

// --- Path Parsers ---

/// One compiled query step, in the order the builder must receive it.
enum Segment {
    Plain(PlainSelector),
    Ambiguous(AmbiguousSelector),
}

fn path(input: &str) -> IResult<&str, Path> {
    let (input, start) = alt((
        map(char('$'), |_| Path::root()),
        map(char('@'), |_| {
            Path::root().with_plain_selector(PlainSelector::Current)
        }),
    ))
    .parse(input)?;
    let (input, steps) = many0(step).parse(input)?;

    let path = steps
        .into_iter()
        .flatten()
        .fold(start, |path, segment| match segment {
            Segment::Plain(selector) => path.with_plain_selector(selector),
            Segment::Ambiguous(selector) => path.with_ambiguous_selector(selector),
        });
    Ok((input, path))
}

fn step(input: &str) -> IResult<&str, Vec<Segment>> {
    alt((
        descendant_step,
        map(dot_step, |s| vec![s]),
        map(bracket_step, |s| vec![s]),
    ))
    .parse(input)
}

/// `..name`, `..*` and `..[...]`. The step after `..` runs in the trailing
/// tail of the descent, so nodes it does not apply to are simply dropped.
fn descendant_step(input: &str) -> IResult<&str, Vec<Segment>> {
    let (input, _) = tag("..").parse(input)?;
    let (input, target) = alt((
        map(char('*'), |_| Segment::Ambiguous(AmbiguousSelector::Star)),
        map(identifier, |name| Segment::Plain(PlainSelector::key(name))),
        bracket_step,
    ))
    .parse(input)?;
    Ok((
        input,
        vec![Segment::Ambiguous(AmbiguousSelector::RecursiveDescent), target],
    ))
}

fn dot_step(input: &str) -> IResult<&str, Segment> {
    preceded(
        char('.'),
        alt((
            map(char('*'), |_| Segment::Ambiguous(AmbiguousSelector::Star)),
            map(delimited(char('('), expression, char(')')), |expr| {
                Segment::Plain(PlainSelector::script(expr))
            }),
            map(identifier, |name| Segment::Plain(PlainSelector::key(name))),
        )),
    )
    .parse(input)
}

fn bracket_step(input: &str) -> IResult<&str, Segment> {
    delimited(char('['), ws(bracket_selector), char(']')).parse(input)
}

fn bracket_selector(input: &str) -> IResult<&str, Segment> {
    alt((
        map(char('*'), |_| Segment::Ambiguous(AmbiguousSelector::Star)),
        map(
            preceded(
                char('?'),
                delimited(ws(char('(')), expression, char(')')),
            ),
            |expr| Segment::Ambiguous(AmbiguousSelector::filter(expr)),
        ),
        map(delimited(char('('), expression, char(')')), |expr| {
            Segment::Plain(PlainSelector::direct(expr))
        }),
        slice,
        key_list,
    ))
    .parse(input)
}

/// `[start:end:step]`, every part optional.
fn slice(input: &str) -> IResult<&str, Segment> {
    let (input, start) = opt(integer).parse(input)?;
    let (input, _) = ws(char(':')).parse(input)?;
    let (input, end) = opt(integer).parse(input)?;
    let (input, step) = opt(preceded(ws(char(':')), opt(integer))).parse(input)?;
    Ok((
        input,
        Segment::Ambiguous(AmbiguousSelector::slice(
            start.unwrap_or(0),
            end.unwrap_or(i64::MAX),
            step.flatten().unwrap_or(1),
        )),
    ))
}

/// `[key]` is a plain step; `[key, key, ...]` fans out.
fn key_list(input: &str) -> IResult<&str, Segment> {
    let (input, keys) = separated_list1(ws(char(',')), key).parse(input)?;
    let segment = match <[Arc<dyn Evaluable>; 1]>::try_from(keys) {
        Ok([key]) => Segment::Plain(PlainSelector::Direct(key)),
        Err(keys) => Segment::Ambiguous(AmbiguousSelector::multi(keys)),
    };
    Ok((input, segment))
}

fn key(input: &str) -> IResult<&str, Arc<dyn Evaluable>> {
    alt((
        map(quoted_string, |s| {
            Arc::new(Literal(Value::String(s))) as Arc<dyn Evaluable>
        }),
        map(integer, |i| Arc::new(Literal::new(i)) as Arc<dyn Evaluable>),
    ))
    .parse(input)
}

// --- Expression Parsers (in order of precedence) ---

fn expression(input: &str) -> IResult<&str, Expression> {
    ws(or_expr).parse(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Or, tag("||")).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::And, tag("&&")).parse(input)
}

fn equality_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Equals, tag("==")),
        value(BinaryOperator::NotEquals, tag("!=")),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::LessThanOrEqual, tag("<=")),
        value(BinaryOperator::GreaterThanOrEqual, tag(">=")),
        value(BinaryOperator::LessThan, char('<')),
        value(BinaryOperator::GreaterThan, char('>')),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Plus, char('+')),
        value(BinaryOperator::Minus, char('-')),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Multiply, char('*')),
        value(BinaryOperator::Divide, char('/')),
        value(BinaryOperator::Modulo, char('%')),
    ))
    .parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(and_expr, or_op, input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(equality_expr, and_op, input)
}

fn equality_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(match_expr, equality_op, input)
}

/// `expr =~ 'pattern'`; the pattern must be a string literal.
fn match_expr(input: &str) -> IResult<&str, Expression> {
    let (input, expr) = relational_expr(input)?;
    let (input, pattern) = opt(preceded(
        ws(tag("=~")),
        map_res(quoted_string, |p| Regex::new(&p)),
    ))
    .parse(input)?;
    let expr = match pattern {
        Some(pattern) => Expression::Matches {
            expr: Box::new(expr),
            pattern,
        },
        None => expr,
    };
    Ok((input, expr))
}

fn relational_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(additive_expr, relational_op, input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(multiplicative_expr, additive_op, input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    left_assoc(unary_expr, multiplicative_op, input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map(preceded(char('!'), unary_expr), |expr| Expression::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(expr),
        }),
        map(preceded(char('-'), unary_expr), |expr| Expression::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(expr),
        }),
        primary_expr,
    )))
    .parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(literal, Expression::Literal),
        map(path, Expression::Path),
        delimited(char('('), expression, char(')')),
    ))
    .parse(input)
}

// --- Literal Parsers ---

fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        value(Value::Null, tag("null")),
        number,
        map(quoted_string, Value::String),
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    map_res(recognize_float, |s: &str| match s.parse::<i64>() {
        Ok(i) => Ok(Value::from(i)),
        Err(_) => s.parse::<f64>().map(Value::from),
    })
    .parse(input)
}
