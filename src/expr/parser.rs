//! `nom` grammar for formula strings.
//!
//! ```text
//! expr    = term (("+" | "-") term)*
//! term    = unary (("*" | "/") unary)*
//! unary   = "-" unary | power
//! power   = postfix ("^" unary)?
//! postfix = primary unit?
//! primary = number | "(" expr ")" | ident "(" expr ")" | "PI" | ident
//! ```

use nom::{
    IResult,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_opt, map_res, opt, recognize},
    error::{Error, ErrorKind},
    multi::{fold_many0, many0_count},
    sequence::{delimited, pair, preceded},
};

use super::{BinOp, Expr, ExprError, Func, Unit};
use crate::float_types::Real;

/// Parse a formula string such as `"2 * module + 0.5 mm"`.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    match all_consuming(ws(expr))(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Failure(Error {
            input: rest,
            code: ErrorKind::Verify,
        })) => Err(ExprError::UnknownFunction(leading_identifier(rest).to_string())),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExprError::Parse {
            input: input.to_string(),
            rest: e.input.to_string(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::Parse {
            input: input.to_string(),
            rest: String::new(),
        }),
    }
}

fn leading_identifier(input: &str) -> &str {
    let end = input
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(input.len());
    &input[..end]
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(ws(one_of("+-")), term),
        move || first.clone(),
        |lhs, (op, rhs)| {
            let op = if op == '+' { BinOp::Add } else { BinOp::Sub };
            Expr::Bin(op, Box::new(lhs), Box::new(rhs))
        },
    )(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    fold_many0(
        pair(ws(one_of("*/")), unary),
        move || first.clone(),
        |lhs, (op, rhs)| {
            let op = if op == '*' { BinOp::Mul } else { BinOp::Div };
            Expr::Bin(op, Box::new(lhs), Box::new(rhs))
        },
    )(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |inner| Expr::Neg(Box::new(inner))),
        power,
    ))(input)
}

// Right associative: the exponent is itself a unary.
fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = postfix(input)?;
    let (input, exponent) = opt(preceded(ws(char('^')), unary))(input)?;
    Ok(match exponent {
        Some(exponent) => (input, base.pow(exponent)),
        None => (input, base),
    })
}

fn postfix(input: &str) -> IResult<&str, Expr> {
    let (input, inner) = ws(primary)(input)?;
    let (input, unit) = opt(ws(unit))(input)?;
    Ok(match unit {
        Some(unit) => (input, inner.with_unit(unit)),
        None => (input, inner),
    })
}

fn unit(input: &str) -> IResult<&str, Unit> {
    map_opt(identifier, Unit::from_symbol)(input)
}

fn primary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(number, Expr::Num),
        delimited(char('('), ws(expr), char(')')),
        call,
        map(identifier, |name| match name {
            "PI" => Expr::Pi,
            _ => Expr::Param(name.to_string()),
        }),
    ))(input)
}

fn call(input: &str) -> IResult<&str, Expr> {
    let (rest, name) = identifier(input)?;
    let (rest, arg) = preceded(ws(char('(')), ws(expr))(rest)?;
    let (rest, _) = char(')')(rest)?;
    match Func::from_name(name) {
        Some(func) => Ok((rest, Expr::Func(func, Box::new(arg)))),
        None => Err(nom::Err::Failure(Error::new(input, ErrorKind::Verify))),
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

// Plain decimals only: `inf`, `nan` and exponents are not formula syntax.
fn number(input: &str) -> IResult<&str, Real> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        str::parse::<Real>,
    )(input)
}
