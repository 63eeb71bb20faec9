//! Recursive-descent parser for normalized coefficient expressions.
//!
//! Grammar (after normalization): `+ - * / ^`, parentheses, unary minus,
//! unsigned integer literals and variable names. `^` is right-associative
//! and binds tighter than unary minus, so `-n^2` reads as `-(n^2)`.

use std::rc::Rc;

use cf_ast::Expr;
use nom::{
    branch::alt,
    character::complete::{alpha1, alphanumeric0, char, digit1, multispace0, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::fold_many0,
    sequence::{delimited, pair, preceded},
    IResult,
};
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::error::ParseError;

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn number(input: &str) -> IResult<&str, Rc<Expr>> {
    map_res(digit1, |s: &str| {
        s.parse::<BigInt>()
            .map(|n| Expr::rational(BigRational::from_integer(n)))
    })(input)
}

fn variable(input: &str) -> IResult<&str, Rc<Expr>> {
    map(recognize(pair(alpha1, alphanumeric0)), Expr::var)(input)
}

fn parens(input: &str) -> IResult<&str, Rc<Expr>> {
    delimited(ws(char('(')), expression, ws(char(')')))(input)
}

fn atom(input: &str) -> IResult<&str, Rc<Expr>> {
    ws(alt((parens, number, variable)))(input)
}

fn power(input: &str) -> IResult<&str, Rc<Expr>> {
    let (input, base) = atom(input)?;
    let (input, exp) = opt(preceded(ws(char('^')), factor))(input)?;
    Ok((
        input,
        match exp {
            Some(e) => Expr::pow(base, e),
            None => base,
        },
    ))
}

fn factor(input: &str) -> IResult<&str, Rc<Expr>> {
    alt((map(preceded(ws(char('-')), factor), Expr::neg), power))(input)
}

fn term(input: &str) -> IResult<&str, Rc<Expr>> {
    let (input, init) = factor(input)?;
    fold_many0(
        pair(ws(one_of("*/")), factor),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '*' => Expr::mul(acc, rhs),
            _ => Expr::div(acc, rhs),
        },
    )(input)
}

fn expression(input: &str) -> IResult<&str, Rc<Expr>> {
    let (input, init) = term(input)?;
    fold_many0(
        pair(ws(one_of("+-")), term),
        move || init.clone(),
        |acc, (op, rhs)| match op {
            '+' => Expr::add(acc, rhs),
            _ => Expr::sub(acc, rhs),
        },
    )(input)
}

/// Parse a normalized coefficient expression into an AST.
pub fn parse(input: &str) -> Result<Rc<Expr>, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    match expression(input) {
        Ok((rest, expr)) => {
            if rest.trim().is_empty() {
                Ok(expr)
            } else {
                Err(ParseError::UnconsumedInput(rest.to_string()))
            }
        }
        Err(e) => Err(ParseError::NomError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_linear_coefficient() {
        let e = parse("2*n + 1").unwrap();
        assert_eq!(
            e,
            Expr::add(Expr::mul(Expr::int(2), Expr::var("n")), Expr::int(1))
        );
    }

    #[test]
    fn unary_minus_binds_below_power() {
        let e = parse("-n^6").unwrap();
        assert_eq!(e, Expr::neg(Expr::pow(Expr::var("n"), Expr::int(6))));
    }

    #[test]
    fn power_is_right_associative() {
        let e = parse("n^2^3").unwrap();
        assert_eq!(
            e,
            Expr::pow(
                Expr::var("n"),
                Expr::pow(Expr::int(2), Expr::int(3))
            )
        );
    }

    #[test]
    fn division_chains_left() {
        let e = parse("8/2/2").unwrap();
        assert_eq!(
            e,
            Expr::div(Expr::div(Expr::int(8), Expr::int(2)), Expr::int(2))
        );
    }

    #[test]
    fn negative_exponent() {
        let e = parse("n^-1").unwrap();
        assert_eq!(e, Expr::pow(Expr::var("n"), Expr::neg(Expr::int(1))));
    }

    #[test]
    fn parenthesized_groups() {
        let e = parse("(1+2*n)*(5+17*n*(1+n))").unwrap();
        // structural spot-check: top level is a product
        assert!(matches!(&*e, Expr::Mul(_, _)));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(matches!(
            parse("2*n + 1)"),
            Err(ParseError::UnconsumedInput(_))
        ));
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn big_literals_survive() {
        let e = parse("123456789012345678901234567890").unwrap();
        assert!(matches!(&*e, Expr::Number(_)));
    }
}
