//! Nom parser for predicate expressions.
//!
//! The grammar is small and closed; anything outside it is rejected:
//!
//! ```text
//! expr       := or_expr
//! or_expr    := and_expr ("or" and_expr)*
//! and_expr   := not_expr ("and" not_expr)*
//! not_expr   := "not" not_expr | comparison
//! comparison := sum (comp_op sum)*
//! sum        := term (("+" | "-") term)*
//! term       := factor (("*" | "/" | "%") factor)*
//! factor     := "-" factor | postfix
//! postfix    := atom ("[" expr "]")*
//! atom       := number | string | list | user_ref | call | name | "(" expr ")"
//! user_ref   := "user" ("[" string "]")+
//! call       := ("len" | "abs") "(" expr ")"
//! name       := "value" | "True" | "False" | "true" | "false"
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, multispace0, multispace1},
    combinator::{all_consuming, cut, map, map_res, recognize, value, verify},
    error::{context, convert_error, VerboseError},
    multi::{many0, many1, separated_list0},
    number::complete::recognize_float,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use super::ast::{BinaryOp, Builtin, CompareOp, Expr, Literal, LogicalOp, UnaryOp};

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Error returned when predicate text is outside the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The predicate text.
    pub expression: String,
    /// What the parser could not accept.
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported predicate `{}`: {}",
            self.expression, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Parses predicate text into an [`Expr`].
///
/// # Errors
///
/// Returns [`ParseError`] if the text is empty or uses any construct the
/// grammar does not define (unknown names, attribute access, calls to
/// functions other than `len`/`abs`, non-literal `user` keys, ...).
///
/// # Examples
///
/// ```
/// use deckcheck::predicate::{parse, Expr};
///
/// let expr = parse("0 <= value <= 40").unwrap();
/// assert!(matches!(expr, Expr::Compare(_, ref rest) if rest.len() == 2));
///
/// assert!(parse("__import__('os')").is_err());
/// ```
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    match all_consuming(delimited(multispace0, expression, multispace0))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(ParseError {
            expression: input.to_string(),
            message: convert_error(input, e).trim_end().to_string(),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError {
            expression: input.to_string(),
            message: "incomplete expression".to_string(),
        }),
    }
}

// ============================================================================
// Tokens
// ============================================================================

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> PResult<'a, O>,
) -> impl FnMut(&'a str) -> PResult<'a, O> {
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> PResult<&str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Matches a whole word, so `in` does not match the start of `index`.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    verify(identifier, move |s: &str| s == word)
}

fn string_literal(input: &str) -> PResult<String> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        str::to_string,
    )(input)
}

fn number(input: &str) -> PResult<Expr> {
    map_res(recognize_float, |text: &str| {
        if text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
            text.parse()
                .map(|x| Expr::Literal(Literal::Float(x)))
                .map_err(|_| "invalid float literal")
        } else {
            text.parse()
                .map(|i| Expr::Literal(Literal::Int(i)))
                .map_err(|_| "integer literal out of range")
        }
    })(input)
}

// ============================================================================
// Expressions
// ============================================================================

fn expression(input: &str) -> PResult<Expr> {
    or_expr(input)
}

fn fold_logical(op: LogicalOp, first: Expr, rest: Vec<Expr>) -> Expr {
    rest.into_iter()
        .fold(first, |lhs, rhs| Expr::Logical(op, Box::new(lhs), Box::new(rhs)))
}

fn fold_binary(first: Expr, rest: Vec<(BinaryOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    })
}

fn or_expr(input: &str) -> PResult<Expr> {
    let (input, first) = and_expr(input)?;
    let (input, rest) = many0(preceded(ws(keyword("or")), and_expr))(input)?;
    Ok((input, fold_logical(LogicalOp::Or, first, rest)))
}

fn and_expr(input: &str) -> PResult<Expr> {
    let (input, first) = not_expr(input)?;
    let (input, rest) = many0(preceded(ws(keyword("and")), not_expr))(input)?;
    Ok((input, fold_logical(LogicalOp::And, first, rest)))
}

fn not_expr(input: &str) -> PResult<Expr> {
    alt((
        map(preceded(ws(keyword("not")), not_expr), |e| {
            Expr::Unary(UnaryOp::Not, Box::new(e))
        }),
        comparison,
    ))(input)
}

fn compare_op(input: &str) -> PResult<CompareOp> {
    alt((
        value(CompareOp::Le, tag("<=")),
        value(CompareOp::Ge, tag(">=")),
        value(CompareOp::Eq, tag("==")),
        value(CompareOp::Ne, tag("!=")),
        value(CompareOp::Lt, tag("<")),
        value(CompareOp::Gt, tag(">")),
        value(
            CompareOp::NotIn,
            tuple((keyword("not"), multispace1, keyword("in"))),
        ),
        value(CompareOp::In, keyword("in")),
    ))(input)
}

fn comparison(input: &str) -> PResult<Expr> {
    let (input, first) = sum(input)?;
    let (input, rest) = many0(pair(ws(compare_op), sum))(input)?;
    if rest.is_empty() {
        Ok((input, first))
    } else {
        Ok((input, Expr::Compare(Box::new(first), rest)))
    }
}

fn sum(input: &str) -> PResult<Expr> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::Add, char('+')),
            value(BinaryOp::Sub, char('-')),
        ))),
        term,
    ))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn term(input: &str) -> PResult<Expr> {
    let (input, first) = factor(input)?;
    let (input, rest) = many0(pair(
        ws(alt((
            value(BinaryOp::Mul, char('*')),
            value(BinaryOp::Div, char('/')),
            value(BinaryOp::Mod, char('%')),
        ))),
        factor,
    ))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn factor(input: &str) -> PResult<Expr> {
    alt((
        map(preceded(ws(char('-')), factor), |e| {
            Expr::Unary(UnaryOp::Neg, Box::new(e))
        }),
        postfix,
    ))(input)
}

fn postfix(input: &str) -> PResult<Expr> {
    let (input, base) = atom(input)?;
    let (input, indices) = many0(delimited(ws(char('[')), expression, ws(char(']'))))(input)?;
    Ok((
        input,
        indices
            .into_iter()
            .fold(base, |b, i| Expr::Index(Box::new(b), Box::new(i))),
    ))
}

fn atom(input: &str) -> PResult<Expr> {
    ws(alt((
        number,
        map(string_literal, |s| Expr::Literal(Literal::Str(s))),
        list_literal,
        user_ref,
        call,
        name,
        delimited(
            char('('),
            expression,
            cut(context("closing parenthesis", char(')'))),
        ),
    )))(input)
}

fn list_literal(input: &str) -> PResult<Expr> {
    map(
        delimited(
            char('['),
            separated_list0(ws(char(',')), expression),
            preceded(multispace0, cut(context("closing bracket", char(']')))),
        ),
        Expr::List,
    )(input)
}

fn user_ref(input: &str) -> PResult<Expr> {
    let (input, _) = keyword("user")(input)?;
    let (input, keys) = cut(context(
        "user lookups take literal string keys, e.g. user['scf']['energy']",
        many1(delimited(ws(char('[')), ws(string_literal), char(']'))),
    ))(input)?;
    Ok((input, Expr::UserPath(keys)))
}

fn call(input: &str) -> PResult<Expr> {
    let (input, builtin) = alt((
        value(Builtin::Len, keyword("len")),
        value(Builtin::Abs, keyword("abs")),
    ))(input)?;
    let (input, arg) = delimited(
        ws(char('(')),
        expression,
        cut(context("closing parenthesis", ws(char(')')))),
    )(input)?;
    Ok((input, Expr::Call(builtin, Box::new(arg))))
}

fn name(input: &str) -> PResult<Expr> {
    context(
        "name (only `value`, `user`, `True`, `False`, `len` and `abs` are defined)",
        map_res(identifier, |name: &str| match name {
            "value" => Ok(Expr::Value),
            "True" | "true" => Ok(Expr::Literal(Literal::Bool(true))),
            "False" | "false" => Ok(Expr::Literal(Literal::Bool(false))),
            _ => Err("unknown name"),
        }),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(i: i64) -> Expr {
        Expr::Literal(Literal::Int(i))
    }

    #[test]
    fn test_parse_simple_comparison() {
        assert_eq!(
            parse("value > 0").unwrap(),
            Expr::Compare(Box::new(Expr::Value), vec![(CompareOp::Gt, int(0))])
        );
    }

    #[test]
    fn test_parse_chained_comparison() {
        assert_eq!(
            parse("0 <= value <= 40").unwrap(),
            Expr::Compare(
                Box::new(int(0)),
                vec![(CompareOp::Le, Expr::Value), (CompareOp::Le, int(40))]
            )
        );
    }

    #[test]
    fn test_parse_modulo_precedence() {
        assert_eq!(
            parse("value % 2 == 0").unwrap(),
            Expr::Compare(
                Box::new(Expr::Binary(
                    BinaryOp::Mod,
                    Box::new(Expr::Value),
                    Box::new(int(2))
                )),
                vec![(CompareOp::Eq, int(0))]
            )
        );
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            Expr::Binary(
                BinaryOp::Add,
                Box::new(int(1)),
                Box::new(Expr::Binary(BinaryOp::Mul, Box::new(int(2)), Box::new(int(3))))
            )
        );
        // subtraction is left associative
        assert_eq!(
            parse("5-3-1").unwrap(),
            Expr::Binary(
                BinaryOp::Sub,
                Box::new(Expr::Binary(BinaryOp::Sub, Box::new(int(5)), Box::new(int(3)))),
                Box::new(int(1))
            )
        );
    }

    #[test]
    fn test_parse_user_path() {
        assert_eq!(
            parse("user['scf']['some_acceleration'] == True").unwrap(),
            Expr::Compare(
                Box::new(Expr::UserPath(vec![
                    "scf".to_string(),
                    "some_acceleration".to_string()
                ])),
                vec![(CompareOp::Eq, Expr::Literal(Literal::Bool(true)))]
            )
        );
        assert_eq!(
            parse("user[\"title\"]").unwrap(),
            Expr::UserPath(vec!["title".to_string()])
        );
    }

    #[test]
    fn test_parse_user_path_then_list_index() {
        assert_eq!(
            parse("user['a']['b'][0]").unwrap(),
            Expr::Index(
                Box::new(Expr::UserPath(vec!["a".to_string(), "b".to_string()])),
                Box::new(int(0))
            )
        );
    }

    #[test]
    fn test_parse_len_call() {
        assert_eq!(
            parse("len(value) < 80").unwrap(),
            Expr::Compare(
                Box::new(Expr::Call(Builtin::Len, Box::new(Expr::Value))),
                vec![(CompareOp::Lt, int(80))]
            )
        );
    }

    #[test]
    fn test_parse_membership() {
        let expr = parse("value not in ['HF', 'B3LYP']").unwrap();
        let Expr::Compare(_, rest) = expr else {
            panic!("expected comparison");
        };
        assert_eq!(rest[0].0, CompareOp::NotIn);
        assert_eq!(
            rest[0].1,
            Expr::List(vec![
                Expr::Literal(Literal::Str("HF".into())),
                Expr::Literal(Literal::Str("B3LYP".into()))
            ])
        );

        let expr = parse("value in []").unwrap();
        assert!(matches!(expr, Expr::Compare(_, ref rest) if rest[0].0 == CompareOp::In));
    }

    #[test]
    fn test_parse_logical() {
        let expr = parse("not value and value == False or True").unwrap();
        // `or` binds loosest
        assert!(matches!(expr, Expr::Logical(LogicalOp::Or, _, _)));
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            parse("1e-3").unwrap(),
            Expr::Literal(Literal::Float(0.001))
        );
        assert_eq!(parse("2.5").unwrap(), Expr::Literal(Literal::Float(2.5)));
        assert_eq!(parse("false").unwrap(), Expr::Literal(Literal::Bool(false)));
        assert_eq!(
            parse("-value").unwrap(),
            Expr::Unary(UnaryOp::Neg, Box::new(Expr::Value))
        );
    }

    #[test]
    fn test_keywords_need_word_boundaries() {
        // `index` is an unknown name, not `in` followed by `dex`
        assert!(parse("value index").is_err());
        assert!(parse("value order").is_err());
    }

    #[test]
    fn test_rejects_constructs_outside_grammar() {
        for text in [
            "",
            "value.real",
            "__import__('os').system('ls')",
            "open('/etc/passwd')",
            "user",
            "user[value]",
            "user[0]",
            "value = 3",
            "lambda: 1",
            "(value > 1",
            "[1, 2",
            "len(value",
            "value >",
            "99999999999999999999",
        ] {
            assert!(parse(text).is_err(), "expected `{text}` to be rejected");
        }
    }

    #[test]
    fn test_parse_error_carries_text() {
        let err = parse("value ?? 1").unwrap_err();
        assert_eq!(err.expression, "value ?? 1");
        assert!(err.to_string().starts_with("unsupported predicate `value ?? 1`"));
    }
}
