//! Token classification for postfix cell expressions.
//!
//! A cell's content is split on whitespace and every fragment is one of:
//! - an operator from the closed set `+ - * / ++ --`
//! - a numeric literal (anything `f64` accepts that contains a digit)
//! - a cell reference (everything else; validated later by the resolver)

use std::fmt;

/// Arithmetic operators understood by the postfix evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Increment,
    Decrement,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Sub),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            "++" => Some(Operator::Increment),
            "--" => Some(Operator::Decrement),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Increment => "++",
            Operator::Decrement => "--",
        }
    }

    /// Number of operands popped from the stack.
    pub fn arity(self) -> usize {
        match self {
            Operator::Increment | Operator::Decrement => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A classified token borrowed from the expression text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token<'a> {
    Number(f64),
    Op(Operator),
    Reference(&'a str),
}

/// Classify a single whitespace-free token.
pub fn classify(token: &str) -> Token<'_> {
    if let Some(op) = Operator::from_symbol(token) {
        return Token::Op(op);
    }
    if let Some(n) = parse_number(token) {
        return Token::Number(n);
    }
    Token::Reference(token)
}

/// Split an expression into classified tokens.
pub fn tokenize(expression: &str) -> impl Iterator<Item = Token<'_>> {
    expression.split_whitespace().map(classify)
}

// `f64::from_str` also accepts "inf" and "NaN"; those are not decimal literals.
fn parse_number(token: &str) -> Option<f64> {
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_operators() {
        assert_eq!(classify("+"), Token::Op(Operator::Add));
        assert_eq!(classify("-"), Token::Op(Operator::Sub));
        assert_eq!(classify("*"), Token::Op(Operator::Mul));
        assert_eq!(classify("/"), Token::Op(Operator::Div));
        assert_eq!(classify("++"), Token::Op(Operator::Increment));
        assert_eq!(classify("--"), Token::Op(Operator::Decrement));
    }

    #[test]
    fn test_classify_numbers() {
        assert_eq!(classify("3"), Token::Number(3.0));
        assert_eq!(classify("-2.5"), Token::Number(-2.5));
        assert_eq!(classify(".5"), Token::Number(0.5));
        assert_eq!(classify("1e3"), Token::Number(1000.0));
    }

    #[test]
    fn test_non_decimal_words_are_references() {
        assert_eq!(classify("inf"), Token::Reference("inf"));
        assert_eq!(classify("NaN"), Token::Reference("NaN"));
        assert_eq!(classify("B3"), Token::Reference("B3"));
        assert_eq!(classify("+++"), Token::Reference("+++"));
    }

    #[test]
    fn test_tokenize_splits_on_any_whitespace() {
        let tokens: Vec<_> = tokenize(" 3\t4  +\n").collect();
        assert_eq!(
            tokens,
            vec![Token::Number(3.0), Token::Number(4.0), Token::Op(Operator::Add)]
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(Operator::Div.arity(), 2);
        assert_eq!(Operator::Increment.arity(), 1);
    }
}
