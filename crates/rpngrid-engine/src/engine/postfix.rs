//! Postfix (RPN) expression evaluation.
//!
//! Tokens are consumed left to right against a single operand stack.
//! Numbers are pushed, operators pop their operands and push the result,
//! and cell references are handed to a caller-supplied resolver whose value
//! is pushed in their place.
//!
//! Division follows IEEE-754 semantics: `1 0 /` is `inf`, `0 0 /` is `NaN`.

use tracing::trace;

use super::token::{Operator, Token, classify};
use crate::error::{EvalError, Result};

/// Operand stack local to one expression.
#[derive(Debug, Default)]
pub struct OperandStack {
    values: Vec<f64>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pop the operator's operands, compute, and push the result.
    ///
    /// For `-` and `/` the first value popped is the right-hand side.
    /// On underflow the stack is left untouched and a detail message is returned.
    pub fn apply(&mut self, op: Operator) -> std::result::Result<(), String> {
        let found = self.values.len();
        if found < op.arity() {
            return Err(format!(
                "operator '{}' needs {} operand{}, found {}",
                op,
                op.arity(),
                if op.arity() == 1 { "" } else { "s" },
                found
            ));
        }

        let rhs = self.values.pop().unwrap_or_default();
        let result = match op {
            Operator::Increment => rhs + 1.0,
            Operator::Decrement => rhs - 1.0,
            binary => {
                let lhs = self.values.pop().unwrap_or_default();
                match binary {
                    Operator::Add => lhs + rhs,
                    Operator::Sub => lhs - rhs,
                    Operator::Mul => lhs * rhs,
                    _ => lhs / rhs,
                }
            }
        };
        self.values.push(result);
        Ok(())
    }

    /// Take the single remaining value as the expression result.
    pub fn finish(mut self) -> std::result::Result<f64, String> {
        match self.values.len() {
            1 => Ok(self.values.pop().unwrap_or_default()),
            0 => Err("expression produced no value".to_string()),
            n => Err(format!("expected a single result, found {} values", n)),
        }
    }
}

/// Outcome of a single [`PostfixRun::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    /// A number or operator was consumed.
    Continue,
    /// A cell reference was reached; its value must be passed to
    /// [`PostfixRun::supply`] before stepping again.
    Reference(String),
    /// All tokens were consumed and exactly one value remained.
    Done(f64),
}

/// A postfix expression being evaluated one token at a time.
///
/// Lets a caller suspend the expression at a cell reference, evaluate that
/// cell on its own work-stack, and resume with the value.
#[derive(Debug)]
pub struct PostfixRun {
    expression: String,
    words: Vec<String>,
    pos: usize,
    stack: OperandStack,
}

impl PostfixRun {
    pub fn new(expression: &str) -> Self {
        PostfixRun {
            expression: expression.to_string(),
            words: expression.split_whitespace().map(str::to_string).collect(),
            pos: 0,
            stack: OperandStack::new(),
        }
    }

    fn malformed(&self, detail: String) -> EvalError {
        EvalError::MalformedExpression {
            expression: self.expression.clone(),
            detail,
        }
    }

    pub fn step(&mut self) -> Result<Step> {
        let Some(word) = self.words.get(self.pos) else {
            return match std::mem::take(&mut self.stack).finish() {
                Ok(value) => Ok(Step::Done(value)),
                Err(detail) => Err(self.malformed(detail)),
            };
        };
        self.pos += 1;

        let token = classify(word);
        trace!(?token, depth = self.stack.len(), "postfix token");
        match token {
            Token::Number(n) => self.stack.push(n),
            Token::Op(op) => {
                if let Err(detail) = self.stack.apply(op) {
                    return Err(self.malformed(detail));
                }
            }
            Token::Reference(name) => return Ok(Step::Reference(name.to_string())),
        }
        Ok(Step::Continue)
    }

    /// Push the value of the reference returned by the last step.
    pub fn supply(&mut self, value: f64) {
        self.stack.push(value);
    }
}

/// Evaluate a postfix expression.
///
/// `resolve` is called with the raw token text of every cell reference, in
/// order of appearance, and must return that cell's value.
pub fn evaluate_postfix<F>(expression: &str, mut resolve: F) -> Result<f64>
where
    F: FnMut(&str) -> Result<f64>,
{
    let mut run = PostfixRun::new(expression);
    loop {
        match run.step()? {
            Step::Continue => {}
            Step::Reference(name) => {
                let value = resolve(&name)?;
                run.supply(value);
            }
            Step::Done(value) => return Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expression: &str) -> Result<f64> {
        evaluate_postfix(expression, |name| Err(EvalError::InvalidReference(name.to_string())))
    }

    #[test]
    fn test_addition() {
        assert_eq!(eval("3 4 +").unwrap(), 7.0);
    }

    #[test]
    fn test_operand_order() {
        assert_eq!(eval("10 2 /").unwrap(), 5.0);
        assert_eq!(eval("5 3 -").unwrap(), 2.0);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval("4 ++").unwrap(), 5.0);
        assert_eq!(eval("4 --").unwrap(), 3.0);
        assert_eq!(eval("2 3 * ++").unwrap(), 7.0);
    }

    #[test]
    fn test_division_by_zero_is_ieee() {
        assert_eq!(eval("1 0 /").unwrap(), f64::INFINITY);
        assert_eq!(eval("-1 0 /").unwrap(), f64::NEG_INFINITY);
        assert!(eval("0 0 /").unwrap().is_nan());
    }

    #[test]
    fn test_underflow_is_malformed() {
        let err = eval("3 +").unwrap_err();
        assert_eq!(
            err,
            EvalError::MalformedExpression {
                expression: "3 +".to_string(),
                detail: "operator '+' needs 2 operands, found 1".to_string(),
            }
        );
        assert!(matches!(eval("++"), Err(EvalError::MalformedExpression { .. })));
    }

    #[test]
    fn test_leftover_values_are_malformed() {
        let err = eval("3 4").unwrap_err();
        assert!(
            matches!(err, EvalError::MalformedExpression { ref detail, .. } if detail.contains("found 2 values"))
        );
    }

    #[test]
    fn test_empty_expression_is_malformed() {
        assert!(matches!(eval("   "), Err(EvalError::MalformedExpression { .. })));
    }

    #[test]
    fn test_references_are_resolved_in_order() {
        let mut seen = Vec::new();
        let value = evaluate_postfix("A1 B2 -", |name| {
            seen.push(name.to_string());
            Ok(if name == "A1" { 10.0 } else { 4.0 })
        })
        .unwrap();
        assert_eq!(value, 6.0);
        assert_eq!(seen, vec!["A1", "B2"]);
    }

    #[test]
    fn test_run_suspends_at_references() {
        let mut run = PostfixRun::new("2 A1 *");
        assert_eq!(run.step(), Ok(Step::Continue));
        assert_eq!(run.step(), Ok(Step::Reference("A1".to_string())));
        run.supply(21.0);
        assert_eq!(run.step(), Ok(Step::Continue));
        assert_eq!(run.step(), Ok(Step::Done(42.0)));
    }

    #[test]
    fn test_resolver_error_propagates() {
        assert_eq!(
            eval("1 Q9 +").unwrap_err(),
            EvalError::InvalidReference("Q9".to_string())
        );
    }
}
