use parser::{Expr, LiteralValue};
use scanner::{Token, TokenData};

mod value;
pub use value::Value;

/// A dynamic-type precondition of some operator was violated. Carries the
/// offending operator token so the caller can point at a source line; the
/// message texts are part of the language's contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Operand must be a number.")]
    UnaryOperandNotNumber { operator: Token },
    #[error("Operands must be numbers.")]
    OperandsNotNumbers { operator: Token },
    #[error("Operands must be both numbers or both strings.")]
    MismatchedAddition { operator: Token },
}

impl RuntimeError {
    pub fn operator(&self) -> &Token {
        match self {
            RuntimeError::UnaryOperandNotNumber { operator }
            | RuntimeError::OperandsNotNumbers { operator }
            | RuntimeError::MismatchedAddition { operator } => operator,
        }
    }
}

/// Tree-walking evaluator. Holds no cross-call state: evaluation is a
/// pure function of the tree, and the tree is never mutated.
#[derive(Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Top-level entry: evaluates one expression and returns the line of
    /// output its value formats to. The caller decides where it goes.
    pub fn interpret(&self, expr: &Expr) -> Result<String, RuntimeError> {
        let value = self.evaluate(expr)?;
        log::debug!("evaluated to {value:?}");
        Ok(value.to_string())
    }

    /// One evaluation rule per variant, errors propagating straight up:
    /// there are no partial results.
    pub fn evaluate(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(LiteralValue::Number(n)) => Ok((*n).into()),
            Expr::Literal(LiteralValue::Str(s)) => Ok(s.as_str().into()),
            Expr::Literal(LiteralValue::Boolean(b)) => Ok((*b).into()),
            Expr::Literal(LiteralValue::Nil) => Ok(Value::Nil),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match (&operator.data, right) {
                    (TokenData::Minus, Value::Number(n)) => Ok((-n).into()),
                    (TokenData::Minus, _) => {
                        Err(RuntimeError::UnaryOperandNotNumber { operator: operator.clone() })
                    }
                    (TokenData::Bang, value) => Ok((!value.is_truthy()).into()),
                    _ => unreachable!("parser only emits '!' and '-' as unary operators"),
                }
            }

            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match (&operator.data, left, right) {
                    (TokenData::Minus, Value::Number(l), Value::Number(r)) => Ok((l - r).into()),
                    // Division is plain IEEE 754; dividing by zero gives
                    // an infinity, not an error.
                    (TokenData::Slash, Value::Number(l), Value::Number(r)) => Ok((l / r).into()),
                    (TokenData::Star, Value::Number(l), Value::Number(r)) => Ok((l * r).into()),

                    (TokenData::Plus, Value::Number(l), Value::Number(r)) => Ok((l + r).into()),
                    (TokenData::Plus, Value::Str(l), Value::Str(r)) => Ok((l + &r).into()),
                    // "+" never coerces mixed operands.
                    (TokenData::Plus, _, _) => {
                        Err(RuntimeError::MismatchedAddition { operator: operator.clone() })
                    }

                    (TokenData::Greater, Value::Number(l), Value::Number(r)) => Ok((l > r).into()),
                    (TokenData::GreaterEqual, Value::Number(l), Value::Number(r)) => {
                        Ok((l >= r).into())
                    }
                    (TokenData::Less, Value::Number(l), Value::Number(r)) => Ok((l < r).into()),
                    (TokenData::LessEqual, Value::Number(l), Value::Number(r)) => {
                        Ok((l <= r).into())
                    }

                    (TokenData::EqualEqual, l, r) => Ok(l.equals(&r).into()),
                    (TokenData::BangEqual, l, r) => Ok((!l.equals(&r)).into()),

                    (
                        TokenData::Minus
                        | TokenData::Slash
                        | TokenData::Star
                        | TokenData::Greater
                        | TokenData::GreaterEqual
                        | TokenData::Less
                        | TokenData::LessEqual,
                        _,
                        _,
                    ) => Err(RuntimeError::OperandsNotNumbers { operator: operator.clone() }),

                    _ => unreachable!(
                        "parser only emits arithmetic, comparison and equality binary operators"
                    ),
                }
            }

            // Reaching one of these is a defect in the caller, not a
            // runtime error of the interpreted program: the grammar
            // accepts these forms, but their evaluation rules don't exist
            // yet.
            Expr::Comma(_)
            | Expr::Ternary { .. }
            | Expr::Logical { .. }
            | Expr::Variable(_)
            | Expr::Assign { .. }
            | Expr::Call { .. }
            | Expr::Get { .. }
            | Expr::Set { .. }
            | Expr::This(_)
            | Expr::Super { .. } => {
                unimplemented!("no evaluation rule for this expression form: {expr:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use errors::Line;
    use parser::Parser;
    use pretty_assertions::assert_eq;
    use scanner::Scanner;

    use super::*;

    fn eval(source: &str) -> Result<Value, RuntimeError> {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let expr = Parser::new(tokens).parse().unwrap();
        Interpreter::new().evaluate(&expr)
    }

    fn value(source: &str) -> Value {
        eval(source).unwrap()
    }

    #[test]
    fn literals() {
        assert_eq!(value("nil"), Value::Nil);
        assert_eq!(value("true"), Value::Bool(true));
        assert_eq!(value("3.5"), Value::Number(3.5));
        assert_eq!(value("\"hi\""), Value::Str("hi".to_string()));
    }

    #[test]
    fn arithmetic_respects_precedence() {
        assert_eq!(value("1 + 2 * 3"), Value::Number(7.0));
        assert_eq!(value("(1 + 2) * 3"), Value::Number(9.0));
        assert_eq!(value("10 - 4 - 3"), Value::Number(3.0));
        assert_eq!(value("8 / 4 / 2"), Value::Number(1.0));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(value("-3"), Value::Number(-3.0));
        assert_eq!(value("--3"), Value::Number(3.0));
        assert_eq!(
            eval("-\"a\"").unwrap_err().to_string(),
            "Operand must be a number."
        );
    }

    #[test]
    fn bang_uses_truthiness() {
        assert_eq!(value("!0"), Value::Bool(true));
        assert_eq!(value("!nil"), Value::Bool(true));
        assert_eq!(value("!1"), Value::Bool(false));
        assert_eq!(value("!\"\""), Value::Bool(false));
        assert_eq!(value("!false"), Value::Bool(true));
    }

    #[test]
    fn string_concatenation() {
        assert_eq!(value("\"a\" + \"b\""), Value::Str("ab".to_string()));
    }

    #[test]
    fn mixed_addition_is_an_error() {
        let error = eval("1 + \"a\"").unwrap_err();
        assert_eq!(error.to_string(), "Operands must be both numbers or both strings.");
        assert_eq!(error.operator().lexeme, "+");
        assert_eq!(error.operator().line, Line(1));
    }

    #[test]
    fn comparisons() {
        assert_eq!(value("1 < 2"), Value::Bool(true));
        assert_eq!(value("2 <= 1"), Value::Bool(false));
        assert_eq!(value("3 > 2"), Value::Bool(true));
        assert_eq!(value("2 >= 3"), Value::Bool(false));
        assert_eq!(
            eval("1 < \"2\"").unwrap_err().to_string(),
            "Operands must be numbers."
        );
    }

    #[test]
    fn arithmetic_type_errors() {
        assert_eq!(
            eval("\"a\" * 2").unwrap_err().to_string(),
            "Operands must be numbers."
        );
        assert_eq!(
            eval("nil - 1").unwrap_err().to_string(),
            "Operands must be numbers."
        );
    }

    #[test]
    fn equality_is_type_strict() {
        assert_eq!(value("1 == \"1\""), Value::Bool(false));
        assert_eq!(value("nil == nil"), Value::Bool(true));
        assert_eq!(value("nil == false"), Value::Bool(false));
        assert_eq!(value("1 != 2"), Value::Bool(true));
        assert_eq!(value("\"a\" == \"a\""), Value::Bool(true));
    }

    #[test]
    fn division_by_zero_is_infinite() {
        assert_eq!(value("1 / 0"), Value::Number(f64::INFINITY));
    }

    #[test]
    fn grouping_passes_through() {
        assert_eq!(value("(nil)"), Value::Nil);
    }

    #[test]
    fn error_propagates_from_subexpression() {
        assert_eq!(
            eval("1 + (2 * nil)").unwrap_err().to_string(),
            "Operands must be numbers."
        );
    }

    #[test]
    fn interpret_formats_one_line() {
        let tokens = Scanner::new("1 + 2 * 3").scan_tokens().unwrap();
        let expr = Parser::new(tokens).parse().unwrap();
        assert_eq!(Interpreter::new().interpret(&expr).unwrap(), "7");
    }

    #[test]
    #[should_panic(expected = "no evaluation rule")]
    fn comma_evaluation_is_a_hard_failure() {
        let _ = eval("1, 2");
    }
}
