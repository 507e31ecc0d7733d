use scanner::Token;

/// The expression tree. A closed enum instead of the classic visitor
/// hierarchy: every consumer matches exhaustively, so adding a variant
/// breaks the build until each one handles it.
///
/// Nodes own their children outright. The parser builds bottom-up, so a
/// tree is acyclic by construction and read-only from then on.
///
/// The variants after `Ternary` are grammar-complete forward shapes for
/// the statement-level language: the printer renders them, but nothing in
/// the current grammar produces them and the evaluator does not accept
/// them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralValue),
    Grouping(Box<Expr>),
    Unary { operator: Token, right: Box<Expr> },
    Binary { left: Box<Expr>, operator: Token, right: Box<Expr> },
    /// C-style comma chain, in evaluation order. Only built for two or
    /// more operands; a single expression stays itself.
    Comma(Vec<Expr>),
    Ternary { condition: Box<Expr>, then_branch: Box<Expr>, else_branch: Box<Expr> },

    Logical { left: Box<Expr>, operator: Token, right: Box<Expr> },
    Variable(Token),
    Assign { name: Token, value: Box<Expr> },
    Call { callee: Box<Expr>, paren: Token, arguments: Vec<Expr> },
    Get { object: Box<Expr>, name: Token },
    Set { object: Box<Expr>, name: Token, value: Box<Expr> },
    This(Token),
    Super { keyword: Token, method: Token },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    Boolean(bool),
    Nil,
}
