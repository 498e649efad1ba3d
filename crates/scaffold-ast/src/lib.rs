pub mod span {
    use serde::Serialize;

    /// Location of a token in the lexed input.
    ///
    /// `line` is 1-based; `offset` and `len` are byte counts into the input.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub line: u32,
        pub offset: u32,
        pub len: u32,
    }

    impl Span {
        pub fn end(&self) -> u32 {
            self.offset + self.len
        }

        /// True when `other` starts exactly where `self` ends, on the same line.
        pub fn touches(&self, other: &Span) -> bool {
            self.line == other.line && self.end() == other.offset
        }
    }
}

pub mod ast {
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Node {
        StringConstant(String),
        /// Numeric literal kept as source text; int-vs-float is decided on evaluation.
        NumericConstant {
            text: String,
            modifier: Option<char>,
            unsigned: bool,
        },
        BoolConstant(bool),
        NullConstant,
        VariableReference(String),
        Unary {
            op: UnOp,
            operand: Box<Node>,
        },
        Binary {
            op: BinOp,
            left: Box<Node>,
            right: Box<Node>,
        },
        Ternary {
            cond: Box<Node>,
            then: Box<Node>,
            otherwise: Box<Node>,
        },
        Assignment {
            name: String,
            value: Box<Node>,
        },
        Error(String),
    }

    impl Node {
        pub fn is_error(&self) -> bool {
            matches!(self, Node::Error(_))
        }

        /// Message of an error node.
        pub fn error_message(&self) -> Option<&str> {
            match self {
                Node::Error(msg) => Some(msg),
                _ => None,
            }
        }

        /// Name bound by a top-level assignment.
        pub fn assigned_name(&self) -> Option<&str> {
            match self {
                Node::Assignment { name, .. } => Some(name),
                _ => None,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum UnOp {
        Plus,
        Neg,
        Not,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        // logical
        Or,
        And,
        // equality
        Eq,
        Ne,
        // relational
        Lt,
        Le,
        Gt,
        Ge,
        // arithmetic
        Add,
        Sub,
        Mul,
        Div,
        Rem,
        Pow,
    }

    impl BinOp {
        pub fn symbol(&self) -> &'static str {
            match self {
                BinOp::Or => "||",
                BinOp::And => "&&",
                BinOp::Eq => "==",
                BinOp::Ne => "!=",
                BinOp::Lt => "<",
                BinOp::Le => "<=",
                BinOp::Gt => ">",
                BinOp::Ge => ">=",
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Rem => "%",
                BinOp::Pow => "**",
            }
        }
    }
}
