#![allow(dead_code, unreachable_pub)]

use std::sync::Arc;

use canopy_syntax::{
    Builder, Grammar, Language as _, StateId, Symbol, SyntaxTree, TextInput, TextSize,
};

/// Drives a [`Builder`] by type name, checking every leaf against the text.
pub struct Fixture {
    grammar: Arc<Grammar>,
    builder: Builder,
}

impl Fixture {
    pub fn new(grammar: Arc<Grammar>, input: impl TextInput) -> Self {
        init_tracing();
        let builder = Builder::new(grammar.clone(), input);
        Self { grammar, builder }
    }

    fn symbol(&self, kind: &str, named: bool) -> Symbol {
        self.grammar
            .symbol_for_name(kind, named)
            .unwrap_or_else(|| panic!("unknown symbol {kind:?} (named: {named})"))
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.builder.text()[usize::from(self.builder.position())..];
        let whitespace = rest.len() - rest.trim_start().len();
        self.builder.skip(TextSize::new(whitespace as u32));
    }

    fn token(&mut self, kind: Symbol, text: &str) -> &mut Self {
        self.skip_whitespace();
        let rest = &self.builder.text()[usize::from(self.builder.position())..];
        assert!(rest.starts_with(text), "expected {text:?} at {rest:?}");
        self.builder.token(kind, TextSize::of(text));
        self
    }

    pub fn field(&mut self, name: &str) -> &mut Self {
        let field = self.grammar.field_for_name(name).expect("unknown field");
        self.builder.field(field);
        self
    }

    pub fn extra(&mut self) -> &mut Self {
        self.builder.extra();
        self
    }

    pub fn state(&mut self, state: u16) -> &mut Self {
        self.builder.parse_state(StateId(state));
        self
    }

    pub fn node(&mut self, kind: &str, children: impl FnOnce(&mut Self)) -> &mut Self {
        let kind = self.symbol(kind, true);
        self.builder.start_node(kind);
        children(self);
        self.builder.finish_node();
        self
    }

    pub fn error(&mut self, children: impl FnOnce(&mut Self)) -> &mut Self {
        self.builder.start_node(Symbol::ERROR);
        children(self);
        self.builder.finish_node();
        self
    }

    /// A named leaf whose text is `text`.
    pub fn leaf(&mut self, kind: &str, text: &str) -> &mut Self {
        let kind = self.symbol(kind, true);
        self.token(kind, text)
    }

    /// An anonymous leaf, named after its text.
    pub fn punct(&mut self, text: &str) -> &mut Self {
        let kind = self.symbol(text, false);
        self.token(kind, text)
    }

    pub fn missing(&mut self, kind: &str, named: bool) -> &mut Self {
        let kind = self.symbol(kind, named);
        self.builder.missing(kind);
        self
    }

    pub fn finish(self) -> SyntaxTree {
        self.builder.finish()
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const BINARY_EXPRESSION_STATE: u16 = 5;
pub const AFTER_BINARY_EXPRESSION_STATE: u16 = 9;

pub fn javascript() -> Arc<Grammar> {
    let mut grammar = Grammar::builder("javascript");
    for kind in [
        "program",
        "expression_statement",
        "binary_expression",
        "parenthesized_expression",
        "call_expression",
        "arguments",
        "identifier",
        "number",
        "comment",
    ] {
        grammar.symbol(kind);
    }
    for kind in ["+", "*", "/", "||", "(", ")", ";"] {
        grammar.anonymous(kind);
    }
    for field in ["left", "operator", "right", "function", "arguments"] {
        grammar.field(field);
    }
    let binary_expression = grammar.symbol("binary_expression");
    grammar.transition(
        StateId(BINARY_EXPRESSION_STATE),
        binary_expression,
        StateId(AFTER_BINARY_EXPRESSION_STATE),
    );
    Arc::new(grammar.build())
}

pub fn python() -> Arc<Grammar> {
    let mut grammar = Grammar::builder("python");
    for kind in [
        "module",
        "if_statement",
        "elif_clause",
        "block",
        "expression_statement",
        "call",
        "argument_list",
        "identifier",
    ] {
        grammar.symbol(kind);
    }
    for kind in ["if", "elif", ":", "(", ")"] {
        grammar.anonymous(kind);
    }
    for field in ["condition", "consequence", "alternative", "function", "arguments"] {
        grammar.field(field);
    }
    Arc::new(grammar.build())
}

pub const SUM_SOURCE: &str = "x10 + 1000";

/// `x10 + 1000`
pub fn sum(input: impl TextInput) -> SyntaxTree {
    let mut f = Fixture::new(javascript(), input);
    f.node("program", |f| {
        f.node("expression_statement", |f| {
            f.state(BINARY_EXPRESSION_STATE).node("binary_expression", |f| {
                f.field("left").leaf("identifier", "x10");
                f.field("operator").punct("+");
                f.field("right").leaf("number", "1000");
            });
        });
    });
    f.finish()
}

/// `(2 ||)`, recovered by inserting the missing right operand.
pub fn missing_operand() -> SyntaxTree {
    let mut f = Fixture::new(javascript(), "(2 ||)");
    f.node("program", |f| {
        f.node("expression_statement", |f| {
            f.node("parenthesized_expression", |f| {
                f.punct("(");
                f.node("binary_expression", |f| {
                    f.field("left").leaf("number", "2");
                    f.field("operator").punct("||");
                    f.field("right").missing("identifier", true);
                });
                f.punct(")");
            });
        });
    });
    f.finish()
}

/// `1 + 2 * * 3`, with the stray operator wrapped in an error node.
pub fn stray_operator() -> SyntaxTree {
    let mut f = Fixture::new(javascript(), "1 + 2 * * 3");
    f.node("program", |f| {
        f.node("expression_statement", |f| {
            f.node("binary_expression", |f| {
                f.field("left").leaf("number", "1");
                f.field("operator").punct("+");
                f.field("right").node("binary_expression", |f| {
                    f.field("left").leaf("number", "2");
                    f.field("operator").punct("*");
                    f.error(|f| {
                        f.punct("*");
                    });
                    f.field("right").leaf("number", "3");
                });
            });
        });
    });
    f.finish()
}

pub const QUOTIENT_SOURCE: &str = "a👍👎1 / b👎c👎";

/// `a👍👎1 / b👎c👎`
pub fn quotient() -> SyntaxTree {
    let mut f = Fixture::new(javascript(), QUOTIENT_SOURCE);
    f.node("program", |f| {
        f.node("expression_statement", |f| {
            f.node("binary_expression", |f| {
                f.field("left").leaf("identifier", "a👍👎1");
                f.field("operator").punct("/");
                f.field("right").leaf("identifier", "b👎c👎");
            });
        });
    });
    f.finish()
}

/// `foo(/* hi */);`
pub fn call_with_comment() -> SyntaxTree {
    let mut f = Fixture::new(javascript(), "foo(/* hi */);");
    f.node("program", |f| {
        f.node("expression_statement", |f| {
            f.node("call_expression", |f| {
                f.field("function").leaf("identifier", "foo");
                f.field("arguments").node("arguments", |f| {
                    f.punct("(");
                    f.extra().leaf("comment", "/* hi */");
                    f.punct(")");
                });
            });
            f.punct(";");
        });
    });
    f.finish()
}

pub const ELIF_SOURCE: &str = "\
if one:
    a()
elif two:
    b()
elif three:
    c()
elif four:
    d()
";

fn python_call(f: &mut Fixture, function: &str) {
    f.node("block", |f| {
        f.node("expression_statement", |f| {
            f.node("call", |f| {
                f.field("function").leaf("identifier", function);
                f.field("arguments").node("argument_list", |f| {
                    f.punct("(");
                    f.punct(")");
                });
            });
        });
    });
}

/// An `if` statement followed by three `elif` clauses.
pub fn elif_chain() -> SyntaxTree {
    let mut f = Fixture::new(python(), ELIF_SOURCE);
    f.node("module", |f| {
        f.node("if_statement", |f| {
            f.punct("if");
            f.field("condition").leaf("identifier", "one");
            f.punct(":");
            f.field("consequence");
            python_call(f, "a");
            for (condition, function) in [("two", "b"), ("three", "c"), ("four", "d")] {
                f.field("alternative").node("elif_clause", |f| {
                    f.punct("elif");
                    f.field("condition").leaf("identifier", condition);
                    f.punct(":");
                    f.field("consequence");
                    python_call(f, function);
                });
            }
        });
    });
    f.finish()
}

/// Every fixture tree, for checks that must hold on any tree.
pub fn all() -> Vec<SyntaxTree> {
    vec![
        sum(SUM_SOURCE),
        missing_operand(),
        stray_operator(),
        quotient(),
        call_with_comment(),
        elif_chain(),
    ]
}
