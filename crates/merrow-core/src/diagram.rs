use crate::ast::Diagram;
use crate::lexer::Token;
use crate::{Config, Dialect, Result};
use rustc_hash::FxHashMap;

/// What a dialect parser gets besides its tokens.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// The whole document; token offsets index into it.
    pub source: &'a str,
    pub config: &'a Config,
}

/// Options every dialect generator receives.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub indent: usize,
    pub flowchart_keyword: String,
}

impl GenerateOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            indent: config.indent(),
            flowchart_keyword: config.flowchart_keyword().to_string(),
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub type DialectParser = fn(tokens: &[Token<'_>], ctx: &ParseContext<'_>) -> Result<Diagram>;
pub type DialectGenerator = fn(diagram: &Diagram, options: &GenerateOptions) -> String;

#[derive(Debug, Clone, Copy)]
pub struct DialectEntry {
    pub parse: DialectParser,
    pub generate: DialectGenerator,
}

#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    entries: FxHashMap<Dialect, DialectEntry>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dialect: Dialect, parse: DialectParser, generate: DialectGenerator) {
        self.entries.insert(dialect, DialectEntry { parse, generate });
    }

    pub fn get(&self, dialect: Dialect) -> Option<DialectEntry> {
        self.entries.get(&dialect).copied()
    }

    pub fn builtin() -> Self {
        use crate::diagrams::{class, er, flowchart, gantt, sequence, state};

        let mut reg = Self::new();
        reg.insert(Dialect::Flowchart, flowchart::parse_diagram, flowchart::generate_diagram);
        reg.insert(Dialect::Sequence, sequence::parse_diagram, sequence::generate_diagram);
        reg.insert(Dialect::Class, class::parse_diagram, class::generate_diagram);
        reg.insert(Dialect::Er, er::parse_diagram, er::generate_diagram);
        reg.insert(Dialect::State, state::parse_diagram, state::generate_diagram);
        reg.insert(Dialect::Gantt, gantt::parse_diagram, gantt::generate_diagram);
        reg
    }
}
