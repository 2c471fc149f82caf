#![forbid(unsafe_code)]

//! Parser and generator for Mermaid-style diagram text.
//!
//! Six dialects are understood: flowchart, sequence, class, entity-relationship, state and
//! gantt. A document may hold several diagrams; [`parse`] splits it on header lines, tokenizes
//! each segment with its dialect's lexer and builds a typed [`Program`]. [`generate`] writes a
//! program back out in canonical form, so that `parse(generate(parse(text)))` equals
//! `parse(text)`.

pub mod ast;
mod codegen;
pub mod config;
pub mod content;
mod cursor;
pub mod detect;
pub mod diagram;
pub mod diagrams;
pub mod entities;
pub mod error;
pub mod lexer;
pub mod reserved;

pub use ast::{Diagram, Program};
pub use config::Config;
pub use content::Content;
pub use detect::{Dialect, Segment, split_segments};
pub use diagram::{DialectRegistry, GenerateOptions, ParseContext};
pub use error::{Error, ErrorKind, Result};
pub use lexer::{Position, Token, TokenKind, tokenize};

#[derive(Debug, Clone)]
pub struct Engine {
    registry: DialectRegistry,
    config: Config,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            registry: DialectRegistry::builtin(),
            config: Config::default(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `overrides` onto the default configuration.
    pub fn with_config(mut self, overrides: Config) -> Self {
        self.config.deep_merge(overrides.as_value());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DialectRegistry {
        &mut self.registry
    }

    /// Parses every diagram of a document. The first failing diagram aborts the whole parse.
    pub fn parse(&self, text: &str) -> Result<Program> {
        let segments = split_segments(text)?;
        let ctx = ParseContext {
            source: text,
            config: &self.config,
        };

        let mut diagrams = Vec::with_capacity(segments.len());
        for segment in segments {
            tracing::debug!(
                dialect = %segment.dialect,
                line = segment.origin.line,
                bytes = segment.text.len(),
                "parsing diagram segment"
            );
            let Some(entry) = self.registry.get(segment.dialect) else {
                return Err(Error::UnknownDiagramType {
                    position: segment.origin,
                });
            };
            let tokens = lexer::tokenize_at(segment.text, segment.origin, segment.dialect);
            let diagram = (entry.parse)(&tokens, &ctx)?;
            diagrams.push(diagram);
        }
        Ok(Program { diagrams })
    }

    /// Parses a document that must contain exactly one diagram of any dialect and returns it.
    pub fn parse_diagram(&self, text: &str) -> Result<Diagram> {
        let mut program = self.parse(text)?;
        if program.diagrams.len() > 1 {
            let second = split_segments(text)?
                .get(1)
                .map(|s| s.origin)
                .unwrap_or(Position::START);
            return Err(Error::unexpected("end of input", "another diagram header", second));
        }
        program.diagrams.pop().ok_or(Error::UnknownDiagramType {
            position: Position::START,
        })
    }

    /// Canonical text for a program: diagrams separated by one blank line, ending in a newline.
    pub fn generate(&self, program: &Program) -> String {
        self.generate_all(&program.diagrams)
    }

    pub fn generate_diagram(&self, diagram: &Diagram) -> String {
        self.generate_all(std::slice::from_ref(diagram))
    }

    fn generate_all(&self, diagrams: &[Diagram]) -> String {
        let options = GenerateOptions::from_config(&self.config);
        let mut parts = Vec::with_capacity(diagrams.len());
        for diagram in diagrams {
            let Some(entry) = self.registry.get(diagram.dialect()) else {
                tracing::warn!(dialect = %diagram.dialect(), "no generator registered");
                continue;
            };
            tracing::debug!(dialect = %diagram.dialect(), "generating diagram");
            parts.push((entry.generate)(diagram, &options));
        }
        let mut out = parts.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// [`Engine::parse`] with the default configuration.
pub fn parse(text: &str) -> Result<Program> {
    Engine::new().parse(text)
}

/// [`Engine::generate`] with the default configuration.
pub fn generate(program: &Program) -> String {
    Engine::new().generate(program)
}

#[cfg(test)]
mod tests;
