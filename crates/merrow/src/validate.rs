//! Whole-program checks that the parsers cannot make on their own, for trees that were built or
//! rewritten in memory.
//!
//! - every identifier is non-empty, free of whitespace and delimiters, and not reserved in its
//!   dialect
//! - every gantt `after` reference names a task of the same chart
//! - the gantt `after` graph has no cycles

use crate::Dialect;
use crate::ast::*;
use crate::reserved::is_reserved;
use crate::visit::{Visitor, walk_task};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{ident}` is a reserved word in {dialect} diagrams")]
    ReservedIdentifier { dialect: Dialect, ident: String },

    #[error("`{ident}` contains characters a {dialect} identifier cannot hold")]
    InvalidCharacters { dialect: Dialect, ident: String },

    #[error("empty identifier in a {dialect} diagram")]
    EmptyIdentifier { dialect: Dialect },

    #[error("task dependency cycle: {}", .path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    #[error("task `{from}` starts after unknown task `{to}`")]
    UnknownReference { from: String, to: String },
}

const DELIMITERS: &[char] = &[
    '[', ']', '(', ')', '{', '}', '<', '>', '|', ':', ';', ',', '"', '`', '%', '&',
];

/// Checks every diagram of `program` and returns all problems found, in document order.
pub fn validate(program: &Program) -> Result<(), Vec<ValidationError>> {
    let mut checker = Checker::default();
    checker.visit_program(program);
    if checker.errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(errors = checker.errors.len(), "program failed validation");
        Err(checker.errors)
    }
}

#[derive(Default)]
struct Checker {
    errors: Vec<ValidationError>,
    reported: FxHashSet<(Dialect, String)>,
}

impl Checker {
    fn check_ident(&mut self, dialect: Dialect, ident: &str) -> Option<ValidationError> {
        if ident.is_empty() {
            return Some(ValidationError::EmptyIdentifier { dialect });
        }
        if ident
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || DELIMITERS.contains(&c))
        {
            return Some(ValidationError::InvalidCharacters {
                dialect,
                ident: ident.to_string(),
            });
        }
        if is_reserved(dialect, ident) {
            return Some(ValidationError::ReservedIdentifier {
                dialect,
                ident: ident.to_string(),
            });
        }
        None
    }
}

impl Visitor for Checker {
    fn visit_ident(&mut self, dialect: Dialect, ident: &str) {
        // One report per identifier, however often it is referenced.
        if !self.reported.insert((dialect, ident.to_string())) {
            return;
        }
        if let Some(error) = self.check_ident(dialect, ident) {
            self.errors.push(error);
        }
    }

    fn visit_gantt(&mut self, diagram: &GanttDiagram) {
        for task in diagram.tasks() {
            walk_task(self, task);
        }
        self.errors.extend(check_dependencies(diagram));
    }
}

/// Unknown `after` references and dependency cycles of one chart.
fn check_dependencies(diagram: &GanttDiagram) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let known: FxHashSet<&str> = diagram.tasks().filter_map(|t| t.id.as_deref()).collect();

    let mut order: Vec<&str> = Vec::new();
    let mut graph: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for task in diagram.tasks() {
        let TaskStart::After(deps) = &task.start else {
            continue;
        };
        let from = task.id.as_deref().unwrap_or(task.name.as_str());
        for dep in deps {
            if !known.contains(dep.as_str()) {
                errors.push(ValidationError::UnknownReference {
                    from: from.to_string(),
                    to: dep.clone(),
                });
            }
        }
        if let Some(id) = task.id.as_deref() {
            order.push(id);
            graph
                .entry(id)
                .or_default()
                .extend(deps.iter().map(String::as_str));
        }
    }

    errors.extend(
        find_cycles(&order, &graph)
            .into_iter()
            .map(|path| ValidationError::DependencyCycle { path }),
    );
    errors
}

/// Iterative depth-first search over `graph`, starting from each node of `order` in turn.
///
/// `on_path` holds the nodes of the current search path; meeting one of them again closes a
/// cycle. `done` holds nodes whose dependencies are fully explored and are never entered again,
/// so each cycle is reported once.
fn find_cycles(order: &[&str], graph: &FxHashMap<&str, Vec<&str>>) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let mut done: FxHashSet<&str> = FxHashSet::default();

    for &root in order {
        if done.contains(root) {
            continue;
        }
        let mut on_path: FxHashSet<&str> = FxHashSet::default();
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];
        on_path.insert(root);

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let deps = graph.get(node).map(Vec::as_slice).unwrap_or_default();
            let Some(&dep) = deps.get(top.1) else {
                stack.pop();
                on_path.remove(node);
                done.insert(node);
                continue;
            };
            top.1 += 1;

            if on_path.contains(dep) {
                let start = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
                let mut path: Vec<String> =
                    stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                path.push(dep.to_string());
                tracing::debug!(cycle = %path.join(" -> "), "dependency cycle");
                cycles.push(path);
            } else if !done.contains(dep) && graph.contains_key(dep) {
                on_path.insert(dep);
                stack.push((dep, 0));
            }
        }
    }
    cycles
}
