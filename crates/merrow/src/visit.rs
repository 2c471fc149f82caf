//! Traversal over parsed programs.
//!
//! [`Visitor`] is read-only: every `visit_*` method defaults to the matching `walk_*` function,
//! which recurses into subgraphs, sequence blocks and their branches, and composite states.
//! Implementors override only the methods they care about and call the `walk_*` function
//! themselves when they still want the children visited.
//!
//! [`Transform`] takes trees by value and returns rewritten ones. Its defaults rebuild the tree
//! unchanged, routing every identifier through [`Transform::fold_id`] and every label through
//! [`Transform::fold_content`].

use crate::Dialect;
use crate::ast::*;
use rustc_hash::FxHashMap;

/// Read-only traversal of a [`Program`].
pub trait Visitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_diagram(&mut self, diagram: &Diagram) {
        walk_diagram(self, diagram);
    }

    /// Called for every identifier, whether it declares something or refers to it. State
    /// pseudostates are not identifiers and are never passed here.
    fn visit_ident(&mut self, _dialect: Dialect, _ident: &str) {}

    /// Called for every node label, edge label, subgraph title, message and note text.
    fn visit_content(&mut self, _content: &Content) {}

    fn visit_flowchart(&mut self, chart: &Flowchart) {
        walk_flow_statements(self, &chart.statements);
    }

    fn visit_flow_node(&mut self, node: &FlowNode) {
        walk_flow_node(self, node);
    }

    fn visit_flow_edge(&mut self, edge: &FlowEdge) {
        walk_flow_edge(self, edge);
    }

    fn visit_subgraph(&mut self, subgraph: &Subgraph) {
        walk_subgraph(self, subgraph);
    }

    fn visit_sequence(&mut self, diagram: &SequenceDiagram) {
        walk_sequence_statements(self, &diagram.statements);
    }

    fn visit_sequence_statement(&mut self, statement: &SequenceStatement) {
        walk_sequence_statement(self, statement);
    }

    fn visit_message(&mut self, message: &Message) {
        walk_message(self, message);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_class_diagram(&mut self, diagram: &ClassDiagram) {
        walk_class_diagram(self, diagram);
    }

    fn visit_class(&mut self, class: &ClassDef) {
        self.visit_ident(Dialect::Class, &class.name);
    }

    fn visit_class_relation(&mut self, relation: &ClassRelation) {
        self.visit_ident(Dialect::Class, &relation.from);
        self.visit_ident(Dialect::Class, &relation.to);
    }

    fn visit_er(&mut self, diagram: &ErDiagram) {
        walk_er(self, diagram);
    }

    fn visit_entity(&mut self, entity: &Entity) {
        self.visit_ident(Dialect::Er, &entity.name);
    }

    fn visit_relationship(&mut self, relationship: &Relationship) {
        self.visit_ident(Dialect::Er, &relationship.from);
        self.visit_ident(Dialect::Er, &relationship.to);
    }

    fn visit_state_diagram(&mut self, diagram: &StateDiagram) {
        self.visit_state_scope(&diagram.body);
    }

    fn visit_state_scope(&mut self, scope: &StateScope) {
        walk_state_scope(self, scope);
    }

    fn visit_state(&mut self, state: &StateDef) {
        walk_state(self, state);
    }

    /// An entry, named transition or exit. See [`StateScope::edges`].
    fn visit_state_edge(&mut self, from: StateRef<'_>, to: StateRef<'_>, _label: Option<&str>) {
        for end in [from, to] {
            if let StateRef::State(id) = end {
                self.visit_ident(Dialect::State, id);
            }
        }
    }

    fn visit_gantt(&mut self, diagram: &GanttDiagram) {
        walk_gantt(self, diagram);
    }

    fn visit_section(&mut self, section: &Section) {
        for task in &section.tasks {
            self.visit_task(task);
        }
    }

    fn visit_task(&mut self, task: &Task) {
        walk_task(self, task);
    }
}

pub fn walk_program<V: Visitor + ?Sized>(v: &mut V, program: &Program) {
    for diagram in &program.diagrams {
        v.visit_diagram(diagram);
    }
}

pub fn walk_diagram<V: Visitor + ?Sized>(v: &mut V, diagram: &Diagram) {
    match diagram {
        Diagram::Flowchart(chart) => v.visit_flowchart(chart),
        Diagram::Sequence(seq) => v.visit_sequence(seq),
        Diagram::Class(class) => v.visit_class_diagram(class),
        Diagram::Er(er) => v.visit_er(er),
        Diagram::State(state) => v.visit_state_diagram(state),
        Diagram::Gantt(gantt) => v.visit_gantt(gantt),
    }
}

pub fn walk_flow_statements<V: Visitor + ?Sized>(v: &mut V, statements: &[FlowStatement]) {
    for stmt in statements {
        match stmt {
            FlowStatement::Node(node) => v.visit_flow_node(node),
            FlowStatement::Edge(edge) => v.visit_flow_edge(edge),
            FlowStatement::Subgraph(sg) => v.visit_subgraph(sg),
        }
    }
}

pub fn walk_flow_node<V: Visitor + ?Sized>(v: &mut V, node: &FlowNode) {
    v.visit_ident(Dialect::Flowchart, &node.id);
    if let Some(label) = &node.label {
        v.visit_content(label);
    }
}

pub fn walk_flow_edge<V: Visitor + ?Sized>(v: &mut V, edge: &FlowEdge) {
    v.visit_ident(Dialect::Flowchart, &edge.from);
    v.visit_ident(Dialect::Flowchart, &edge.to);
    if let Some(label) = &edge.label {
        v.visit_content(label);
    }
}

pub fn walk_subgraph<V: Visitor + ?Sized>(v: &mut V, subgraph: &Subgraph) {
    v.visit_ident(Dialect::Flowchart, &subgraph.id);
    if let Some(title) = &subgraph.title {
        v.visit_content(title);
    }
    walk_flow_statements(v, &subgraph.statements);
}

pub fn walk_sequence_statements<V: Visitor + ?Sized>(v: &mut V, statements: &[SequenceStatement]) {
    for stmt in statements {
        v.visit_sequence_statement(stmt);
    }
}

pub fn walk_sequence_statement<V: Visitor + ?Sized>(v: &mut V, statement: &SequenceStatement) {
    match statement {
        SequenceStatement::Participant(p) => v.visit_ident(Dialect::Sequence, &p.id),
        SequenceStatement::Message(m) => v.visit_message(m),
        SequenceStatement::Note(note) => {
            for actor in &note.actors {
                v.visit_ident(Dialect::Sequence, actor);
            }
            v.visit_content(&note.text);
        }
        SequenceStatement::Block(block) => v.visit_block(block),
        SequenceStatement::Activate { actor } | SequenceStatement::Deactivate { actor } => {
            v.visit_ident(Dialect::Sequence, actor)
        }
        SequenceStatement::Autonumber { .. } => {}
    }
}

pub fn walk_message<V: Visitor + ?Sized>(v: &mut V, message: &Message) {
    v.visit_ident(Dialect::Sequence, &message.from);
    v.visit_ident(Dialect::Sequence, &message.to);
    v.visit_content(&message.text);
}

pub fn walk_block<V: Visitor + ?Sized>(v: &mut V, block: &Block) {
    walk_sequence_statements(v, &block.statements);
    for branch in &block.branches {
        walk_sequence_statements(v, &branch.statements);
    }
}

pub fn walk_class_diagram<V: Visitor + ?Sized>(v: &mut V, diagram: &ClassDiagram) {
    for class in &diagram.classes {
        v.visit_class(class);
    }
    for relation in &diagram.relations {
        v.visit_class_relation(relation);
    }
}

pub fn walk_er<V: Visitor + ?Sized>(v: &mut V, diagram: &ErDiagram) {
    for entity in &diagram.entities {
        v.visit_entity(entity);
    }
    for relationship in &diagram.relationships {
        v.visit_relationship(relationship);
    }
}

pub fn walk_state_scope<V: Visitor + ?Sized>(v: &mut V, scope: &StateScope) {
    for state in &scope.states {
        v.visit_state(state);
    }
    for (from, to, label) in scope.edges() {
        v.visit_state_edge(from, to, label);
    }
    for note in &scope.notes {
        v.visit_ident(Dialect::State, &note.target);
    }
}

pub fn walk_state<V: Visitor + ?Sized>(v: &mut V, state: &StateDef) {
    v.visit_ident(Dialect::State, &state.id);
    if let Some(inner) = &state.composite {
        v.visit_state_scope(inner);
    }
}

pub fn walk_gantt<V: Visitor + ?Sized>(v: &mut V, diagram: &GanttDiagram) {
    for section in &diagram.sections {
        v.visit_section(section);
    }
}

pub fn walk_task<V: Visitor + ?Sized>(v: &mut V, task: &Task) {
    if let Some(id) = &task.id {
        v.visit_ident(Dialect::Gantt, id);
    }
    if let TaskStart::After(ids) = &task.start {
        for id in ids {
            v.visit_ident(Dialect::Gantt, id);
        }
    }
}

/// Owned rewriting of a [`Program`].
pub trait Transform {
    fn fold_program(&mut self, program: Program) -> Program {
        fold_program(self, program)
    }

    fn fold_diagram(&mut self, diagram: Diagram) -> Diagram {
        fold_diagram(self, diagram)
    }

    /// Every identifier, declaration or reference. Pseudostates are never passed here.
    fn fold_id(&mut self, _dialect: Dialect, id: String) -> String {
        id
    }

    fn fold_content(&mut self, content: Content) -> Content {
        content
    }

    fn fold_flowchart(&mut self, chart: Flowchart) -> Flowchart {
        Flowchart {
            direction: chart.direction,
            statements: fold_flow_statements(self, chart.statements),
        }
    }

    fn fold_flow_statement(&mut self, statement: FlowStatement) -> FlowStatement {
        fold_flow_statement(self, statement)
    }

    fn fold_sequence(&mut self, diagram: SequenceDiagram) -> SequenceDiagram {
        SequenceDiagram {
            title: diagram.title,
            statements: fold_sequence_statements(self, diagram.statements),
        }
    }

    fn fold_sequence_statement(&mut self, statement: SequenceStatement) -> SequenceStatement {
        fold_sequence_statement(self, statement)
    }

    fn fold_class_diagram(&mut self, diagram: ClassDiagram) -> ClassDiagram {
        fold_class_diagram(self, diagram)
    }

    fn fold_er(&mut self, diagram: ErDiagram) -> ErDiagram {
        fold_er(self, diagram)
    }

    fn fold_state_diagram(&mut self, diagram: StateDiagram) -> StateDiagram {
        StateDiagram {
            version: diagram.version,
            body: self.fold_state_scope(diagram.body),
        }
    }

    fn fold_state_scope(&mut self, scope: StateScope) -> StateScope {
        fold_state_scope(self, scope)
    }

    fn fold_gantt(&mut self, diagram: GanttDiagram) -> GanttDiagram {
        let sections = diagram
            .sections
            .into_iter()
            .map(|section| Section {
                name: section.name,
                tasks: section
                    .tasks
                    .into_iter()
                    .map(|task| self.fold_task(task))
                    .collect(),
            })
            .collect();
        GanttDiagram { sections, ..diagram }
    }

    fn fold_task(&mut self, task: Task) -> Task {
        fold_task(self, task)
    }
}

pub fn fold_program<T: Transform + ?Sized>(t: &mut T, program: Program) -> Program {
    Program {
        diagrams: program
            .diagrams
            .into_iter()
            .map(|d| t.fold_diagram(d))
            .collect(),
    }
}

pub fn fold_diagram<T: Transform + ?Sized>(t: &mut T, diagram: Diagram) -> Diagram {
    match diagram {
        Diagram::Flowchart(chart) => Diagram::Flowchart(t.fold_flowchart(chart)),
        Diagram::Sequence(seq) => Diagram::Sequence(t.fold_sequence(seq)),
        Diagram::Class(class) => Diagram::Class(t.fold_class_diagram(class)),
        Diagram::Er(er) => Diagram::Er(t.fold_er(er)),
        Diagram::State(state) => Diagram::State(t.fold_state_diagram(state)),
        Diagram::Gantt(gantt) => Diagram::Gantt(t.fold_gantt(gantt)),
    }
}

fn fold_label<T: Transform + ?Sized>(t: &mut T, label: Option<Content>) -> Option<Content> {
    label.map(|c| t.fold_content(c))
}

pub fn fold_flow_statements<T: Transform + ?Sized>(
    t: &mut T,
    statements: Vec<FlowStatement>,
) -> Vec<FlowStatement> {
    statements
        .into_iter()
        .map(|s| t.fold_flow_statement(s))
        .collect()
}

pub fn fold_flow_statement<T: Transform + ?Sized>(
    t: &mut T,
    statement: FlowStatement,
) -> FlowStatement {
    const D: Dialect = Dialect::Flowchart;
    match statement {
        FlowStatement::Node(node) => FlowStatement::Node(FlowNode {
            id: t.fold_id(D, node.id),
            shape: node.shape,
            label: fold_label(t, node.label),
        }),
        FlowStatement::Edge(edge) => FlowStatement::Edge(FlowEdge {
            from: t.fold_id(D, edge.from),
            to: t.fold_id(D, edge.to),
            style: edge.style,
            label: fold_label(t, edge.label),
        }),
        FlowStatement::Subgraph(sg) => FlowStatement::Subgraph(Subgraph {
            id: t.fold_id(D, sg.id),
            title: fold_label(t, sg.title),
            direction: sg.direction,
            statements: fold_flow_statements(t, sg.statements),
        }),
    }
}

pub fn fold_sequence_statements<T: Transform + ?Sized>(
    t: &mut T,
    statements: Vec<SequenceStatement>,
) -> Vec<SequenceStatement> {
    statements
        .into_iter()
        .map(|s| t.fold_sequence_statement(s))
        .collect()
}

pub fn fold_sequence_statement<T: Transform + ?Sized>(
    t: &mut T,
    statement: SequenceStatement,
) -> SequenceStatement {
    const D: Dialect = Dialect::Sequence;
    match statement {
        SequenceStatement::Participant(p) => SequenceStatement::Participant(Participant {
            id: t.fold_id(D, p.id),
            ..p
        }),
        SequenceStatement::Message(m) => SequenceStatement::Message(Message {
            from: t.fold_id(D, m.from),
            to: t.fold_id(D, m.to),
            text: t.fold_content(m.text),
            ..m
        }),
        SequenceStatement::Note(n) => SequenceStatement::Note(Note {
            placement: n.placement,
            actors: n.actors.into_iter().map(|a| t.fold_id(D, a)).collect(),
            text: t.fold_content(n.text),
        }),
        SequenceStatement::Block(b) => SequenceStatement::Block(Block {
            kind: b.kind,
            label: b.label,
            statements: fold_sequence_statements(t, b.statements),
            branches: b
                .branches
                .into_iter()
                .map(|branch| Branch {
                    label: branch.label,
                    statements: fold_sequence_statements(t, branch.statements),
                })
                .collect(),
        }),
        SequenceStatement::Activate { actor } => SequenceStatement::Activate {
            actor: t.fold_id(D, actor),
        },
        SequenceStatement::Deactivate { actor } => SequenceStatement::Deactivate {
            actor: t.fold_id(D, actor),
        },
        autonumber @ SequenceStatement::Autonumber { .. } => autonumber,
    }
}

pub fn fold_class_diagram<T: Transform + ?Sized>(t: &mut T, diagram: ClassDiagram) -> ClassDiagram {
    const D: Dialect = Dialect::Class;
    ClassDiagram {
        v2: diagram.v2,
        classes: diagram
            .classes
            .into_iter()
            .map(|c| ClassDef {
                name: t.fold_id(D, c.name),
                ..c
            })
            .collect(),
        relations: diagram
            .relations
            .into_iter()
            .map(|r| ClassRelation {
                from: t.fold_id(D, r.from),
                to: t.fold_id(D, r.to),
                ..r
            })
            .collect(),
    }
}

pub fn fold_er<T: Transform + ?Sized>(t: &mut T, diagram: ErDiagram) -> ErDiagram {
    const D: Dialect = Dialect::Er;
    ErDiagram {
        entities: diagram
            .entities
            .into_iter()
            .map(|e| Entity {
                name: t.fold_id(D, e.name),
                ..e
            })
            .collect(),
        relationships: diagram
            .relationships
            .into_iter()
            .map(|r| Relationship {
                from: t.fold_id(D, r.from),
                to: t.fold_id(D, r.to),
                ..r
            })
            .collect(),
    }
}

pub fn fold_state_scope<T: Transform + ?Sized>(t: &mut T, scope: StateScope) -> StateScope {
    const D: Dialect = Dialect::State;
    let pseudo = |t: &mut T, edges: Vec<PseudoTransition>| -> Vec<PseudoTransition> {
        edges
            .into_iter()
            .map(|e| PseudoTransition {
                state: t.fold_id(D, e.state),
                label: e.label,
            })
            .collect()
    };
    let states = scope
        .states
        .into_iter()
        .map(|s| StateDef {
            id: t.fold_id(D, s.id),
            label: s.label,
            composite: s.composite.map(|inner| t.fold_state_scope(inner)),
            pseudo: s.pseudo,
        })
        .collect();
    let transitions = scope
        .transitions
        .into_iter()
        .map(|tr| Transition {
            from: t.fold_id(D, tr.from),
            to: t.fold_id(D, tr.to),
            label: tr.label,
        })
        .collect();
    let entries = pseudo(&mut *t, scope.entries);
    let exits = pseudo(&mut *t, scope.exits);
    let notes = scope
        .notes
        .into_iter()
        .map(|n| StateNote {
            target: t.fold_id(D, n.target),
            ..n
        })
        .collect();
    StateScope {
        direction: scope.direction,
        states,
        transitions,
        entries,
        exits,
        notes,
    }
}

pub fn fold_task<T: Transform + ?Sized>(t: &mut T, task: Task) -> Task {
    const D: Dialect = Dialect::Gantt;
    let start = match task.start {
        TaskStart::After(ids) => {
            TaskStart::After(ids.into_iter().map(|id| t.fold_id(D, id)).collect())
        }
        other => other,
    };
    Task {
        id: task.id.map(|id| t.fold_id(D, id)),
        start,
        ..task
    }
}

/// Renames identifiers, optionally in one dialect only.
///
/// ```
/// use merrow::{RenameIds, Transform};
///
/// let program = merrow::parse("flowchart LR\n    A --> B\n").unwrap();
/// let renamed = RenameIds::new().rename("A", "Start").fold_program(program);
/// assert_eq!(merrow::generate(&renamed), "flowchart LR\n    Start --> B\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenameIds {
    dialect: Option<Dialect>,
    renames: FxHashMap<String, String>,
}

impl RenameIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    pub fn in_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }
}

impl Transform for RenameIds {
    fn fold_id(&mut self, dialect: Dialect, id: String) -> String {
        if self.dialect.is_some_and(|d| d != dialect) {
            return id;
        }
        match self.renames.get(&id) {
            Some(to) => to.clone(),
            None => id,
        }
    }
}
