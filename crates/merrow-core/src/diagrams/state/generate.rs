use super::{PseudoTransition, StateDef, StateDiagram, StateNote, StateScope};
use crate::codegen::Writer;
use crate::diagram::GenerateOptions;

pub fn generate_state(diagram: &StateDiagram, options: &GenerateOptions) -> String {
    let mut w = Writer::new(options.indent);
    w.line(diagram.version.header());
    w.indented(|w| write_scope(w, &diagram.body));
    let out = w.finish();
    tracing::trace!(bytes = out.len(), "generated state diagram");
    out
}

/// Declarations come before any composite body, so a state referenced from inside a body is
/// already known in the scope it belongs to.
fn write_scope(w: &mut Writer, scope: &StateScope) {
    if let Some(direction) = scope.direction {
        w.line(format!("direction {direction}"));
    }
    for state in &scope.states {
        write_declaration(w, state);
    }
    for state in &scope.states {
        if let Some(inner) = &state.composite {
            w.line(format!("state {} {{", state.id));
            w.indented(|w| write_scope(w, inner));
            w.line("}");
        }
    }
    for entry in &scope.entries {
        w.line(format!("[*] --> {}{}", entry.state, label_suffix(entry)));
    }
    for t in &scope.transitions {
        let label = t.label.as_deref().map(|l| format!(" : {l}")).unwrap_or_default();
        w.line(format!("{} --> {}{label}", t.from, t.to));
    }
    for exit in &scope.exits {
        w.line(format!("{} --> [*]{}", exit.state, label_suffix(exit)));
    }
    for note in &scope.notes {
        write_note(w, note);
    }
}

fn label_suffix(p: &PseudoTransition) -> String {
    p.label.as_deref().map(|l| format!(" : {l}")).unwrap_or_default()
}

fn write_declaration(w: &mut Writer, state: &StateDef) {
    match state.pseudo {
        Some(kind) => w.line(format!("state {} <<{}>>", state.id, kind.as_str())),
        None => w.line(format!("state {}", state.id)),
    }
    if let Some(label) = &state.label {
        w.line(format!("{} : {label}", state.id));
    }
}

fn write_note(w: &mut Writer, note: &StateNote) {
    let head = format!("note {} of {}", note.position.keyword(), note.target);
    if !note.text.contains('\n') {
        w.line(format!("{head} : {}", note.text));
        return;
    }
    w.line(head);
    w.indented(|w| {
        for line in note.text.lines() {
            w.line(line);
        }
    });
    w.line("end note");
}
