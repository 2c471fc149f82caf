use crate::Dialect;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::OnceLock;

const FLOWCHART: &[&str] = &[
    "end",
    "subgraph",
    "graph",
    "flowchart",
    "direction",
    "style",
    "classDef",
    "class",
    "click",
    "linkStyle",
];

const SEQUENCE: &[&str] = &[
    "end",
    "participant",
    "actor",
    "loop",
    "alt",
    "else",
    "opt",
    "par",
    "and",
    "critical",
    "option",
    "break",
    "rect",
    "note",
    "activate",
    "deactivate",
    "autonumber",
    "title",
    "sequenceDiagram",
];

const CLASS: &[&str] = &[
    "class",
    "classDiagram",
    "classDiagram-v2",
    "namespace",
    "note",
    "style",
    "classDef",
    "cssClass",
    "click",
    "link",
    "callback",
];

const ER: &[&str] = &["erDiagram", "style", "classDef"];

const STATE: &[&str] = &[
    "state",
    "note",
    "end",
    "as",
    "direction",
    "stateDiagram",
    "stateDiagram-v2",
    "classDef",
    "class",
    "style",
];

const GANTT: &[&str] = &[
    "gantt",
    "title",
    "section",
    "dateFormat",
    "axisFormat",
    "tickInterval",
    "excludes",
    "includes",
    "todayMarker",
    "after",
    "done",
    "active",
    "crit",
    "milestone",
];

fn table() -> &'static FxHashMap<Dialect, FxHashSet<&'static str>> {
    static TABLE: OnceLock<FxHashMap<Dialect, FxHashSet<&'static str>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            (Dialect::Flowchart, FLOWCHART),
            (Dialect::Sequence, SEQUENCE),
            (Dialect::Class, CLASS),
            (Dialect::Er, ER),
            (Dialect::State, STATE),
            (Dialect::Gantt, GANTT),
        ]
        .into_iter()
        .map(|(dialect, words)| (dialect, words.iter().copied().collect()))
        .collect()
    })
}

/// Words that cannot name a node, actor, class, entity, state or task in `dialect`.
///
/// Sequence and gantt keywords are matched case-insensitively, like their lexers do.
pub fn is_reserved(dialect: Dialect, word: &str) -> bool {
    let Some(words) = table().get(&dialect) else {
        return false;
    };
    match dialect {
        Dialect::Sequence | Dialect::Gantt => {
            words.iter().any(|w| w.eq_ignore_ascii_case(word))
        }
        _ => words.contains(word),
    }
}
