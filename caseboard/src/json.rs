use crate::error::{DocumentError, LoadWarning};
use crate::geometry::limits;
use crate::model::{Color, Edge, EdgeId, FieldRecord, Node, NodeId};
use crate::todo::{TodoItem, TodoList};
use crate::{config::BoardConfig, Board};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Version written by `Board::to_json_value`.
pub const FORMAT_VERSION: u32 = 4;

/// Outcome of a successful load: the document's version and everything that
/// had to be repaired on the way in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub version: u32,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub fn to_json_impl(b: &Board) -> Result<Value, DocumentError> {
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct NodeSer<'a> {
        id: NodeId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        title: &'a str,
        description: &'a str,
        icon: Option<&'a str>,
        image_ref: Option<&'a str>,
        background_color: Color,
        collapsed: bool,
        fields: &'a IndexMap<String, FieldRecord>,
    }
    #[derive(Serialize)]
    struct EdgeSer<'a> {
        id: EdgeId,
        source: NodeId,
        target: NodeId,
        label: &'a str,
        color: Color,
        hidden: bool,
    }
    #[derive(Serialize)]
    struct NextIdsSer {
        node: NodeId,
        edge: EdgeId,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct DocSer<'a> {
        nodes: Vec<NodeSer<'a>>,
        edges: Vec<EdgeSer<'a>>,
        todo_list: &'a [TodoItem],
        next_ids: NextIdsSer,
        scale: f64,
        version: u32,
    }
    let doc = DocSer {
        nodes: b
            .nodes
            .values()
            .map(|n| NodeSer {
                id: n.id,
                x: n.x,
                y: n.y,
                width: n.width,
                height: n.height,
                title: &n.title,
                description: &n.description,
                icon: n.icon.as_deref(),
                image_ref: n.image_ref.as_deref(),
                background_color: n.background_color,
                collapsed: n.collapsed,
                fields: &n.fields,
            })
            .collect(),
        edges: b
            .edges
            .values()
            .map(|e| EdgeSer {
                id: e.id,
                source: e.source,
                target: e.target,
                label: &e.label,
                color: e.color,
                hidden: e.hidden,
            })
            .collect(),
        todo_list: b.todos.items(),
        next_ids: NextIdsSer {
            node: b.next_node_id,
            edge: b.next_edge_id,
        },
        scale: b.scale,
        version: FORMAT_VERSION,
    };
    Ok(serde_json::to_value(doc)?)
}

/// Reads one entry leniently. Bad values fall back to defaults and leave an
/// `InvalidField` warning behind.
struct Reader<'a, 'w> {
    obj: &'a Map<String, Value>,
    kind: &'static str,
    index: usize,
    prefix: Option<&'a str>,
    warnings: &'w mut Vec<LoadWarning>,
}

impl<'a, 'w> Reader<'a, 'w> {
    fn new(obj: &'a Map<String, Value>, kind: &'static str, index: usize, warnings: &'w mut Vec<LoadWarning>) -> Self {
        Reader { obj, kind, index, prefix: None, warnings }
    }

    // First of `keys` present with a non-null value; later keys are legacy spellings.
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|k| self.obj.get(*k).filter(|v| !v.is_null()))
    }

    fn invalid(&mut self, key: &str) {
        let field = match self.prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.to_string(),
        };
        self.warnings.push(LoadWarning::InvalidField {
            kind: self.kind,
            index: self.index,
            field,
        });
    }

    fn string(&mut self, keys: &[&str]) -> String {
        match self.get(keys) {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(_) => {
                self.invalid(keys[0]);
                String::new()
            }
        }
    }

    fn opt_string(&mut self, keys: &[&str]) -> Option<String> {
        match self.get(keys)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                self.invalid(keys[0]);
                None
            }
        }
    }

    fn number(&mut self, keys: &[&str]) -> Option<f64> {
        let v = self.get(keys)?;
        match v.as_f64().filter(|x| x.is_finite()) {
            Some(x) => Some(x),
            None => {
                self.invalid(keys[0]);
                None
            }
        }
    }

    fn flag(&mut self, keys: &[&str], default: bool) -> bool {
        match self.get(keys) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.invalid(keys[0]);
                default
            }
        }
    }

    fn color(&mut self, keys: &[&str], default: Color) -> Color {
        match self.get(keys) {
            None => default,
            Some(Value::String(s)) => Color::from_hex(s).unwrap_or_else(|| {
                self.invalid(keys[0]);
                default
            }),
            Some(_) => {
                self.invalid(keys[0]);
                default
            }
        }
    }

    fn coordinate(&mut self, key: &str) -> f64 {
        match self.number(&[key]) {
            Some(x) if limits::in_coord_bounds(x) => x,
            Some(_) => {
                self.invalid(key);
                0.0
            }
            None => 0.0,
        }
    }

    /// Missing sizes take `default`; invalid ones are reset to it and sizes
    /// under `min` are raised to it.
    fn size(&mut self, key: &str, default: f64, min: f64) -> f64 {
        match self.number(&[key]) {
            None => default,
            Some(s) if !limits::in_size_bounds(s) => {
                self.invalid(key);
                default
            }
            Some(s) if s < min => {
                self.invalid(key);
                min
            }
            Some(s) => s,
        }
    }
}

fn parse_id(v: Option<&Value>) -> Option<u64> {
    match v? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn endpoint(v: Option<&Value>) -> Option<NodeId> {
    parse_id(v).and_then(|x| u32::try_from(x).ok())
}

fn in_id_range(id: u64) -> Option<u32> {
    u32::try_from(id).ok().filter(|id| *id <= limits::MAX_ID)
}

fn fresh_id(next: &mut u32, seen: &mut BTreeSet<u32>) -> u32 {
    while seen.contains(next) {
        *next += 1;
    }
    let id = *next;
    *next += 1;
    seen.insert(id);
    id
}

// Keeps first occurrences of explicit ids up to `MAX_ID`; missing, repeated
// and out-of-range ids get fresh ones above the largest kept id.
fn assign_ids<T>(kind: &'static str, entries: Vec<(usize, Option<u64>, T)>, warnings: &mut Vec<LoadWarning>) -> Vec<(u32, T)> {
    let mut fresh = entries
        .iter()
        .filter_map(|(_, id, _)| id.and_then(in_id_range))
        .max()
        .map_or(1, |m| m + 1);
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(entries.len());
    for (index, id, item) in entries {
        let assigned = match id {
            Some(raw) => match in_id_range(raw) {
                Some(id) if seen.insert(id) => id,
                Some(id) => {
                    let assigned = fresh_id(&mut fresh, &mut seen);
                    warnings.push(LoadWarning::DuplicateId { kind, id, assigned });
                    assigned
                }
                None => {
                    let assigned = fresh_id(&mut fresh, &mut seen);
                    warnings.push(LoadWarning::IdOutOfRange { kind, index, id: raw, assigned });
                    assigned
                }
            },
            None => {
                let assigned = fresh_id(&mut fresh, &mut seen);
                warnings.push(LoadWarning::MissingId { kind, index, assigned });
                assigned
            }
        };
        out.push((assigned, item));
    }
    out
}

fn list<'a>(root: &'a Map<String, Value>, keys: &[&'static str]) -> Result<&'a [Value], DocumentError> {
    match keys.iter().find_map(|k| root.get(*k).filter(|v| !v.is_null())) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DocumentError::NotAList(keys[0])),
    }
}

fn check_cap(kind: &'static str, count: usize, max: usize) -> Result<(), DocumentError> {
    if count > max {
        return Err(DocumentError::TooLarge { kind, count, max });
    }
    Ok(())
}

fn read_fields(r: &mut Reader<'_, '_>) -> Result<IndexMap<String, FieldRecord>, DocumentError> {
    let mut fields = IndexMap::new();
    let obj = match r.get(&["fields"]) {
        None => return Ok(fields),
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            r.invalid("fields");
            return Ok(fields);
        }
    };
    check_cap("fields", obj.len(), limits::MAX_FIELDS_PER_NODE)?;
    for (name, v) in obj {
        let record = match v {
            Value::Null => FieldRecord::new(""),
            Value::String(s) => FieldRecord::new(s.clone()),
            Value::Number(_) | Value::Bool(_) => FieldRecord::new(v.to_string()),
            Value::Object(inner) => {
                let mut fr = Reader {
                    obj: inner,
                    kind: r.kind,
                    index: r.index,
                    prefix: Some(name.as_str()),
                    warnings: &mut *r.warnings,
                };
                FieldRecord {
                    value: fr.string(&["value"]),
                    visible: fr.flag(&["visible"], true),
                    file_link: fr.opt_string(&["fileLink", "file_link"]),
                    image_ref: fr.opt_string(&["imageRef", "image_path", "image_ref"]),
                }
            }
            Value::Array(_) => {
                r.invalid(&format!("fields.{name}"));
                continue;
            }
        };
        fields.insert(name.clone(), record);
    }
    Ok(fields)
}

pub fn from_json_impl(config: BoardConfig, v: Value) -> Result<(Board, LoadReport), DocumentError> {
    let Value::Object(root) = v else {
        return Err(DocumentError::NotAnObject);
    };
    let nodes_v = list(&root, &["nodes"])?;
    let edges_v = list(&root, &["edges"])?;
    let todos_v = list(&root, &["todoList", "todo_list"])?;
    check_cap("nodes", nodes_v.len(), limits::MAX_NODES)?;
    check_cap("edges", edges_v.len(), limits::MAX_EDGES)?;
    check_cap("todos", todos_v.len(), limits::MAX_TODOS)?;

    let mut warnings = Vec::new();
    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX));
    if version > FORMAT_VERSION {
        warnings.push(LoadWarning::NewerVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }
    let scale = root
        .get("scale")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite() && *s > 0.0)
        .map_or(1.0, |s| s.clamp(config.zoom_min, config.zoom_max));

    let mut board = Board::with_config(config);
    board.scale = scale;
    let default_w = board.config.default_width * scale;
    let default_h = board.config.default_height * scale;
    let (min_w, min_h) = board.min_size();
    let background = board.config.node_background;
    let edge_color = board.config.edge_color;

    // Nodes
    let mut parsed = Vec::with_capacity(nodes_v.len());
    for (index, entry) in nodes_v.iter().enumerate() {
        let Value::Object(obj) = entry else {
            warnings.push(LoadWarning::SkippedEntry { kind: "node", index });
            continue;
        };
        let id = parse_id(obj.get("id"));
        let mut r = Reader::new(obj, "node", index, &mut warnings);
        let node = Node {
            id: 0,
            x: r.coordinate("x"),
            y: r.coordinate("y"),
            width: r.size("width", default_w, min_w),
            height: r.size("height", default_h, min_h),
            title: r.string(&["title"]),
            description: r.string(&["description"]),
            icon: r.opt_string(&["icon"]),
            image_ref: r.opt_string(&["imageRef", "image_path", "image_ref"]),
            background_color: r.color(&["backgroundColor", "bg_color"], background),
            collapsed: r.flag(&["collapsed"], false),
            fields: read_fields(&mut r)?,
        };
        parsed.push((index, id, node));
    }
    for (id, mut node) in assign_ids("node", parsed, &mut warnings) {
        node.id = id;
        board.nodes.insert(id, node);
    }

    // Edges
    let mut parsed = Vec::with_capacity(edges_v.len());
    for (index, entry) in edges_v.iter().enumerate() {
        let Value::Object(obj) = entry else {
            warnings.push(LoadWarning::SkippedEntry { kind: "edge", index });
            continue;
        };
        let (Some(source), Some(target)) = (
            endpoint(obj.get("source").or_else(|| obj.get("src"))),
            endpoint(obj.get("target").or_else(|| obj.get("dst"))),
        ) else {
            warnings.push(LoadWarning::SkippedEntry { kind: "edge", index });
            continue;
        };
        if source == target {
            warnings.push(LoadWarning::SelfLoop { index, node: source });
            continue;
        }
        if let Some(missing) = [source, target].into_iter().find(|n| !board.nodes.contains_key(n)) {
            warnings.push(LoadWarning::DanglingReference { index, node: missing });
            continue;
        }
        let id = parse_id(obj.get("id"));
        let mut r = Reader::new(obj, "edge", index, &mut warnings);
        let edge = Edge {
            id: 0,
            source,
            target,
            label: r.string(&["label"]),
            color: r.color(&["color"], edge_color),
            hidden: r.flag(&["hidden"], false),
        };
        parsed.push((index, id, edge));
    }
    for (id, mut edge) in assign_ids("edge", parsed, &mut warnings) {
        edge.id = id;
        board.adjacency.on_edge_added(&edge);
        board.edges.insert(id, edge);
    }

    // Tasks
    let mut items = Vec::with_capacity(todos_v.len());
    for (index, entry) in todos_v.iter().enumerate() {
        match entry {
            Value::String(task) => items.push(TodoItem {
                task: task.clone(),
                done: false,
            }),
            Value::Object(obj) => {
                let mut r = Reader::new(obj, "todo", index, &mut warnings);
                items.push(TodoItem {
                    task: r.string(&["task"]),
                    done: r.flag(&["done"], false),
                });
            }
            _ => warnings.push(LoadWarning::SkippedEntry { kind: "todo", index }),
        }
    }
    board.todos = TodoList::from_items(items);

    // Counters
    let next_ids = root
        .get("nextIds")
        .or_else(|| root.get("next_ids"))
        .and_then(Value::as_object);
    let mut doc_next = |kind: &'static str| -> Option<u32> {
        let found = next_ids.and_then(|m| m.get(kind)).and_then(Value::as_u64)?;
        match u32::try_from(found).ok().filter(|n| *n <= limits::MAX_ID + 1) {
            Some(n) => Some(n),
            None => {
                warnings.push(LoadWarning::CounterOutOfRange { kind, found });
                None
            }
        }
    };
    let (node_next, edge_next) = (doc_next("node"), doc_next("edge"));
    board.next_node_id = next_after(&board.nodes, node_next.unwrap_or(1));
    board.next_edge_id = next_after(&board.edges, edge_next.unwrap_or(1));

    for w in &warnings {
        warn!(warning = %w, "repaired document");
    }
    info!(
        nodes = board.nodes.len(),
        edges = board.edges.len(),
        version,
        warnings = warnings.len(),
        "board loaded"
    );
    Ok((board, LoadReport { version, warnings }))
}

// Loaded ids are at most `MAX_ID`, so one past the largest cannot overflow.
fn next_after<T>(map: &BTreeMap<u32, T>, doc_next: u32) -> u32 {
    let past_max = map.keys().next_back().map_or(1, |m| m + 1);
    doc_next.max(past_max).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(v: Value) -> (Board, LoadReport) {
        from_json_impl(BoardConfig::default(), v).unwrap()
    }

    #[test]
    fn writer_uses_current_keys() {
        let mut b = Board::new();
        b.todos_mut().add("call lab");
        let v = to_json_impl(&b).unwrap();
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["nodes", "edges", "todoList", "nextIds", "scale", "version"]);
        assert_eq!(v["version"], json!(FORMAT_VERSION));
        assert_eq!(v["todoList"], json!([{"task": "call lab", "done": false}]));
    }

    #[test]
    fn legacy_keys_are_read() {
        let (b, report) = load(json!({
            "nodes": [
                {"id": "1", "title": "A", "bg_color": "#abc", "image_path": "a.png",
                 "fields": {"Phone": {"value": "555", "visible": false, "file_link": "x.pdf"}}},
                {"id": 2, "title": "B"}
            ],
            "edges": [{"id": 1, "src": 1, "dst": 2}],
            "todo_list": ["legacy task", {"task": "t", "done": true}],
            "next_ids": {"node": 10, "edge": 5},
            "version": 3
        }));
        assert!(report.is_clean(), "{:?}", report.warnings);
        let a = b.node(1).unwrap();
        assert_eq!(a.background_color, Color::rgb(0xaa, 0xbb, 0xcc));
        assert_eq!(a.image_ref.as_deref(), Some("a.png"));
        assert_eq!(a.fields["Phone"].file_link.as_deref(), Some("x.pdf"));
        assert!(!a.fields["Phone"].visible);
        assert_eq!(b.edge(1).map(|e| (e.source, e.target)), Some((1, 2)));
        assert_eq!(b.todos().items()[0], TodoItem { task: "legacy task".into(), done: false });
        assert_eq!(b.next_ids(), (10, 5));
    }

    #[test]
    fn bad_values_fall_back_with_warnings() {
        let (b, report) = load(json!({
            "nodes": [{"id": 1, "x": "left", "width": 10, "backgroundColor": "teal", "collapsed": "yes"}]
        }));
        let n = b.node(1).unwrap();
        assert_eq!((n.x, n.width), (0.0, 180.0));
        assert_eq!(n.height, 130.0);
        assert_eq!(n.background_color, Color::NODE_BACKGROUND);
        assert!(!n.collapsed);
        let fields: Vec<_> = report
            .warnings
            .iter()
            .filter_map(|w| match w {
                LoadWarning::InvalidField { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fields, ["x", "width", "backgroundColor", "collapsed"]);
    }

    #[test]
    fn missing_and_duplicate_ids_get_fresh_ones() {
        let (b, report) = load(json!({
            "nodes": [{"id": 4}, {"title": "no id"}, {"id": 4, "title": "dup"}],
            "nextIds": {"node": 2}
        }));
        assert_eq!(b.node_count(), 3);
        assert_eq!(b.node(5).map(|n| n.title.as_str()), Some("no id"));
        assert_eq!(b.node(6).map(|n| n.title.as_str()), Some("dup"));
        assert_eq!(b.next_ids().0, 7);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn structural_errors_are_fatal() {
        let cfg = BoardConfig::default;
        assert!(matches!(from_json_impl(cfg(), json!([1, 2])), Err(DocumentError::NotAnObject)));
        assert!(matches!(
            from_json_impl(cfg(), json!({"nodes": {"1": {}}})),
            Err(DocumentError::NotAList("nodes"))
        ));
    }

    #[test]
    fn newer_version_only_warns() {
        let (_, report) = load(json!({"version": 99}));
        assert_eq!(
            report.warnings,
            vec![LoadWarning::NewerVersion { found: 99, supported: FORMAT_VERSION }]
        );
    }
}
