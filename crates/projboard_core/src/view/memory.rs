//! In-process document backing `RenderSurface`.
//!
//! # Responsibility
//! - Hold the element tree, templates and listeners of one page.
//! - Dispatch events with bubbling from target to document root.
//! - Render a text outline for terminal hosts and assertions.
//!
//! # Invariants
//! - Nodes removed by `clear_children` are freed with their subtrees and
//!   their handles may be reused by later nodes.
//! - Instantiated but never inserted nodes stay addressable.
//! - `element_by_id` only sees nodes attached under the document body.

use crate::view::surface::{
    DomEvent, EventHandler, EventKind, InsertPosition, NodeId, RenderSurface, SurfaceError,
    SurfaceResult,
};
use log::{debug, warn};
use slab::Slab;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Template content shape, deep-copied on instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    tag: String,
    id: Option<String>,
    text: String,
    children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Templates used by the project board views.
pub fn app_templates() -> Vec<(&'static str, TemplateNode)> {
    vec![
        (
            "project-input",
            TemplateNode::new("form")
                .child(TemplateNode::new("input").with_id("title"))
                .child(TemplateNode::new("textarea").with_id("description"))
                .child(TemplateNode::new("input").with_id("people"))
                .child(TemplateNode::new("button").with_text("ADD PROJECT")),
        ),
        (
            "project-list",
            TemplateNode::new("section")
                .child(TemplateNode::new("header").child(TemplateNode::new("h2")))
                .child(TemplateNode::new("ul")),
        ),
        (
            "single-project",
            TemplateNode::new("li")
                .child(TemplateNode::new("h2"))
                .child(TemplateNode::new("h3"))
                .child(TemplateNode::new("p")),
        ),
    ]
}

struct NodeData {
    tag: String,
    id: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    text: String,
    classes: BTreeSet<String>,
    value: String,
    handlers: Vec<(EventKind, EventHandler)>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            parent: None,
            children: Vec::new(),
            text: String::new(),
            classes: BTreeSet::new(),
            value: String::new(),
            handlers: Vec::new(),
        }
    }
}

#[derive(Default)]
struct DocumentInner {
    nodes: Slab<NodeData>,
    templates: BTreeMap<String, TemplateNode>,
    alerts: Vec<String>,
}

impl DocumentInner {
    fn node(&self, node: NodeId) -> SurfaceResult<&NodeData> {
        self.nodes.get(node.0).ok_or(SurfaceError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> SurfaceResult<&mut NodeData> {
        self.nodes
            .get_mut(node.0)
            .ok_or(SurfaceError::UnknownNode(node))
    }

    fn create(&mut self, template: &TemplateNode) -> NodeId {
        let mut data = NodeData::new(&template.tag);
        data.id = template.id.clone();
        data.text = template.text.clone();
        let handle = NodeId(self.nodes.insert(data));
        for child in &template.children {
            let child_handle = self.create(child);
            self.nodes[child_handle.0].parent = Some(handle);
            self.nodes[handle.0].children.push(child_handle);
        }
        handle
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    /// Frees `node` and every descendant.
    fn release(&mut self, node: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.nodes.try_remove(current.0) {
                freed += 1;
                stack.extend(data.children);
            }
        }
        freed
    }

    fn find(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let mut stack = self.nodes.get(root.0)?.children.iter().rev().copied().collect::<Vec<_>>();
        while let Some(current) = stack.pop() {
            let data = &self.nodes[current.0];
            let matched = match selector.strip_prefix('#') {
                Some(id) => data.id.as_deref() == Some(id),
                None => data.tag == selector,
            };
            if matched {
                return Some(current);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        None
    }
}

/// Headless document with a `<body>` root.
pub struct MemoryDocument {
    inner: RefCell<DocumentInner>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        let mut inner = DocumentInner::default();
        inner.nodes.insert(NodeData::new("body"));
        Self {
            inner: RefCell::new(inner),
        }
    }
}

impl MemoryDocument {
    pub const BODY: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self::default()
    }

    /// Document with an empty `<div id=host_id>` under the body.
    pub fn with_host(host_id: &str) -> Self {
        let document = Self::new();
        {
            let mut inner = document.inner.borrow_mut();
            let host = inner.create(&TemplateNode::new("div").with_id(host_id));
            inner.nodes[host.0].parent = Some(Self::BODY);
            inner.nodes[Self::BODY.0].children.push(host);
        }
        document
    }

    /// Host element plus the project board templates.
    pub fn with_app_templates(host_id: &str) -> Self {
        let document = Self::with_host(host_id);
        for (id, template) in app_templates() {
            document.register_template(id, template);
        }
        document
    }

    pub fn register_template(&self, template_id: &str, template: TemplateNode) {
        self.inner
            .borrow_mut()
            .templates
            .insert(template_id.to_string(), template);
    }

    /// Delivers `event` to `target` and then to each ancestor.
    pub fn dispatch(&self, target: NodeId, event: &mut DomEvent) -> SurfaceResult<()> {
        let handlers = {
            let inner = self.inner.borrow();
            inner.node(target)?;
            let mut handlers = Vec::new();
            let mut current = Some(target);
            while let Some(node) = current {
                let data = &inner.nodes[node.0];
                handlers.extend(
                    data.handlers
                        .iter()
                        .filter(|(kind, _)| *kind == event.kind())
                        .map(|(_, handler)| handler.clone()),
                );
                current = data.parent;
            }
            handlers
        };

        debug!(
            "event=dom_dispatch module=view kind={} target={} handlers={}",
            event.kind().as_str(),
            target.0,
            handlers.len()
        );
        for handler in handlers {
            handler(event);
        }
        Ok(())
    }

    /// `dispatch` addressed by element id.
    pub fn dispatch_to(&self, element_id: &str, event: &mut DomEvent) -> SurfaceResult<()> {
        let target = self.element_by_id_required(element_id)?;
        self.dispatch(target, event)
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(node.0)
            .map(|data| data.text.clone())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner
            .borrow()
            .nodes
            .get(node.0)
            .is_some_and(|data| data.classes.contains(class))
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner
            .borrow()
            .nodes
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    pub fn element_id(&self, node: NodeId) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(node.0)
            .and_then(|data| data.id.clone())
    }

    /// Alerts raised so far, oldest first.
    pub fn alerts(&self) -> Vec<String> {
        self.inner.borrow().alerts.clone()
    }

    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut self.inner.borrow_mut().alerts)
    }

    /// Live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.inner.borrow().nodes.len()
    }

    /// Indented outline of `root` and its attached descendants.
    pub fn outline(&self, root: NodeId) -> String {
        let inner = self.inner.borrow();
        let mut out = String::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let Some(data) = inner.nodes.get(node.0) else {
                continue;
            };
            out.push_str(&"  ".repeat(depth));
            out.push_str(&data.tag);
            if let Some(id) = &data.id {
                out.push('#');
                out.push_str(id);
            }
            for class in &data.classes {
                out.push('.');
                out.push_str(class);
            }
            if !data.text.is_empty() {
                out.push_str(&format!(" {:?}", data.text));
            }
            if !data.value.is_empty() {
                out.push_str(&format!(" value={:?}", data.value));
            }
            out.push('\n');
            stack.extend(data.children.iter().rev().map(|child| (*child, depth + 1)));
        }
        out
    }
}

impl RenderSurface for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.inner.borrow().find(Self::BODY, &format!("#{id}"))
    }

    fn instantiate_template(&self, template_id: &str) -> SurfaceResult<NodeId> {
        let mut inner = self.inner.borrow_mut();
        let template = inner
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| SurfaceError::TemplateNotFound(template_id.to_string()))?;
        Ok(inner.create(&template))
    }

    fn insert(&self, host: NodeId, node: NodeId, position: InsertPosition) -> SurfaceResult<()> {
        let mut inner = self.inner.borrow_mut();
        inner.node(host)?;
        inner.node(node)?;
        inner.detach(node);
        inner.nodes[node.0].parent = Some(host);
        let children = &mut inner.nodes[host.0].children;
        match position {
            InsertPosition::AfterBegin => children.insert(0, node),
            InsertPosition::BeforeEnd => children.push(node),
        }
        Ok(())
    }

    fn set_element_id(&self, node: NodeId, id: &str) -> SurfaceResult<()> {
        self.inner.borrow_mut().node_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    fn query(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        self.inner.borrow().find(root, selector)
    }

    fn set_text(&self, node: NodeId, text: &str) -> SurfaceResult<()> {
        self.inner.borrow_mut().node_mut(node)?.text = text.to_string();
        Ok(())
    }

    fn clear_children(&self, node: NodeId) -> SurfaceResult<()> {
        let mut inner = self.inner.borrow_mut();
        let children = std::mem::take(&mut inner.node_mut(node)?.children);
        let freed = children
            .into_iter()
            .map(|child| inner.release(child))
            .sum::<usize>();
        debug!(
            "event=children_cleared module=view node={} freed={}",
            node.0, freed
        );
        Ok(())
    }

    fn add_class(&self, node: NodeId, class: &str) -> SurfaceResult<()> {
        self.inner
            .borrow_mut()
            .node_mut(node)?
            .classes
            .insert(class.to_string());
        Ok(())
    }

    fn remove_class(&self, node: NodeId, class: &str) -> SurfaceResult<()> {
        self.inner.borrow_mut().node_mut(node)?.classes.remove(class);
        Ok(())
    }

    fn input_value(&self, node: NodeId) -> SurfaceResult<String> {
        Ok(self.inner.borrow().node(node)?.value.clone())
    }

    fn set_input_value(&self, node: NodeId, value: &str) -> SurfaceResult<()> {
        self.inner.borrow_mut().node_mut(node)?.value = value.to_string();
        Ok(())
    }

    fn add_event_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: EventHandler,
    ) -> SurfaceResult<()> {
        self.inner
            .borrow_mut()
            .node_mut(node)?
            .handlers
            .push((kind, handler));
        Ok(())
    }

    fn alert(&self, message: &str) {
        warn!("event=alert module=view message={message}");
        self.inner.borrow_mut().alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryDocument, TemplateNode};
    use crate::view::surface::{DomEvent, EventKind, InsertPosition, RenderSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn instantiated_template_is_detached_until_inserted() {
        let document = MemoryDocument::with_app_templates("app");
        let item = document
            .instantiate_template("single-project")
            .expect("template exists");
        document.set_element_id(item, "p1").expect("set id");
        assert!(document.element_by_id("p1").is_none());

        let host = document.element_by_id("app").expect("host exists");
        document
            .insert(host, item, InsertPosition::BeforeEnd)
            .expect("insert");
        assert_eq!(document.element_by_id("p1"), Some(item));
        assert!(document.query(item, "h3").is_some());
    }

    #[test]
    fn after_begin_prepends() {
        let document = MemoryDocument::with_host("app");
        document.register_template("x", TemplateNode::new("span"));
        let host = document.element_by_id("app").expect("host exists");
        let first = document.instantiate_template("x").expect("template");
        let second = document.instantiate_template("x").expect("template");
        document
            .insert(host, first, InsertPosition::BeforeEnd)
            .expect("insert");
        document
            .insert(host, second, InsertPosition::AfterBegin)
            .expect("insert");
        assert_eq!(document.children(host), vec![second, first]);
    }

    #[test]
    fn events_bubble_to_ancestors() {
        let document = MemoryDocument::with_app_templates("app");
        let list = document
            .instantiate_template("project-list")
            .expect("template");
        let host = document.element_by_id("app").expect("host exists");
        document
            .insert(host, list, InsertPosition::BeforeEnd)
            .expect("insert");
        let ul = document.query(list, "ul").expect("ul exists");

        let hits = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&hits);
        document
            .add_event_listener(
                list,
                EventKind::Drop,
                Rc::new(move |event: &mut DomEvent| sink.borrow_mut().push(event.kind())),
            )
            .expect("listener");

        let mut event = DomEvent::new(EventKind::Drop);
        document.dispatch(ul, &mut event).expect("dispatch");
        let mut other = DomEvent::new(EventKind::DragOver);
        document.dispatch(ul, &mut other).expect("dispatch");
        assert_eq!(*hits.borrow(), vec![EventKind::Drop]);
    }

    #[test]
    fn clear_children_detaches_from_lookup() {
        let document = MemoryDocument::with_app_templates("app");
        let host = document.element_by_id("app").expect("host exists");
        let item = document
            .instantiate_template("single-project")
            .expect("template");
        document.set_element_id(item, "gone").expect("set id");
        document
            .insert(host, item, InsertPosition::BeforeEnd)
            .expect("insert");

        document.clear_children(host).expect("clear");
        assert!(document.element_by_id("gone").is_none());
        assert!(document.children(host).is_empty());
    }

    #[test]
    fn clear_children_frees_subtrees_for_reuse() {
        let document = MemoryDocument::with_app_templates("app");
        let host = document.element_by_id("app").expect("host exists");
        let baseline = document.node_count();

        for round in 0..50 {
            document.clear_children(host).expect("clear");
            for index in 0..3 {
                let item = document
                    .instantiate_template("single-project")
                    .expect("template");
                document
                    .set_element_id(item, &format!("p{round}-{index}"))
                    .expect("set id");
                document
                    .insert(host, item, InsertPosition::BeforeEnd)
                    .expect("insert");
            }
        }

        assert_eq!(document.node_count(), baseline + 3 * 4);
        assert!(document.element_by_id("p0-0").is_none());
        let last = document.element_by_id("p49-2").expect("latest item attached");
        assert_eq!(document.text(document.query(last, "h2").expect("h2")), Some(String::new()));
    }

    #[test]
    fn outline_lists_ids_classes_and_text() {
        let document = MemoryDocument::with_app_templates("app");
        let host = document.element_by_id("app").expect("host exists");
        document.add_class(host, "droppable").expect("class");
        document.set_text(host, "hi").expect("text");
        assert_eq!(
            document.outline(MemoryDocument::BODY),
            "body\n  div#app.droppable \"hi\"\n"
        );
    }
}
