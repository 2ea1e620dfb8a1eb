// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, geometry, queries, and subscriptions.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect, Size, Vec2};

use crate::selector::Selector;
use crate::types::{
    ElementSpec, ListenerId, Mutation, MutationKind, NodeFlags, NodeId, ObserverId, PointerEvent,
    PointerKind, PointerMask,
};

/// Default viewport size of a fresh document.
pub const DEFAULT_VIEWPORT: Size = Size::new(1024.0, 768.0);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An in-memory document.
///
/// Nodes live in generational slots. A node is *attached* when its ancestor chain ends at
/// [`Document::body`]; only attached nodes have geometry and can be queried or hit.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    body: NodeId,
    scroll: Vec2,
    viewport: Size,
    stylesheet: Vec<(String, Size)>,
    observers: Vec<(ObserverId, Vec<Mutation>)>,
    listeners: Vec<(ListenerId, PointerMask)>,
    next_handle: u64,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("scroll", &self.scroll)
            .field("viewport", &self.viewport)
            .field("observers", &self.observers.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched node.
    pub node: NodeId,
    /// Path from root to node (inclusive).
    pub path: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: ElementSpec,
}

impl Node {
    fn new(generation: u32, element: ElementSpec) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            element,
        }
    }
}

impl Document {
    /// Create a document containing only its body, sized to [`DEFAULT_VIEWPORT`].
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: NodeId::new(0, 0),
            scroll: Vec2::ZERO,
            viewport: DEFAULT_VIEWPORT,
            stylesheet: Vec::new(),
            observers: Vec::new(),
            listeners: Vec::new(),
            next_handle: 1,
        };
        doc.body = doc.create(
            ElementSpec::new("body").with_bounds(Rect::from_origin_size(Point::ORIGIN, DEFAULT_VIEWPORT)),
        );
        doc
    }

    /// The root of the attached tree.
    pub fn body(&self) -> NodeId {
        self.body
    }

    // --- structure ---

    /// Create a detached node.
    pub fn create(&mut self, element: ElementSpec) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, element));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, element)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Create a node and append it to `parent`.
    pub fn insert(&mut self, parent: NodeId, element: ElementSpec) -> NodeId {
        let id = self.create(element);
        self.append(parent, id);
        id
    }

    /// Append `id` as the last child of `parent`, detaching it from any previous parent.
    ///
    /// Ignored when either id is stale or when `id` contains `parent`.
    pub fn append(&mut self, parent: NodeId, id: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(id) || self.contains(id, parent) {
            return;
        }
        self.detach(id);
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.push(id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = Some(parent);
        }
        self.record(parent, MutationKind::ChildList);
    }

    /// Unlink `id` from its parent. The node and its subtree stay alive.
    ///
    /// Idempotent: a node without a parent is left as is.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.node_opt_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_opt_mut(id) {
            n.parent = None;
        }
        self.record(parent, MutationKind::ChildList);
    }

    /// Remove a node (and its subtree) from the document, freeing the slots.
    ///
    /// Idempotent; the body cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = match self.node_opt(id) {
            Some(n) => n.children.clone(),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    // --- attributes ---

    /// Update the box relative to the parent's origin.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            if n.element.bounds == bounds {
                return;
            }
            n.element.bounds = bounds;
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            if n.element.flags == flags {
                return;
            }
            n.element.flags = flags;
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Add (`enabled`) or remove a class.
    pub fn set_class(&mut self, id: NodeId, class: &str, enabled: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            let present = n.element.has_class(class);
            if present == enabled {
                return;
            }
            if enabled {
                n.element.classes.push(String::from(class));
            } else {
                n.element.classes.retain(|c| c != class);
            }
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Replace the text content.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(n) = self.node_opt_mut(id) {
            if n.element.text == text {
                return;
            }
            n.element.text = String::from(text);
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            if n.element.z_index == z {
                return;
            }
            n.element.z_index = z;
            self.record(id, MutationKind::Attributes);
        }
    }

    /// Register an intrinsic size for elements carrying `class` and an empty box.
    ///
    /// Later registrations for the same class replace earlier ones.
    pub fn style_class(&mut self, class: &str, size: Size) {
        match self.stylesheet.iter_mut().find(|(c, _)| c == class) {
            Some(entry) => entry.1 = size,
            None => self.stylesheet.push((String::from(class), size)),
        }
    }

    /// Scroll the viewport to `offset`.
    pub fn set_scroll(&mut self, offset: Vec2) {
        self.scroll = offset;
    }

    /// Current scroll offset.
    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Resize the viewport.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
    }

    // --- accessors ---

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns true if `id` is live and its ancestor chain reaches the body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_alive(id) && self.contains(self.body, id)
    }

    /// Element data of a live node.
    pub fn element(&self, id: NodeId) -> Option<&ElementSpec> {
        self.node_opt(id).map(|n| &n.element)
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a live node, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        if !self.is_alive(ancestor) {
            return false;
        }
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    // --- geometry ---

    /// Layout size: the box's own size, or the stylesheet size for an empty box.
    fn layout_size(&self, element: &ElementSpec) -> Size {
        let own = element.bounds.size();
        if own.width > 0.0 || own.height > 0.0 {
            return own;
        }
        self.stylesheet
            .iter()
            .find(|(class, _)| element.has_class(class))
            .map(|(_, size)| *size)
            .unwrap_or(own)
    }

    /// Page-space box of a node, accumulating ancestor origins. Zero for stale ids.
    pub fn page_rect(&self, id: NodeId) -> Rect {
        let Some(node) = self.node_opt(id) else {
            return Rect::ZERO;
        };
        let mut origin = node.element.bounds.origin();
        let mut cursor = node.parent;
        while let Some(p) = cursor.and_then(|p| self.node_opt(p)) {
            origin += p.element.bounds.origin().to_vec2();
            cursor = p.parent;
        }
        Rect::from_origin_size(origin, self.layout_size(&node.element))
    }

    /// Viewport-relative box of an attached node. Zero when detached or stale.
    pub fn client_rect(&self, id: NodeId) -> Rect {
        if !self.is_attached(id) {
            return Rect::ZERO;
        }
        self.page_rect(id) - self.scroll
    }

    /// Rendered size: zero unless the node is attached and it and all its ancestors are visible.
    pub fn rendered_size(&self, id: NodeId) -> Size {
        if !self.is_attached(id) {
            return Size::ZERO;
        }
        let mut cursor = Some(id);
        while let Some(n) = cursor.and_then(|c| self.node_opt(c)) {
            if !n.element.flags.contains(NodeFlags::VISIBLE) {
                return Size::ZERO;
            }
            cursor = n.parent;
        }
        self.element(id)
            .map(|el| self.layout_size(el))
            .unwrap_or(Size::ZERO)
    }

    /// Returns true if the node renders with a positive width and height.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let size = self.rendered_size(id);
        size.width > 0.0 && size.height > 0.0
    }

    /// Whole-document extent: the viewport grown to cover every rendered node.
    pub fn extent(&self) -> Size {
        let mut extent = self.viewport;
        for id in self.descendants(self.body) {
            if !self.is_rendered(id) {
                continue;
            }
            let r = self.page_rect(id);
            extent.width = extent.width.max(r.x1);
            extent.height = extent.height.max(r.y1);
        }
        extent
    }

    // --- queries ---

    /// Pre-order traversal of `root`'s subtree (inclusive).
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(root) {
            return out;
        }
        let mut stack = alloc::vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Attached nodes matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    /// First node in `root`'s subtree (inclusive) carrying `class`.
    pub fn find_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.element(id).is_some_and(|el| el.has_class(class)))
    }

    /// Hit test a page-space point. Returns the topmost rendered, pickable node.
    ///
    /// If multiple nodes overlap with the same `z_index`, the newer [`NodeId`] wins.
    pub fn hit_test(&self, pt: Point) -> Option<Hit> {
        let mut best: Option<(NodeId, i32)> = None;
        for id in self.descendants(self.body) {
            let Some(el) = self.element(id) else {
                continue;
            };
            if !el.flags.contains(NodeFlags::PICKABLE) || !self.is_rendered(id) {
                continue;
            }
            if !self.page_rect(id).contains(pt) {
                continue;
            }
            match best {
                None => best = Some((id, el.z_index)),
                Some((best_id, z_best)) => {
                    let z = el.z_index;
                    if z > z_best || (z == z_best && id.is_newer_than(best_id)) {
                        best = Some((id, z));
                    }
                }
            }
        }
        best.map(|(node, _)| Hit {
            node,
            path: self.path_to_root(node),
        })
    }

    /// Resolve a pointer interaction at a page-space point.
    pub fn pointer_event(&self, kind: PointerKind, pt: Point) -> Option<PointerEvent> {
        let hit = self.hit_test(pt)?;
        Some(PointerEvent {
            kind,
            target: hit.node,
            path: hit.path,
            point: pt,
        })
    }

    // --- subscriptions ---

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Connect a mutation observer watching the whole attached tree.
    pub fn observe(&mut self) -> ObserverId {
        let id = ObserverId(self.next_handle());
        self.observers.push((id, Vec::new()));
        id
    }

    /// Disconnect an observer, discarding its pending records. Idempotent.
    pub fn disconnect(&mut self, id: ObserverId) {
        self.observers.retain(|(o, _)| *o != id);
    }

    /// Drain the pending batch of an observer.
    pub fn take_records(&mut self, id: ObserverId) -> Vec<Mutation> {
        self.observers
            .iter_mut()
            .find(|(o, _)| *o == id)
            .map(|(_, pending)| core::mem::take(pending))
            .unwrap_or_default()
    }

    /// Number of connected observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Register a pointer listener for `kinds`.
    pub fn listen(&mut self, kinds: PointerMask) -> ListenerId {
        let id = ListenerId(self.next_handle());
        self.listeners.push((id, kinds));
        id
    }

    /// Unregister a pointer listener. Idempotent.
    pub fn unlisten(&mut self, id: ListenerId) {
        self.listeners.retain(|(l, _)| *l != id);
    }

    /// Number of registered pointer listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if a listener is registered for `kind`.
    pub fn is_listening(&self, kind: PointerKind) -> bool {
        self.listeners.iter().any(|(_, m)| m.contains(kind.mask()))
    }

    // --- internals ---

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        // Only changes inside the attached tree are observable.
        if self.observers.is_empty() || !self.is_attached(target) {
            return;
        }
        let mutation = Mutation { target, kind };
        for (_, pending) in &mut self.observers {
            pending.push(mutation);
        }
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.parent(id) {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }
}
