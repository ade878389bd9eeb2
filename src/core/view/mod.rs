//=========================================================================
// View
//=========================================================================
//
// Render tree produced by scenes and the compositor.
//
// Nodes are plain data: a tag, optional stable key, attributes, an
// optional click message and children. A rendering layer outside this
// crate turns them into pixels. Keys identify nodes across frames, so a
// changed key means full replacement rather than reconciliation.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod animation;
mod compositor;
mod menu;

//=== Public API ==========================================================

pub use compositor::compose;
pub use menu::{menu_overlay, MenuOption};

//=== Node ================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Node<M> {
    Element(Element<M>),
    Text(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element<M> {
    pub tag: &'static str,
    pub key: Option<String>,
    pub attributes: Vec<(&'static str, String)>,
    pub on_click: Option<M>,
    pub children: Vec<Node<M>>,
}

impl<M> Node<M> {
    //--- Construction -----------------------------------------------------

    pub fn element(tag: &'static str) -> Self {
        Self::Element(Element {
            tag,
            key: None,
            attributes: Vec::new(),
            on_click: None,
            children: Vec::new(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A clickable element labelled with `label`.
    pub fn button(label: impl Into<String>, msg: M) -> Self {
        Self::element("button")
            .on_click(msg)
            .child(Self::text(label))
    }

    //--- Builders ---------------------------------------------------------
    //
    // Builders only apply to elements; text and empty nodes pass through.
    //

    pub fn key(mut self, key: impl Into<String>) -> Self {
        if let Self::Element(el) = &mut self {
            el.key = Some(key.into());
        }
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        if let Self::Element(el) = &mut self {
            el.attributes.push((name, value.into()));
        }
        self
    }

    pub fn on_click(mut self, msg: M) -> Self {
        if let Self::Element(el) = &mut self {
            el.on_click = Some(msg);
        }
        self
    }

    pub fn child(mut self, child: Node<M>) -> Self {
        if let Self::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Node<M>>,
    {
        if let Self::Element(el) = &mut self {
            el.children.extend(children);
        }
        self
    }

    //--- Mapping ----------------------------------------------------------

    /// Lifts every click message into another message type.
    pub fn map<N, F>(self, f: &F) -> Node<N>
    where
        F: Fn(M) -> N,
    {
        match self {
            Self::Element(el) => Node::Element(Element {
                tag: el.tag,
                key: el.key,
                attributes: el.attributes,
                on_click: el.on_click.map(f),
                children: el.children.into_iter().map(|c| c.map(f)).collect(),
            }),
            Self::Text(text) => Node::Text(text),
            Self::Empty => Node::Empty,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn get_key(&self) -> Option<&str> {
        match self {
            Self::Element(el) => el.key.as_deref(),
            _ => None,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element(el) => el
                .attributes
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn child_nodes(&self) -> &[Node<M>] {
        match self {
            Self::Element(el) => &el.children,
            _ => &[],
        }
    }

    /// Depth-first search for the first node carrying `key`.
    pub fn find_key(&self, key: &str) -> Option<&Node<M>> {
        if self.get_key() == Some(key) {
            return Some(self);
        }
        self.child_nodes().iter().find_map(|c| c.find_key(key))
    }

    /// All text content, depth-first.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Text(text) => vec![text.as_str()],
            Self::Element(el) => el.children.iter().flat_map(|c| c.texts()).collect(),
            Self::Empty => Vec::new(),
        }
    }

    /// All click messages, depth-first.
    pub fn click_messages(&self) -> Vec<&M> {
        match self {
            Self::Element(el) => el
                .on_click
                .iter()
                .chain(el.children.iter().flat_map(|c| c.click_messages()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

//=== Tests ===============================================================
