use gridjudge_cache::Atom;
use std::fmt;

/// Elements rendered without a closing tag
const VOID_ELEMENTS: [&str; 3] = ["br", "img", "input"];

/// A node in a rendered screen
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Plain text, escaped on output
    Text(String),
    /// Trusted markup supplied by the experiment configuration, emitted verbatim
    Markup(String),
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: Atom,
    attrs: Vec<(Atom, Option<String>)>,
    styles: Vec<(Atom, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: Atom::from(tag),
            attrs: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Boolean attribute such as `disabled`
    pub fn flag(mut self, name: &str) -> Self {
        let name = Atom::from(name);
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = None,
            None => self.attrs.push((name, None)),
        }
        self
    }

    pub fn style(mut self, property: &str, value: impl ToString) -> Self {
        let property = Atom::from(property);
        let value = value.to_string();
        match self.styles.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.styles.push((property, value)),
        }
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(Node::Text(text.to_string()))
    }

    pub fn markup(self, markup: &str) -> Self {
        self.child(Node::Markup(markup.to_string()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value; boolean attributes read as `Some("")`
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| &**n == name)
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(p, _)| &**p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let name = Atom::from(name);
        let value = Some(value.to_string());
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(n, _)| &**n != name);
        before != self.attrs.len()
    }

    /// Pre-order walk over this element and every element below it
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Element>) {
        out.push(self);
        for node in &self.children {
            if let Node::Element(el) = node {
                el.collect_into(out);
            }
        }
    }

    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|el| el.tag() == tag)
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.descendants()
            .into_iter()
            .find(|el| el.attr_value("id") == Some(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.attr_value("id") == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) => el.find_by_id_mut(id),
            _ => None,
        })
    }

    /// Concatenated text below this element. Markup nodes contribute their
    /// raw source.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Element(el) => el.push_text(out),
                Node::Text(t) | Node::Markup(t) => out.push_str(t),
            }
        }
    }

    pub fn to_markup(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element(el) => fmt::Display::fmt(el, f),
            Node::Text(t) => write_escaped(f, t, false),
            Node::Markup(m) => f.write_str(m),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag())?;
        for (name, value) in &self.attrs {
            match value {
                Some(v) => {
                    write!(f, " {}=\"", &**name)?;
                    write_escaped(f, v, true)?;
                    f.write_str("\"")?;
                }
                None => write!(f, " {}", &**name)?,
            }
        }
        if !self.styles.is_empty() {
            f.write_str(" style=\"")?;
            for (i, (prop, value)) in self.styles.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}: ", &**prop)?;
                write_escaped(f, value, true)?;
                f.write_str(";")?;
            }
            f.write_str("\"")?;
        }
        f.write_str(">")?;

        if VOID_ELEMENTS.contains(&self.tag()) {
            return Ok(());
        }
        for node in &self.children {
            fmt::Display::fmt(node, f)?;
        }
        write!(f, "</{}>", self.tag())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str, in_attr: bool) -> fmt::Result {
    let mut last = 0;
    for (i, ch) in s.char_indices() {
        let rep = match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' if in_attr => "&quot;",
            _ => continue,
        };
        f.write_str(&s[last..i])?;
        f.write_str(rep)?;
        last = i + ch.len_utf8();
    }
    f.write_str(&s[last..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_serializes_nested_elements() {
        let el = Element::new("div")
            .id("wrapper")
            .style("position", "relative")
            .style("width", "500px")
            .child(Element::new("h2").text("Round 4"))
            .child(Element::new("img").attr("src", "trials/003/00.png"));

        assert_eq!(
            el.to_markup(),
            "<div id=\"wrapper\" style=\"position: relative; width: 500px;\">\
             <h2>Round 4</h2><img src=\"trials/003/00.png\"></div>"
        );
    }

    #[test]
    fn escapes_text_and_attributes_but_not_markup() {
        let el = Element::new("p")
            .attr("title", "a \"quoted\" <b>")
            .text("1 < 2 & 3 > 2")
            .markup("<em>kept</em>");
        assert_eq!(
            el.to_markup(),
            "<p title=\"a &quot;quoted&quot; &lt;b&gt;\">1 &lt; 2 &amp; 3 &gt; 2<em>kept</em></p>"
        );
    }

    #[test]
    fn boolean_attributes_toggle() {
        let mut button = Element::new("button").flag("disabled").text("Go");
        assert!(button.has_attr("disabled"));
        assert_eq!(button.attr_value("disabled"), Some(""));
        assert_eq!(button.to_markup(), "<button disabled>Go</button>");

        assert!(button.remove_attr("disabled"));
        assert!(!button.remove_attr("disabled"));
        assert_eq!(button.to_markup(), "<button>Go</button>");
    }

    #[test]
    fn setting_an_existing_style_or_attr_overwrites_in_place() {
        let mut el = Element::new("input").attr("min", 0).style("width", "50%");
        el.set_attr("min", 5);
        let el = el.style("width", "100%");
        assert_eq!(el.attr_value("min"), Some("5"));
        assert_eq!(el.style_value("width"), Some("100%"));
        assert_eq!(el.to_markup(), "<input min=\"5\" style=\"width: 100%;\">");
    }

    #[test]
    fn queries_walk_the_whole_tree() {
        let mut root = Element::new("div").child(
            Element::new("div")
                .child(Element::new("span").text("low"))
                .child(Element::new("span").id("hi").text("high")),
        );

        assert_eq!(root.descendants().len(), 4);
        assert_eq!(root.find_all("span").len(), 2);
        assert_eq!(root.text_content(), "lowhigh");
        assert_eq!(root.find_by_id("hi").map(|e| e.text_content()), Some("high".into()));
        assert!(root.find_by_id("missing").is_none());

        root.find_by_id_mut("hi").unwrap().set_attr("class", "x");
        assert_eq!(root.find_by_id("hi").unwrap().attr_value("class"), Some("x"));
    }
}
