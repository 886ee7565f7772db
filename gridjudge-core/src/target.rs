use crate::view::Element;

/// Identifies one mounting of content on a display target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MountToken(u64);

/// Surface a trial draws onto. Every `mount` and `clear` issues a fresh token,
/// so a trial can tell whether the content it mounted is still on screen.
pub trait DisplayTarget {
    fn mount(&mut self, view: Element) -> MountToken;
    fn clear(&mut self);
    fn current(&self) -> Option<&Element>;
    fn current_mut(&mut self) -> Option<&mut Element>;
    fn token(&self) -> MountToken;
}

/// In-memory display target
#[derive(Debug, Clone, Default)]
pub struct Container {
    content: Option<Element>,
    token: MountToken,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    /// Rendered markup, empty when nothing is mounted
    pub fn markup(&self) -> String {
        self.content
            .as_ref()
            .map(Element::to_markup)
            .unwrap_or_default()
    }

    fn bump(&mut self) -> MountToken {
        self.token = MountToken(self.token.0 + 1);
        self.token
    }
}

impl DisplayTarget for Container {
    fn mount(&mut self, view: Element) -> MountToken {
        self.content = Some(view);
        self.bump()
    }

    fn clear(&mut self) {
        self.content = None;
        self.bump();
    }

    fn current(&self) -> Option<&Element> {
        self.content.as_ref()
    }

    fn current_mut(&mut self) -> Option<&mut Element> {
        self.content.as_mut()
    }

    fn token(&self) -> MountToken {
        self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_replaces_content_and_issues_new_token() {
        let mut c = Container::new();
        assert!(c.is_empty());
        assert_eq!(c.markup(), "");

        let first = c.mount(Element::new("p").text("one"));
        let second = c.mount(Element::new("p").text("two"));
        assert_ne!(first, second);
        assert_eq!(c.token(), second);
        assert_eq!(c.markup(), "<p>two</p>");

        c.clear();
        assert!(c.is_empty());
        assert_ne!(c.token(), second);
    }
}
