use crate::Atom;

/// Ordered, de-duplicated list of asset references (images, videos) that a
/// host should fetch before the first screen is shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetManifest {
    assets: Vec<Atom>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an asset path and return its position in the manifest
    pub fn insert(&mut self, path: &str) -> usize {
        let atom = Atom::from(path);
        match self.assets.iter().position(|a| *a == atom) {
            Some(idx) => idx,
            None => {
                self.assets.push(atom);
                self.assets.len() - 1
            }
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        let atom = Atom::from(path);
        self.assets.contains(&atom)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.assets.get(idx).map(|a| &**a)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.assets.iter().map(|a| &**a)
    }

    /// Append every asset from `other` not already present, keeping order.
    pub fn merge(&mut self, other: &AssetManifest) {
        for path in other.iter() {
            self.insert(path);
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for AssetManifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut manifest = AssetManifest::new();
        manifest.extend(iter);
        manifest
    }
}

impl<S: AsRef<str>> Extend<S> for AssetManifest {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path.as_ref());
        }
    }
}
