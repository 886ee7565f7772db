pub mod manifest;

pub use manifest::AssetManifest;
pub use string_cache::DefaultAtom as Atom;
