//! Texture lookup seam.
//!
//! The engine never loads images itself. A host supplies an [`AssetResolver`]
//! that maps an image path to a [`TextureHandle`]; a miss is not an error, the
//! surface just gets a blank placeholder material.

use crate::scene::Material;
use fnv::FnvHashMap;

/// Opaque handle to a texture owned by the host renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

pub trait AssetResolver {
    fn resolve(&mut self, path: &str) -> Option<TextureHandle>;
}

/// Resolves nothing; every surface renders as a placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullResolver;

impl AssetResolver for NullResolver {
    fn resolve(&mut self, _path: &str) -> Option<TextureHandle> {
        None
    }
}

impl<F> AssetResolver for F
where
    F: FnMut(&str) -> Option<TextureHandle>,
{
    fn resolve(&mut self, path: &str) -> Option<TextureHandle> {
        self(path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedMaterial {
    pub material: Material,
    pub placeholder: bool,
}

/// Memoizes resolver answers per path so each image is requested once.
#[derive(Default)]
pub struct AssetCache {
    entries: FnvHashMap<String, Option<TextureHandle>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material(
        &mut self,
        resolver: &mut dyn AssetResolver,
        path: &str,
        placeholder_color: [f32; 4],
    ) -> ResolvedMaterial {
        let handle = match self.entries.get(path) {
            Some(h) => *h,
            None => {
                let h = resolver.resolve(path);
                if h.is_none() {
                    log::warn!("[assets] missing {path}, using placeholder");
                }
                self.entries.insert(path.to_string(), h);
                h
            }
        };
        match handle {
            Some(texture) => ResolvedMaterial {
                material: Material {
                    color: [1.0; 4],
                    texture: Some(texture),
                },
                placeholder: false,
            },
            None => ResolvedMaterial {
                material: Material::flat(placeholder_color),
                placeholder: true,
            },
        }
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, h)| h.is_none())
            .map(|(p, _)| p.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_yields_placeholder_and_is_cached() {
        let mut calls = 0;
        let mut resolver = |p: &str| {
            calls += 1;
            p.ends_with("p1.jpg").then_some(TextureHandle(7))
        };
        let mut cache = AssetCache::new();
        let hit = cache.material(&mut resolver, "images/book1-p1.jpg", [0.5; 4]);
        assert!(!hit.placeholder);
        assert_eq!(hit.material.texture, Some(TextureHandle(7)));
        let miss = cache.material(&mut resolver, "images/book1-p2.jpg", [0.5; 4]);
        assert!(miss.placeholder);
        assert_eq!(miss.material.color, [0.5; 4]);
        cache.material(&mut resolver, "images/book1-p2.jpg", [0.5; 4]);
        assert_eq!(calls, 2);
        assert_eq!(cache.missing().collect::<Vec<_>>(), vec!["images/book1-p2.jpg"]);
    }
}
