//! Couche composée d'une liste ordonnée de sources

use super::{OverlayBounds, TileRetriever};

/// Liste ordonnée de sources ; la première qui fournit la tuile l'emporte
#[derive(Default)]
pub struct CompositeOverlay {
    bounds: OverlayBounds,
    overlays: Vec<Box<dyn TileRetriever>>,
}

impl CompositeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overlays(overlays: impl IntoIterator<Item = Box<dyn TileRetriever>>) -> Self {
        let mut composite = Self::new();
        composite.add_overlays(overlays);
        composite
    }

    pub fn add_overlay(&mut self, overlay: Box<dyn TileRetriever>) {
        self.overlays.push(overlay);
    }

    pub fn add_overlays(&mut self, overlays: impl IntoIterator<Item = Box<dyn TileRetriever>>) {
        self.overlays.extend(overlays);
    }

    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn bounds(&self) -> &OverlayBounds {
        &self.bounds
    }

    pub fn bounds_mut(&mut self) -> &mut OverlayBounds {
        &mut self.bounds
    }
}

impl TileRetriever for CompositeOverlay {
    fn has_tile(&self, x: u32, y: u32, zoom: u8) -> bool {
        self.bounds.is_within_bounds(x, y, zoom) && self.overlays.iter().any(|o| o.has_tile(x, y, zoom))
    }

    fn tile(&self, x: u32, y: u32, zoom: u8) -> Option<Vec<u8>> {
        if !self.bounds.is_within_bounds(x, y, zoom) {
            return None;
        }
        self.overlays
            .iter()
            .filter(|o| o.has_tile(x, y, zoom))
            .find_map(|o| o.tile(x, y, zoom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::BoundedOverlay;

    /// Source qui annonce ses tuiles mais peut échouer à les produire
    struct Source {
        label: u8,
        produces: bool,
    }

    impl TileRetriever for Source {
        fn has_tile(&self, _x: u32, _y: u32, _zoom: u8) -> bool {
            true
        }

        fn tile(&self, _x: u32, _y: u32, _zoom: u8) -> Option<Vec<u8>> {
            self.produces.then(|| vec![self.label])
        }
    }

    fn source(label: u8, produces: bool, min_zoom: u8) -> Box<dyn TileRetriever> {
        Box::new(BoundedOverlay::new(Source { label, produces }).with_zoom_range(Some(min_zoom), None))
    }

    #[test]
    fn test_first_producing_overlay_wins() {
        let composite = CompositeOverlay::with_overlays([
            source(1, false, 0),
            source(2, true, 5),
            source(3, true, 0),
        ]);

        // Zoom 3 : la source 2 ne couvre pas, la source 1 échoue
        assert_eq!(composite.tile(0, 0, 3), Some(vec![3]));
        // Zoom 6 : la source 2 passe avant la 3
        assert_eq!(composite.tile(0, 0, 6), Some(vec![2]));
        assert!(composite.has_tile(0, 0, 3));
    }

    #[test]
    fn test_empty_and_bounded() {
        let mut composite = CompositeOverlay::new();
        assert!(!composite.has_tile(0, 0, 0));
        assert!(composite.tile(0, 0, 0).is_none());

        composite.add_overlay(source(1, true, 0));
        composite.bounds_mut().max_zoom = Some(4);
        assert!(composite.has_tile(0, 0, 4));
        assert!(!composite.has_tile(0, 0, 5));
        assert_eq!(composite.len(), 1);
    }
}
