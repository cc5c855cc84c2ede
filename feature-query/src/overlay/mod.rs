//! Couches de tuiles bornées (zoom, emprise)
//!
//! Une couche bornée ne fournit une tuile que si le zoom est dans sa plage,
//! si la tuile recoupe son emprise Web Mercator (antiméridien compris) et
//! si la source sous-jacente l'a.

mod composite;

pub use composite::CompositeOverlay;

use mapshape::projection::{Transform, WEB_MERCATOR_HALF_WORLD_WIDTH};
use mapshape::tiles::web_mercator_tile_bounds;
use mapshape::{BoundingBox, Projection};

use crate::error::Result;

/// Source de tuiles XYZ
pub trait TileRetriever {
    fn has_tile(&self, x: u32, y: u32, zoom: u8) -> bool;

    /// Octets de la tuile, `None` si absente
    fn tile(&self, x: u32, y: u32, zoom: u8) -> Option<Vec<u8>>;
}

impl<T: TileRetriever + ?Sized> TileRetriever for Box<T> {
    fn has_tile(&self, x: u32, y: u32, zoom: u8) -> bool {
        (**self).has_tile(x, y, zoom)
    }

    fn tile(&self, x: u32, y: u32, zoom: u8) -> Option<Vec<u8>> {
        (**self).tile(x, y, zoom)
    }
}

/// Bornes d'une couche : plage de zoom et emprise Web Mercator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayBounds {
    pub min_zoom: Option<u8>,
    pub max_zoom: Option<u8>,
    web_mercator_bbox: Option<BoundingBox>,
}

impl OverlayBounds {
    /// Emprise exprimée dans `projection`, stockée en Web Mercator
    pub fn set_bounding_box(&mut self, bbox: &BoundingBox, projection: &Projection) -> Result<()> {
        let transform = Transform::new(projection, &Projection::web_mercator())?;
        self.web_mercator_bbox = Some(bbox.transform(&transform)?);
        Ok(())
    }

    pub fn web_mercator_bounding_box(&self) -> Option<&BoundingBox> {
        self.web_mercator_bbox.as_ref()
    }

    /// Emprise reprojetée dans `projection`
    pub fn bounding_box(&self, projection: &Projection) -> Result<Option<BoundingBox>> {
        let Some(bbox) = &self.web_mercator_bbox else {
            return Ok(None);
        };
        let transform = Transform::new(&Projection::web_mercator(), projection)?;
        Ok(Some(bbox.transform(&transform)?))
    }

    pub fn is_within_zoom(&self, zoom: u8) -> bool {
        self.min_zoom.map_or(true, |min| zoom >= min) && self.max_zoom.map_or(true, |max| zoom <= max)
    }

    /// Vrai si la tuile recoupe l'emprise (bords compris)
    pub fn is_within_bounding_box(&self, x: u32, y: u32, zoom: u8) -> bool {
        let Some(bbox) = &self.web_mercator_bbox else {
            return true;
        };
        let tile = web_mercator_tile_bounds(x, y, zoom);
        bbox.overlap_wrapped(&tile, WEB_MERCATOR_HALF_WORLD_WIDTH, true)
            .is_some()
    }

    pub fn is_within_bounds(&self, x: u32, y: u32, zoom: u8) -> bool {
        self.is_within_zoom(zoom) && self.is_within_bounding_box(x, y, zoom)
    }
}

/// Source de tuiles restreinte à des bornes
#[derive(Debug)]
pub struct BoundedOverlay<R> {
    bounds: OverlayBounds,
    retriever: R,
}

impl<R: TileRetriever> BoundedOverlay<R> {
    pub fn new(retriever: R) -> Self {
        Self {
            bounds: OverlayBounds::default(),
            retriever,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: Option<u8>, max_zoom: Option<u8>) -> Self {
        self.bounds.min_zoom = min_zoom;
        self.bounds.max_zoom = max_zoom;
        self
    }

    pub fn with_bounding_box(mut self, bbox: &BoundingBox, projection: &Projection) -> Result<Self> {
        self.bounds.set_bounding_box(bbox, projection)?;
        Ok(self)
    }

    pub fn bounds(&self) -> &OverlayBounds {
        &self.bounds
    }

    pub fn bounds_mut(&mut self) -> &mut OverlayBounds {
        &mut self.bounds
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }
}

impl<R: TileRetriever> TileRetriever for BoundedOverlay<R> {
    fn has_tile(&self, x: u32, y: u32, zoom: u8) -> bool {
        self.bounds.is_within_bounds(x, y, zoom) && self.retriever.has_tile(x, y, zoom)
    }

    fn tile(&self, x: u32, y: u32, zoom: u8) -> Option<Vec<u8>> {
        if !self.has_tile(x, y, zoom) {
            return None;
        }
        self.retriever.tile(x, y, zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapshape::tiles::tile_coord;

    /// Toutes les tuiles existent
    struct Everywhere;

    impl TileRetriever for Everywhere {
        fn has_tile(&self, _x: u32, _y: u32, _zoom: u8) -> bool {
            true
        }

        fn tile(&self, x: u32, y: u32, zoom: u8) -> Option<Vec<u8>> {
            Some(vec![x as u8, y as u8, zoom])
        }
    }

    #[test]
    fn test_zoom_range() {
        let overlay = BoundedOverlay::new(Everywhere).with_zoom_range(Some(3), Some(5));
        assert!(!overlay.has_tile(0, 0, 2));
        assert!(overlay.has_tile(0, 0, 3));
        assert!(overlay.has_tile(0, 0, 5));
        assert!(overlay.tile(0, 0, 6).is_none());
        assert_eq!(overlay.tile(1, 2, 4), Some(vec![1, 2, 4]));
    }

    #[test]
    fn test_bounding_box() {
        let overlay = BoundedOverlay::new(Everywhere)
            .with_bounding_box(&BoundingBox::new(2.0, 48.0, 3.0, 49.0), &Projection::wgs84())
            .unwrap();

        let paris = tile_coord(2.35, 48.85, 10);
        assert!(overlay.has_tile(paris.x, paris.y, 10));

        let new_york = tile_coord(-74.0, 40.7, 10);
        assert!(!overlay.has_tile(new_york.x, new_york.y, 10));

        let back = overlay.bounds().bounding_box(&Projection::wgs84()).unwrap().unwrap();
        assert!((back.min_x - 2.0).abs() < 1e-9 && (back.max_y - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_across_antimeridian() {
        // 170°E → 170°W, exprimé avec max_x > 180
        let overlay = BoundedOverlay::new(Everywhere)
            .with_bounding_box(&BoundingBox::new(170.0, -20.0, 190.0, 20.0), &Projection::wgs84())
            .unwrap();

        let west = tile_coord(-175.0, 0.0, 6);
        assert!(overlay.has_tile(west.x, west.y, 6));
        let east = tile_coord(175.0, 0.0, 6);
        assert!(overlay.has_tile(east.x, east.y, 6));
        let outside = tile_coord(0.0, 0.0, 6);
        assert!(!overlay.has_tile(outside.x, outside.y, 6));
    }
}
