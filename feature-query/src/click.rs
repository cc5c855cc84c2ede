//! Contexte d'un clic carte et zone de tolérance associée

use geo::{HaversineDestination, HaversineDistance, Point as GeoPoint};
use mapshape::tiles::{self, TileCoord};
use mapshape::{BoundingBox, LatLng};

use crate::config::validate_percentage;
use crate::error::Result;

/// Clic sur la carte et état de la vue au moment du clic
#[derive(Debug, Clone, PartialEq)]
pub struct ClickContext {
    /// Position cliquée (WGS84)
    pub location: LatLng,
    /// Zoom courant, éventuellement fractionnaire
    pub zoom: f64,
    /// Emprise WGS84 visible, `max_x` au-delà de 180 si elle traverse l'antiméridien
    pub viewport: BoundingBox,
    /// Taille de la vue en pixels, 0 si inconnue
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Densité d'écran (pixels physiques par pixel logique)
    pub density: f64,
}

impl ClickContext {
    pub fn new(location: LatLng, zoom: f64, viewport: BoundingBox) -> Self {
        Self {
            location,
            zoom,
            viewport,
            pixel_width: 0,
            pixel_height: 0,
            density: 1.0,
        }
    }

    pub fn with_pixel_size(mut self, width: u32, height: u32) -> Self {
        self.pixel_width = width;
        self.pixel_height = height;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Niveau de zoom entier de la grille de tuiles
    pub fn tile_zoom(&self) -> u8 {
        self.zoom.clamp(0.0, 31.0) as u8
    }

    /// Tuile contenant le clic
    pub fn tile(&self) -> TileCoord {
        tiles::tile_coord(self.location.lng, self.location.lat, self.tile_zoom())
    }

    /// Résolution au sol à la latitude du clic
    pub fn meters_per_pixel(&self) -> f64 {
        tiles::meters_per_pixel(self.zoom, self.location.lat)
    }

    /// Mètres par pixel dans la dimension d'écran la plus serrée
    ///
    /// `None` si la taille de la vue est inconnue.
    pub fn pixel_tolerance(&self) -> Option<f64> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return None;
        }
        let width = self.viewport.longitude_distance() / self.pixel_width as f64;
        let height = self.viewport.latitude_distance() / self.pixel_height as f64;
        Some(width.min(height))
    }

    /// Zone de tolérance pour une part d'écran donnée
    ///
    /// Sans taille de vue en pixels, la tolérance retombe sur la demi-largeur
    /// ou demi-hauteur de la zone, la plus petite des deux.
    pub fn region(&self, screen_click_percentage: f64) -> Result<ClickRegion> {
        validate_percentage(screen_click_percentage)?;

        let width = self.viewport.longitude_distance() * screen_click_percentage;
        let height = self.viewport.latitude_distance() * screen_click_percentage;

        let click = GeoPoint::new(self.location.lng, self.location.lat);
        let left = click.haversine_destination(270.0, width);
        let up = click.haversine_destination(0.0, height);
        let right = click.haversine_destination(90.0, width);
        let down = click.haversine_destination(180.0, height);

        // Demi-zone la plus serrée
        let tolerance = self.pixel_tolerance().unwrap_or_else(|| {
            click
                .haversine_distance(&left)
                .min(click.haversine_distance(&up))
        });

        Ok(ClickRegion {
            bbox: BoundingBox::new(left.x(), down.y(), right.x(), up.y()),
            tolerance,
        })
    }
}

/// Zone de requête autour d'un clic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickRegion {
    /// Emprise WGS84 transmise à l'index
    pub bbox: BoundingBox,
    /// Tolérance en mètres pour le filtrage fin
    pub tolerance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    fn context() -> ClickContext {
        ClickContext::new(
            LatLng::new(45.0, 5.0),
            12.0,
            BoundingBox::new(4.9, 44.95, 5.1, 45.05),
        )
    }

    #[test]
    fn test_region_surrounds_click() {
        let region = context().region(0.05).unwrap();
        assert!(region.bbox.min_x < 5.0 && region.bbox.max_x > 5.0);
        assert!(region.bbox.min_y < 45.0 && region.bbox.max_y > 45.0);

        // 5 % de ~15.7 km en longitude
        let width = region.bbox.longitude_distance();
        assert!((width - 2.0 * 0.05 * context().viewport.longitude_distance()).abs() < 1.0);
    }

    #[test]
    fn test_pixel_tolerance() {
        let ctx = context().with_pixel_size(1000, 500);
        let expected = (ctx.viewport.longitude_distance() / 1000.0)
            .min(ctx.viewport.latitude_distance() / 500.0);
        assert_eq!(ctx.pixel_tolerance(), Some(expected));
        assert_eq!(ctx.region(0.03).unwrap().tolerance, expected);
        assert_eq!(context().pixel_tolerance(), None);
    }

    #[test]
    fn test_tolerance_without_pixel_size() {
        let region = context().region(0.05).unwrap();
        let half_width = 0.05 * context().viewport.longitude_distance();
        let half_height = 0.05 * context().viewport.latitude_distance();

        assert!(region.tolerance > 0.0);
        assert!((region.tolerance - half_width.min(half_height)).abs() < 1.0);
    }

    #[test]
    fn test_percentage_validated() {
        assert!(matches!(context().region(-0.1), Err(QueryError::Configuration(_))));
        assert!(context().region(0.0).is_ok());
    }

    #[test]
    fn test_tile() {
        let ctx = ClickContext::new(
            LatLng::new(38.753195, -77.196785),
            6.7,
            BoundingBox::world_wgs84(),
        );
        let tile = ctx.tile();
        assert_eq!((tile.x, tile.y, tile.zoom), (18, 24, 6));
    }
}
