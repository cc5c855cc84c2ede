//! Grille de tuiles XYZ (Web Mercator)
//!
//! Origine en haut à gauche, `2^zoom` tuiles par côté.

use crate::bbox::BoundingBox;
use crate::error::Result;
use crate::geometry::Point;
use crate::projection::{
    web_mercator_to_wgs84, wgs84_to_web_mercator, Projection, Transform,
    WEB_MERCATOR_HALF_WORLD_WIDTH,
};

/// Taille d'une tuile en pixels
pub const TILE_PIXELS: f64 = 256.0;

/// Coordonnées d'une tuile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

/// Nombre de tuiles par côté au niveau de zoom
pub fn tiles_per_side(zoom: u8) -> u32 {
    1u32 << zoom.min(31)
}

/// Largeur d'une tuile en mètres Web Mercator
pub fn tile_size(zoom: u8) -> f64 {
    2.0 * WEB_MERCATOR_HALF_WORLD_WIDTH / tiles_per_side(zoom) as f64
}

/// Résolution au sol (mètres par pixel) pour un zoom éventuellement fractionnaire
pub fn meters_per_pixel(zoom: f64, latitude: f64) -> f64 {
    let resolution = 2.0 * WEB_MERCATOR_HALF_WORLD_WIDTH / (2f64.powf(zoom) * TILE_PIXELS);
    resolution * latitude.to_radians().cos()
}

/// Tuile contenant une coordonnée WGS84
pub fn tile_coord(lon: f64, lat: f64, zoom: u8) -> TileCoord {
    let (x, y) = wgs84_to_web_mercator(lon, lat);
    let size = tile_size(zoom);
    let max_index = (tiles_per_side(zoom) - 1) as f64;

    let tile_x = ((x + WEB_MERCATOR_HALF_WORLD_WIDTH) / size).floor();
    let tile_y = ((WEB_MERCATOR_HALF_WORLD_WIDTH - y) / size).floor();

    TileCoord {
        x: tile_x.clamp(0.0, max_index) as u32,
        y: tile_y.clamp(0.0, max_index) as u32,
        zoom,
    }
}

/// Tuile contenant un point WGS84
pub fn tile_coord_for_point(point: &Point, zoom: u8) -> TileCoord {
    tile_coord(point.x, point.y, zoom)
}

/// Emprise Web Mercator d'une tuile
pub fn web_mercator_tile_bounds(x: u32, y: u32, zoom: u8) -> BoundingBox {
    let size = tile_size(zoom);
    let min_x = -WEB_MERCATOR_HALF_WORLD_WIDTH + x as f64 * size;
    let max_y = WEB_MERCATOR_HALF_WORLD_WIDTH - y as f64 * size;
    BoundingBox::new(min_x, max_y - size, min_x + size, max_y)
}

/// Emprise WGS84 d'une tuile
pub fn wgs84_tile_bounds(x: u32, y: u32, zoom: u8) -> BoundingBox {
    let mercator = web_mercator_tile_bounds(x, y, zoom);
    let (min_lon, min_lat) = web_mercator_to_wgs84(mercator.min_x, mercator.min_y);
    let (max_lon, max_lat) = web_mercator_to_wgs84(mercator.max_x, mercator.max_y);
    BoundingBox::new(min_lon, min_lat, max_lon, max_lat)
}

/// Emprise WGS84 de la tuile contenant la coordonnée
pub fn tile_bounds(lon: f64, lat: f64, zoom: u8) -> BoundingBox {
    let tile = tile_coord(lon, lat, zoom);
    wgs84_tile_bounds(tile.x, tile.y, zoom)
}

/// Emprise WGS84 de la tuile contenant le point
pub fn tile_bounds_for_point(point: &Point, zoom: u8) -> BoundingBox {
    tile_bounds(point.x, point.y, zoom)
}

/// Emprise, dans une projection donnée, de la tuile contenant la coordonnée WGS84
pub fn tile_bounds_in(projection: &Projection, lon: f64, lat: f64, zoom: u8) -> Result<BoundingBox> {
    let tile = tile_coord(lon, lat, zoom);
    let mercator = web_mercator_tile_bounds(tile.x, tile.y, zoom);
    let transform = Transform::new(&Projection::web_mercator(), projection)?;
    mercator.transform(&transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bbox(actual: BoundingBox, expected: (f64, f64, f64, f64)) {
        let eps = 1e-9;
        assert!((actual.min_x - expected.0).abs() < eps, "{:?}", actual);
        assert!((actual.min_y - expected.1).abs() < eps, "{:?}", actual);
        assert!((actual.max_x - expected.2).abs() < eps, "{:?}", actual);
        assert!((actual.max_y - expected.3).abs() < eps, "{:?}", actual);
    }

    #[test]
    fn test_tile_bounds_zoom_6() {
        let bbox = tile_bounds(-77.196785, 38.753195, 6);
        assert_bbox(bbox, (-78.75, 36.597889133070204, -73.125, 40.97989806962014));

        // Entrées point et coordonnée identiques
        let from_point = tile_bounds_for_point(&Point::new(-77.196785, 38.753195), 6);
        assert_eq!(bbox, from_point);
    }

    #[test]
    fn test_tile_bounds_web_mercator() {
        let bbox = tile_bounds_in(&Projection::web_mercator(), -77.196785, 38.753195, 6).unwrap();
        let eps = 1e-6;
        assert!((bbox.min_x + 8766409.899970295).abs() < eps, "{:?}", bbox);
        assert!((bbox.min_y - 4383204.9499851465).abs() < eps, "{:?}", bbox);
        assert!((bbox.max_x + 8140237.7642581295).abs() < eps, "{:?}", bbox);
        assert!((bbox.max_y - 5009377.085697312).abs() < eps, "{:?}", bbox);
    }

    #[test]
    fn test_tile_bounds_zoom_15() {
        let bbox = tile_bounds(151.215026, -33.856686, 15);
        assert_bbox(
            bbox,
            (
                151.20483398437506,
                -33.86129311351553,
                151.21582031250003,
                -33.852169701407426,
            ),
        );
    }

    #[test]
    fn test_tile_coord_clamped() {
        let tile = tile_coord(180.0, -90.0, 2);
        assert_eq!(tile, TileCoord { x: 3, y: 3, zoom: 2 });
        let tile = tile_coord(-180.0, 90.0, 0);
        assert_eq!(tile, TileCoord { x: 0, y: 0, zoom: 0 });
    }

    #[test]
    fn test_meters_per_pixel() {
        // Zoom 0 à l'équateur : 156543 m/px
        assert!((meters_per_pixel(0.0, 0.0) - 156_543.03).abs() < 0.01);
        assert!(meters_per_pixel(10.0, 60.0) < meters_per_pixel(10.0, 0.0));
    }
}
