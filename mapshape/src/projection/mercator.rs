//! Projection Web Mercator (EPSG:3857)
//!
//! Modèle sphérique avec le rayon équatorial WGS84, utilisé par les
//! grilles de tuiles XYZ.

/// Rayon équatorial WGS84 en mètres
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Demi-largeur du monde en Web Mercator (mètres)
pub const WEB_MERCATOR_HALF_WORLD_WIDTH: f64 = 20_037_508.342789244;

/// Latitude maximale représentable en Web Mercator
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.0511287798066;

/// Convertit des degrés WGS84 vers Web Mercator
pub fn wgs84_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    // Limiter la latitude pour éviter l'infini
    let lat = lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);

    let x = lon * WEB_MERCATOR_HALF_WORLD_WIDTH / 180.0;
    let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();

    (x, y)
}

/// Convertit Web Mercator vers des degrés WGS84
pub fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 180.0 / WEB_MERCATOR_HALF_WORLD_WIDTH;
    let lat = 2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2;

    (lon, lat.to_degrees())
}
