//! Conversion géométrie ↔ forme carte
//!
//! Sens géométrie → forme : projection en WGS84, simplification optionnelle
//! (Douglas-Peucker en mètres), indication d'élévation par le Z maximal.
//!
//! Sens forme → géométrie : projection vers la projection native, anneaux de
//! polygone fermés et réorientés selon [`ConverterOptions`].
//!
//! Les surfaces polyédriques, TIN et triangles s'affichent comme des
//! multi-polygones mais ne se reconvertissent pas en géométrie.

mod map;
mod orientation;

pub use map::add_shape_to_map;
pub use orientation::{close_ring, orient, orientation, signed_area, PolygonOrientation};

use geo::{Coord, LineString as GeoLineString, SimplifyIdx};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};
use crate::geometry::{
    CompoundCurve, Curve, CurvePolygon, Geometry, GeometryCollection, GeometryType, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, PolyhedralSurface,
};
use crate::projection::Projector;
use crate::shape::{LatLng, MapShape, PolygonShape, PolylineShape, Shape};

/// Options de conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterOptions {
    /// Sens de l'anneau extérieur (`None` : conservé)
    pub exterior_orientation: Option<PolygonOrientation>,
    /// Sens des trous (`None` : conservé)
    pub hole_orientation: Option<PolygonOrientation>,
    /// Tolérance de simplification en mètres
    pub simplify_tolerance: Option<f64>,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            exterior_orientation: Some(PolygonOrientation::CounterClockwise),
            hole_orientation: Some(PolygonOrientation::Clockwise),
            simplify_tolerance: None,
        }
    }
}

/// Convertisseur entre géométries (projection native) et formes (WGS84)
#[derive(Debug)]
pub struct ShapeConverter {
    projector: Projector,
    options: ConverterOptions,
}

impl Default for ShapeConverter {
    fn default() -> Self {
        Self::new(Projector::identity())
    }
}

impl ShapeConverter {
    pub fn new(projector: Projector) -> Self {
        Self::with_options(projector, ConverterOptions::default())
    }

    pub fn with_options(projector: Projector, options: ConverterOptions) -> Self {
        Self { projector, options }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ConverterOptions) {
        self.options = options;
    }

    // ------------------------------------------------------------------
    // Géométrie → forme
    // ------------------------------------------------------------------

    pub fn to_lat_lng(&self, point: &Point) -> Result<LatLng> {
        let geographic = self.projector.to_geographic(point)?;
        Ok(LatLng::new(geographic.y, geographic.x))
    }

    fn to_lat_lngs(&self, points: &[Point]) -> Result<Vec<LatLng>> {
        points.iter().map(|p| self.to_lat_lng(p)).collect()
    }

    /// Simplifie une suite de points si une tolérance est configurée
    ///
    /// Les sommets conservés sont ceux d'origine, Z et M compris.
    pub fn simplify_points(&self, points: &[Point]) -> Result<Vec<Point>> {
        let Some(tolerance) = self.options.simplify_tolerance else {
            return Ok(points.to_vec());
        };
        if points.len() < 3 {
            return Ok(points.to_vec());
        }

        let metric = self.projector.to_metric(points)?;
        let line: GeoLineString<f64> = metric.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
        let kept = line.simplify_idx(&tolerance);
        Ok(kept.into_iter().map(|i| points[i]).collect())
    }

    pub fn to_polyline(&self, line: &LineString) -> Result<PolylineShape> {
        let points = self.simplify_points(&line.points)?;
        Ok(PolylineShape {
            points: self.to_lat_lngs(&points)?,
            elevation: elevation(line.has_z, &points),
        })
    }

    /// Polygone depuis ses anneaux (extérieur en premier)
    fn rings_to_polygon_shape(&self, rings: &[&[Point]], has_z: bool) -> Result<PolygonShape> {
        let Some((exterior, holes)) = rings.split_first() else {
            return Ok(PolygonShape::default());
        };

        let exterior = self.simplify_points(exterior)?;
        let mut all_points = exterior.clone();
        let mut hole_shapes = Vec::with_capacity(holes.len());
        for hole in holes {
            let hole = self.simplify_points(hole)?;
            hole_shapes.push(self.to_lat_lngs(&hole)?);
            all_points.extend(hole);
        }

        Ok(PolygonShape {
            points: self.to_lat_lngs(&exterior)?,
            holes: hole_shapes,
            elevation: elevation(has_z, &all_points),
        })
    }

    pub fn to_polygon_shape(&self, polygon: &Polygon) -> Result<PolygonShape> {
        let rings: Vec<&[Point]> = polygon.rings.iter().map(|r| r.points.as_slice()).collect();
        self.rings_to_polygon_shape(&rings, polygon.has_z)
    }

    /// CurvePolygon : les courbes composées sont aplaties en anneaux
    pub fn curve_polygon_to_shape(&self, polygon: &CurvePolygon) -> Result<PolygonShape> {
        let owned: Vec<Vec<Point>> = polygon.rings.iter().map(Curve::points).collect();
        let rings: Vec<&[Point]> = owned.iter().map(Vec::as_slice).collect();
        self.rings_to_polygon_shape(&rings, polygon.has_z)
    }

    fn polygons_to_shapes(&self, polygons: &[Polygon]) -> Result<Vec<PolygonShape>> {
        polygons.iter().map(|p| self.to_polygon_shape(p)).collect()
    }

    /// Convertit une géométrie en forme affichable
    pub fn to_shape(&self, geometry: &Geometry) -> Result<MapShape> {
        let shape = match geometry {
            Geometry::Point(point) => Shape::LatLng(self.to_lat_lng(point)?),
            Geometry::LineString(line) | Geometry::CircularString(line) => {
                Shape::Polyline(self.to_polyline(line)?)
            }
            Geometry::Polygon(polygon) | Geometry::Triangle(polygon) => {
                Shape::Polygon(self.to_polygon_shape(polygon)?)
            }
            Geometry::CurvePolygon(polygon) => Shape::Polygon(self.curve_polygon_to_shape(polygon)?),
            Geometry::MultiPoint(multi) => Shape::MultiLatLng(self.to_lat_lngs(&multi.points)?),
            Geometry::MultiLineString(MultiLineString { line_strings, .. })
            | Geometry::CompoundCurve(CompoundCurve { line_strings, .. }) => Shape::MultiPolyline(
                line_strings
                    .iter()
                    .map(|l| self.to_polyline(l))
                    .collect::<Result<_>>()?,
            ),
            Geometry::MultiPolygon(MultiPolygon { polygons, .. })
            | Geometry::PolyhedralSurface(PolyhedralSurface { polygons, .. })
            | Geometry::Tin(PolyhedralSurface { polygons, .. }) => {
                Shape::MultiPolygon(self.polygons_to_shapes(polygons)?)
            }
            Geometry::GeometryCollection(collection) => Shape::Collection(
                collection
                    .geometries
                    .iter()
                    .map(|g| self.to_shape(g))
                    .collect::<Result<_>>()?,
            ),
        };

        Ok(MapShape::new(geometry.geometry_type(), shape))
    }

    // ------------------------------------------------------------------
    // Forme → géométrie
    // ------------------------------------------------------------------

    pub fn to_point(&self, lat_lng: LatLng) -> Result<Point> {
        self.projector.to_native(&Point::new(lat_lng.lng, lat_lng.lat))
    }

    fn to_points(&self, lat_lngs: &[LatLng]) -> Result<Vec<Point>> {
        lat_lngs.iter().map(|p| self.to_point(*p)).collect()
    }

    pub fn to_line_string(&self, lat_lngs: &[LatLng]) -> Result<LineString> {
        Ok(LineString::new(self.to_points(lat_lngs)?))
    }

    /// Polygone fermé et orienté selon les options
    pub fn to_polygon(&self, points: &[LatLng], holes: &[Vec<LatLng>]) -> Result<Polygon> {
        let mut rings = Vec::with_capacity(holes.len() + 1);

        let exterior = orient(points.to_vec(), self.options.exterior_orientation);
        rings.push(LineString::new(self.to_points(&exterior)?));

        for hole in holes {
            let hole = orient(hole.clone(), self.options.hole_orientation);
            rings.push(LineString::new(self.to_points(&hole)?));
        }

        Ok(Polygon::new(rings))
    }

    fn polygon_shapes_to_polygons(&self, polygons: &[PolygonShape]) -> Result<Vec<Polygon>> {
        polygons
            .iter()
            .map(|p| self.to_polygon(&p.points, &p.holes))
            .collect()
    }

    fn polylines_to_line_strings(&self, polylines: &[PolylineShape]) -> Result<Vec<LineString>> {
        polylines
            .iter()
            .map(|p| self.to_line_string(&p.points))
            .collect()
    }

    /// Reconvertit une forme en géométrie du type d'origine
    pub fn to_geometry(&self, shape: &MapShape) -> Result<Geometry> {
        let geometry_type = shape.geometry_type;
        let incompatible = || ShapeError::IncompatibleShape {
            shape: shape.shape_type(),
            geometry: geometry_type,
        };

        let geometry = match (geometry_type, &shape.shape) {
            (GeometryType::Point, Shape::LatLng(p)) => Geometry::Point(self.to_point(*p)?),
            (GeometryType::LineString, Shape::Polyline(line)) => {
                Geometry::LineString(self.to_line_string(&line.points)?)
            }
            (GeometryType::CircularString, Shape::Polyline(line)) => {
                Geometry::CircularString(self.to_line_string(&line.points)?)
            }
            (GeometryType::Polygon, Shape::Polygon(p)) => {
                Geometry::Polygon(self.to_polygon(&p.points, &p.holes)?)
            }
            (GeometryType::CurvePolygon, Shape::Polygon(p)) => {
                let polygon = self.to_polygon(&p.points, &p.holes)?;
                let rings = polygon.rings.into_iter().map(Curve::LineString).collect();
                Geometry::CurvePolygon(CurvePolygon::new(rings))
            }
            (GeometryType::MultiPoint, Shape::MultiLatLng(points)) => {
                Geometry::MultiPoint(MultiPoint::new(self.to_points(points)?))
            }
            (GeometryType::MultiLineString, Shape::MultiPolyline(lines)) => Geometry::MultiLineString(
                MultiLineString::new(self.polylines_to_line_strings(lines)?),
            ),
            (GeometryType::CompoundCurve, Shape::MultiPolyline(lines)) => Geometry::CompoundCurve(
                CompoundCurve::new(self.polylines_to_line_strings(lines)?),
            ),
            (GeometryType::MultiPolygon, Shape::MultiPolygon(polygons)) => Geometry::MultiPolygon(
                MultiPolygon::new(self.polygon_shapes_to_polygons(polygons)?),
            ),
            (GeometryType::GeometryCollection, Shape::Collection(shapes)) => {
                Geometry::GeometryCollection(GeometryCollection::new(
                    shapes
                        .iter()
                        .map(|s| self.to_geometry(s))
                        .collect::<Result<_>>()?,
                ))
            }
            (
                GeometryType::PolyhedralSurface | GeometryType::Tin | GeometryType::Triangle,
                _,
            ) => return Err(ShapeError::UnsupportedGeometryType(geometry_type)),
            _ => return Err(incompatible()),
        };

        Ok(geometry)
    }
}

/// Z maximal des points, si la géométrie porte un Z
fn elevation(has_z: bool, points: &[Point]) -> Option<f64> {
    if !has_z {
        return None;
    }
    points.iter().filter_map(|p| p.z).reduce(f64::max)
}
