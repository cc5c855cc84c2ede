//! Modèle de géométrie vectorielle (13 types, dimensions Z/M)
//!
//! Le modèle suit la hiérarchie simple feature : un polygone non vide a
//! toujours son anneau extérieur en premier, les trous ensuite.

use std::fmt;

use geozero::error::Result as GeozeroResult;
use geozero::{CoordDimensions, GeomProcessor, GeozeroGeometry};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Type de géométrie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeometryType {
    Point,
    #[serde(rename = "LINESTRING")]
    LineString,
    Polygon,
    #[serde(rename = "MULTIPOINT")]
    MultiPoint,
    #[serde(rename = "MULTILINESTRING")]
    MultiLineString,
    #[serde(rename = "MULTIPOLYGON")]
    MultiPolygon,
    #[serde(rename = "CIRCULARSTRING")]
    CircularString,
    #[serde(rename = "COMPOUNDCURVE")]
    CompoundCurve,
    #[serde(rename = "CURVEPOLYGON")]
    CurvePolygon,
    #[serde(rename = "POLYHEDRALSURFACE")]
    PolyhedralSurface,
    Tin,
    Triangle,
    #[serde(rename = "GEOMETRYCOLLECTION")]
    GeometryCollection,
}

impl GeometryType {
    /// Nom WKT du type
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::CircularString => "CIRCULARSTRING",
            Self::CompoundCurve => "COMPOUNDCURVE",
            Self::CurvePolygon => "CURVEPOLYGON",
            Self::PolyhedralSurface => "POLYHEDRALSURFACE",
            Self::Tin => "TIN",
            Self::Triangle => "TRIANGLE",
            Self::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point avec Z et M optionnels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    pub fn new_z(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Ajoute une mesure M
    pub fn with_m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }
}

fn dims<'a>(points: impl IntoIterator<Item = &'a Point>) -> (bool, bool) {
    points.into_iter().fold((false, false), |(z, m), p| {
        (z || p.z.is_some(), m || p.m.is_some())
    })
}

/// Suite ordonnée de points (LineString, CircularString, anneau)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    pub points: Vec<Point>,
    pub has_z: bool,
    pub has_m: bool,
}

impl LineString {
    /// Crée une ligne, les dimensions sont déduites des points
    pub fn new(points: Vec<Point>) -> Self {
        let (has_z, has_m) = dims(&points);
        Self {
            points,
            has_z,
            has_m,
        }
    }

    pub fn with_dims(points: Vec<Point>, has_z: bool, has_m: bool) -> Self {
        Self {
            points,
            has_z,
            has_m,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Polygone : anneau extérieur puis trous
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub rings: Vec<LineString>,
    pub has_z: bool,
    pub has_m: bool,
}

impl Polygon {
    pub fn new(rings: Vec<LineString>) -> Self {
        let has_z = rings.iter().any(|r| r.has_z);
        let has_m = rings.iter().any(|r| r.has_m);
        Self {
            rings,
            has_z,
            has_m,
        }
    }

    /// Anneau extérieur (absent si polygone vide)
    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }

    /// Anneaux intérieurs
    pub fn holes(&self) -> &[LineString] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPoint {
    pub points: Vec<Point>,
    pub has_z: bool,
    pub has_m: bool,
}

impl MultiPoint {
    pub fn new(points: Vec<Point>) -> Self {
        let (has_z, has_m) = dims(&points);
        Self {
            points,
            has_z,
            has_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLineString {
    pub line_strings: Vec<LineString>,
    pub has_z: bool,
    pub has_m: bool,
}

impl MultiLineString {
    pub fn new(line_strings: Vec<LineString>) -> Self {
        let has_z = line_strings.iter().any(|l| l.has_z);
        let has_m = line_strings.iter().any(|l| l.has_m);
        Self {
            line_strings,
            has_z,
            has_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
    pub has_z: bool,
    pub has_m: bool,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let has_z = polygons.iter().any(|p| p.has_z);
        let has_m = polygons.iter().any(|p| p.has_m);
        Self {
            polygons,
            has_z,
            has_m,
        }
    }
}

/// Courbe composée de segments linéaires enchaînés
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundCurve {
    pub line_strings: Vec<LineString>,
    pub has_z: bool,
    pub has_m: bool,
}

impl CompoundCurve {
    pub fn new(line_strings: Vec<LineString>) -> Self {
        let has_z = line_strings.iter().any(|l| l.has_z);
        let has_m = line_strings.iter().any(|l| l.has_m);
        Self {
            line_strings,
            has_z,
            has_m,
        }
    }

    /// Points de tous les segments, dans l'ordre
    pub fn points(&self) -> Vec<Point> {
        self.line_strings
            .iter()
            .flat_map(|l| l.points.iter().copied())
            .collect()
    }
}

/// Anneau d'un CurvePolygon
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    LineString(LineString),
    CircularString(LineString),
    CompoundCurve(CompoundCurve),
}

impl Curve {
    /// Points de l'anneau (segments d'une courbe composée concaténés)
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::LineString(l) | Self::CircularString(l) => l.points.clone(),
            Self::CompoundCurve(c) => c.points(),
        }
    }

    fn dims(&self) -> (bool, bool) {
        match self {
            Self::LineString(l) | Self::CircularString(l) => (l.has_z, l.has_m),
            Self::CompoundCurve(c) => (c.has_z, c.has_m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurvePolygon {
    pub rings: Vec<Curve>,
    pub has_z: bool,
    pub has_m: bool,
}

impl CurvePolygon {
    pub fn new(rings: Vec<Curve>) -> Self {
        let (has_z, has_m) = rings.iter().fold((false, false), |(z, m), r| {
            let (rz, rm) = r.dims();
            (z || rz, m || rm)
        });
        Self {
            rings,
            has_z,
            has_m,
        }
    }
}

/// Surface polyédrique ou TIN
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyhedralSurface {
    pub polygons: Vec<Polygon>,
    pub has_z: bool,
    pub has_m: bool,
}

impl PolyhedralSurface {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let has_z = polygons.iter().any(|p| p.has_z);
        let has_m = polygons.iter().any(|p| p.has_m);
        Self {
            polygons,
            has_z,
            has_m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryCollection {
    pub geometries: Vec<Geometry>,
    pub has_z: bool,
    pub has_m: bool,
}

impl GeometryCollection {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        let has_z = geometries.iter().any(|g| g.has_z());
        let has_m = geometries.iter().any(|g| g.has_m());
        Self {
            geometries,
            has_z,
            has_m,
        }
    }
}

/// Géométrie vectorielle
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    CircularString(LineString),
    CompoundCurve(CompoundCurve),
    CurvePolygon(CurvePolygon),
    PolyhedralSurface(PolyhedralSurface),
    Tin(PolyhedralSurface),
    Triangle(Polygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Self::Point(_) => GeometryType::Point,
            Self::LineString(_) => GeometryType::LineString,
            Self::Polygon(_) => GeometryType::Polygon,
            Self::MultiPoint(_) => GeometryType::MultiPoint,
            Self::MultiLineString(_) => GeometryType::MultiLineString,
            Self::MultiPolygon(_) => GeometryType::MultiPolygon,
            Self::CircularString(_) => GeometryType::CircularString,
            Self::CompoundCurve(_) => GeometryType::CompoundCurve,
            Self::CurvePolygon(_) => GeometryType::CurvePolygon,
            Self::PolyhedralSurface(_) => GeometryType::PolyhedralSurface,
            Self::Tin(_) => GeometryType::Tin,
            Self::Triangle(_) => GeometryType::Triangle,
            Self::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn has_z(&self) -> bool {
        match self {
            Self::Point(p) => p.z.is_some(),
            Self::LineString(g) | Self::CircularString(g) => g.has_z,
            Self::Polygon(g) | Self::Triangle(g) => g.has_z,
            Self::MultiPoint(g) => g.has_z,
            Self::MultiLineString(g) => g.has_z,
            Self::MultiPolygon(g) => g.has_z,
            Self::CompoundCurve(g) => g.has_z,
            Self::CurvePolygon(g) => g.has_z,
            Self::PolyhedralSurface(g) | Self::Tin(g) => g.has_z,
            Self::GeometryCollection(g) => g.has_z,
        }
    }

    pub fn has_m(&self) -> bool {
        match self {
            Self::Point(p) => p.m.is_some(),
            Self::LineString(g) | Self::CircularString(g) => g.has_m,
            Self::Polygon(g) | Self::Triangle(g) => g.has_m,
            Self::MultiPoint(g) => g.has_m,
            Self::MultiLineString(g) => g.has_m,
            Self::MultiPolygon(g) => g.has_m,
            Self::CompoundCurve(g) => g.has_m,
            Self::CurvePolygon(g) => g.has_m,
            Self::PolyhedralSurface(g) | Self::Tin(g) => g.has_m,
            Self::GeometryCollection(g) => g.has_m,
        }
    }

    /// Applique une transformation à chaque point, en conservant la structure
    pub fn try_map_points<F>(&self, f: &mut F) -> Result<Geometry>
    where
        F: FnMut(&Point) -> Result<Point>,
    {
        fn line<F>(l: &LineString, f: &mut F) -> Result<LineString>
        where
            F: FnMut(&Point) -> Result<Point>,
        {
            let points = l.points.iter().map(&mut *f).collect::<Result<Vec<_>>>()?;
            Ok(LineString::with_dims(points, l.has_z, l.has_m))
        }

        fn polygon<F>(p: &Polygon, f: &mut F) -> Result<Polygon>
        where
            F: FnMut(&Point) -> Result<Point>,
        {
            let rings = p.rings.iter().map(|r| line(r, &mut *f)).collect::<Result<Vec<_>>>()?;
            Ok(Polygon {
                rings,
                has_z: p.has_z,
                has_m: p.has_m,
            })
        }

        fn compound<F>(c: &CompoundCurve, f: &mut F) -> Result<CompoundCurve>
        where
            F: FnMut(&Point) -> Result<Point>,
        {
            let line_strings = c
                .line_strings
                .iter()
                .map(|l| line(l, &mut *f))
                .collect::<Result<Vec<_>>>()?;
            Ok(CompoundCurve {
                line_strings,
                has_z: c.has_z,
                has_m: c.has_m,
            })
        }

        fn surface<F>(s: &PolyhedralSurface, f: &mut F) -> Result<PolyhedralSurface>
        where
            F: FnMut(&Point) -> Result<Point>,
        {
            let polygons = s
                .polygons
                .iter()
                .map(|p| polygon(p, &mut *f))
                .collect::<Result<Vec<_>>>()?;
            Ok(PolyhedralSurface {
                polygons,
                has_z: s.has_z,
                has_m: s.has_m,
            })
        }

        Ok(match self {
            Self::Point(p) => Self::Point(f(p)?),
            Self::LineString(l) => Self::LineString(line(l, &mut *f)?),
            Self::CircularString(l) => Self::CircularString(line(l, &mut *f)?),
            Self::Polygon(p) => Self::Polygon(polygon(p, &mut *f)?),
            Self::Triangle(p) => Self::Triangle(polygon(p, &mut *f)?),
            Self::MultiPoint(mp) => Self::MultiPoint(MultiPoint {
                points: mp.points.iter().map(&mut *f).collect::<Result<Vec<_>>>()?,
                has_z: mp.has_z,
                has_m: mp.has_m,
            }),
            Self::MultiLineString(ml) => Self::MultiLineString(MultiLineString {
                line_strings: ml
                    .line_strings
                    .iter()
                    .map(|l| line(l, &mut *f))
                    .collect::<Result<Vec<_>>>()?,
                has_z: ml.has_z,
                has_m: ml.has_m,
            }),
            Self::MultiPolygon(mp) => Self::MultiPolygon(MultiPolygon {
                polygons: mp
                    .polygons
                    .iter()
                    .map(|p| polygon(p, &mut *f))
                    .collect::<Result<Vec<_>>>()?,
                has_z: mp.has_z,
                has_m: mp.has_m,
            }),
            Self::CompoundCurve(c) => Self::CompoundCurve(compound(c, &mut *f)?),
            Self::CurvePolygon(cp) => {
                let rings = cp
                    .rings
                    .iter()
                    .map(|r| {
                        Ok(match r {
                            Curve::LineString(l) => Curve::LineString(line(l, &mut *f)?),
                            Curve::CircularString(l) => {
                                Curve::CircularString(line(l, &mut *f)?)
                            }
                            Curve::CompoundCurve(c) => {
                                Curve::CompoundCurve(compound(c, &mut *f)?)
                            }
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::CurvePolygon(CurvePolygon {
                    rings,
                    has_z: cp.has_z,
                    has_m: cp.has_m,
                })
            }
            Self::PolyhedralSurface(s) => Self::PolyhedralSurface(surface(s, &mut *f)?),
            Self::Tin(s) => Self::Tin(surface(s, &mut *f)?),
            Self::GeometryCollection(gc) => Self::GeometryCollection(GeometryCollection {
                geometries: gc
                    .geometries
                    .iter()
                    .map(|g| g.try_map_points(&mut *f))
                    .collect::<Result<Vec<_>>>()?,
                has_z: gc.has_z,
                has_m: gc.has_m,
            }),
        })
    }

    /// Représentation WKT (XY)
    pub fn wkt(&self) -> Result<String> {
        Ok(geozero::ToWkt::to_wkt(self)?)
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Self::Point(point)
    }
}

// Émission geozero

fn process_coord<P: GeomProcessor>(
    p: &Point,
    multi_dim: bool,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    if multi_dim {
        processor.coordinate(p.x, p.y, p.z, p.m, None, None, idx)
    } else {
        processor.xy(p.x, p.y, idx)
    }
}

fn process_coords<P: GeomProcessor>(points: &[Point], processor: &mut P) -> GeozeroResult<()> {
    let multi_dim = processor.multi_dim();
    for (i, p) in points.iter().enumerate() {
        process_coord(p, multi_dim, i, processor)?;
    }
    Ok(())
}

fn process_line<P: GeomProcessor>(
    line: &LineString,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.linestring_begin(tagged, line.len(), idx)?;
    process_coords(&line.points, processor)?;
    processor.linestring_end(tagged, idx)
}

fn process_circular<P: GeomProcessor>(
    line: &LineString,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.circularstring_begin(line.len(), idx)?;
    process_coords(&line.points, processor)?;
    processor.circularstring_end(idx)
}

fn process_compound<P: GeomProcessor>(
    curve: &CompoundCurve,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.compoundcurve_begin(curve.line_strings.len(), idx)?;
    for (i, line) in curve.line_strings.iter().enumerate() {
        process_line(line, false, i, processor)?;
    }
    processor.compoundcurve_end(idx)
}

fn process_polygon<P: GeomProcessor>(
    polygon: &Polygon,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.polygon_begin(tagged, polygon.rings.len(), idx)?;
    for (i, ring) in polygon.rings.iter().enumerate() {
        process_line(ring, false, i, processor)?;
    }
    processor.polygon_end(tagged, idx)
}

fn process_triangle<P: GeomProcessor>(
    triangle: &Polygon,
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    processor.triangle_begin(tagged, triangle.rings.len(), idx)?;
    for (i, ring) in triangle.rings.iter().enumerate() {
        process_line(ring, false, i, processor)?;
    }
    processor.triangle_end(tagged, idx)
}

fn process_geometry<P: GeomProcessor>(
    geometry: &Geometry,
    idx: usize,
    processor: &mut P,
) -> GeozeroResult<()> {
    match geometry {
        Geometry::Point(p) => {
            processor.point_begin(idx)?;
            process_coord(p, processor.multi_dim(), 0, processor)?;
            processor.point_end(idx)
        }
        Geometry::LineString(l) => process_line(l, true, idx, processor),
        Geometry::Polygon(p) => process_polygon(p, true, idx, processor),
        Geometry::MultiPoint(mp) => {
            processor.multipoint_begin(mp.points.len(), idx)?;
            process_coords(&mp.points, processor)?;
            processor.multipoint_end(idx)
        }
        Geometry::MultiLineString(ml) => {
            processor.multilinestring_begin(ml.line_strings.len(), idx)?;
            for (i, line) in ml.line_strings.iter().enumerate() {
                process_line(line, false, i, processor)?;
            }
            processor.multilinestring_end(idx)
        }
        Geometry::MultiPolygon(mp) => {
            processor.multipolygon_begin(mp.polygons.len(), idx)?;
            for (i, polygon) in mp.polygons.iter().enumerate() {
                process_polygon(polygon, false, i, processor)?;
            }
            processor.multipolygon_end(idx)
        }
        Geometry::CircularString(l) => process_circular(l, idx, processor),
        Geometry::CompoundCurve(c) => process_compound(c, idx, processor),
        Geometry::CurvePolygon(cp) => {
            processor.curvepolygon_begin(cp.rings.len(), idx)?;
            for (i, ring) in cp.rings.iter().enumerate() {
                match ring {
                    Curve::LineString(l) => process_line(l, false, i, processor)?,
                    Curve::CircularString(l) => process_circular(l, i, processor)?,
                    Curve::CompoundCurve(c) => process_compound(c, i, processor)?,
                }
            }
            processor.curvepolygon_end(idx)
        }
        Geometry::PolyhedralSurface(s) => {
            processor.polyhedralsurface_begin(s.polygons.len(), idx)?;
            for (i, polygon) in s.polygons.iter().enumerate() {
                process_polygon(polygon, false, i, processor)?;
            }
            processor.polyhedralsurface_end(idx)
        }
        Geometry::Tin(s) => {
            processor.tin_begin(s.polygons.len(), idx)?;
            for (i, triangle) in s.polygons.iter().enumerate() {
                process_triangle(triangle, false, i, processor)?;
            }
            processor.tin_end(idx)
        }
        Geometry::Triangle(t) => process_triangle(t, true, idx, processor),
        Geometry::GeometryCollection(gc) => {
            processor.geometrycollection_begin(gc.geometries.len(), idx)?;
            for (i, g) in gc.geometries.iter().enumerate() {
                process_geometry(g, i, processor)?;
            }
            processor.geometrycollection_end(idx)
        }
    }
}

impl GeozeroGeometry for Geometry {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> GeozeroResult<()> {
        process_geometry(self, 0, processor)
    }

    fn dims(&self) -> CoordDimensions {
        CoordDimensions {
            z: self.has_z(),
            m: self.has_m(),
            t: false,
            tm: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> LineString {
        LineString::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ])
    }

    #[test]
    fn test_dimensions_inferred() {
        let line = LineString::new(vec![Point::new(0.0, 0.0), Point::new_z(1.0, 1.0, 5.0)]);
        assert!(line.has_z);
        assert!(!line.has_m);

        let collection = GeometryCollection::new(vec![
            Geometry::Point(Point::new(1.0, 2.0).with_m(3.0)),
            Geometry::LineString(square()),
        ]);
        assert!(collection.has_m);
        assert!(!collection.has_z);
    }

    #[test]
    fn test_polygon_rings() {
        let polygon = Polygon::new(vec![square(), square()]);
        assert_eq!(polygon.exterior().map(|r| r.len()), Some(5));
        assert_eq!(polygon.holes().len(), 1);
        assert!(Polygon::default().exterior().is_none());
        assert!(Polygon::default().holes().is_empty());
    }

    #[test]
    fn test_compound_curve_points() {
        let curve = CompoundCurve::new(vec![
            LineString::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
            LineString::new(vec![Point::new(1.0, 0.0), Point::new(2.0, 1.0)]),
        ]);
        assert_eq!(curve.points().len(), 4);
    }

    #[test]
    fn test_wkt_point() {
        let wkt = Geometry::Point(Point::new(1.5, -2.0)).wkt().unwrap();
        assert!(wkt.starts_with("POINT"), "wkt={}", wkt);
        assert!(wkt.contains("1.5 -2"), "wkt={}", wkt);
    }

    #[test]
    fn test_wkt_polygon() {
        let wkt = Geometry::Polygon(Polygon::new(vec![square()])).wkt().unwrap();
        assert!(wkt.starts_with("POLYGON"), "wkt={}", wkt);
        assert!(wkt.contains("1 1"), "wkt={}", wkt);
    }

    #[test]
    fn test_try_map_points_keeps_structure() {
        let geometry = Geometry::MultiPolygon(MultiPolygon::new(vec![Polygon::new(vec![
            square(),
        ])]));
        let shifted = geometry
            .try_map_points(&mut |p| Ok(Point { x: p.x + 10.0, ..*p }))
            .unwrap();
        match shifted {
            Geometry::MultiPolygon(mp) => {
                assert_eq!(mp.polygons[0].rings[0].points[2].x, 11.0);
                assert_eq!(mp.polygons[0].rings[0].len(), 5);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_geometry_type_names() {
        assert_eq!(GeometryType::Tin.to_string(), "TIN");
        assert_eq!(GeometryType::MultiLineString.name(), "MULTILINESTRING");
    }
}
