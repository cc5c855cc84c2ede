//! Tests d'intégration de la requête au clic, avec un index en mémoire

use std::cell::Cell;
use std::rc::Rc;

use feature_query::{
    BoundedOverlay, ClickContext, ColumnValue, FeatureCursor, FeatureOverlayQuery, FeatureRow,
    QueryConfig, QueryError, SpatialIndex, TileRetriever,
};
use mapshape::geometry::{LineString, Polygon};
use mapshape::{BoundingBox, Geometry, GeometryType, LatLng, Point, Projection, ShapeConverter};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Index en mémoire, géométries en WGS84
struct MemoryIndex {
    geometry_type: GeometryType,
    rows: Vec<FeatureRow>,
    indexed: bool,
    fail_cursor: bool,
    closed: Rc<Cell<usize>>,
    projection: Projection,
}

impl MemoryIndex {
    fn new(geometry_type: GeometryType, geometries: Vec<Geometry>) -> Self {
        let rows = geometries
            .into_iter()
            .enumerate()
            .map(|(i, geometry)| FeatureRow {
                table: "places".into(),
                columns: vec!["fid".into(), "geom".into(), "name".into()],
                values: vec![
                    ColumnValue::Integer(i as i64 + 1),
                    ColumnValue::Geometry(geometry),
                    ColumnValue::Text(format!("place {}", i + 1)),
                ],
                id_column: 0,
                geometry_column: Some(1),
            })
            .collect();

        Self {
            geometry_type,
            rows,
            indexed: true,
            fail_cursor: false,
            closed: Rc::new(Cell::new(0)),
            projection: Projection::wgs84(),
        }
    }

    fn matching(&self, bbox: &BoundingBox) -> Vec<FeatureRow> {
        let converter = ShapeConverter::default();
        self.rows
            .iter()
            .filter(|row| {
                row.geometry()
                    .and_then(|g| converter.to_shape(g).ok())
                    .is_some_and(|shape| shape.bounding_box().intersects(bbox, true))
            })
            .cloned()
            .collect()
    }
}

struct MemoryCursor {
    rows: std::vec::IntoIter<FeatureRow>,
    fail: bool,
    closed: Rc<Cell<usize>>,
}

impl FeatureCursor for MemoryCursor {
    fn next_row(&mut self) -> feature_query::Result<Option<FeatureRow>> {
        if self.fail {
            return Err(QueryError::index("database is locked"));
        }
        Ok(self.rows.next())
    }

    fn close(&mut self) {
        self.closed.set(self.closed.get() + 1);
    }
}

impl SpatialIndex for MemoryIndex {
    fn database(&self) -> &str {
        "city.gpkg"
    }

    fn table_name(&self) -> &str {
        "places"
    }

    fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    fn projection(&self) -> Option<&Projection> {
        Some(&self.projection)
    }

    fn column_names(&self) -> Vec<String> {
        vec!["fid".into(), "geom".into(), "name".into()]
    }

    fn is_indexed(&self) -> bool {
        self.indexed
    }

    fn query(
        &self,
        _columns: &[String],
        bbox: &BoundingBox,
        _projection: &Projection,
    ) -> feature_query::Result<Box<dyn FeatureCursor + '_>> {
        Ok(Box::new(MemoryCursor {
            rows: self.matching(bbox).into_iter(),
            fail: self.fail_cursor,
            closed: Rc::clone(&self.closed),
        }))
    }

    fn count(&self) -> feature_query::Result<u64> {
        Ok(self.rows.len() as u64)
    }

    fn count_in(&self, bbox: &BoundingBox, _projection: &Projection) -> feature_query::Result<u64> {
        Ok(self.matching(bbox).len() as u64)
    }
}

/// Tuiles présentes uniquement au zoom 14
struct ZoomFourteen;

impl TileRetriever for ZoomFourteen {
    fn has_tile(&self, _x: u32, _y: u32, zoom: u8) -> bool {
        zoom == 14
    }

    fn tile(&self, _x: u32, _y: u32, _zoom: u8) -> Option<Vec<u8>> {
        Some(Vec::new())
    }
}

fn point(lng: f64, lat: f64) -> Geometry {
    Geometry::Point(Point::new(lng, lat))
}

/// Clic à (45, 5) sur une vue de ~15.7 x 11.1 km, tolérance ~15.7 m
fn click() -> ClickContext {
    ClickContext::new(
        LatLng::new(45.0, 5.0),
        14.0,
        BoundingBox::new(4.9, 44.95, 5.1, 45.05),
    )
    .with_pixel_size(1000, 500)
}

fn points_index() -> MemoryIndex {
    MemoryIndex::new(
        GeometryType::Point,
        vec![
            point(5.0001, 45.0),
            point(5.0, 45.0),
            // Dans la zone de requête mais hors tolérance
            point(5.001, 45.0),
            point(6.0, 46.0),
        ],
    )
}

#[test]
fn test_zero_candidates_gives_no_result() {
    init_tracing();
    let index = MemoryIndex::new(GeometryType::Point, vec![point(6.0, 46.0)]);
    let closed = Rc::clone(&index.closed);
    let query = FeatureOverlayQuery::new(Box::new(index), QueryConfig::default()).unwrap();

    assert_eq!(query.build_map_click_message(&click(), None).unwrap(), None);
    assert_eq!(query.build_map_click_table_data(&click(), None).unwrap(), None);
    assert_eq!(closed.get(), 2);
}

#[test]
fn test_click_message_ranks_closest_first() {
    init_tracing();
    let index = points_index();
    let closed = Rc::clone(&index.closed);
    let query = FeatureOverlayQuery::new(Box::new(index), QueryConfig::default()).unwrap();

    let message = query.build_map_click_message(&click(), None).unwrap().unwrap();
    assert_eq!(
        message,
        "city.gpkg - places\n\n2 Features\n\nFeature 1:\n\nfid: 2\nname: place 2\n\n\
         Feature 2:\n\nfid: 1\nname: place 1"
    );
    assert_eq!(closed.get(), 1);
}

#[test]
fn test_cap_gives_summary_only() {
    init_tracing();
    let config = QueryConfig {
        max_point_detailed_info: 1,
        ..Default::default()
    };
    let query = FeatureOverlayQuery::new(Box::new(points_index()), config).unwrap();

    let message = query.build_map_click_message(&click(), None).unwrap().unwrap();
    assert!(
        message.starts_with("city.gpkg - places\n\t2 features near location:\nPOINT"),
        "{}",
        message
    );
    assert!(!message.contains("Feature 1"));

    let table = query.build_map_click_table_data(&click(), None).unwrap().unwrap();
    assert_eq!(table.count, 2);
    assert!(table.rows.is_empty());
}

#[test]
fn test_table_data_in_web_mercator() {
    init_tracing();
    let config = QueryConfig {
        geodesic: true,
        ..Default::default()
    };
    let query = FeatureOverlayQuery::new(Box::new(points_index()), config).unwrap();

    let table = query
        .build_map_click_table_data(&click(), Some(&Projection::web_mercator()))
        .unwrap()
        .unwrap();
    assert_eq!(table.name, "places");
    assert_eq!(table.count, 2);
    assert_eq!(table.rows[0].id(), Some(&ColumnValue::Integer(2)));

    let Some(ColumnValue::Geometry(Geometry::Point(p))) = table.rows[0].geometry() else {
        panic!("expected a point geometry");
    };
    assert!((p.x - 556_597.45).abs() < 1.0);

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["rows"][0]["values"]["name"], "place 2");
    assert_eq!(json["rows"][0]["geometry_column"], "geom");
}

#[test]
fn test_polygon_containing_click_after_known_distances() {
    init_tracing();
    let square = Geometry::Polygon(Polygon::new(vec![LineString::new(vec![
        Point::new(4.99, 44.99),
        Point::new(5.01, 44.99),
        Point::new(5.01, 45.01),
        Point::new(4.99, 45.01),
        Point::new(4.99, 44.99),
    ])]));
    let index = MemoryIndex::new(GeometryType::GeometryCollection, vec![square, point(5.0, 45.0)]);
    let query = FeatureOverlayQuery::new(Box::new(index), QueryConfig::default()).unwrap();

    let table = query.build_map_click_table_data(&click(), None).unwrap().unwrap();
    let ids: Vec<_> = table.rows.iter().map(|r| r.id().cloned()).collect();
    assert_eq!(ids, vec![Some(ColumnValue::Integer(2)), Some(ColumnValue::Integer(1))]);
}

#[test]
fn test_not_indexed_is_configuration_error() {
    init_tracing();
    let mut index = points_index();
    index.indexed = false;
    let query = FeatureOverlayQuery::new(Box::new(index), QueryConfig::default()).unwrap();

    let err = query.build_map_click_message(&click(), None).unwrap_err();
    assert!(matches!(err, QueryError::Configuration(_)), "{:?}", err);
}

#[test]
fn test_cursor_closed_on_error() {
    init_tracing();
    let mut index = points_index();
    index.fail_cursor = true;
    let closed = Rc::clone(&index.closed);
    let query = FeatureOverlayQuery::new(Box::new(index), QueryConfig::default()).unwrap();

    let err = query.build_map_click_message(&click(), None).unwrap_err();
    assert!(matches!(err, QueryError::Index(_)));
    assert_eq!(closed.get(), 1);
}

#[test]
fn test_overlay_tile_gating() {
    init_tracing();
    let query = FeatureOverlayQuery::new(Box::new(points_index()), QueryConfig::default())
        .unwrap()
        .with_overlay(Box::new(BoundedOverlay::new(ZoomFourteen)));

    assert!(query.build_map_click_message(&click(), None).unwrap().is_some());

    let zoomed_out = ClickContext { zoom: 12.0, ..click() };
    assert_eq!(query.build_map_click_message(&zoomed_out, None).unwrap(), None);
}

#[test]
fn test_max_features_per_tile() {
    init_tracing();
    let config = QueryConfig {
        max_features_per_tile: Some(2),
        ..Default::default()
    };
    let query = FeatureOverlayQuery::new(Box::new(points_index()), config).unwrap();

    // La tuile de zoom 14 contient les trois points proches
    assert_eq!(query.tile_feature_count(LatLng::new(45.0, 5.0), 14.0).unwrap(), 3);
    assert_eq!(
        query.build_map_click_message(&click(), None).unwrap().as_deref(),
        Some("city.gpkg - places\n\t3 features")
    );

    let table = query.build_map_click_table_data(&click(), None).unwrap().unwrap();
    assert_eq!((table.name.as_str(), table.count), ("places", 3));
    assert!(table.is_summary());

    let silent = FeatureOverlayQuery::new(
        Box::new(points_index()),
        QueryConfig {
            max_features_per_tile: Some(2),
            max_features_info: false,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(silent.build_map_click_message(&click(), None).unwrap(), None);
}

#[test]
fn test_tile_bounds_entry_points() {
    let location = LatLng::new(38.753195, -77.196785);
    let bbox = FeatureOverlayQuery::tile_bounds(location, 6.0);
    assert!((bbox.min_x + 78.75).abs() < 1e-6);
    assert!((bbox.max_y - 40.979898).abs() < 1e-6);

    let mercator = FeatureOverlayQuery::tile_bounds_in(&Projection::web_mercator(), location, 6.0).unwrap();
    assert!((mercator.min_x + 8_766_409.9).abs() < 1.0);
}

#[test]
fn test_invalid_percentage() {
    let mut query = FeatureOverlayQuery::new(Box::new(points_index()), QueryConfig::default()).unwrap();
    assert!(query.set_screen_click_percentage(2.0).is_err());
    assert!(query.set_screen_click_percentage(0.1).is_ok());

    let config = QueryConfig {
        screen_click_percentage: -1.0,
        ..Default::default()
    };
    assert!(matches!(
        FeatureOverlayQuery::new(Box::new(points_index()), config),
        Err(QueryError::Configuration(_))
    ));
}
