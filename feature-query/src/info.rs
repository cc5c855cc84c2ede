//! Filtrage fin, classement et mise en forme des entités cliquées
//!
//! Les candidats de l'index sont filtrés par type de géométrie puis par
//! distance réelle au clic (tolérance scalaire ou emprise du style), classés
//! par distance, puis rapportés en détail ou résumés au-delà du plafond.

use std::collections::{BTreeMap, HashSet};

use mapshape::projection::Transform;
use mapshape::{
    distance_to_shape, ClickDistance, Geometry, GeometryType, LatLng, Point, Projection,
    ProjectionTransform, Projector, Shape, ShapeConverter,
};
use tracing::{debug, trace, warn};

use crate::click::ClickContext;
use crate::config::QueryConfig;
use crate::error::Result;
use crate::index::{column_display_name, ColumnAliases, ColumnValue, FeatureRow, ScopedCursor, SpatialIndex};
use crate::style::{PixelBounds, StyleLookup};
use crate::table::{FeatureRowData, FeatureTableData};

/// Candidat retenu et sa distance au clic
#[derive(Debug, Clone)]
pub struct RankedFeature {
    pub row: FeatureRow,
    pub distance: ClickDistance,
}

/// Construit les messages et tableaux de résultats d'une table
pub struct FeatureInfoBuilder {
    name: String,
    table_name: String,
    geometry_type: GeometryType,
    converter: ShapeConverter,
    ignore_geometry_types: HashSet<GeometryType>,
    max_point_detailed_info: usize,
    max_feature_detailed_info: usize,
    detailed_info_print_points: bool,
    detailed_info_print_features: bool,
    geodesic: bool,
    aliases: Option<Box<dyn ColumnAliases>>,
    style: Option<Box<dyn StyleLookup>>,
}

impl FeatureInfoBuilder {
    pub fn new(index: &dyn SpatialIndex, config: &QueryConfig) -> Result<Self> {
        let projector = Projector::new(index.projection().cloned())?;
        Ok(Self {
            name: format!("{} - {}", index.database(), index.table_name()),
            table_name: index.table_name().to_string(),
            geometry_type: index.geometry_type(),
            converter: ShapeConverter::new(projector),
            ignore_geometry_types: config.ignore_geometry_types.iter().copied().collect(),
            max_point_detailed_info: config.max_point_detailed_info,
            max_feature_detailed_info: config.max_feature_detailed_info,
            detailed_info_print_points: config.detailed_info_print_points,
            detailed_info_print_features: config.detailed_info_print_features,
            geodesic: config.geodesic,
            aliases: None,
            style: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn ignore_geometry_type(&mut self, geometry_type: GeometryType) {
        self.ignore_geometry_types.insert(geometry_type);
    }

    pub fn set_geodesic(&mut self, geodesic: bool) {
        self.geodesic = geodesic;
    }

    pub fn set_column_aliases(&mut self, aliases: Box<dyn ColumnAliases>) {
        self.aliases = Some(aliases);
    }

    pub fn set_style_lookup(&mut self, style: Box<dyn StyleLookup>) {
        self.style = Some(style);
    }

    /// Plafond de détail selon le type de géométrie de la table
    pub fn max_detailed_info(&self) -> usize {
        if self.geometry_type == GeometryType::Point {
            self.max_point_detailed_info
        } else {
            self.max_feature_detailed_info
        }
    }

    // ------------------------------------------------------------------
    // Filtrage
    // ------------------------------------------------------------------

    /// Filtre et classe les candidats ; le curseur est fermé sur tous les chemins
    ///
    /// Sans clic ni type ignoré, tous les candidats sont retenus tels quels.
    pub fn fine_filter(
        &self,
        mut cursor: ScopedCursor<'_>,
        click: Option<&ClickContext>,
        tolerance: f64,
    ) -> Result<Vec<RankedFeature>> {
        if self.ignore_geometry_types.contains(&self.geometry_type) {
            cursor.close();
            return Ok(Vec::new());
        }

        let mut ranked = Vec::new();
        let mut candidates = 0usize;
        while let Some(row) = cursor.next_row()? {
            candidates += 1;
            if click.is_none() && self.ignore_geometry_types.is_empty() {
                ranked.push(RankedFeature {
                    row,
                    distance: ClickDistance::Unknown,
                });
                continue;
            }

            let Some(geometry) = row.geometry() else {
                trace!(table = %self.table_name, "Skipping row without geometry");
                continue;
            };
            if self.ignore_geometry_types.contains(&geometry.geometry_type()) {
                trace!(geometry_type = %geometry.geometry_type(), "Skipping ignored geometry type");
                continue;
            }

            let distance = match click {
                Some(click) => self.click_distance(&row, geometry, click, tolerance)?,
                None => ClickDistance::Unknown,
            };
            if distance.is_excluded() {
                trace!(id = ?row.id(), "Row outside click tolerance");
                continue;
            }
            ranked.push(RankedFeature { row, distance });
        }
        cursor.close();

        ranked.sort_by(|a, b| a.distance.rank(&b.distance));
        debug!(
            table = %self.table_name,
            candidates,
            retained = ranked.len(),
            "Fine filtered click candidates"
        );
        Ok(ranked)
    }

    fn click_distance(
        &self,
        row: &FeatureRow,
        geometry: &Geometry,
        click: &ClickContext,
        tolerance: f64,
    ) -> Result<ClickDistance> {
        let shape = self.converter.to_shape(geometry)?;

        let tolerance = match self.footprint(row) {
            Some(bounds) => {
                let mut bounds = bounds.scaled(click.density);
                if let Shape::LatLng(point) = shape.shape {
                    bounds = bounds.facing(click.location, point);
                }
                if bounds.is_empty() {
                    return Ok(ClickDistance::Excluded);
                }
                bounds.max_extent() * click.meters_per_pixel()
            }
            None => tolerance,
        };

        Ok(distance_to_shape(click.location, &shape, self.geodesic, tolerance))
    }

    fn footprint(&self, row: &FeatureRow) -> Option<PixelBounds> {
        let style = self.style.as_ref()?;
        match style.pixel_bounds(row) {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!(table = %self.table_name, id = ?row.id(), error = %e, "Failed to look up feature style");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Mise en forme
    // ------------------------------------------------------------------

    /// Message texte des entités proches du clic, `None` si aucune
    pub fn build_results_info_message(
        &self,
        cursor: ScopedCursor<'_>,
        click: Option<&ClickContext>,
        tolerance: f64,
        projection: Option<&Projection>,
    ) -> Result<Option<String>> {
        let features = self.fine_filter(cursor, click, tolerance)?;
        if features.is_empty() {
            return Ok(None);
        }

        let count = features.len();
        if count > self.max_detailed_info() {
            return self
                .build_summary_message(count as u64, click.map(|c| c.location))
                .map(Some);
        }

        let mut message = format!("{}\n", self.name);
        for (i, feature) in features.iter().enumerate() {
            let number = i + 1;
            if count > 1 {
                if number > 1 {
                    message.push('\n');
                } else {
                    message.push_str(&format!("\n{} Features\n", count));
                }
                message.push_str(&format!("\nFeature {}:\n", number));
            }
            self.write_row(&mut message, &feature.row, projection)?;
        }
        Ok(Some(message))
    }

    fn write_row(&self, message: &mut String, row: &FeatureRow, projection: Option<&Projection>) -> Result<()> {
        for (i, (column, value)) in row.columns.iter().zip(&row.values).enumerate() {
            if Some(i) == row.geometry_column || value.is_null() {
                continue;
            }
            let name = column_display_name(self.aliases.as_deref(), &row.table, column);
            message.push_str(&format!("\n{}: {}", name, value));
        }

        if let Some(geometry) = row.geometry() {
            let print = if geometry.geometry_type() == GeometryType::Point {
                self.detailed_info_print_points
            } else {
                self.detailed_info_print_features
            };
            if print {
                let geometry = self.project_geometry(geometry, projection)?;
                message.push_str("\n\n");
                message.push_str(&geometry.wkt()?);
            }
        }
        Ok(())
    }

    /// Résumé : nom, nombre d'entités et position du clic si connue
    pub fn build_summary_message(&self, count: u64, location: Option<LatLng>) -> Result<String> {
        let mut message = format!("{}\n\t{} features", self.name, count);
        if let Some(location) = location {
            message.push_str(" near location:\n");
            message.push_str(&Geometry::Point(Point::new(location.lng, location.lat)).wkt()?);
        }
        Ok(message)
    }

    /// Tableau des entités proches du clic, `None` si aucune
    pub fn build_table_data(
        &self,
        cursor: ScopedCursor<'_>,
        click: Option<&ClickContext>,
        tolerance: f64,
        projection: Option<&Projection>,
    ) -> Result<Option<FeatureTableData>> {
        let features = self.fine_filter(cursor, click, tolerance)?;
        if features.is_empty() {
            return Ok(None);
        }

        let count = features.len() as u64;
        if features.len() > self.max_detailed_info() {
            return Ok(Some(FeatureTableData::summary(&self.table_name, count)));
        }

        let rows = features
            .iter()
            .map(|f| self.row_data(&f.row, projection))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(FeatureTableData::with_rows(&self.table_name, count, rows)))
    }

    fn row_data(&self, row: &FeatureRow, projection: Option<&Projection>) -> Result<FeatureRowData> {
        let mut values = BTreeMap::new();
        let mut id_column = None;
        let mut geometry_column = None;

        for (i, (column, value)) in row.columns.iter().zip(&row.values).enumerate() {
            let name = column_display_name(self.aliases.as_deref(), &row.table, column);
            if i == row.id_column {
                id_column = Some(name.clone());
            }
            if Some(i) == row.geometry_column {
                geometry_column = Some(name.clone());
            }
            if value.is_null() {
                continue;
            }

            let value = match value {
                ColumnValue::Geometry(geometry) if Some(i) == row.geometry_column => {
                    ColumnValue::Geometry(self.project_geometry(geometry, projection)?)
                }
                other => other.clone(),
            };
            values.insert(name, value);
        }

        Ok(FeatureRowData {
            values,
            id_column,
            geometry_column,
        })
    }

    /// Reprojette une géométrie de la table vers `projection`
    ///
    /// Sans projection de table connue, la géométrie est rendue telle quelle.
    pub fn project_geometry(&self, geometry: &Geometry, projection: Option<&Projection>) -> Result<Geometry> {
        let (Some(target), Some(native)) = (projection, self.converter.projector().projection()) else {
            return Ok(geometry.clone());
        };
        if target == native {
            return Ok(geometry.clone());
        }
        let transform = Transform::new(native, target)?;
        Ok(geometry.try_map_points(&mut |p| transform.transform(p))?)
    }
}
