//! Requête au clic sur une couche d'entités indexées
//!
//! Enchaînement : vérification de l'index, tuile présente au zoom courant,
//! nombre d'entités de la tuile (résumé au-delà du maximum), requête de
//! l'index sur la zone de tolérance, filtrage fin puis mise en forme.

use mapshape::tiles::{self, tile_coord};
use mapshape::{BoundingBox, LatLng, Projection};
use tracing::debug;

use crate::click::{ClickContext, ClickRegion};
use crate::config::{validate_percentage, QueryConfig};
use crate::error::{QueryError, Result};
use crate::index::{ScopedCursor, SpatialIndex};
use crate::info::FeatureInfoBuilder;
use crate::overlay::TileRetriever;
use crate::table::FeatureTableData;

/// Étape atteinte avant la mise en forme
enum ClickOutcome<'a> {
    /// Trop d'entités dans la tuile
    MaxFeatures(u64),
    /// Candidats à filtrer
    Candidates(ScopedCursor<'a>, ClickRegion),
}

/// Requête au clic pour une table d'entités
pub struct FeatureOverlayQuery {
    index: Box<dyn SpatialIndex>,
    overlay: Option<Box<dyn TileRetriever>>,
    info: FeatureInfoBuilder,
    config: QueryConfig,
}

impl FeatureOverlayQuery {
    pub fn new(index: Box<dyn SpatialIndex>, config: QueryConfig) -> Result<Self> {
        config.validate()?;
        let info = FeatureInfoBuilder::new(index.as_ref(), &config)?;
        Ok(Self {
            index,
            overlay: None,
            info,
            config,
        })
    }

    /// Couche de tuiles affichant la table : le clic doit tomber sur une de ses tuiles
    pub fn with_overlay(mut self, overlay: Box<dyn TileRetriever>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn info_builder(&self) -> &FeatureInfoBuilder {
        &self.info
    }

    pub fn info_builder_mut(&mut self) -> &mut FeatureInfoBuilder {
        &mut self.info
    }

    pub fn set_screen_click_percentage(&mut self, percentage: f64) -> Result<()> {
        validate_percentage(percentage)?;
        self.config.screen_click_percentage = percentage;
        Ok(())
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_indexed()
    }

    fn require_index(&self) -> Result<()> {
        if !self.index.is_indexed() {
            return Err(QueryError::configuration(format!(
                "Table {} is not indexed, an index is required to query features",
                self.index.table_name()
            )));
        }
        Ok(())
    }

    /// Vrai si la couche a une tuile sous la position au zoom donné
    pub fn is_on_at_current_zoom(&self, zoom: f64, location: LatLng) -> bool {
        let Some(overlay) = &self.overlay else {
            return true;
        };
        let zoom = zoom.clamp(0.0, 31.0) as u8;
        let tile = tile_coord(location.lng, location.lat, zoom);
        overlay.has_tile(tile.x, tile.y, zoom)
    }

    /// Nombre d'entités indexées dans la tuile sous la position
    pub fn tile_feature_count(&self, location: LatLng, zoom: f64) -> Result<u64> {
        let bbox = Self::tile_bounds(location, zoom);
        self.index.count_in(&bbox, &Projection::wgs84())
    }

    /// Emprise WGS84 de la tuile sous la position
    pub fn tile_bounds(location: LatLng, zoom: f64) -> BoundingBox {
        tiles::tile_bounds(location.lng, location.lat, zoom.clamp(0.0, 31.0) as u8)
    }

    /// Emprise de la tuile sous la position, dans `projection`
    pub fn tile_bounds_in(projection: &Projection, location: LatLng, zoom: f64) -> Result<BoundingBox> {
        let zoom = zoom.clamp(0.0, 31.0) as u8;
        Ok(tiles::tile_bounds_in(projection, location.lng, location.lat, zoom)?)
    }

    pub fn is_more_than_max_features(&self, tile_feature_count: u64) -> bool {
        self.config
            .max_features_per_tile
            .is_some_and(|max| tile_feature_count > max)
    }

    /// Entités de l'index recoupant l'emprise (WGS84 par défaut)
    pub fn query_features(&self, bbox: &BoundingBox, projection: Option<&Projection>) -> Result<ScopedCursor<'_>> {
        self.require_index()?;

        let wgs84 = Projection::wgs84();
        let projection = projection.unwrap_or(&wgs84);
        let columns = self.index.column_names();
        let cursor = self.index.query(&columns, bbox, projection)?;
        Ok(ScopedCursor::new(cursor))
    }

    pub fn build_max_features_info_message(&self, tile_feature_count: u64) -> String {
        format!("{}\n\t{} features", self.info.name(), tile_feature_count)
    }

    fn prepare(&self, click: &ClickContext) -> Result<Option<ClickOutcome<'_>>> {
        self.require_index()?;
        if !(self.config.max_features_info || self.config.features_info) {
            return Ok(None);
        }
        if !self.is_on_at_current_zoom(click.zoom, click.location) {
            debug!(zoom = click.zoom, "No tile under click location");
            return Ok(None);
        }

        if self.config.max_features_per_tile.is_some() {
            let count = self.tile_feature_count(click.location, click.zoom)?;
            if self.is_more_than_max_features(count) {
                debug!(count, "Tile exceeds max features");
                return Ok(self.config.max_features_info.then_some(ClickOutcome::MaxFeatures(count)));
            }
        }
        if !self.config.features_info {
            return Ok(None);
        }

        let region = click.region(self.config.screen_click_percentage)?;
        let cursor = self.query_features(&region.bbox, None)?;
        Ok(Some(ClickOutcome::Candidates(cursor, region)))
    }

    /// Message texte du clic, `None` si aucune entité n'est touchée
    ///
    /// Les géométries affichées sont reprojetées dans `projection` si fournie.
    pub fn build_map_click_message(
        &self,
        click: &ClickContext,
        projection: Option<&Projection>,
    ) -> Result<Option<String>> {
        match self.prepare(click)? {
            None => Ok(None),
            Some(ClickOutcome::MaxFeatures(count)) => Ok(Some(self.build_max_features_info_message(count))),
            Some(ClickOutcome::Candidates(cursor, region)) => {
                self.info
                    .build_results_info_message(cursor, Some(click), region.tolerance, projection)
            }
        }
    }

    /// Tableau du clic, `None` si aucune entité n'est touchée
    pub fn build_map_click_table_data(
        &self,
        click: &ClickContext,
        projection: Option<&Projection>,
    ) -> Result<Option<FeatureTableData>> {
        match self.prepare(click)? {
            None => Ok(None),
            Some(ClickOutcome::MaxFeatures(count)) => Ok(Some(FeatureTableData::summary(
                self.index.table_name(),
                count,
            ))),
            Some(ClickOutcome::Candidates(cursor, region)) => {
                self.info
                    .build_table_data(cursor, Some(click), region.tolerance, projection)
            }
        }
    }
}
