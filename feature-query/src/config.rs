//! Configuration de la requête au clic

use anyhow::{Context, Result};
use mapshape::GeometryType;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Réglages de la requête et de la mise en forme des résultats
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Part de l'écran (0.0 à 1.0) autour du clic considérée comme touchée
    pub screen_click_percentage: f64,

    /// Nombre maximal de points détaillés avant un simple résumé
    pub max_point_detailed_info: usize,

    /// Nombre maximal d'entités (hors points) détaillées avant un simple résumé
    pub max_feature_detailed_info: usize,

    /// Afficher la géométrie des points détaillés
    pub detailed_info_print_points: bool,

    /// Afficher la géométrie des autres entités détaillées
    pub detailed_info_print_features: bool,

    /// Distances géodésiques plutôt que planaires
    pub geodesic: bool,

    /// Produire un résumé quand la tuile dépasse `max_features_per_tile`
    pub max_features_info: bool,

    /// Produire le détail des entités cliquées
    pub features_info: bool,

    /// Nombre d'entités par tuile au-delà duquel la requête n'est pas faite
    pub max_features_per_tile: Option<u64>,

    /// Types de géométrie ignorés au filtrage
    pub ignore_geometry_types: Vec<GeometryType>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            screen_click_percentage: 0.03,
            max_point_detailed_info: 10,
            max_feature_detailed_info: 10,
            detailed_info_print_points: false,
            detailed_info_print_features: false,
            geodesic: false,
            max_features_info: true,
            features_info: true,
            max_features_per_tile: None,
            ignore_geometry_types: Vec::new(),
        }
    }
}

impl QueryConfig {
    /// Charge et valide une configuration JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse query config JSON")?;
        config.validate().context("Invalid query config")?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        validate_percentage(self.screen_click_percentage)
    }
}

pub(crate) fn validate_percentage(percentage: f64) -> crate::Result<()> {
    if !(0.0..=1.0).contains(&percentage) {
        return Err(QueryError::configuration(format!(
            "Screen click percentage must be between 0.0 and 1.0, not {}",
            percentage
        )));
    }
    Ok(())
}
