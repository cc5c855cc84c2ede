//! Types d'erreurs pour le crate feature-query

use mapshape::ShapeError;
use thiserror::Error;

/// Erreurs de la requête au clic
#[derive(Debug, Error)]
pub enum QueryError {
    /// Configuration manquante ou invalide (index absent, pourcentage hors bornes)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Échec de l'index spatial externe
    #[error("Spatial index error: {0}")]
    Index(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl QueryError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    pub fn index(reason: impl Into<String>) -> Self {
        Self::Index(reason.into())
    }
}

/// Résultat spécialisé du crate
pub type Result<T> = std::result::Result<T, QueryError>;
