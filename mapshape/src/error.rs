//! Types d'erreurs pour le crate mapshape

use thiserror::Error;

use crate::geometry::GeometryType;
use crate::shape::ShapeType;

/// Erreurs pouvant survenir lors des conversions géométrie / forme
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Aucune correspondance définie pour ce type de géométrie
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometryType(GeometryType),

    /// La forme ne peut pas produire le type de géométrie demandé
    #[error("Shape type {shape} can not be converted to geometry type {geometry}")]
    IncompatibleShape {
        shape: ShapeType,
        geometry: GeometryType,
    },

    /// Configuration manquante ou invalide (projection requise, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Forme éditable invalide au moment de l'extraction
    #[error("Invalid edit state for {shape}: {reason}")]
    InvalidEditState { shape: ShapeType, reason: String },

    /// Échec d'une transformation de projection
    #[error("Projection transform failed: {0}")]
    Transform(String),

    /// Erreur d'écriture WKT
    #[error("Geometry write error: {0}")]
    Write(#[from] geozero::error::GeozeroError),
}

impl ShapeError {
    /// Crée une erreur de configuration
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Crée une erreur d'état d'édition invalide
    pub fn invalid_edit_state(shape: ShapeType, reason: impl Into<String>) -> Self {
        Self::InvalidEditState {
            shape,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de transformation
    pub fn transform(reason: impl Into<String>) -> Self {
        Self::Transform(reason.into())
    }
}

/// Résultat spécialisé du crate
pub type Result<T> = std::result::Result<T, ShapeError>;
