//! # feature-query
//!
//! Interrogation au clic d'entités indexées affichées sur une carte.
//!
//! ## Features
//!
//! - Zone de tolérance autour du clic à partir de la vue courante
//! - Requête de l'index spatial externe, curseur fermé sur tous les chemins
//! - Filtrage fin par distance réelle (géodésique ou planaire) et emprise du style
//! - Résultats en texte ou en tableau, résumés au-delà d'un plafond
//! - Couches de tuiles bornées par zoom et emprise, composition ordonnée
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feature_query::{ClickContext, FeatureOverlayQuery, QueryConfig};
//!
//! let config = QueryConfig::from_json(r#"{"screen_click_percentage": 0.05}"#)?;
//! let query = FeatureOverlayQuery::new(Box::new(index), config)?;
//!
//! let click = ClickContext::new(location, zoom, viewport).with_pixel_size(1080, 1920);
//! if let Some(message) = query.build_map_click_message(&click, None)? {
//!     println!("{}", message);
//! }
//! ```

pub mod click;
pub mod config;
pub mod error;
pub mod index;
pub mod info;
pub mod overlay;
pub mod query;
pub mod style;
pub mod table;

pub use click::{ClickContext, ClickRegion};
pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use index::{ColumnAliases, ColumnValue, FeatureCursor, FeatureRow, ScopedCursor, SpatialIndex};
pub use info::{FeatureInfoBuilder, RankedFeature};
pub use overlay::{BoundedOverlay, CompositeOverlay, OverlayBounds, TileRetriever};
pub use query::FeatureOverlayQuery;
pub use style::{PixelBounds, StyleLookup};
pub use table::{FeatureRowData, FeatureTableData};
