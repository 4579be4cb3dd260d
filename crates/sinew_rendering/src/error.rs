//! # Rendering Error Types
//!
//! All errors that can occur while building a skeleton mesh.

use thiserror::Error;

/// Errors that can occur in the skeleton renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer was initialized without skeleton data.
    #[error("missing skeleton data, renderer disabled until reinitialized")]
    MissingSkeleton,

    /// A renderable attachment could not be resolved to a material.
    #[error("no material for attachment in slot {slot}")]
    MissingMaterial {
        /// Name of the slot holding the attachment.
        slot: String,
    },

    /// The attachment's atlas page is not registered in the material table.
    #[error("unknown atlas page {page} for attachment in slot {slot}")]
    UnknownAtlasPage {
        /// Atlas page id.
        page: u32,
        /// Name of the slot holding the attachment.
        slot: String,
    },

    /// Invalid renderer configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
