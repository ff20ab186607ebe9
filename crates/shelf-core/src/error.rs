//! Error types for the fallible edges of the engine.
//!
//! Interaction itself never fails: navigation clamps, flip conflicts are
//! ignored and missing assets become placeholders. Only loading a catalog,
//! parsing configuration and low-level scene edits can report errors.

use crate::scene::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("catalog has no books")]
    Empty,
    #[error("book {id} lists {listed} page images but declares page_count = {declared}")]
    PageCountMismatch {
        id: u32,
        listed: usize,
        declared: usize,
    },
    #[error("book {id} has no pages")]
    NoPages { id: u32 },
    #[error("duplicate book id {0}")]
    DuplicateId(u32),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene node {0:?} does not exist")]
    MissingNode(NodeId),
    #[error("cannot parent {child:?} under its own descendant {parent:?}")]
    Cycle { child: NodeId, parent: NodeId },
    #[error("the scene root cannot be reparented or removed")]
    Root,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewer config JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
