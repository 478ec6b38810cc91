//! Error types for `causeway-layout`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] causeway_core::Error),

  #[error("cannot read layout file {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("xml error for {type_name}: {message}")]
  Xml {
    type_name: &'static str,
    message:   String,
  },

  #[error("{0} has no grid facet")]
  NoGridFacet(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
