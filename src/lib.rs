//! sitenav: navigation trees for static documentation sites
//!
//! Turns a site's declarative configuration and sidebar declarations into a
//! validated, immutable navigation model.
//!
//! Layers, bottom-up:
//! - [`domain`]: navigation tree model, tree builder, document index
//! - [`config`]: layered site configuration
//! - [`application`]: services loading and resolving a site
//! - [`infrastructure`]: I/O boundary and service wiring
//! - [`cli`]: command line surface

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
