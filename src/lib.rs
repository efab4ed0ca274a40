//! Spritegroup - sprite atlas grouping policy
//!
//! This library decides, for a batch of sprite importers:
//! - which atlas each sprite belongs to (from its packing tag)
//! - which page of that atlas it lands on (one page per distinct texture settings)
//! - whether it is packed by its tight mesh outline or its rectangle
//!
//! Reading import settings and building atlas textures are left to the
//! [`resolver::AttributeResolver`] and [`job::AtlasBuilder`] collaborators.

pub mod cli;
pub mod config;
pub mod grouping;
pub mod job;
pub mod models;
pub mod packing;
pub mod policy;
pub mod resolver;
pub mod tag;
