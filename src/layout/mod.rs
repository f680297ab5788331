// src/layout/mod.rs
//! Document-to-page typesetting: measure, wrap, order, paginate.

pub mod engine;
pub mod fonts;
pub mod template;

pub use engine::{Element, LayoutEngine, Page};
pub use fonts::Face;
pub use template::{Template, TemplateRegistry};
