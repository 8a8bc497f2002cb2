// Resume ATS analysis core.
// Pipeline: extract → normalize → score against a catalog role.
// Everything here is synchronous and stateless apart from the static tables.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod roles;
pub mod scoring;
pub mod similarity;
pub mod stopwords;
