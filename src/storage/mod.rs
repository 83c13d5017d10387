//! Filesystem storage for uploaded assets
//!
//! The layout is fixed: an uploads root with `images/` and `files/`
//! subtrees, chosen per upload by the ingress classifier.

pub mod local;

pub use local::LocalStorage;
