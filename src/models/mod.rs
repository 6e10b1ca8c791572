//! Data models

mod post;

pub use post::Post;
