//! Fetching of media posts from the content platform and random selection of them.

pub(crate) mod fetch;
pub(crate) mod model;
pub(crate) mod reddit;
pub(crate) mod select;

pub(crate) use fetch::Fetcher;
pub(crate) use model::{MediaKind, Post};
pub(crate) use select::Selector;
