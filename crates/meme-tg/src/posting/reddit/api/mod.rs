mod client;
mod model;

pub(crate) use client::Client;
pub(crate) use model::*;
