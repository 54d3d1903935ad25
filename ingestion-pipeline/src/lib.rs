#![allow(clippy::missing_docs_in_private_items)]

pub mod chunker;
pub mod importers;
pub mod parser;
pub mod sword;
