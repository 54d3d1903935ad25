//! Domain importers: each maps one external source format into
//! [`common::document::CorpusDocument`] values.

pub mod books;
pub mod geography;
pub mod lexicon;
