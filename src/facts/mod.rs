//! Listing facts assembly
//!
//! [`ListingFactsAssembler`] obtains one product's detail document from a
//! [`DocumentProvider`](crate::provider::DocumentProvider) and runs every
//! extractor over it to produce a [`ListingRecord`].

mod assembler;
mod record;

pub use assembler::{assemble, ListingFactsAssembler};
pub use record::ListingRecord;
