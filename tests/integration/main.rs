//! Integration tests for Listing-Lens

mod listing_facts;
mod listing_groups;
mod properties;
