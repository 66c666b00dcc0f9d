//! Tests for the dataset module

mod accessor_tests;
mod index_tests;
