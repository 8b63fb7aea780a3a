//! HTTP access to mevzuat.gov.tr and the bedesten API

pub mod client;

pub use client::{
    BEDESTEN_APPLICATION_NAME, DOCUMENT_PATH, PDF_PATH, SEARCH_PATH, UpstreamClient,
};
