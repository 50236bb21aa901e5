pub mod classifier;
pub mod document_parser;
pub mod errors;
pub mod field_extractor;
pub mod id_generator;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod remote_scoring;
pub mod scoring;
pub mod section_extractor;
pub mod segmenter;
pub mod service;
pub mod settings_store;
pub mod template_catalog;
