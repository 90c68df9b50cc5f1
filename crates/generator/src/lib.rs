// Module structure for the collector config generator.

// Core rendering
pub mod helpers;
pub mod labels;
pub mod output;
pub mod spec;

// Configuration and process lifecycle
pub mod conf;
pub mod runtime;
