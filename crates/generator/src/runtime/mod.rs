//! Runtime module — process lifecycle: logging and config boot.

pub mod boot;
