//! Library entry point for the docker-volume-sync CLI.

pub mod commands;
pub mod config;
pub mod docker;
pub mod error;
pub mod model;
pub mod path;
pub mod process;
pub mod s3;
