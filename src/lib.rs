//! Data layer and run configuration for the FTTH/GPON results viewer.
//!
//! The GUI binary (`ftth-viewer`) and the sample generator both build on
//! this library; nothing here depends on egui.

pub mod config;
pub mod data;
