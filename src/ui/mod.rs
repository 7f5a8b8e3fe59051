//! Presentation layer: egui panels, charts, tables and the map.
pub mod charts;
pub mod map;
pub mod panels;
pub mod views;
