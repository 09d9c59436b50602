//! Fleet Detector CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the Fleet Detector controller.

pub mod cluster_detector;

pub use cluster_detector::*;
