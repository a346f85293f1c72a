//! Drift detection: comparing locked skill folder hashes against the
//! current state of their GitHub repositories.

pub mod check;
pub mod github;

pub use {
    check::{DriftFailure, DriftReport, OutdatedAsset, check_drift},
    github::{GithubClient, GithubError},
};
