//! Scoring algorithms applied to diagnosis data

pub mod frailty;
