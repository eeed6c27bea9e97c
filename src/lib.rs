//! ReputexAI core: blockchain address classification and reputation scoring.

pub mod address;
pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod scoring;
pub mod solana;
pub mod storage;
pub mod web;
