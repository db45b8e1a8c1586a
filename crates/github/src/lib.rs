//! GitHub contents-API client for committing memo files

pub mod client;
pub mod memo;

pub use client::{ClientError, GithubClient};
pub use memo::Memo;
