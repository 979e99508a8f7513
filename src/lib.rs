pub mod api;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod humanize;
pub mod observability;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod transform;
