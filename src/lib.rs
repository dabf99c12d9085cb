//! Portfolio testimonials service library
//!
//! Fetches visitor testimonials from a Google Sheet backing a Google Form,
//! caches them briefly, and serves them as JSON for the portfolio frontend.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod provider;
pub mod server;

pub use data::{Author, Avatar, Testimonial};
pub use provider::{FetchOptions, TestimonialProvider};
