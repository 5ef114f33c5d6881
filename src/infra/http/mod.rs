mod client;

pub use client::HttpPostService;
