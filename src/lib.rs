pub mod calendar {
    pub mod controller;
    pub mod filter;
    pub mod progress;
    pub mod view;
}
pub mod cli;
pub mod config {
    pub mod env_loader;
    pub mod model;
}
pub mod tracing;
pub mod virgilio {
    pub mod api;
    pub mod dates;
    pub mod dto;
    pub mod model;
    pub mod normalizer;
}
