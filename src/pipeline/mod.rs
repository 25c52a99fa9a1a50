pub mod agent;
pub mod context;
pub mod fetcher;
pub mod flow;
