pub mod assistant;
pub mod auth;
pub mod escalation;
pub mod extractor;
pub mod generative;
pub mod notifier;
pub mod pipeline;
pub mod renderer;
pub mod report;
