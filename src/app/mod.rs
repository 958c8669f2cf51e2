mod collaborators;
mod pipeline;
mod runtime;
mod stats;
mod types;

#[cfg(test)]
mod tests;

pub use collaborators::{LogNotifier, LogRenderer, Notifier, Renderer};
pub use pipeline::MocapPipeline;
pub use stats::PipelineStats;
pub use types::{Notice, RenderStatus, TickOutcome};
