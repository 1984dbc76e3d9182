#[path = "core/component.rs"]
mod component;
#[path = "core/feedback.rs"]
mod feedback;
#[path = "core/pipeline.rs"]
mod pipeline;
#[path = "core/viewport.rs"]
mod viewport;
