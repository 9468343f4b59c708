//! Framework enrichers: post-resolution passes that attach HTTP routes,
//! dependency-injection edges, and JPA repository links to an IR already
//! built by a [`codegraph_adapter::LanguageAdapter`].

pub mod fiber;
pub mod gin;
mod go_router;
pub mod laravel;
pub mod spring;
mod util;

pub use fiber::FiberEnricher;
pub use gin::GinEnricher;
pub use laravel::LaravelEnricher;
pub use spring::SpringEnricher;

/// All four enrichers, in the order the orchestrator runs them.
#[must_use]
pub fn default_enrichers() -> Vec<Box<dyn codegraph_adapter::Enricher>> {
    vec![
        Box::new(SpringEnricher::new()),
        Box::new(GinEnricher::new()),
        Box::new(FiberEnricher::new()),
        Box::new(LaravelEnricher::new()),
    ]
}
