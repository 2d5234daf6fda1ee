//! The browser-driven stages: harvest result links, then enrich each posting.

mod enricher;
mod harvester;

pub use enricher::{contacts, EnrichOutcome, Enricher};
pub use harvester::{Harvest, Harvester};
