//! Game-agnostic terrain growth engine.
//!
//! Watches block changes, samples the neighborhood of each relevant change,
//! and slowly turns exposed substrate into weighted grown variants. The
//! engine owns only its candidate queue; the world lives in a block store it
//! reaches through [`protocol`] messages. [`world::World`] is an in-memory
//! store that speaks that protocol.

pub mod config;
pub mod engine;
pub mod growth;
pub mod protocol;
pub mod rng;
pub mod world;

pub use config::{BlockConfig, ConfigError, GrowthConfig, GrowthSettings, VariantSettings};
pub use engine::{GrowthEngine, TickReport};
pub use growth::queue::{Candidate, GrowthQueue};
pub use protocol::{Inbound, Outbound};
pub use rng::RandomSource;
pub use world::block::BlockTypeId;
pub use world::filter::BlockFilter;
pub use world::position::Position;
pub use world::sample::NeighborhoodSample;
pub use world::shape::BoxShape;
pub use world::World;
