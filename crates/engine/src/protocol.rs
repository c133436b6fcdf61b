//! Messages between the growth engine and its host.
//!
//! The engine never talks to a block store directly. It consumes
//! [`Inbound`] messages and answers with [`Outbound`] requests; the host
//! delivers those to the store and feeds the store's answers (query results,
//! block changes) back in as new inbound messages, in whatever order they
//! happen to arrive.

use std::time::Duration;

use crate::world::block::BlockTypeId;
use crate::world::filter::BlockFilter;
use crate::world::position::Position;
use crate::world::sample::NeighborhoodSample;
use crate::world::shape::BoxShape;

#[derive(Debug, Clone)]
pub enum Inbound {
    /// Blocks changed somewhere in the world (any writer, including us).
    BlocksUpdated(Vec<(Position, BlockTypeId)>),
    /// New simulation-speed multiplier.
    SimulationSpeed(f64),
    /// Answer to an earlier [`Outbound::QueryBox`].
    QueryResult(NeighborhoodSample),
    /// The pending tick timer fired.
    Tick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Sample every block in the box and answer with [`Inbound::QueryResult`].
    QueryBox(BoxShape),
    /// Set `position` to `block` if its current block matches `filter`.
    ReplaceBlock {
        position: Position,
        block: BlockTypeId,
        filter: BlockFilter,
    },
    /// Set `position` to `block` unconditionally.
    PlaceBlock { position: Position, block: BlockTypeId },
    /// Deliver [`Inbound::Tick`] after this delay. Replaces any pending timer.
    ScheduleTick(Duration),
}
