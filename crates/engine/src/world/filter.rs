use super::block::BlockTypeId;

/// Predicate over the block currently occupying a position.
///
/// Built from elementary "is exactly this type" tests combined with logical
/// OR. A store evaluates it atomically with the write it guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockFilter {
    Type(BlockTypeId),
    Any(Vec<BlockFilter>),
}

impl BlockFilter {
    pub fn for_type(block: BlockTypeId) -> Self {
        BlockFilter::Type(block)
    }

    /// Union of equality tests over `blocks`. Empty input matches nothing.
    pub fn any_of<I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = BlockTypeId>,
    {
        BlockFilter::Any(blocks.into_iter().map(BlockFilter::Type).collect())
    }

    /// `self OR other`, flattening nested unions.
    pub fn or(self, other: BlockFilter) -> Self {
        let mut terms = match self {
            BlockFilter::Any(terms) => terms,
            single => vec![single],
        };
        match other {
            BlockFilter::Any(more) => terms.extend(more),
            single => terms.push(single),
        }
        BlockFilter::Any(terms)
    }

    pub fn matches(&self, block: &BlockTypeId) -> bool {
        match self {
            BlockFilter::Type(expected) => expected == block,
            BlockFilter::Any(terms) => terms.iter().any(|t| t.matches(block)),
        }
    }
}
