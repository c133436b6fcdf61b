use crate::config::GrowthConfig;
use crate::growth::queue::Candidate;
use crate::protocol::Outbound;

/// Store requests that realize one candidate.
///
/// The replace is guarded by "still substrate", so a candidate whose block
/// was changed by someone else in the meantime is dropped by the store.
/// Variants with an underneath block also get that block laid in the
/// `underneath_depth` cells below, unless it is itself substrate (which
/// would trigger growth again and stack layers forever).
pub fn apply(config: &GrowthConfig, candidate: Candidate) -> Vec<Outbound> {
    let Candidate { position, block } = candidate;

    let underneath = config
        .variant_config(&block)
        .and_then(|c| c.underneath.clone())
        .filter(|under| !config.is_substrate(under));

    let mut out = Vec::with_capacity(1 + config.underneath_depth() as usize);
    out.push(Outbound::ReplaceBlock {
        position,
        block,
        filter: config.substrate_filter(),
    });

    if let Some(under) = underneath {
        for depth in 1..=i64::from(config.underneath_depth()) {
            out.push(Outbound::PlaceBlock {
                position: position.offset(0, -depth, 0),
                block: under.clone(),
            });
        }
    }

    out
}
