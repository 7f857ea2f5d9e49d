use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum StrategyError {
    #[snafu(display("matched reduction has rank {rank}; at least one loop dimension is required"))]
    InvalidReductionRank { rank: usize },
}
