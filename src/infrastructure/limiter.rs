pub mod ledger;
pub mod rate_limiter;
