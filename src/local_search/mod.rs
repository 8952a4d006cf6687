//! Local search operators for improving agent routes.
//!
//! - [`two_opt_improve`]: Intra-route 2-opt segment reversal on open routes

mod two_opt;

pub use two_opt::two_opt_improve;
