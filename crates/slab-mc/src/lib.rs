// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Monte Carlo Power Iteration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Monte Carlo k-eigenvalue estimation by power iteration on a 1-D slab.
//!
//! A cycle transports a batch of histories drawn from the current fission
//! source, banks the fission sites they produce into the next-cycle source,
//! and updates the eigenvalue estimate from the ratio of produced weight to
//! histories. Inactive cycles let the source shape converge; active cycles
//! accumulate eigenvalue and shape statistics.
//!
//! Every history owns a counter-based RNG substream derived from the master
//! seed, so runs are reproducible for a fixed seed regardless of scheduling.

pub mod bank;
pub mod hist;
pub mod particle;
pub mod power;
pub mod rng;
pub mod source;
pub mod stats;

pub use bank::BankSource;
pub use hist::HistSource;
pub use particle::Particle;
pub use power::{power_from_config, PowerIterator, PowerRun};
pub use rng::RngStream;
pub use source::FissionSource;
