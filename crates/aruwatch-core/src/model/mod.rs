// ── Domain model ──

mod profile;
mod session;

pub use profile::NetworkProfile;
pub use session::{ClientSession, Whitelist};
