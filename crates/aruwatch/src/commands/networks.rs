//! Network profile listing.

use strum::IntoEnumIterator;
use tabled::Tabled;

use aruwatch_core::NetworkProfile;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Backend ID")]
    backend_id: &'static str,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let profiles: Vec<NetworkProfile> = NetworkProfile::iter().collect();
    let out = output::render_list(
        &global.output,
        &profiles,
        |p| ProfileRow {
            name: p.label(),
            backend_id: p.profile_id(),
        },
        |p| p.label().to_lowercase(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
