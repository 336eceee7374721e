use clap::Subcommand;

use super::{print_json, print_outcome, CmdResult, Session};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Update settings; omitted flags keep their current value
    Set {
        /// Child's display name
        #[arg(long)]
        name: Option<String>,
        /// Points granted when the total is zero
        #[arg(long)]
        starting_points: Option<u32>,
        /// Maximum points per day
        #[arg(long)]
        daily_limit: Option<u32>,
    },
}

pub fn run(action: SettingsAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        SettingsAction::Show => {
            session.save()?;
            print_json(session.tracker.state().settings())
        }
        SettingsAction::Set {
            name,
            starting_points,
            daily_limit,
        } => {
            let current = session.tracker.state().settings().clone();
            let now = session.now;
            let outcome = session.tracker.apply_settings_at(
                name.as_deref().unwrap_or(&current.display_name),
                starting_points.unwrap_or(current.starting_points),
                daily_limit.unwrap_or(current.daily_limit),
                now,
            );
            session.save()?;
            print_outcome(&outcome, &outcome.events())
        }
    }
}
