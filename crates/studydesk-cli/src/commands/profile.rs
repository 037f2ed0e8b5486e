use clap::Subcommand;
use studydesk_core::profile::{self, FIELDS};
use studydesk_core::{Profile, SqliteStore};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the saved profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one profile field
    Set {
        /// Field name, e.g. name, email, rollNumber, dob, bloodGroup
        field: String,
        value: String,
    },
    /// Clear the profile, role and notes from this machine
    Logout,
}

pub fn run(action: ProfileAction) -> anyhow::Result<()> {
    let mut store = SqliteStore::open_default()?;

    match action {
        ProfileAction::Show { json } => {
            let profile = Profile::load(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                for field in FIELDS {
                    println!("{field:<12} {}", profile.get(field).unwrap_or_default());
                }
                println!("{:<12} {}", "session", profile::current_role(&store)?);
            }
        }
        ProfileAction::Set { field, value } => {
            let profile = Profile::update_field(&mut store, &field, &value)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Logout => {
            profile::logout(&mut store)?;
            println!("Logged out");
        }
    }
    Ok(())
}
