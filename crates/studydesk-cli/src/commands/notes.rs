use clap::Subcommand;
use studydesk_core::notes::{ALL_SUBJECTS, SUBJECTS};
use studydesk_core::{Notebook, SqliteStore};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum NotesAction {
    /// Add a note
    Add {
        /// Note text
        text: String,
        /// Subject the note belongs to
        #[arg(long, default_value = "General")]
        subject: String,
    },
    /// List notes, newest first
    List {
        /// Only show this subject ("All" for every subject)
        #[arg(long)]
        subject: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the text of a note
    Edit {
        id: Uuid,
        text: String,
    },
    /// Delete a note
    Remove {
        id: Uuid,
    },
    /// List the built-in subjects
    Subjects,
}

pub fn run(action: NotesAction) -> anyhow::Result<()> {
    match action {
        NotesAction::Add { text, subject } => {
            let note = open_notebook()?.add(&subject, &text)?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        NotesAction::List { subject, json } => {
            let notes = open_notebook()?.list(subject.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else if notes.is_empty() {
                println!("No notes yet");
            } else {
                for note in notes {
                    println!(
                        "{}  [{}] {}  ({})",
                        note.id,
                        note.subject,
                        note.text,
                        note.updated_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        NotesAction::Edit { id, text } => {
            let note = open_notebook()?.update(id, &text)?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }
        NotesAction::Remove { id } => {
            open_notebook()?.remove(id)?;
            println!("removed {id}");
        }
        NotesAction::Subjects => {
            println!("{ALL_SUBJECTS}");
            for subject in SUBJECTS {
                println!("{subject}");
            }
        }
    }
    Ok(())
}

fn open_notebook() -> anyhow::Result<Notebook<SqliteStore>> {
    Ok(Notebook::open(SqliteStore::open_default()?)?)
}
