mod cli;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands, EventCommands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = notedash::logging::init_logging(&cli.log_level) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let notes = cli.notes.as_deref();
    let result = match cli.command {
        None | Some(Commands::Status) => cli::status::run(notes),
        Some(Commands::Init { notes_path }) => cli::init::run(notes_path),
        Some(Commands::Timelines) => cli::timelines::list(notes),
        Some(Commands::Timeline { id }) => cli::timelines::show(notes, &id),
        Some(Commands::Payments { month, past }) => cli::payments::run(notes, month.as_deref(), past),
        Some(Commands::Validate) => cli::payments::validate(notes),
        Some(Commands::Purchases) => cli::payments::purchases(notes),
        Some(Commands::Event { command }) => match command {
            EventCommands::Add { id, text, date, link } => {
                cli::event::add(notes, &id, &text, date.as_deref(), link.as_deref())
            }
            EventCommands::Edit {
                id,
                line,
                text,
                date,
                link,
            } => cli::event::edit(notes, &id, line, &text, date.as_deref(), link.as_deref()),
            EventCommands::Delete { id, line } => cli::event::delete(notes, &id, line),
            EventCommands::Close { id } => cli::event::set_closed(notes, &id, true),
            EventCommands::Reopen { id } => cli::event::set_closed(notes, &id, false),
        },
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "notedash", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
