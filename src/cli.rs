use clap::{Parser, Subcommand};

/// Personal to-do list API server
#[derive(Parser, Debug)]
#[command(name = "todolist-api", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (the default)
    Serve,
    /// Grant the ADMIN role to an existing user
    MakeAdmin {
        /// Email the user registered with
        email: String,
    },
}

impl Cli {
    pub fn selected(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
