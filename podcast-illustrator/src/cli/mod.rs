use anyhow::Result;
use clap::{Parser, Subcommand};

mod serve;

pub use serve::ServeCommand;

#[derive(Parser, Debug)]
#[command(name = "podcast-illustrator")]
#[command(about = "Audio upload service for podcast illustration jobs")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve(ServeCommand),
}

impl Args {
    pub async fn run(self) -> Result<()> {
        let command = match self.command {
            Some(command) => command,
            None => Command::Serve(default_serve(std::iter::empty::<&str>())?),
        };

        match command {
            Command::Serve(cmd) => cmd.run().await,
        }
    }
}

/// Build the implicit `serve` command from `extra` arguments so env
/// fallbacks still apply. Bad values become errors instead of exits.
fn default_serve<I, T>(extra: I) -> Result<ServeCommand>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args = std::iter::once(std::ffi::OsString::from("serve"))
        .chain(extra.into_iter().map(Into::into));
    Ok(ServeCommand::try_parse_from(args)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_optional() {
        let args = Args::try_parse_from(["podcast-illustrator"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_default_serve_parses() {
        let cmd = default_serve(["--port", "8081"]).unwrap();
        assert_eq!(cmd.port, 8081);
    }

    #[test]
    fn test_default_serve_bad_value_is_error() {
        let err = default_serve(["--port", "abc"]).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }
}
