use clap::Subcommand;

use lotprobe_core::{AppConfig, SiteKind};
use lotprobe_scraper::cookies;

/// Sub-commands available under `jar`.
#[derive(Debug, Subcommand)]
pub enum JarCommands {
    /// Print the stored cookies for a site as a Cookie header value
    Show {
        /// copart or iaai
        site: SiteKind,

        /// Include cookies that the minter would not be given
        #[arg(long)]
        all: bool,
    },
    /// Delete a site's cookie jar file
    Clear {
        /// copart or iaai
        site: SiteKind,
    },
}

pub(crate) fn run(config: &AppConfig, command: &JarCommands) {
    match command {
        JarCommands::Show { site, all } => {
            let path = cookies::jar_path(&config.cookie_dir, &config.cookie_file_base, *site);
            let jar = if *all {
                cookies::load_all(&path)
            } else {
                cookies::load(&path)
            };
            tracing::debug!(path = %path.display(), count = jar.len(), "loaded cookie jar");
            println!("{}", jar.serialize());
        }
        JarCommands::Clear { site } => {
            let path = cookies::jar_path(&config.cookie_dir, &config.cookie_file_base, *site);
            cookies::delete(&path);
            tracing::info!(%site, path = %path.display(), "cookie jar cleared");
        }
    }
}
