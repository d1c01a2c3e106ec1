// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use fxbuild::commands::{CompileCommand, JlinkCommand, PackageCommand, RunCommand};
use fxbuild::config::{CONFIG_FILE_NAME, FxConfig};
use fxbuild::error::{Result, format_error_chain, get_exit_code};
use fxbuild::logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fxbuild")]
#[command(author, version, about = "JavaFX application build tool", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Project configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Skip execution of the goal
    #[arg(long, global = true)]
    skip: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the project sources with javac
    #[command(visible_alias = "c")]
    Compile,

    /// Launch the application with java
    #[command(visible_alias = "r")]
    Run {
        /// Override the configured main class
        #[arg(long)]
        main_class: Option<String>,

        /// Run the application asynchronously and return immediately
        #[arg(long)]
        r#async: bool,
    },

    /// Create a custom runtime image with jlink
    Jlink {
        /// Override the configured image directory name
        #[arg(long)]
        image_name: Option<String>,
    },

    /// Copy dependencies and write a runnable launch script
    #[command(visible_alias = "p")]
    Package,
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let mut config = match FxConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error_chain(&e));
            std::process::exit(get_exit_code(&e));
        }
    };
    if cli.skip {
        config.project.skip = true;
    }

    let result: Result<()> = (|| match cli.command {
        Commands::Compile => CompileCommand::new(&config).execute(),
        Commands::Run { main_class, r#async } => {
            if let Some(main_class) = main_class {
                config.project.main_class = main_class;
            }
            if r#async {
                config.run.r#async = true;
            }
            RunCommand::new(&config).execute()
        }
        Commands::Jlink { image_name } => {
            if let Some(image_name) = image_name {
                config.jlink.image_name = image_name;
            }
            JlinkCommand::new(&config).execute()
        }
        Commands::Package => PackageCommand::new(&config).execute(),
    })();

    if let Err(e) = result {
        eprintln!("{}", format_error_chain(&e));
        std::process::exit(get_exit_code(&e));
    }
}
