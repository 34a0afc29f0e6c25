use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser};
use spore_mod_manager::application::{IdSpec, InstallOptions};
use spore_mod_manager::commands::{self, DirectoryOptions};
use spore_mod_manager::config::PathOverrides;
use spore_mod_manager::runtime::RealRuntime;
use std::path::PathBuf;
use std::process::ExitCode;

/// SporeModManager - install, list and uninstall Spore mods
///
/// Mods are `.sporemod` archives (with a modinfo.xml) or raw `.package` files.
/// The directory configuration and the list of installed mods are kept in the
/// data directory, which defaults to the directory of this executable.
///
/// Examples:
///   SporeModManager -i MyMod.sporemod   # Install a mod
///   SporeModManager -l                  # List installed mods with their IDs
///   SporeModManager -u 0 2              # Uninstall the mods with ID 0 and 2
///   SporeModManager -u 1-3              # Uninstall the mods with ID 1, 2 and 3
///   SporeModManager -s --ep1-path /games/Spore/DataEP1  # Remember a game directory
#[derive(Parser, Debug)]
#[command(author, version = env!("SPORE_MOD_MANAGER_VERSION"), about)]
#[command(group(
    ArgGroup::new("action")
        .args(["list_installed", "install", "uninstall"])
        .multiple(false)
))]
struct Cli {
    /// List installed mods and their IDs
    #[arg(short = 'l', long = "list-installed")]
    pub list_installed: bool,

    /// Install one or more .sporemod or .package files
    #[arg(short = 'i', long = "install", value_name = "FILE", num_args = 1..)]
    pub install: Vec<PathBuf>,

    /// Uninstall one or more mods by ID, or by an ID range such as 0-3
    #[arg(short = 'u', long = "uninstall", value_name = "ID", num_args = 1..)]
    pub uninstall: Vec<IdSpec>,

    /// Only install mods that aren't installed yet
    #[arg(long, short = 'n', requires = "install")]
    pub needed: bool,

    /// Directory holding directory_config.json and installed_mods.json
    #[arg(
        long = "data-dir",
        short = 'd',
        env = "SPORE_MOD_MANAGER_DIR",
        value_name = "PATH"
    )]
    pub data_dir: Option<PathBuf>,

    /// ModLibs directory to use instead of the configured one
    #[arg(long = "modlibs-path", value_name = "PATH")]
    pub modlibs_path: Option<PathBuf>,

    /// Galactic Adventures data directory (DataEP1) to use instead of the configured one
    #[arg(long = "ep1-path", value_name = "PATH")]
    pub ep1_path: Option<PathBuf>,

    /// Spore data directory (Data) to use instead of the configured one
    #[arg(long = "data-path", value_name = "PATH")]
    pub data_path: Option<PathBuf>,

    /// Save the given --*-path directories to directory_config.json
    #[arg(long, short = 's')]
    pub save_paths: bool,

    /// Answer yes to mod warnings (experimental, galaxy reset, save data dependency)
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print debug logs and where every file is installed
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let runtime = RealRuntime;
    let directories = DirectoryOptions {
        data_dir: cli.data_dir,
        overrides: PathOverrides {
            mod_libs: cli.modlibs_path,
            galactic_adventures_data: cli.ep1_path,
            core_spore_data: cli.data_path,
        },
        save_paths: cli.save_paths,
    };

    if cli.list_installed {
        return commands::list(runtime, directories);
    }

    if !cli.install.is_empty() {
        let options = InstallOptions {
            yes: cli.yes,
            verbose: cli.verbose,
            needed: cli.needed,
        };
        return commands::install(runtime, &cli.install, directories, options);
    }

    if !cli.uninstall.is_empty() {
        return commands::uninstall(runtime, &cli.uninstall, directories);
    }

    if cli.save_paths {
        return commands::save_paths(runtime, directories);
    }

    Cli::command().print_help()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_list_parsing() {
        let cli = Cli::try_parse_from(["SporeModManager", "-l"]).unwrap();
        assert!(cli.list_installed);
        assert!(cli.install.is_empty());
        assert!(cli.uninstall.is_empty());
    }

    #[test]
    fn test_cli_install_multiple_files() {
        let cli = Cli::try_parse_from([
            "SporeModManager",
            "--install",
            "a.sporemod",
            "b.package",
            "-y",
        ])
        .unwrap();
        assert_eq!(
            cli.install,
            vec![PathBuf::from("a.sporemod"), PathBuf::from("b.package")]
        );
        assert!(cli.yes);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_uninstall_ids() {
        let cli = Cli::try_parse_from(["SporeModManager", "-u", "0", "2"]).unwrap();
        assert_eq!(cli.uninstall, vec![IdSpec::Single(0), IdSpec::Single(2)]);
    }

    #[test]
    fn test_cli_uninstall_range() {
        let cli = Cli::try_parse_from(["SporeModManager", "-u", "0-3"]).unwrap();
        assert_eq!(cli.uninstall, vec![IdSpec::Range(0, 3)]);
        assert!(Cli::try_parse_from(["SporeModManager", "-u", "3-0"]).is_err());
    }

    #[test]
    fn test_cli_needed_requires_install() {
        let cli = Cli::try_parse_from(["SporeModManager", "-n", "-i", "a.sporemod"]).unwrap();
        assert!(cli.needed);
        assert!(Cli::try_parse_from(["SporeModManager", "-n", "-l"]).is_err());
    }

    #[test]
    fn test_cli_path_overrides() {
        let cli = Cli::try_parse_from([
            "SporeModManager",
            "--modlibs-path",
            "/spore/ModLibs",
            "--ep1-path=/spore/DataEP1",
            "--data-path",
            "/spore/Data",
            "-s",
        ])
        .unwrap();
        assert_eq!(cli.modlibs_path, Some(PathBuf::from("/spore/ModLibs")));
        assert_eq!(cli.ep1_path, Some(PathBuf::from("/spore/DataEP1")));
        assert_eq!(cli.data_path, Some(PathBuf::from("/spore/Data")));
        assert!(cli.save_paths);
        assert!(cli.install.is_empty());
    }

    #[test]
    fn test_cli_uninstall_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["SporeModManager", "-u", "first"]).is_err());
        assert!(Cli::try_parse_from(["SporeModManager", "-u", "-1"]).is_err());
    }

    #[test]
    fn test_cli_actions_are_exclusive() {
        let result = Cli::try_parse_from(["SporeModManager", "-l", "-u", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_data_dir_parsing() {
        let cli = Cli::try_parse_from(["SporeModManager", "-d", "/tmp/data", "-l"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
    }

    #[test]
    fn test_cli_no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["SporeModManager"]).unwrap();
        assert!(!cli.list_installed);
        assert!(cli.install.is_empty());
        assert!(cli.uninstall.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
