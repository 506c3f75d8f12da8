use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use docker_volume_sync::commands::config_cmd::ConfigOptions;
use docker_volume_sync::commands::file_to_volume::FileToVolumeOptions;
use docker_volume_sync::commands::s3_to_volume::S3ToVolumeOptions;
use docker_volume_sync::commands::volume_to_file::VolumeToFileOptions;
use docker_volume_sync::commands::volume_to_s3::VolumeToS3Options;
use docker_volume_sync::commands::{
    execute_config, execute_file_to_volume, execute_s3_to_volume, execute_volume_to_file,
    execute_volume_to_s3,
};
use docker_volume_sync::config::Config;
use docker_volume_sync::error::AppError;
use docker_volume_sync::model::Compression;
use docker_volume_sync::process::SystemRunner;
use tracing::Level;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Config(args) => execute_config(ConfigOptions {
            show_path: args.path,
            show: args.show,
            edit: args.edit,
        }),
        command => run_volume_command(command, cli.compression),
    }
}

fn run_volume_command(command: Commands, compression: Option<Compression>) -> Result<(), AppError> {
    let mut config = Config::load()?;
    if let Some(compression) = compression {
        config.compression = compression;
    }
    let runner = SystemRunner;

    match command {
        Commands::VolumeToFile(args) => {
            let options = VolumeToFileOptions { volume: args.volume_name, path: args.path };
            execute_volume_to_file(options, &runner, &config)?;
        }
        Commands::FileToVolume(args) => {
            let options = FileToVolumeOptions { path: args.path, volume: args.volume_name };
            execute_file_to_volume(options, &runner, &config)?;
        }
        Commands::VolumeToS3(args) => {
            let options = VolumeToS3Options { volume: args.volume_name, s3_path: args.s3_path };
            execute_volume_to_s3(options, &runner, &config)?;
        }
        Commands::S3ToVolume(args) => {
            let options = S3ToVolumeOptions {
                s3_path: args.s3_path,
                volume: args.volume_name,
                force: args.force,
            };
            execute_s3_to_volume(options, &runner, &config)?;
        }
        Commands::Config(_) => unreachable!("config is dispatched before loading configuration"),
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "docker-volume-sync",
    version,
    about = "Save and restore Docker volumes to and from S3. Also supports saving volumes to disk."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Archive compression: 'auto' picks it from the file extension, 'none' writes plain tar.
    #[arg(long, global = true, value_name = "MODE")]
    compression: Option<Compression>,

    /// Log every step, not just the commands being run.
    #[arg(short, long, global = true, action = ArgAction::SetTrue, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a volume to a file.
    VolumeToFile(VolumeToFileArgs),
    /// Restore a file to a volume.
    FileToVolume(FileToVolumeArgs),
    /// Upload a volume to an S3 bucket.
    #[command(name = "volume-to-s3")]
    VolumeToS3(VolumeToS3Args),
    /// Restore a volume from S3.
    ///
    /// By default a volume that already exists is not restored, so the command can run
    /// on a schedule from configuration management: the first run restores, later runs
    /// do nothing. Pass --force to override this behavior.
    #[command(name = "s3-to-volume")]
    S3ToVolume(S3ToVolumeArgs),
    /// Manage docker-volume-sync configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct VolumeToFileArgs {
    /// Docker volume to back up.
    #[arg(value_name = "VOLUME_NAME")]
    volume_name: String,

    /// Archive to write, e.g. ~/backups/myvol.tar.gz.
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

#[derive(Args)]
struct FileToVolumeArgs {
    /// Archive to extract.
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Docker volume to restore into; created if it does not exist.
    #[arg(value_name = "VOLUME_NAME")]
    volume_name: String,
}

#[derive(Args)]
struct VolumeToS3Args {
    /// Docker volume to back up.
    #[arg(value_name = "VOLUME_NAME")]
    volume_name: String,

    /// S3 URL to upload to (e.g. s3://my-backup-bucket/myfile.tar.gz).
    #[arg(value_name = "S3_PATH")]
    s3_path: String,
}

#[derive(Args)]
struct S3ToVolumeArgs {
    /// S3 URL to restore from (e.g. s3://my-backup-bucket/myfile.tar.gz).
    #[arg(value_name = "S3_PATH")]
    s3_path: String,

    /// Docker volume to create.
    #[arg(value_name = "VOLUME_NAME")]
    volume_name: String,

    /// Restore even if the volume already exists.
    #[arg(long, action = ArgAction::SetTrue)]
    force: bool,
}

#[derive(Args)]
struct ConfigArgs {
    /// Show the configuration file path.
    #[arg(long = "path", action = ArgAction::SetTrue)]
    path: bool,

    /// Print the effective configuration.
    #[arg(long = "show", action = ArgAction::SetTrue)]
    show: bool,

    /// Open the configuration file in $EDITOR.
    #[arg(long = "edit", action = ArgAction::SetTrue)]
    edit: bool,
}
