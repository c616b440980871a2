use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const LAMBDA_PACKAGE: &str = "resume_search_lambda";

/// Lambda binaries and the archive each one ships in.
const LAMBDA_ARTIFACTS: [(&str, &str); 2] = [
    ("finder_lambda", "finder.zip"),
    ("uploader_lambda", "uploader.zip"),
];

#[derive(Parser)]
#[command(name = "xtask", about = "Task runner for the resume search workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks
    Ci {
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Build the finder and uploader binaries and zip each as `bootstrap`
    ServerlessPackage {
        /// Compilation target triple for Lambda binaries
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        /// Build without `--release`
        #[arg(long)]
        debug: bool,
        /// Directory the zip artifacts are written to
        #[arg(long, default_value = "infra/dist")]
        dist_dir: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, unit and integration tests
    Check,
    /// Unit tests only
    Unit,
    /// Handler integration tests only
    Integration,
}

fn run_cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo");
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_ci(job: CiJob) {
    let lint = matches!(job, CiJob::Check);
    let unit = matches!(job, CiJob::Check | CiJob::Unit);
    let integration = matches!(job, CiJob::Check | CiJob::Integration);

    if lint {
        run_cargo(&["fmt", "--all", "--", "--check"]);
        run_cargo(&["clippy", "--all-targets", "--", "-D", "warnings"]);
    }
    if unit {
        run_cargo(&["test", "-p", "resume_search_core"]);
        run_cargo(&["test", "-p", LAMBDA_PACKAGE, "--lib", "--bins"]);
    }
    if integration {
        run_cargo(&["test", "-p", LAMBDA_PACKAGE, "--tests"]);
    }
}

fn package_lambdas(target: &str, debug: bool, dist_dir: &Path) {
    let mut args = vec!["build", "-p", LAMBDA_PACKAGE, "--target", target];
    for (bin, _) in LAMBDA_ARTIFACTS {
        args.extend(["--bin", bin]);
    }
    if !debug {
        args.push("--release");
    }
    run_cargo(&args);

    let profile = if debug { "debug" } else { "release" };
    let build_dir = Path::new("target").join(target).join(profile);
    fs::create_dir_all(dist_dir).expect("failed to create dist directory");

    for (bin, artifact) in LAMBDA_ARTIFACTS {
        let zip_path = dist_dir.join(artifact);
        write_bootstrap_zip(&build_dir.join(bin), &zip_path);
        eprintln!("packaged {}", zip_path.display());
    }
}

/// Custom Lambda runtimes start the archive entry named `bootstrap`.
fn write_bootstrap_zip(binary_path: &Path, zip_path: &Path) {
    let binary = fs::read(binary_path)
        .unwrap_or_else(|error| panic!("cannot read {}: {error}", binary_path.display()));
    let mut archive = ZipWriter::new(fs::File::create(zip_path).expect("failed to create zip"));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);

    archive
        .start_file("bootstrap", options)
        .expect("failed to add bootstrap entry");
    archive
        .write_all(&binary)
        .expect("failed to write bootstrap entry");
    archive.finish().expect("failed to finish lambda zip");
}

fn main() {
    match Cli::parse().command {
        Commands::Ci { job } => {
            run_ci(job);
            eprintln!("CI job passed.");
        }
        Commands::ServerlessPackage {
            target,
            debug,
            dist_dir,
        } => package_lambdas(&target, debug, &dist_dir),
    }
}
