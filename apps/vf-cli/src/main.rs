mod error;
mod replay;

use clap::Parser;
use error::{CliError, CliResult};
use replay::ReplaySolver;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};
use vf_config::RunConfig;
use vf_control::{DriverOptions, RunReport, SimulationController, StepProgress, run_with_progress};
use vf_core::SerialComm;
use vf_params::ParameterStore;

#[derive(Parser)]
#[command(name = "vf-cli")]
#[command(about = "Run control for viscoelastic thinning simulations", long_about = None)]
struct Cli {
    /// Parameter file (default: case.params)
    params: Option<String>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run_in(cli, Path::new(".")) {
        error!("{e}");
        match failure(&e) {
            Failure::Abort => std::process::abort(),
            Failure::Exit(code) => std::process::exit(code),
        }
    }
}

/// How the process ends after an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Failure {
    Exit(i32),
    /// Physical invariant violated; no clean shutdown.
    Abort,
}

fn failure(e: &CliError) -> Failure {
    if e.is_invariant() {
        Failure::Abort
    } else {
        Failure::Exit(1)
    }
}

/// `RUST_LOG` overrides the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,vf_cli=info,vf_control=info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run with every output (and relative replay path) under `workdir`.
fn run_in(cli: Cli, workdir: &Path) -> CliResult<()> {
    let store = ParameterStore::from_args(cli.params);
    let config = RunConfig::from_store(&store)?;

    let Some(replay_path) = config.replay_log() else {
        info!("no solver backend configured, printing the resolved configuration");
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    };

    let replay_path = workdir.join(replay_path);
    let mut solver = ReplaySolver::open(&replay_path)?;
    let controller = SimulationController::new(&config, SerialComm).with_output_dir(workdir);
    if same_file(solver.source(), &controller.log_path()) {
        return Err(CliError::ReplayOverwrite { path: replay_path });
    }
    info!(
        source = %solver.source().display(),
        records = solver.len(),
        "replaying monitor log"
    );

    let report = drive(controller, &mut solver)?;
    print_report(&config, &report);
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn drive(
    mut controller: SimulationController<'_, SerialComm>,
    solver: &mut ReplaySolver,
) -> CliResult<RunReport> {
    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let report = run_with_progress(
        &mut controller,
        solver,
        &DriverOptions::default(),
        Some(&mut |p| {
            let emit_now = (p.fraction_complete - last_fraction).abs() >= 0.005
                || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_progress(&p);
                last_fraction = p.fraction_complete;
                last_emit = Instant::now();
            }
        }),
    );
    clear_progress_line();
    report.map_err(CliError::from)
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_progress(p: &StepProgress) {
    let width = 28usize;
    let filled = ((p.fraction_complete * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let ke = p
        .kinetic_energy
        .map_or_else(|| "-".to_string(), |ke| format!("{ke:.3e}"));
    print!(
        "\r[{}] {:>6.2}%  t={:.4}/{:.4}  step={}  ke={}  elapsed={:.1}s",
        bar,
        p.fraction_complete * 100.0,
        p.sim_time,
        p.t_end,
        p.step,
        ke,
        p.elapsed_wall_s
    );
    let _ = io::stdout().flush();
}

fn print_report(config: &RunConfig, report: &RunReport) {
    println!(
        "✓ Case {} finished: {} at step {}, t = {:.6}",
        config.case_id(),
        report.outcome.label(),
        report.steps,
        report.final_time
    );
    if report.resumed {
        println!("  Resumed from {}", config.dump_file().display());
    }
    if let Some(summary) = &report.summary {
        println!("  Wall time: {:.2}s", summary.wall_time_s);
        println!("  Summary: {}", config.summary_file_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use vf_control::ControlError;
    use vf_core::CoreError;
    use vf_results::{MonitorLog, MonitorRecord, read_log};

    fn workdir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("vf_cli_run_tests").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_params(dir: &Path, content: &str) -> Cli {
        let path = dir.join("case.params");
        std::fs::write(&path, content).unwrap();
        Cli {
            params: Some(path.display().to_string()),
        }
    }

    fn write_log(path: &Path, steps: usize) {
        let mut log = MonitorLog::create(path, "Case 1000", Box::new(std::io::sink())).unwrap();
        for step in 0..=steps {
            log.append(MonitorRecord {
                step,
                dt: 1e-3,
                time: step as f64 * 1e-3,
                kinetic_energy: 0.5,
                min_interface_height: 0.9,
                max_velocity_norm: 1.0,
            })
            .unwrap();
        }
    }

    #[test]
    fn invalid_parameters_exit_with_status_one() {
        let dir = workdir("invalid");
        let cli = write_params(&dir, "tmax = 1\ndtmax = 2\n");
        let err = run_in(cli, &dir).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(failure(&err), Failure::Exit(1));
        assert!(!dir.join("c1000-log").exists());
    }

    #[test]
    fn invariant_violations_abort() {
        let err = CliError::Control(ControlError::Invariant(CoreError::Invariant {
            what: "kinetic energy must not be negative",
            value: -1.0,
        }));
        assert_eq!(failure(&err), Failure::Abort);
        let empty = CliError::EmptyReplay {
            path: PathBuf::from("c1000-log"),
        };
        assert_eq!(failure(&empty), Failure::Exit(1));
    }

    #[test]
    fn replaying_own_log_is_refused() {
        let dir = workdir("overwrite");
        let log = dir.join("c1000-log");
        write_log(&log, 5);
        let cli = write_params(
            &dir,
            "tmax = 0.005\ndtmax = 1e-3\ntsnap = 0.005\nReplayLog = c1000-log\n",
        );

        let err = run_in(cli, &dir).unwrap_err();
        assert!(matches!(err, CliError::ReplayOverwrite { .. }));
        assert_eq!(failure(&err), Failure::Exit(1));
        assert_eq!(read_log(&log).unwrap().len(), 6);
        assert!(!dir.join("dump").exists());
    }

    #[test]
    fn replay_writes_outputs_into_workdir() {
        let dir = workdir("replay");
        let source = dir.join("recorded-log");
        write_log(&source, 5);
        let cli = write_params(
            &dir,
            &format!(
                "tmax = 0.005\ndtmax = 1e-3\ntsnap = 0.005\nReplayLog = {}\n",
                source.display()
            ),
        );

        run_in(cli, &dir).unwrap();
        assert!(dir.join("c1000-summary.json").exists());
        assert!(dir.join("dump").exists());
        assert_eq!(read_log(&dir.join("c1000-log")).unwrap().len(), 6);
        assert_eq!(read_log(&source).unwrap().len(), 6);
    }

    #[test]
    fn without_backend_only_prints_configuration() {
        let dir = workdir("print_only");
        let cli = write_params(&dir, "tmax = 0.5\n");
        run_in(cli, &dir).unwrap();
        assert!(!dir.join("c1000-log").exists());
    }
}
