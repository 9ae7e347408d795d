use clap::{ArgAction, Args, Parser, Subcommand};
use dnsmul_core::socket::SocketCommunicator;
use dnsmul_matrix::{
    run_local, ConfigurationError, Element, FileMatrixSource, Matrix, ProcessTask,
    RunConfiguration, RunError, Topology, DEFAULT_RECURSIVE_THRESHOLD, SUPPORTED_GRID_SIDES,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env::current_exe;
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{stdout, AsyncWriteExt};
use tokio::process::Command;
use tracing::{error, info, info_span};
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct MainArguments {
    #[clap(subcommand)]
    command: MainCommand,
    /// Repeat to raise log verbosity on standard error
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Args)]
struct SourceArguments {
    /// Left operand, one row of whitespace-separated integers per line
    left: PathBuf,
    /// Right operand
    right: PathBuf,
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, Args)]
struct ConfigurationArguments {
    /// Grid sides whose cube is an allowed process count
    #[arg(long, value_delimiter = ',', default_values_t = SUPPORTED_GRID_SIDES.to_vec())]
    grid_sides: Vec<usize>,
    /// Smallest power of two block size multiplied by divide and conquer
    #[arg(long, default_value_t = DEFAULT_RECURSIVE_THRESHOLD)]
    recursive_threshold: usize,
}

impl From<ConfigurationArguments> for RunConfiguration {
    fn from(arguments: ConfigurationArguments) -> Self {
        Self::new(arguments.grid_sides, arguments.recursive_threshold)
    }
}

impl ConfigurationArguments {
    fn to_arguments(&self) -> Vec<String> {
        vec![
            "--grid-sides".into(),
            self.grid_sides
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            "--recursive-threshold".into(),
            self.recursive_threshold.to_string(),
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Subcommand)]
enum MainCommand {
    /// Run every process as a task of this process
    Run {
        #[arg(short, long)]
        processes: usize,
        #[command(flatten)]
        configuration: ConfigurationArguments,
        #[command(flatten)]
        sources: SourceArguments,
    },
    /// Run one process connected to its peers over TCP
    Worker {
        #[arg(long)]
        rank: usize,
        /// Listen address of every process, in rank order
        #[arg(long, value_delimiter = ',', required = true)]
        peers: Vec<SocketAddr>,
        #[command(flatten)]
        configuration: ConfigurationArguments,
        #[command(flatten)]
        sources: SourceArguments,
    },
    /// Launch one worker process per rank on consecutive localhost ports
    Spawn {
        #[arg(short, long)]
        processes: usize,
        #[arg(long, default_value_t = 7000)]
        port: u16,
        #[command(flatten)]
        configuration: ConfigurationArguments,
        #[command(flatten)]
        sources: SourceArguments,
    },
    /// Write a random or identity matrix to standard output
    Generate {
        #[arg(short, long)]
        size: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        identity: bool,
        /// Largest absolute value of a random element
        #[arg(long, default_value_t = 9)]
        bound: u32,
    },
}

////////////////////////////////////////////////////////////////////////////////////////////////////

fn initialize_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn exit_code<T>(result: Result<T, RunError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        // Processes report their own failures, only a crashed task is left to report here.
        Err(RunError::Join(error)) => {
            error!("{}", error);
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

async fn worker(
    rank: usize,
    peers: Vec<SocketAddr>,
    configuration: RunConfiguration,
    sources: SourceArguments,
) -> ExitCode {
    let span = info_span!("process", rank);

    // The same check every peer makes, before any connection exists.
    if let Err(error) = Topology::from_configuration(peers.len(), &configuration) {
        span.in_scope(|| error!("{}", error));
        return ExitCode::FAILURE;
    }

    if rank >= peers.len() {
        let error = ConfigurationError::UnknownRank {
            rank,
            process_count: peers.len(),
        };
        span.in_scope(|| error!("{}", error));
        return ExitCode::FAILURE;
    }

    let communicator = match SocketCommunicator::connect(rank, &peers).await {
        Ok(communicator) => communicator,
        Err(error) => {
            span.in_scope(|| error!("{}", error));
            return ExitCode::FAILURE;
        }
    };

    exit_code(
        ProcessTask::new(
            communicator,
            configuration,
            FileMatrixSource::new(sources.left),
            FileMatrixSource::new(sources.right),
        )
        .run(stdout())
        .await,
    )
}

async fn spawn(
    processes: usize,
    port: u16,
    verbose: u8,
    configuration: ConfigurationArguments,
    sources: SourceArguments,
) -> Result<ExitCode, Box<dyn Error>> {
    if processes == 0 {
        error!("No process to spawn");
        return Ok(ExitCode::FAILURE);
    }

    let mut peers = Vec::with_capacity(processes);

    for rank in 0..processes {
        let port = u16::try_from(rank)
            .ok()
            .and_then(|offset| port.checked_add(offset))
            .ok_or("Port range exceeds 65535")?;

        peers.push(SocketAddr::from((Ipv4Addr::LOCALHOST, port)).to_string());
    }

    let executable = current_exe()?;
    let peers = peers.join(",");
    let mut children = Vec::with_capacity(processes);

    for rank in 0..processes {
        let mut command = Command::new(&executable);

        if verbose > 0 {
            command.arg(format!("-{}", "v".repeat(verbose.into())));
        }

        command
            .arg("worker")
            .arg("--rank")
            .arg(rank.to_string())
            .arg("--peers")
            .arg(&peers)
            .args(configuration.to_arguments())
            .arg(&sources.left)
            .arg(&sources.right);

        children.push(command.spawn()?);
    }

    info!("Spawned {} processes", processes);

    let mut code = ExitCode::SUCCESS;

    for (rank, mut child) in children.into_iter().enumerate() {
        let status = child.wait().await?;

        if !status.success() {
            error!("Process {} exited with {}", rank, status);
            code = ExitCode::FAILURE;
        }
    }

    Ok(code)
}

async fn generate(
    size: usize,
    seed: Option<u64>,
    identity: bool,
    bound: u32,
) -> Result<ExitCode, Box<dyn Error>> {
    let matrix = if identity {
        Matrix::identity(size)
    } else {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let bound = Element::from(bound);

        Matrix::random(size, -bound..=bound, &mut rng)
    };

    let mut stdout = stdout();
    stdout.write_all(matrix.to_string().as_bytes()).await?;
    stdout.flush().await?;

    Ok(ExitCode::SUCCESS)
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let arguments = MainArguments::parse();

    initialize_tracing(arguments.verbose);

    match arguments.command {
        MainCommand::Run {
            processes,
            configuration,
            sources,
        } => Ok(exit_code(
            run_local(
                processes,
                configuration.into(),
                FileMatrixSource::new(sources.left),
                FileMatrixSource::new(sources.right),
                stdout(),
            )
            .await,
        )),
        MainCommand::Worker {
            rank,
            peers,
            configuration,
            sources,
        } => Ok(worker(rank, peers, configuration.into(), sources).await),
        MainCommand::Spawn {
            processes,
            port,
            configuration,
            sources,
        } => spawn(processes, port, arguments.verbose, configuration, sources).await,
        MainCommand::Generate {
            size,
            seed,
            identity,
            bound,
        } => generate(size, seed, identity, bound).await,
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments() {
        MainArguments::command().debug_assert();
    }

    #[test]
    fn parse_run() {
        let arguments = MainArguments::parse_from(["dnsmul", "-vv", "run", "-p", "8", "a", "b"]);

        assert_eq!(arguments.verbose, 2);

        match arguments.command {
            MainCommand::Run {
                processes,
                configuration,
                sources,
            } => {
                assert_eq!(processes, 8);
                assert_eq!(
                    RunConfiguration::from(configuration),
                    RunConfiguration::default()
                );
                assert_eq!(sources.left, PathBuf::from("a"));
                assert_eq!(sources.right, PathBuf::from("b"));
            }
            command => panic!("unexpected command {command:?}"),
        }
    }

    #[test]
    fn parse_worker_peers() {
        let arguments = MainArguments::parse_from([
            "dnsmul",
            "worker",
            "--rank",
            "1",
            "--peers",
            "127.0.0.1:7000,127.0.0.1:7001",
            "--grid-sides",
            "2",
            "a",
            "b",
        ]);

        match arguments.command {
            MainCommand::Worker {
                rank,
                peers,
                configuration,
                ..
            } => {
                assert_eq!(rank, 1);
                assert_eq!(peers.len(), 2);
                assert_eq!(configuration.grid_sides, vec![2]);
            }
            command => panic!("unexpected command {command:?}"),
        }
    }

    #[test]
    fn configuration_round_trip() {
        let configuration = ConfigurationArguments {
            grid_sides: vec![2, 4],
            recursive_threshold: 32,
        };

        let arguments = MainArguments::parse_from(
            ["dnsmul", "run", "-p", "8"]
                .into_iter()
                .map(String::from)
                .chain(configuration.to_arguments())
                .chain(["a".into(), "b".into()]),
        );

        match arguments.command {
            MainCommand::Run { configuration, .. } => {
                assert_eq!(configuration.grid_sides, vec![2, 4]);
                assert_eq!(configuration.recursive_threshold, 32);
            }
            command => panic!("unexpected command {command:?}"),
        }
    }
}
