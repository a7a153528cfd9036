//! numlin command-line interface.
//!
//! Runs one of the library solvers on a JSON problem file and prints the
//! result, operation count, status and residual.

mod output;
mod problem;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Env;
use nalgebra::DVector;
use numlin_solver::{
    EigenConfig, IterativeConfig, IterativeMethod, SolverConfig, gauss_jordan, gaussian,
    iterative, jacobi_eigen, lu, matrix,
};

use crate::output::Report;
use crate::problem::{Problem, Rhs};

#[derive(Parser)]
#[command(name = "numlin")]
#[command(about = "Classical dense linear solvers and Jacobi eigen-decomposition")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve A x = b
    Solve {
        /// Path to the problem file
        problem: PathBuf,

        /// plain, pivot, gauss-jordan, lu, cholesky, jacobi or gauss-seidel
        #[arg(short, long, default_value = "pivot")]
        method: String,

        /// Relaxation weight for iterative methods
        #[arg(long, default_value = "1.0")]
        relaxation: f64,

        /// Relative error threshold for iterative methods
        #[arg(long, default_value = "1e-8")]
        tol: f64,

        /// Iteration cap for iterative methods
        #[arg(long, default_value = "10000")]
        max_iter: usize,

        /// Print intermediate steps
        #[arg(long)]
        trace: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Invert A by Gauss-Jordan elimination
    Inverse {
        /// Path to the problem file
        problem: PathBuf,

        /// Print intermediate steps
        #[arg(long)]
        trace: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Factor A into L and U
    Decompose {
        /// Path to the problem file
        problem: PathBuf,

        /// Use Cholesky instead of Doolittle
        #[arg(long)]
        cholesky: bool,

        /// Print intermediate steps
        #[arg(long)]
        trace: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Eigenvalues and eigenvectors of a symmetric A
    Eigen {
        /// Path to the problem file
        problem: PathBuf,

        /// Off-diagonal threshold
        #[arg(long, default_value = "1e-9")]
        tol: f64,

        /// Rotation cap
        #[arg(long, default_value = "10000")]
        max_iter: usize,

        /// Order pairs by descending eigenvalue
        #[arg(long)]
        sort: bool,

        /// Print intermediate steps
        #[arg(long)]
        trace: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Direct or iterative method selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    GaussianPlain,
    GaussianPivot,
    GaussJordan,
    Lu,
    Cholesky,
    Iterative(IterativeMethod),
}

impl Method {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "plain" | "gauss" | "gaussian" => Some(Self::GaussianPlain),
            "pivot" | "pivoted" => Some(Self::GaussianPivot),
            "gauss-jordan" | "jordan" | "gj" => Some(Self::GaussJordan),
            "lu" | "doolittle" => Some(Self::Lu),
            "cholesky" => Some(Self::Cholesky),
            other => IterativeMethod::from_name(other).map(Self::Iterative),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::GaussianPlain => "Gaussian elimination",
            Self::GaussianPivot => "Gaussian elimination (partial pivoting)",
            Self::GaussJordan => "Gauss-Jordan elimination",
            Self::Lu => "LU decomposition",
            Self::Cholesky => "Cholesky decomposition",
            Self::Iterative(m) => m.name(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Solve {
            problem,
            method,
            relaxation,
            tol,
            max_iter,
            trace,
            json,
        } => {
            let method = Method::from_name(&method)
                .with_context(|| format!("unknown method '{}'", method))?;
            let iterative_config = IterativeConfig::default()
                .with_relaxation(relaxation)
                .with_tol(tol)
                .with_max_iter(max_iter)
                .with_trace(trace);
            cmd_solve(&Problem::load(&problem)?, method, iterative_config, json)?;
        }
        Commands::Inverse {
            problem,
            trace,
            json,
        } => {
            cmd_inverse(&Problem::load(&problem)?, trace, json)?;
        }
        Commands::Decompose {
            problem,
            cholesky,
            trace,
            json,
        } => {
            cmd_decompose(&Problem::load(&problem)?, cholesky, trace, json)?;
        }
        Commands::Eigen {
            problem,
            tol,
            max_iter,
            sort,
            trace,
            json,
        } => {
            let config = EigenConfig::default()
                .with_tol(tol)
                .with_max_iter(max_iter)
                .with_trace(trace);
            cmd_eigen(&Problem::load(&problem)?, &config, sort, json)?;
        }
    }
    Ok(())
}

fn cmd_solve(
    problem: &Problem,
    method: Method,
    iterative_config: IterativeConfig,
    json: bool,
) -> Result<Report> {
    let label = method.label();
    let config = SolverConfig::default().with_trace(iterative_config.trace);
    log::debug!("solving {}x{} system with {}", problem.a.nrows(), problem.a.ncols(), label);

    if let (Method::GaussianPivot, Some(Rhs::Matrix(b))) = (method, &problem.b) {
        let solved = gaussian::solve_pivoted_multi(&problem.a, b, &config)
            .with_context(|| format!("{} failed", label))?;
        let residual = (&problem.a * &solved.value - b).amax();
        let report = Report::matrix(label, &solved, Some(residual));
        if json {
            print_json(&report)?;
        } else {
            output::print_matrix_solution(label, &solved, Some(residual));
        }
        return Ok(report);
    }

    let b = problem.rhs_vector()?;
    let solved = match method {
        Method::GaussianPlain => gaussian::solve_plain(&problem.a, b, &config),
        Method::GaussianPivot => gaussian::solve_pivoted(&problem.a, b, &config),
        Method::GaussJordan => gauss_jordan::solve(&problem.a, b, &config),
        Method::Lu => lu::solve(&problem.a, b, &config),
        Method::Cholesky => lu::solve_cholesky(&problem.a, b, &config),
        Method::Iterative(kind) => {
            return cmd_iterative(problem, b, label, &iterative_config.with_method(kind), json);
        }
    }
    .inspect_err(|e| log::debug!("{} gave up after {} operations", label, e.ops()))
    .with_context(|| format!("{} failed", label))?;

    let residual = matrix::max_abs_residual(&problem.a, &solved.value, b).ok();
    let report = Report::vector(label, &solved, residual);
    if json {
        print_json(&report)?;
    } else {
        output::print_vector_solution(label, &solved, residual);
    }
    Ok(report)
}

fn cmd_iterative(
    problem: &Problem,
    b: &DVector<f64>,
    label: &str,
    config: &IterativeConfig,
    json: bool,
) -> Result<Report> {
    let solution = iterative::solve(&problem.a, b, &problem.initial_guess(), config)
        .with_context(|| format!("{} failed", label))?;
    let residual = matrix::max_abs_residual(&problem.a, &solution.x, b).ok();
    let report = Report::iterative(label, &solution, residual);

    if json {
        print_json(&report)?;
    } else {
        output::print_iterative(label, &solution, residual);
    }
    Ok(report)
}

fn cmd_inverse(problem: &Problem, trace: bool, json: bool) -> Result<Report> {
    let label = "Gauss-Jordan inverse";
    let config = SolverConfig::default().with_trace(trace);
    let solved =
        gauss_jordan::inverse(&problem.a, &config).with_context(|| format!("{} failed", label))?;
    let residual = matrix::inverse_residual(&problem.a, &solved.value).ok();
    let report = Report::matrix(label, &solved, residual);

    if json {
        print_json(&report)?;
    } else {
        output::print_matrix_solution(label, &solved, residual);
    }
    Ok(report)
}

fn cmd_decompose(problem: &Problem, cholesky: bool, trace: bool, json: bool) -> Result<Report> {
    let config = SolverConfig::default().with_trace(trace);
    let (label, result) = if cholesky {
        ("Cholesky decomposition", lu::decompose_cholesky(&problem.a, &config))
    } else {
        ("LU decomposition", lu::decompose(&problem.a, &config))
    };
    let solved = result.with_context(|| format!("{} failed", label))?;
    let residual = lu::reconstruction_error(&problem.a, &solved.value).ok();
    let report = Report::factors(label, &solved, residual);

    if json {
        print_json(&report)?;
    } else {
        output::print_factors(label, &solved, residual);
    }
    Ok(report)
}

fn cmd_eigen(problem: &Problem, config: &EigenConfig, sort: bool, json: bool) -> Result<Report> {
    if problem.a.nrows() != problem.a.ncols() {
        bail!(
            "eigen-decomposition needs a square matrix, got {}x{}",
            problem.a.nrows(),
            problem.a.ncols()
        );
    }
    let mut eig = jacobi_eigen(&problem.a, config).context("Jacobi eigen-decomposition failed")?;
    if sort {
        eig = eig.sorted_descending();
    }

    let report = Report::eigen(&eig);
    if json {
        print_json(&report)?;
    } else {
        output::print_eigen(&eig);
    }
    Ok(report)
}

fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
