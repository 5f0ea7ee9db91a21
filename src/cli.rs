use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "kubestat",
    version,
    about = "Pod and node health at a glance for one or more Kubernetes targets."
)]
pub struct CliArgs {
    /// Path to a kubestat YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the kubeconfig file (defaults to kube's own discovery)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Namespace to watch
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Watch all namespaces
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Kubeconfig context to watch; repeat to cycle between several
    #[arg(long = "context")]
    pub contexts: Vec<String>,

    /// Refresh interval in seconds
    #[arg(long)]
    pub refresh_secs: Option<u64>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Write logs to this file instead of discarding them
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
