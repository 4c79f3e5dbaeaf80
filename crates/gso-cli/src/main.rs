use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gso_config::{AmfEndpoint, N2RelationView, SourceMode, StaticConfig};
use gso_host::{FixedAttachment, LocalProcessWorkload};
use gso_reconcile::{ReconcileOutcome, Reconciler, Trigger};
use gso_render::{render, ControlEndpoint};
use gso_simrun::{ActionResult, SimEnv, SimulationRunner};
use gso_workload::gnb_network_annotation;
use serde::Deserialize;
use std::fs;

#[derive(Parser)]
#[command(name = "gso")]
#[command(about = "gnbsim operator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SourceArg {
    /// All parameters from the static config document.
    Static,
    /// AMF endpoint supplied over the fiveg-n2 relation.
    N2Relation,
}

impl From<SourceArg> for SourceMode {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Static => SourceMode::Static,
            SourceArg::N2Relation => SourceMode::N2Relation,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum TriggerArg {
    ConfigChanged,
    WorkloadReady,
    StorageAttached,
    NetworkAttachmentChanged,
    N2DataChanged,
    Redelivery,
}

impl From<TriggerArg> for Trigger {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::ConfigChanged => Trigger::ConfigChanged,
            TriggerArg::WorkloadReady => Trigger::WorkloadReady,
            TriggerArg::StorageAttached => Trigger::StorageAttached,
            TriggerArg::NetworkAttachmentChanged => Trigger::NetworkAttachmentChanged,
            TriggerArg::N2DataChanged => Trigger::N2DataChanged,
            TriggerArg::Redelivery => Trigger::Redelivery,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one reconciliation pass and print the resulting status as JSON.
    Reconcile {
        /// Static config document (JSON object of string values).
        #[arg(long)]
        config: String,

        /// Workload root directory.
        #[arg(long)]
        root: String,

        /// Address of this component's control endpoint.
        #[arg(long)]
        control_ip: String,

        /// Where the AMF endpoint comes from.
        #[arg(long, value_enum, default_value = "static")]
        source: SourceArg,

        /// Current fiveg-n2 relation view (JSON), if any.
        #[arg(long)]
        n2_relation: Option<String>,

        /// The secondary network attachment is ready.
        #[arg(long, default_value_t = false)]
        attachment_ready: bool,

        /// The signal that caused this pass.
        #[arg(long, value_enum, default_value = "config-changed")]
        trigger: TriggerArg,
    },

    /// Render the configuration artifact to stdout without touching the
    /// workload.
    Render {
        #[arg(long)]
        config: String,

        #[arg(long)]
        control_ip: String,

        #[arg(long, value_enum, default_value = "static")]
        source: SourceArg,

        #[arg(long)]
        n2_relation: Option<String>,
    },

    /// Invoke the simulation binary against the written artifact.
    StartSimulation {
        #[arg(long)]
        root: String,

        /// Pass the POD_IP/MEM_LIMIT context (tightens the exec timeout).
        #[arg(long)]
        pod_ip: Option<String>,
    },

    /// Print the network annotation derived from the configuration.
    Annotation {
        #[arg(long)]
        config: String,
    },
}

/// Raw relation document, string-typed the way the relation transport
/// delivers it.
#[derive(Debug, Default, Deserialize)]
struct RelationFile {
    #[serde(default)]
    created: bool,
    #[serde(rename = "amf-hostname")]
    amf_hostname: Option<String>,
    #[serde(rename = "amf-port")]
    amf_port: Option<String>,
}

fn load_config(path: &str) -> Result<StaticConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("read config: {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse config: {path}"))
}

fn load_relation(path: Option<&str>) -> Result<N2RelationView> {
    let Some(path) = path else {
        return Ok(N2RelationView::absent());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("read relation: {path}"))?;
    let file: RelationFile =
        serde_json::from_str(&raw).with_context(|| format!("parse relation: {path}"))?;
    Ok(N2RelationView {
        created: file.created,
        endpoint: AmfEndpoint::from_raw(file.amf_hostname.as_deref(), file.amf_port.as_deref()),
    })
}

fn resolve_params(
    config: &str,
    source: SourceArg,
    n2_relation: Option<&str>,
) -> Result<gso_config::GnbParams> {
    let cfg = load_config(config)?;
    let relation = load_relation(n2_relation)?;
    let resolved = gso_config::resolve(&cfg, source.into())?;
    match resolved.into_params(&relation) {
        Some(params) => Ok(params),
        None => bail!("AMF endpoint not available from the fiveg-n2 relation"),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Reconcile {
            config,
            root,
            control_ip,
            source,
            n2_relation,
            attachment_ready,
            trigger,
        } => {
            let cfg = load_config(&config)?;
            let relation = load_relation(n2_relation.as_deref())?;
            let workload = LocalProcessWorkload::new(root)?;
            let attachment = FixedAttachment::new(attachment_ready);
            let reconciler = Reconciler::new(
                &workload,
                &attachment,
                ControlEndpoint::new(control_ip),
                source.into(),
            );

            let outcome = reconciler.reconcile(&cfg, &relation, trigger.into());
            let status = outcome.unit_status();
            let digest = match &outcome {
                ReconcileOutcome::Active { config_digest } => Some(config_digest.clone()),
                _ => None,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "state": status.state(),
                    "reason": status.reason(),
                    "redeliver": outcome.wants_redelivery(),
                    "config_digest": digest,
                }))?
            );
        }

        Commands::Render {
            config,
            control_ip,
            source,
            n2_relation,
        } => {
            let params = resolve_params(&config, source, n2_relation.as_deref())?;
            print!("{}", render(&params, &ControlEndpoint::new(control_ip))?);
        }

        Commands::StartSimulation { root, pod_ip } => {
            let workload = LocalProcessWorkload::new(root)?;
            let outcome = match pod_ip {
                Some(ip) => SimulationRunner::with_env(&workload, SimEnv::new(ip)).run(),
                None => SimulationRunner::new(&workload).run(),
            };
            match outcome {
                Ok(outcome) => {
                    let result = ActionResult::from(&outcome);
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Err(err) => bail!("{err}"),
            }
        }

        Commands::Annotation { config } => {
            let cfg = load_config(&config)?;
            let Some(gnb_ip) = cfg.get("gnb-ip-address").filter(|v| !v.is_empty()) else {
                bail!("gnb-ip-address is not configured");
            };
            let annotation = gnb_network_annotation(gnb_ip);
            println!("{}", serde_json::to_string_pretty(&annotation)?);
        }
    }

    Ok(())
}
