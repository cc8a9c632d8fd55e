//! Command-line argument parsing

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ibm-container-registry")]
#[command(about = "Manage namespaces, images, quotas and retention in IBM Cloud Container Registry")]
#[command(version)]
pub struct Args {
    /// IBM Cloud account ID
    #[arg(long, short = 'a', env = "CONTAINER_REGISTRY_ACCOUNT")]
    pub account: String,

    /// Registry region, e.g. us-south or eu-de
    #[arg(long, short = 'r', conflicts_with = "url")]
    pub region: Option<String>,

    /// Registry API base URL
    #[arg(long)]
    pub url: Option<String>,

    /// Prefix of the external configuration properties
    #[arg(long = "service-name", default_value = "container_registry")]
    pub service_name: String,

    /// Enable verbose output
    #[arg(long, short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Account authorization options
    #[command(subcommand)]
    Auth(AuthCommand),
    #[command(subcommand)]
    Images(ImagesCommand),
    /// Show the registry banner message
    Messages,
    #[command(subcommand)]
    Namespaces(NamespacesCommand),
    /// Registry pricing plan
    #[command(subcommand)]
    Plans(PlansCommand),
    #[command(subcommand)]
    Quota(QuotaCommand),
    /// Namespace retention policies
    #[command(subcommand)]
    Retention(RetentionCommand),
    /// Account settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    #[command(subcommand)]
    Tags(TagsCommand),
    /// Deleted images
    #[command(subcommand)]
    Trash(TrashCommand),
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    Get,
    Update {
        #[arg(long)]
        iam_authz: Option<bool>,
        #[arg(long)]
        private_only: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImagesCommand {
    /// List images, optionally filtered
    List {
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long)]
        include_ibm: Option<bool>,
        #[arg(long)]
        include_private: Option<bool>,
        #[arg(long)]
        include_manifest_lists: Option<bool>,
        #[arg(long)]
        vulnerabilities: Option<bool>,
        #[arg(long)]
        repository: Option<String>,
    },
    /// Delete images by digest reference
    BulkDelete {
        #[arg(required = true)]
        images: Vec<String>,
    },
    /// List images by digest
    Digests {
        #[arg(long)]
        exclude_tagged: Option<bool>,
        #[arg(long)]
        exclude_va: Option<bool>,
        #[arg(long)]
        include_ibm: Option<bool>,
        #[arg(long = "repository")]
        repositories: Vec<String>,
    },
    Tag {
        fromimage: String,
        toimage: String,
    },
    Delete(ImageArg),
    Inspect(ImageArg),
    Manifest(ImageArg),
}

#[derive(ClapArgs, Debug)]
pub struct ImageArg {
    /// Image reference, e.g. us.icr.io/birds/bird:1
    pub image: String,
}

#[derive(Subcommand, Debug)]
pub enum NamespacesCommand {
    List,
    /// List namespaces with resource group and creation details
    Details,
    Create {
        name: String,
        #[arg(long)]
        resource_group: Option<String>,
    },
    /// Assign a namespace to a resource group
    Assign {
        name: String,
        #[arg(long)]
        resource_group: String,
    },
    Delete {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlansCommand {
    Get,
    Update {
        #[arg(long)]
        plan: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuotaCommand {
    Get,
    Update {
        #[arg(long, allow_hyphen_values = true)]
        storage_megabytes: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        traffic_megabytes: Option<i64>,
    },
}

#[derive(ClapArgs, Debug)]
pub struct PolicyArgs {
    pub namespace: String,
    /// Images kept per repository, -1 for all
    #[arg(long, allow_hyphen_values = true)]
    pub images_per_repo: Option<i32>,
    #[arg(long)]
    pub retain_untagged: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum RetentionCommand {
    List,
    Set(PolicyArgs),
    /// Show which images a policy would delete
    Analyze(PolicyArgs),
    Get {
        namespace: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Get,
    Update {
        #[arg(long)]
        platform_metrics: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// Remove a tag from an image
    Delete(ImageArg),
}

#[derive(Subcommand, Debug)]
pub enum TrashCommand {
    List {
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Restore a digest and its tags
    RestoreTags {
        digest: String,
    },
    Restore(ImageArg),
}
