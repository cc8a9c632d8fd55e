//! Runs one parsed command against the registry API

use crate::cli::args::{
    Args, AuthCommand, Command, ImagesCommand, NamespacesCommand, PlansCommand, PolicyArgs,
    QuotaCommand, RetentionCommand, SettingsCommand, TagsCommand, TrashCommand,
};
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::operations::*;
use crate::registry::{ContainerRegistryClient, DetailedResponse};
use serde::Serialize;

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = if args.quiet {
            Logger::new_quiet()
        } else {
            Logger::new(args.verbose)
        };
        Self { args, output }
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub async fn run(&self) -> Result<()> {
        let client = self.create_client()?;
        self.output.detail(&format!(
            "Account {} at {}",
            client.account(),
            client.service_url()
        ));

        self.dispatch(&client).await?;
        self.output.detail(&format!("Completed in {}", self.output.elapsed()));
        Ok(())
    }

    /// External configuration first, then the command-line overrides.
    fn create_client(&self) -> Result<ContainerRegistryClient> {
        let client = ContainerRegistryClient::new_instance_with_service_name(
            self.args.account.as_str(),
            &self.args.service_name,
        )?;
        match (&self.args.url, &self.args.region) {
            (Some(url), _) => client.with_service_url(url),
            (None, Some(region)) => client.with_region(region),
            (None, None) => Ok(client),
        }
    }

    async fn dispatch(&self, client: &ContainerRegistryClient) -> Result<()> {
        match &self.args.command {
            Command::Auth(AuthCommand::Get) => self.print(client.get_auth().await?),
            Command::Auth(AuthCommand::Update {
                iam_authz,
                private_only,
            }) => {
                let options = UpdateAuthOptions {
                    iam_authz: *iam_authz,
                    private_only: *private_only,
                };
                self.done("Authorization options updated", client.update_auth(&options).await?)
            }

            Command::Images(command) => self.images(client, command).await,

            Command::Messages => {
                let response = client.get_messages().await?;
                match response.result {
                    Some(message) => self.print_value(&message),
                    None => {
                        self.output.info("No registry messages");
                        Ok(())
                    }
                }
            }

            Command::Namespaces(command) => self.namespaces(client, command).await,

            Command::Plans(PlansCommand::Get) => self.print(client.get_plans().await?),
            Command::Plans(PlansCommand::Update { plan }) => {
                let options = UpdatePlansOptions { plan: plan.clone() };
                self.done("Plan updated", client.update_plans(&options).await?)
            }

            Command::Quota(QuotaCommand::Get) => self.print(client.get_quota().await?),
            Command::Quota(QuotaCommand::Update {
                storage_megabytes,
                traffic_megabytes,
            }) => {
                let options = UpdateQuotaOptions {
                    storage_megabytes: *storage_megabytes,
                    traffic_megabytes: *traffic_megabytes,
                };
                self.done("Quota updated", client.update_quota(&options).await?)
            }

            Command::Retention(command) => self.retention(client, command).await,

            Command::Settings(SettingsCommand::Get) => self.print(client.get_settings().await?),
            Command::Settings(SettingsCommand::Update { platform_metrics }) => {
                let options = UpdateSettingsOptions {
                    platform_metrics: *platform_metrics,
                };
                self.done("Settings updated", client.update_settings(&options).await?)
            }

            Command::Tags(TagsCommand::Delete(arg)) => self.print(
                client
                    .delete_image_tag(&DeleteImageTagOptions::new(arg.image.as_str()))
                    .await?,
            ),

            Command::Trash(TrashCommand::List { namespace }) => {
                let options = ListDeletedImagesOptions {
                    namespace: namespace.clone(),
                };
                self.print(client.list_deleted_images(&options).await?)
            }
            Command::Trash(TrashCommand::RestoreTags { digest }) => self.print(
                client
                    .restore_tags(&RestoreTagsOptions::new(digest.as_str()))
                    .await?,
            ),
            Command::Trash(TrashCommand::Restore(arg)) => self.done(
                &format!("Restored {}", arg.image),
                client
                    .restore_image(&RestoreImageOptions::new(arg.image.as_str()))
                    .await?,
            ),
        }
    }

    async fn images(&self, client: &ContainerRegistryClient, command: &ImagesCommand) -> Result<()> {
        match command {
            ImagesCommand::List {
                namespace,
                include_ibm,
                include_private,
                include_manifest_lists,
                vulnerabilities,
                repository,
            } => {
                let options = ListImagesOptions {
                    namespace: namespace.clone(),
                    include_ibm: *include_ibm,
                    include_private: *include_private,
                    include_manifest_lists: *include_manifest_lists,
                    vulnerabilities: *vulnerabilities,
                    repository: repository.clone(),
                };
                self.print(client.list_images(&options).await?)
            }
            ImagesCommand::BulkDelete { images } => {
                let options = BulkDeleteImagesOptions::new(images.iter().cloned());
                let response = client.bulk_delete_images(&options).await?;
                if let Some(failed) = response.result().and_then(|r| r.error.as_ref()) {
                    if !failed.is_empty() {
                        self.output
                            .warning(&format!("{} image(s) could not be deleted", failed.len()));
                    }
                }
                self.print(response)
            }
            ImagesCommand::Digests {
                exclude_tagged,
                exclude_va,
                include_ibm,
                repositories,
            } => {
                let options = ListImageDigestsOptions {
                    exclude_tagged: *exclude_tagged,
                    exclude_va: *exclude_va,
                    include_ibm: *include_ibm,
                    repositories: (!repositories.is_empty()).then(|| repositories.clone()),
                };
                self.print(client.list_image_digests(&options).await?)
            }
            ImagesCommand::Tag { fromimage, toimage } => self.done(
                &format!("Tagged {} as {}", fromimage, toimage),
                client
                    .tag_image(&TagImageOptions::new(fromimage.as_str(), toimage.as_str()))
                    .await?,
            ),
            ImagesCommand::Delete(arg) => self.print(
                client
                    .delete_image(&DeleteImageOptions::new(arg.image.as_str()))
                    .await?,
            ),
            ImagesCommand::Inspect(arg) => self.print(
                client
                    .inspect_image(&InspectImageOptions::new(arg.image.as_str()))
                    .await?,
            ),
            ImagesCommand::Manifest(arg) => self.print(
                client
                    .get_image_manifest(&GetImageManifestOptions::new(arg.image.as_str()))
                    .await?,
            ),
        }
    }

    async fn namespaces(
        &self,
        client: &ContainerRegistryClient,
        command: &NamespacesCommand,
    ) -> Result<()> {
        match command {
            NamespacesCommand::List => self.print(client.list_namespaces().await?),
            NamespacesCommand::Details => self.print(client.list_namespace_details().await?),
            NamespacesCommand::Create {
                name,
                resource_group,
            } => {
                let options = CreateNamespaceOptions {
                    name: Some(name.clone()),
                    x_auth_resource_group: resource_group.clone(),
                };
                self.print(client.create_namespace(&options).await?)
            }
            NamespacesCommand::Assign {
                name,
                resource_group,
            } => self.print(
                client
                    .assign_namespace(&AssignNamespaceOptions::new(
                        resource_group.as_str(),
                        name.as_str(),
                    ))
                    .await?,
            ),
            NamespacesCommand::Delete { name } => self.done(
                &format!("Deleted namespace {}", name),
                client
                    .delete_namespace(&DeleteNamespaceOptions::new(name.as_str()))
                    .await?,
            ),
        }
    }

    async fn retention(
        &self,
        client: &ContainerRegistryClient,
        command: &RetentionCommand,
    ) -> Result<()> {
        match command {
            RetentionCommand::List => self.print(client.list_retention_policies().await?),
            RetentionCommand::Set(policy) => self.done(
                &format!("Retention policy set for {}", policy.namespace),
                client.set_retention_policy(&policy_options(policy)).await?,
            ),
            RetentionCommand::Analyze(policy) => {
                self.print(client.analyze_retention_policy(&policy_options(policy)).await?)
            }
            RetentionCommand::Get { namespace } => self.print(
                client
                    .get_retention_policy(&GetRetentionPolicyOptions::new(namespace.as_str()))
                    .await?,
            ),
        }
    }

    fn print<T: Serialize>(&self, response: DetailedResponse<T>) -> Result<()> {
        self.output.detail(&format!("HTTP {}", response.status));
        match response.result {
            Some(result) => self.print_value(&result),
            None => {
                self.output.info("The service returned no content");
                Ok(())
            }
        }
    }

    fn print_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        self.output.json(value)?;
        Ok(())
    }

    fn done(&self, message: &str, response: DetailedResponse<()>) -> Result<()> {
        self.output
            .success(&format!("{} ({})", message, response.status));
        Ok(())
    }
}

fn policy_options(policy: &PolicyArgs) -> RetentionPolicyOptions {
    RetentionPolicyOptions {
        namespace: Some(policy.namespace.clone()),
        images_per_repo: policy.images_per_repo,
        retain_untagged: policy.retain_untagged,
    }
}
