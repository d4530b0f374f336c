use crate::sources::{ContextInfo, PodRef, PodSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use std::path::PathBuf;
use tracing::{debug, warn};

const PODS_PAGE_SIZE: u32 = 500;

/// Every context of a kubeconfig file.
pub struct KubeContexts {
    kubeconfig_path: Option<PathBuf>,
}

impl KubeContexts {
    /// Without a path, the kubeconfig is found the way kubectl finds it.
    pub fn new(kubeconfig_path: Option<PathBuf>) -> Self {
        Self { kubeconfig_path }
    }

    fn kubeconfig(&self) -> Result<Kubeconfig> {
        match &self.kubeconfig_path {
            Some(path) => Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig {}", path.display())),
            None => Kubeconfig::read().context("Failed to read kubeconfig. Is kubectl configured?"),
        }
    }

    async fn client_for_context(&self, context_name: &str) -> Result<kube::Client> {
        let config = kube::Config::from_custom_kubeconfig(
            self.kubeconfig()?,
            &KubeConfigOptions {
                context: Some(context_name.to_owned()),
                ..Default::default()
            },
        )
        .await
        .with_context(|| format!("Failed to create config for context: {context_name}"))?;

        kube::Client::try_from(config)
            .with_context(|| format!("Failed to create client for context: {context_name}"))
    }
}

fn pod_ref(pod: Pod) -> Option<PodRef> {
    let name = pod.metadata.name?;
    let Some(namespace) = pod.metadata.namespace else {
        warn!("Skipping pod {} without a namespace", name);
        return None;
    };
    Some(PodRef { name, namespace })
}

#[async_trait]
impl PodSource for KubeContexts {
    type Connection = kube::Client;

    async fn contexts(&self) -> Result<Vec<ContextInfo>> {
        Ok(self
            .kubeconfig()?
            .contexts
            .into_iter()
            .map(|named| {
                let context = named.context.as_ref();
                ContextInfo {
                    cluster: context.map(|c| c.cluster.clone()).unwrap_or_default(),
                    user: context.and_then(|c| c.user.clone()).unwrap_or_default(),
                    name: named.name,
                }
            })
            .collect())
    }

    #[tracing::instrument(skip_all, fields(context = %context.name))]
    async fn connect(&self, context: &ContextInfo) -> Result<kube::Client> {
        self.client_for_context(&context.name).await
    }

    async fn pods(&self, client: &kube::Client) -> Result<Vec<PodRef>> {
        let pods: Api<Pod> = Api::all(client.clone());

        let mut list_params = ListParams::default().limit(PODS_PAGE_SIZE);
        let mut found = Vec::new();
        loop {
            let page = pods
                .list(&list_params)
                .await
                .context("Failed listing pods in all namespaces")?;
            debug!("Got a page of {} pods", page.items.len());
            found.extend(page.items.into_iter().filter_map(pod_ref));

            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => {
                    list_params = list_params.continue_token(&token);
                }
                _ => break,
            }
        }

        Ok(found)
    }
}
