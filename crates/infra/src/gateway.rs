use std::marker::PhantomData;
use std::time::Duration;

use metrics::counter;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use skema_domain::DomainResult;
use skema_domain::entity::{Entity, EntityKind};
use skema_domain::error::DomainError;
use skema_domain::ports::BoxFuture;
use skema_domain::ports::gateway::{EntityGateway, ExportGateway};

use crate::config::AppConfig;

const GATEWAY_FAILURES_TOTAL: &str = "skema_gateway_failures_total";

/// Typed client for the editor's REST API. One instance is shared by the
/// per-kind gateways; each call is a single attempt — the dispatcher's
/// policy is that a failed command is abandoned, not retried.
#[derive(Clone)]
pub struct RestGateway {
    http: reqwest::Client,
    base_url: String,
}

impl RestGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.api_base_url,
            Duration::from_millis(config.api_timeout_ms.max(1)),
        )
    }

    pub fn entity<E>(&self) -> RestEntityGateway<E>
    where
        E: Entity + Serialize + DeserializeOwned,
    {
        RestEntityGateway {
            gateway: self.clone(),
            _marker: PhantomData,
        }
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/api/{}", self.base_url, kind.resource())
    }

    fn entity_url(&self, kind: EntityKind, id: &str) -> String {
        format!("{}/api/{}/{id}", self.base_url, kind.resource())
    }

    fn scoped_url(&self, kind: EntityKind, parent_kind: EntityKind, parent_id: &str) -> String {
        format!(
            "{}/api/{}/{}/{parent_id}",
            self.base_url,
            kind.resource(),
            parent_kind.as_str()
        )
    }

    async fn send(
        &self,
        kind: EntityKind,
        request: reqwest::RequestBuilder,
    ) -> DomainResult<reqwest::Response> {
        let response = request.send().await.map_err(|err| {
            record_failure(kind, "transport");
            DomainError::Transport(err.to_string())
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        record_failure(kind, "upstream");
        match status {
            StatusCode::NOT_FOUND => Err(DomainError::NotFound),
            _ => Err(DomainError::Upstream {
                status: status.as_u16(),
                message,
            }),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        request: reqwest::RequestBuilder,
    ) -> DomainResult<T> {
        let response = self.send(kind, request).await?;
        response.json::<T>().await.map_err(|err| {
            record_failure(kind, "decode");
            DomainError::InvalidResponse(err.to_string())
        })
    }

    async fn fetch_text(
        &self,
        kind: EntityKind,
        request: reqwest::RequestBuilder,
    ) -> DomainResult<String> {
        let response = self.send(kind, request).await?;
        response.text().await.map_err(|err| {
            record_failure(kind, "decode");
            DomainError::InvalidResponse(err.to_string())
        })
    }
}

fn record_failure(kind: EntityKind, reason: &'static str) {
    counter!(
        GATEWAY_FAILURES_TOTAL,
        "kind" => kind.as_str(),
        "reason" => reason
    )
    .increment(1);
}

/// `EntityGateway` adapter for one kind over the shared REST client.
#[derive(Clone)]
pub struct RestEntityGateway<E> {
    gateway: RestGateway,
    _marker: PhantomData<fn() -> E>,
}

impl<E> EntityGateway<E> for RestEntityGateway<E>
where
    E: Entity + Serialize + DeserializeOwned,
{
    fn list(&self) -> BoxFuture<'_, DomainResult<Vec<E>>> {
        let url = self.gateway.collection_url(E::KIND);
        Box::pin(async move {
            self.gateway
                .fetch_json(E::KIND, self.gateway.http.get(url))
                .await
        })
    }

    fn get(&self, id: &str) -> BoxFuture<'_, DomainResult<E>> {
        let url = self.gateway.entity_url(E::KIND, id);
        Box::pin(async move {
            self.gateway
                .fetch_json(E::KIND, self.gateway.http.get(url))
                .await
        })
    }

    fn list_by_parent(
        &self,
        parent_kind: EntityKind,
        parent_id: &str,
    ) -> BoxFuture<'_, DomainResult<Vec<E>>> {
        let url = self.gateway.scoped_url(E::KIND, parent_kind, parent_id);
        Box::pin(async move {
            self.gateway
                .fetch_json(E::KIND, self.gateway.http.get(url))
                .await
        })
    }

    fn create(&self, entity: &E) -> BoxFuture<'_, DomainResult<E>> {
        let url = self.gateway.collection_url(E::KIND);
        let request = self.gateway.http.post(url).json(entity);
        Box::pin(async move { self.gateway.fetch_json(E::KIND, request).await })
    }

    fn update(&self, entity: &E) -> BoxFuture<'_, DomainResult<()>> {
        let url = self.gateway.entity_url(E::KIND, entity.id());
        let request = self.gateway.http.put(url).json(entity);
        Box::pin(async move {
            self.gateway.send(E::KIND, request).await?;
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let url = self.gateway.entity_url(E::KIND, id);
        Box::pin(async move {
            self.gateway
                .send(E::KIND, self.gateway.http.delete(url))
                .await?;
            Ok(())
        })
    }

    fn search(&self, term: &str) -> BoxFuture<'_, DomainResult<Vec<E>>> {
        let url = format!("{}/search", self.gateway.collection_url(E::KIND));
        let request = self.gateway.http.get(url).query(&[("term", term)]);
        Box::pin(async move { self.gateway.fetch_json(E::KIND, request).await })
    }
}

impl ExportGateway for RestGateway {
    fn export_message(&self, id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let url = format!("{}/export", self.entity_url(EntityKind::Message, id));
        Box::pin(async move { self.fetch_text(EntityKind::Message, self.http.get(url)).await })
    }

    fn export_field(&self, id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let url = format!("{}/export", self.entity_url(EntityKind::Field, id));
        Box::pin(async move { self.fetch_text(EntityKind::Field, self.http.get(url)).await })
    }

    fn export_root(&self, id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let url = format!("{}/export", self.entity_url(EntityKind::Root, id));
        Box::pin(async move { self.fetch_text(EntityKind::Root, self.http.get(url)).await })
    }

    fn export_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let url = format!("{}/api/roots/export-all/{project_id}", self.base_url);
        Box::pin(async move { self.fetch_text(EntityKind::Project, self.http.get(url)).await })
    }
}
