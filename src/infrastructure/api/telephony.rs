//! Adapter for the outbound-call voice gateway.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{
    CallConfirmation, OutboundCallRequest, OutboundNumber, TelephonyClient,
};

use super::ApiContext;

pub struct VoiceGatewayClient {
    http: reqwest::Client,
    ctx: ApiContext,
}

#[derive(Debug, Deserialize)]
struct NumberListReply {
    #[serde(default)]
    numbers: Vec<OutboundNumber>,
}

impl VoiceGatewayClient {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            http: super::http_client(),
            ctx,
        }
    }

    fn map_status(status: reqwest::StatusCode, body: String, action: &str) -> DomainError {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            DomainError::Telephony("Voice provider credentials missing or invalid".into())
        } else {
            DomainError::Telephony(format!("{action} returned {status}: {body}"))
        }
    }
}

#[async_trait]
impl TelephonyClient for VoiceGatewayClient {
    async fn list_outbound_numbers(&self) -> DomainResult<Vec<OutboundNumber>> {
        let url = self.ctx.endpoint("v1/voice/numbers");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.ctx.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, body, "number listing"));
        }

        Ok(response.json::<NumberListReply>().await?.numbers)
    }

    async fn place_call(&self, request: &OutboundCallRequest) -> DomainResult<CallConfirmation> {
        let url = self.ctx.endpoint("v1/voice/calls");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.ctx.token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_status(status, body, "call initiation"));
        }

        Ok(response.json::<CallConfirmation>().await?)
    }
}
