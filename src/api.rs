// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking client for the `/api/finance/*` REST endpoints.

use chrono::NaiveDate;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::ClientError;
use crate::ingest::{
    IngestReport, WireAccount, WireBudget, WireCategory, WireRecord, WireTransaction,
    parse_collection,
};
use crate::models::{Ledger, Transaction, TransactionType};

pub const FINANCE_PREFIX: &str = "api/finance";

/// The shared developer token, passed explicitly to every client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().trim().to_string(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential").field("token", &"***").finish()
    }
}

/// Anything that can produce a full ledger snapshot.
pub trait LedgerSource {
    fn load_ledger(&self) -> anyhow::Result<(Ledger, IngestReport)>;
}

/// Request body for creating or updating a transaction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category_id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Single<T> {
    Wrapped { data: T },
    Bare(T),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: reqwest::blocking::Client,
    credential: Credential,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        credential: Credential,
        timeout_secs: u64,
    ) -> Result<Self, ClientError> {
        let mut raw = base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|e| ClientError::BaseUrl(e.to_string()))?;
        let http = crate::utils::http_client(timeout_secs)
            .map_err(|e| ClientError::BaseUrl(format!("http client: {e}")))?;
        Ok(Self {
            base,
            http,
            credential,
        })
    }

    /// `{base}/api/finance/{collection}[/{id}]?apiKey={token}`
    pub fn endpoint(&self, collection: &str, id: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self
            .base
            .join(&format!("{FINANCE_PREFIX}/{collection}"))
            .map_err(|e| ClientError::BaseUrl(e.to_string()))?;
        if let Some(id) = id {
            url.path_segments_mut()
                .map_err(|_| ClientError::BaseUrl(self.base.to_string()))?
                .push(id);
        }
        url.query_pairs_mut()
            .append_pair("apiKey", self.credential.token());
        Ok(url)
    }

    fn read(&self, res: reqwest::blocking::Response) -> Result<String, ClientError> {
        let status = res.status();
        let body = res.text()?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::from_status(status.as_u16(), body))
        }
    }

    fn get_collection(&self, collection: &str) -> Result<String, ClientError> {
        let url = self.endpoint(collection, None)?;
        debug!(collection, "GET finance collection");
        let res = self.http.get(url).send()?;
        self.read(res)
    }

    fn fetch<W: WireRecord>(&self, report: &mut IngestReport) -> Result<Vec<W::Model>, ClientError> {
        let body = self.get_collection(W::COLLECTION)?;
        let items = parse_collection::<W>(&body, report)?;
        debug!(collection = W::COLLECTION, count = items.len(), "fetched");
        Ok(items)
    }

    pub fn fetch_ledger(&self) -> Result<(Ledger, IngestReport), ClientError> {
        let mut report = IngestReport::default();
        let ledger = Ledger {
            accounts: self.fetch::<WireAccount>(&mut report)?,
            categories: self.fetch::<WireCategory>(&mut report)?,
            transactions: self.fetch::<WireTransaction>(&mut report)?,
            budgets: self.fetch::<WireBudget>(&mut report)?,
        };
        Ok((ledger, report))
    }

    /// Checks the token with a cheap authenticated read.
    pub fn verify(&self) -> Result<(), ClientError> {
        self.get_collection(WireAccount::COLLECTION).map(|_| ())
    }

    fn decode_transaction(body: &str) -> Result<Transaction, ClientError> {
        let wire = match serde_json::from_str::<Single<WireTransaction>>(body)? {
            Single::Wrapped { data } => data,
            Single::Bare(t) => t,
        };
        Ok(wire.into_model()?)
    }

    pub fn create_transaction(&self, draft: &TransactionDraft) -> Result<Transaction, ClientError> {
        let url = self.endpoint(WireTransaction::COLLECTION, None)?;
        debug!(description = %draft.description, "POST transaction");
        let res = self.http.post(url).json(draft).send()?;
        Self::decode_transaction(&self.read(res)?)
    }

    pub fn update_transaction(
        &self,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction, ClientError> {
        let url = self.endpoint(WireTransaction::COLLECTION, Some(id))?;
        debug!(id, "PUT transaction");
        let res = self.http.put(url).json(draft).send()?;
        Self::decode_transaction(&self.read(res)?)
    }

    pub fn delete_transaction(&self, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(WireTransaction::COLLECTION, Some(id))?;
        debug!(id, "DELETE transaction");
        let res = self.http.delete(url).send()?;
        self.read(res).map(|_| ())
    }
}

impl LedgerSource for ApiClient {
    fn load_ledger(&self) -> anyhow::Result<(Ledger, IngestReport)> {
        Ok(self.fetch_ledger()?)
    }
}
